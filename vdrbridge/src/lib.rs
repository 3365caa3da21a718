//! VDR bridge library for VDRLink
//!
//! This crate connects a VDR device (through [`vdrclient`]) to a
//! home-automation state tree. It owns the persisted-key contract:
//!
//! - `ChannelList` / `RecordingsList`: JSON lists mirrored from the
//!   device on every poll, written acknowledged.
//! - `ChannelSelect` / `KeyPress`: command keys written by the user
//!   with `ack = false`, acknowledged by the bridge and forwarded to the
//!   device as fire-and-forget POSTs.
//!
//! The host platform's state storage is injected through the
//! [`StateStore`] trait; [`MemoryStateStore`] is the in-process
//! implementation. All platform services arrive by parameter passing;
//! the crate holds no global handles.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use vdrbridge::{BridgeConfig, MemoryStateStore, VdrAdapter};
//! use vdrclient::VdrClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BridgeConfig::load()?;
//!     let client = VdrClient::builder()
//!         .host(config.ip.as_str())
//!         .port(config.port)
//!         .build()?;
//!
//!     let store = Arc::new(MemoryStateStore::new());
//!     let adapter = VdrAdapter::new(config, Arc::new(client), store);
//!     adapter.run(CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mirror;
pub mod state;

pub use adapter::{Message, VdrAdapter, MESSAGE_RECEIVED};
pub use config::BridgeConfig;
pub use dispatcher::CommandDispatcher;
pub use error::{BridgeError, Result};
pub use mirror::{ChannelEntry, RecordingEntry, StateMirror};
pub use state::{
    MemoryStateStore, ObjectMeta, PersistedKey, StateChange, StateKind, StateStore, StateValue,
    StoreError, state_id,
};

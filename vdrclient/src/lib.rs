//! VDR restful API client library for VDRLink
//!
//! This crate provides a Rust client for the REST interface exposed by
//! the VDR restful API plugin.
//!
//! # Features
//!
//! - **Channel List**: `GET /channels.json`, typed as [`Channel`]
//! - **Recording List**: `GET /recordings.json`, typed as [`Recording`]
//! - **Device Info**: `GET /info.json`
//! - **Remote Control**: fire-and-forget `POST /remote/{key}` and
//!   `POST /remote/switch/{channel}` commands
//!
//! Every operation is a single best-effort HTTP call: no retries, no
//! caching, no authentication. Failures are reported through the crate's
//! [`Error`] taxonomy and carry no state.
//!
//! # Example
//!
//! ```no_run
//! use vdrclient::VdrClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VdrClient::builder().host("192.168.1.20").build()?;
//!
//!     let channels = client.channels().await?;
//!     println!("device has {} channels", channels.len());
//!
//!     client.select_channel("5").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::{
    ClientBuilder, VdrClient, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::{Error, Result};
pub use models::{Channel, ChannelsResponse, DeviceInfo, Recording, RecordingsResponse};

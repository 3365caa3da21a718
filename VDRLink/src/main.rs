//! VDRLink daemon
//!
//! Bridges a VDR device into an in-process home-automation state tree:
//! polls the device's restful API for channel and recording lists, and
//! forwards `KeyPress`/`ChannelSelect` command writes back to it.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vdrbridge::{BridgeConfig, MemoryStateStore, VdrAdapter};
use vdrclient::VdrClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BridgeConfig::load().context("loading configuration")?;

    let client = VdrClient::builder()
        .host(config.ip.as_str())
        .port(config.port)
        .timeout(config.request_timeout())
        .build()
        .context("building device client")?;

    let store = Arc::new(MemoryStateStore::new());
    let adapter = VdrAdapter::new(config, Arc::new(client), store);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            shutdown.cancel();
        }
    });

    adapter.run(cancel).await?;
    Ok(())
}

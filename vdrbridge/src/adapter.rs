//! Adapter lifecycle
//!
//! [`VdrAdapter`] wires the client, mirror and dispatcher together: it
//! registers the persisted keys, runs the initial device poll, and then
//! drives a single event loop over state-change notifications, the
//! optional re-poll tick, and the shutdown token. The host runtime's
//! cooperative scheduling is preserved: one loop, one change handled at
//! a time, never two handlers interleaved for the same key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::Interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use vdrclient::VdrClient;

use crate::config::BridgeConfig;
use crate::dispatcher::CommandDispatcher;
use crate::error::Result;
use crate::mirror::StateMirror;
use crate::state::{ObjectMeta, PersistedKey, StateStore, state_id};

/// Reply sent for an echoed message-box `send` command
pub const MESSAGE_RECEIVED: &str = "Message received";

/// An inbound platform message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message command (only `send` is understood)
    pub command: String,
    /// Free-form payload
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Sender identity, used to address the reply
    #[serde(default)]
    pub from: String,
}

/// The bridge's lifecycle controller
pub struct VdrAdapter {
    config: BridgeConfig,
    client: Arc<VdrClient>,
    store: Arc<dyn StateStore>,
    mirror: StateMirror,
    dispatcher: CommandDispatcher,
}

impl VdrAdapter {
    pub fn new(config: BridgeConfig, client: Arc<VdrClient>, store: Arc<dyn StateStore>) -> Self {
        let mirror = StateMirror::new(store.clone(), config.namespace.clone());
        let dispatcher =
            CommandDispatcher::new(client.clone(), store.clone(), config.namespace.clone());
        Self {
            config,
            client,
            store,
            mirror,
            dispatcher,
        }
    }

    /// Register the persisted keys and run the initial poll
    pub async fn start(&self) -> Result<()> {
        info!(
            "starting VDR bridge, device {}:{}",
            self.config.ip, self.config.port
        );

        self.register_objects().await?;

        match self.client.info().await {
            Ok(info) => debug!(
                "device info: version {}",
                info.version.as_deref().unwrap_or("unknown")
            ),
            Err(err) => warn!("device info unavailable: {}", err),
        }

        self.refresh().await;
        Ok(())
    }

    /// Create-or-replace the four persisted keys
    async fn register_objects(&self) -> Result<()> {
        for key in PersistedKey::ALL {
            let meta = ObjectMeta::new(key.as_str(), key.kind());
            self.store
                .set_object(&state_id(&self.config.namespace, key), meta)
                .await?;
        }
        Ok(())
    }

    /// Poll the device once
    ///
    /// Each poll failure is logged and leaves the previously persisted
    /// value in place; nothing propagates out of here.
    pub async fn refresh(&self) {
        match self.client.channels().await {
            Ok(channels) => {
                if let Err(err) = self.mirror.publish_channels(&channels).await {
                    error!("failed to publish channel list: {}", err);
                }
            }
            Err(err) => error!("channel poll failed: {}", err),
        }

        match self.client.recordings().await {
            Ok(recordings) => {
                if let Err(err) = self.mirror.publish_recordings(&recordings).await {
                    error!("failed to publish recording list: {}", err);
                }
            }
            Err(err) => error!("recording poll failed: {}", err),
        }
    }

    /// Start the bridge and serve its event loop until cancellation
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        self.start().await?;

        let mut changes = self.store.subscribe();
        let mut poll = self.config.poll_interval().map(tokio::time::interval);
        if let Some(interval) = poll.as_mut() {
            // The first tick completes immediately; start() already polled.
            interval.tick().await;
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                change = changes.recv() => match change {
                    Ok(change) => self.dispatcher.handle_change(&change).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("state change stream lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = maybe_tick(poll.as_mut()) => self.refresh().await,
            }
        }

        info!("VDR bridge stopped");
        Ok(())
    }

    /// Answer an inbound platform message
    ///
    /// `send` is acknowledged with an echo reply; anything else is
    /// ignored.
    pub fn handle_message(&self, message: &Message) -> Option<String> {
        if message.command == "send" {
            debug!("message box: send from {:?}", message.from);
            Some(MESSAGE_RECEIVED.to_string())
        } else {
            None
        }
    }
}

/// Await the next tick of an optional interval; pends forever when unset
async fn maybe_tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

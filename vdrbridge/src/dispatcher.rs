//! Command dispatcher: state writes → device commands
//!
//! User-written command values arrive as state changes with `ack ==
//! false`. The dispatcher acknowledges them immediately (re-writing the
//! same value with `ack == true`) and then fires the device call.
//! Acknowledgement happens before the call is attempted, so it never
//! implies the device accepted the command.

use std::sync::Arc;

use tracing::{debug, error, info};

use vdrclient::VdrClient;

use crate::state::{PersistedKey, StateChange, StateStore, StateValue};

/// A device command decoded from a state change
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Remote-control key press
    PressKey(String),
    /// Channel switch
    SelectChannel(String),
}

/// Routes inbound state changes to device commands
pub struct CommandDispatcher {
    client: Arc<VdrClient>,
    store: Arc<dyn StateStore>,
    namespace: String,
}

impl CommandDispatcher {
    pub fn new(
        client: Arc<VdrClient>,
        store: Arc<dyn StateStore>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            namespace: namespace.into(),
        }
    }

    /// Handle one state change; never fails
    ///
    /// Acknowledged values, foreign namespaces and non-command keys are
    /// ignored. Device errors are logged and discarded.
    pub async fn handle_change(&self, change: &StateChange) {
        debug!(
            "state change {} ack={} val={}",
            change.id, change.state.ack, change.state.val
        );

        let Some(command) = self.route(change) else {
            return;
        };

        // Acknowledge before the device call: the key holds status from
        // here on, even if the command never reaches the device.
        let acknowledged = StateValue::status(change.state.val.clone());
        if let Err(err) = self.store.set_state(&change.id, acknowledged).await {
            error!("failed to acknowledge {}: {}", change.id, err);
            return;
        }

        let result = match &command {
            Command::PressKey(key) => {
                info!("sending key {}", key);
                self.client.press_key(key).await
            }
            Command::SelectChannel(channel) => {
                info!("selecting channel {}", channel);
                self.client.select_channel(channel).await
            }
        };

        if let Err(err) = result {
            error!("device command failed: {}", err);
        }
    }

    /// Decode the command a change encodes, if any
    fn route(&self, change: &StateChange) -> Option<Command> {
        if change.state.ack {
            return None;
        }

        let key = change
            .id
            .strip_prefix(&self.namespace)?
            .strip_prefix('.')?;
        let key = PersistedKey::parse(key)?;

        match key {
            PersistedKey::KeyPress => Some(Command::PressKey(change.state.val.clone())),
            PersistedKey::ChannelSelect => Some(Command::SelectChannel(change.state.val.clone())),
            PersistedKey::ChannelList | PersistedKey::RecordingsList => None,
        }
    }
}

//! State mirror: device lists → persisted JSON values
//!
//! The mirror maps the device's wire records to the persisted shapes
//! (`{nr, name, chid}` for channels, `{nr, name, filename}` for
//! recordings), preserving source order, and overwrites the backing
//! state value with the serialized list as acknowledged status.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use vdrclient::{Channel, Recording};

use crate::error::Result;
use crate::state::{PersistedKey, StateStore, StateValue, state_id};

/// Persisted shape of one channel entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelEntry {
    pub nr: u32,
    pub name: String,
    pub chid: String,
}

impl From<&Channel> for ChannelEntry {
    fn from(channel: &Channel) -> Self {
        Self {
            nr: channel.number,
            name: channel.name.clone(),
            chid: channel.channel_id.clone(),
        }
    }
}

/// Persisted shape of one recording entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordingEntry {
    pub nr: u32,
    pub name: String,
    pub filename: String,
}

impl From<&Recording> for RecordingEntry {
    fn from(recording: &Recording) -> Self {
        Self {
            nr: recording.number,
            name: recording.name.clone(),
            filename: recording.filename.clone(),
        }
    }
}

/// Publishes device lists into the state tree
pub struct StateMirror {
    store: Arc<dyn StateStore>,
    namespace: String,
}

impl StateMirror {
    pub fn new(store: Arc<dyn StateStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Serialize the channel list into `ChannelList`
    pub async fn publish_channels(&self, channels: &[Channel]) -> Result<()> {
        debug!("publishing channel list, length: {}", channels.len());
        let entries: Vec<ChannelEntry> = channels.iter().map(ChannelEntry::from).collect();
        self.publish(PersistedKey::ChannelList, &entries).await
    }

    /// Serialize the recording list into `RecordingsList`
    pub async fn publish_recordings(&self, recordings: &[Recording]) -> Result<()> {
        debug!("publishing recording list, length: {}", recordings.len());
        let entries: Vec<RecordingEntry> = recordings.iter().map(RecordingEntry::from).collect();
        self.publish(PersistedKey::RecordingsList, &entries).await
    }

    async fn publish<T: Serialize>(&self, key: PersistedKey, entries: &[T]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.store
            .set_state(&state_id(&self.namespace, key), StateValue::status(json))
            .await?;
        Ok(())
    }
}

//! Persisted state tree abstraction
//!
//! The bridge never owns the host platform's state storage; it programs
//! against the [`StateStore`] trait and receives it by injection. The
//! trait models the small slice of a home-automation state tree the
//! bridge needs: named state objects, overwritable values with an
//! acknowledgement flag, and a change notification stream.
//!
//! [`MemoryStateStore`] is the in-process implementation used by the
//! daemon and the tests.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};

/// Result type alias for state store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Capacity of the change broadcast channel
const CHANGE_BUS_CAPACITY: usize = 64;

/// Errors raised by a state store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or could not complete the operation
    #[error("state backend unavailable: {0}")]
    Backend(String),
}

/// A persisted value with acknowledgement semantics
///
/// `ack == false` marks a pending command written by a user;
/// `ack == true` marks confirmed status written by the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateValue {
    /// The raw value (free text or serialized JSON)
    pub val: String,
    /// Command (`false`) vs. status (`true`)
    pub ack: bool,
    /// When the value was written
    pub ts: DateTime<Utc>,
}

impl StateValue {
    /// A pending command value (`ack = false`)
    pub fn command(val: impl Into<String>) -> Self {
        Self {
            val: val.into(),
            ack: false,
            ts: Utc::now(),
        }
    }

    /// An acknowledged status value (`ack = true`)
    pub fn status(val: impl Into<String>) -> Self {
        Self {
            val: val.into(),
            ack: true,
            ts: Utc::now(),
        }
    }
}

/// Declared type of a state object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    /// String value holding a serialized JSON document
    Json,
    /// Free-text string value
    Text,
}

impl StateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

/// Metadata of a state object, registered once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub name: String,
    pub kind: StateKind,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A state write, as delivered to subscribers
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Fully qualified state id (`{namespace}.{key}`)
    pub id: String,
    pub state: StateValue,
}

/// The persisted keys owned by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistedKey {
    /// Serialized channel list (producer side)
    ChannelList,
    /// Serialized recording list (producer side)
    RecordingsList,
    /// Channel switch command (consumer/producer pair)
    ChannelSelect,
    /// Remote-control key command (consumer/producer pair)
    KeyPress,
}

impl PersistedKey {
    pub const ALL: [PersistedKey; 4] = [
        Self::ChannelList,
        Self::RecordingsList,
        Self::ChannelSelect,
        Self::KeyPress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChannelList => "ChannelList",
            Self::RecordingsList => "RecordingsList",
            Self::ChannelSelect => "ChannelSelect",
            Self::KeyPress => "KeyPress",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ChannelList" => Some(Self::ChannelList),
            "RecordingsList" => Some(Self::RecordingsList),
            "ChannelSelect" => Some(Self::ChannelSelect),
            "KeyPress" => Some(Self::KeyPress),
            _ => None,
        }
    }

    /// Declared type of the backing state object
    pub fn kind(&self) -> StateKind {
        match self {
            Self::ChannelList | Self::RecordingsList => StateKind::Json,
            Self::ChannelSelect | Self::KeyPress => StateKind::Text,
        }
    }

    /// Whether user writes to this key encode a device command
    pub fn is_command(&self) -> bool {
        matches!(self, Self::ChannelSelect | Self::KeyPress)
    }
}

impl fmt::Display for PersistedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the fully qualified id of a persisted key
pub fn state_id(namespace: &str, key: PersistedKey) -> String {
    format!("{}.{}", namespace, key.as_str())
}

/// The slice of the host platform's state tree the bridge talks to
///
/// Writers only overwrite; there is no read-modify-write, so
/// implementations need no locking discipline beyond their own maps.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Idempotent create-or-replace of a state object's metadata
    async fn set_object(&self, id: &str, meta: ObjectMeta) -> Result<()>;

    /// Fetch a state object's metadata
    async fn get_object(&self, id: &str) -> Result<Option<ObjectMeta>>;

    /// Overwrite a state value, notifying subscribers
    async fn set_state(&self, id: &str, state: StateValue) -> Result<()>;

    /// Fetch a state value
    async fn get_state(&self, id: &str) -> Result<Option<StateValue>>;

    /// Subscribe to all state writes
    fn subscribe(&self) -> broadcast::Receiver<StateChange>;
}

/// In-process state store backed by maps and a broadcast bus
pub struct MemoryStateStore {
    objects: RwLock<HashMap<String, ObjectMeta>>,
    states: RwLock<HashMap<String, StateValue>>,
    changes: broadcast::Sender<StateChange>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUS_CAPACITY);
        Self {
            objects: RwLock::new(HashMap::new()),
            states: RwLock::new(HashMap::new()),
            changes,
        }
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn set_object(&self, id: &str, meta: ObjectMeta) -> Result<()> {
        self.objects.write().await.insert(id.to_owned(), meta);
        Ok(())
    }

    async fn get_object(&self, id: &str) -> Result<Option<ObjectMeta>> {
        Ok(self.objects.read().await.get(id).cloned())
    }

    async fn set_state(&self, id: &str, state: StateValue) -> Result<()> {
        self.states.write().await.insert(id.to_owned(), state.clone());
        // A send error only means nobody is subscribed right now.
        let _ = self.changes.send(StateChange {
            id: id.to_owned(),
            state,
        });
        Ok(())
    }

    async fn get_state(&self, id: &str) -> Result<Option<StateValue>> {
        Ok(self.states.read().await.get(id).cloned())
    }

    fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }
}

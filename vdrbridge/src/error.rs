//! Error types for the bridge

use crate::state::StoreError;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while bridging device and state tree
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The state store rejected a write
    #[error("state store failure: {0}")]
    Store(#[from] StoreError),

    /// Serializing a persisted value failed
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

//! Data models for VDR restful API responses
//!
//! This module contains the structures needed to deserialize responses
//! from the VDR restful API plugin. Unknown fields are ignored so the
//! client keeps working when the plugin adds attributes.

use serde::{Deserialize, Serialize};

/// A single entry from `/channels.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    /// Channel number as shown on the device
    pub number: u32,
    /// Human-readable channel name (e.g., "Das Erste HD")
    pub name: String,
    /// DVB channel identifier (e.g., "S19.2E-1-1019-10301")
    pub channel_id: String,
}

/// A single entry from `/recordings.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recording {
    /// Recording number as assigned by the device
    pub number: u32,
    /// Recording title
    pub name: String,
    /// Path of the recording on the device's disk
    pub filename: String,
}

/// Response from the `/channels.json` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Vec<Channel>,
}

/// Response from the `/recordings.json` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RecordingsResponse {
    pub recordings: Vec<Recording>,
}

/// Response from the `/info.json` endpoint
///
/// The payload varies between plugin versions, so everything beyond the
/// version string is kept as raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    /// VDR version string, when reported
    pub version: Option<String>,
    /// Remaining fields of the info payload
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

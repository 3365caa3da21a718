//! Bridge configuration
//!
//! Configuration is a typed struct loaded once at startup and passed by
//! value into the adapter, never held as a global. Sources, in increasing
//! precedence: built-in defaults, a YAML file (path from the
//! `VDRLINK_CONFIG` environment variable), individual `VDRLINK_*`
//! environment overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vdrclient::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Environment variable naming the config file path
pub const ENV_CONFIG_PATH: &str = "VDRLINK_CONFIG";

/// Environment override for the device IP
pub const ENV_IP: &str = "VDRLINK_IP";

/// Environment override for the device port
pub const ENV_PORT: &str = "VDRLINK_PORT";

/// Default namespace prefix for persisted keys
pub const DEFAULT_NAMESPACE: &str = "vdr.0";

/// VDRLink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Device IP address or hostname
    pub ip: String,
    /// Port of the device's restful API
    pub port: u16,
    /// Namespace prefix identifying this bridge instance in the state tree
    pub namespace: String,
    /// Per-request timeout for device calls, in seconds
    pub request_timeout_secs: u64,
    /// Interval between device re-polls, in seconds
    ///
    /// Unset means the channel and recording lists are fetched only once
    /// at startup.
    pub poll_interval_secs: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            namespace: DEFAULT_NAMESPACE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_secs: None,
        }
    }
}

impl BridgeConfig {
    /// Load the configuration from the default locations
    ///
    /// Reads the file named by `VDRLINK_CONFIG` when set, otherwise
    /// starts from defaults; `VDRLINK_IP`/`VDRLINK_PORT` override either.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load the configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text)
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing config file")
    }

    /// Apply individual overrides from a lookup function
    ///
    /// Taking the lookup as a parameter keeps the override logic
    /// testable without touching the process environment.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(ip) = lookup(ENV_IP) {
            self.ip = ip;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .parse()
                .with_context(|| format!("invalid {ENV_PORT} value: {port}"))?;
        }
        Ok(())
    }

    /// Per-request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Poll interval as a [`Duration`], when configured
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_secs.map(Duration::from_secs)
    }
}

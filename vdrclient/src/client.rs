//! HTTP client for the VDR restful API
//!
//! This module provides a client for the REST interface exposed by the
//! VDR restful API plugin: channel and recording lists, device info, and
//! the remote-control endpoints.
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
//!     for channel in client.channels().await? {
//!         println!("{:>3} {}", channel.number, channel.name);
//!     }
//!
//!     // Press a key on the device's remote control
//!     client.press_key("Menu").await?;
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{Channel, ChannelsResponse, DeviceInfo, Recording, RecordingsResponse};
use reqwest::header;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default device host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of the VDR restful API plugin
pub const DEFAULT_PORT: u16 = 8002;

/// Default timeout for HTTP requests (10 seconds)
///
/// The device sits on the local network; anything slower than this is
/// treated as a transport failure.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// VDR restful API client
///
/// The client is stateless: every call is a single best-effort request
/// with no retry, caching, or session state. Failed requests surface as
/// [`Error`] values and leave no trace in the client.
#[derive(Debug, Clone)]
pub struct VdrClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl VdrClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL (`http://{host}:{port}`)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the internal HTTP client
    ///
    /// Useful for sharing the connection pool with other components.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Fetch the channel list from `/channels.json`
    pub async fn channels(&self) -> Result<Vec<Channel>> {
        debug!("retrieving channel list");
        let response: ChannelsResponse = self.fetch_json("channels.json").await?;
        Ok(response.channels)
    }

    /// Fetch the recording list from `/recordings.json`
    pub async fn recordings(&self) -> Result<Vec<Recording>> {
        debug!("retrieving recording list");
        let response: RecordingsResponse = self.fetch_json("recordings.json").await?;
        Ok(response.recordings)
    }

    /// Fetch device information from `/info.json`
    pub async fn info(&self) -> Result<DeviceInfo> {
        self.fetch_json("info.json").await
    }

    /// Perform a GET request against `{base}/{path}` and parse the JSON body
    ///
    /// The response is rejected before the body is read when the status is
    /// not 200 or the content type is not `application/json`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Status(status));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let is_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"));
        if !is_json {
            return Err(Error::ContentType(content_type));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Press a key on the device's remote control (`POST /remote/{key}`)
    pub async fn press_key(&self, key: &str) -> Result<()> {
        self.post_command("remote", key).await
    }

    /// Switch the device to a channel (`POST /remote/switch/{channel}`)
    pub async fn select_channel(&self, channel: &str) -> Result<()> {
        self.post_command("remote/switch", channel).await
    }

    /// Perform a POST to `{base}/{resource}/{command}` with an empty body
    ///
    /// This is fire-and-forget: the response status is not inspected, the
    /// body is drained and logged at debug level, and only transport
    /// failures are reported.
    pub async fn post_command(&self, resource: &str, command: &str) -> Result<()> {
        let url = self.endpoint(&format!("{}/{}", resource, command))?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_LENGTH, 0)
            .timeout(self.timeout)
            .send()
            .await?;

        debug!("device answered {}", response.status());
        let body = response.text().await?;
        if !body.is_empty() {
            debug!("response body: {}", body);
        }

        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }
}

/// Builder for [`VdrClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    host: String,
    port: u16,
    timeout: Duration,
    client: Option<Client>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            client: None,
        }
    }
}

impl ClientBuilder {
    /// Set the device host (IP address or hostname)
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the device port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom `reqwest::Client`
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings.
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<VdrClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };
        let base_url = format!("http://{}:{}", self.host, self.port);
        // Fail on a bad host now rather than on the first request.
        Url::parse(&base_url)?;

        Ok(VdrClient {
            client,
            base_url,
            timeout: self.timeout,
        })
    }
}

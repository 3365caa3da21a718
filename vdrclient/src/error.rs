//! Error types for the VDR client

/// Result type alias for VDR client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the VDR restful API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection-level failure (refused, reset, timed out)
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered with a status other than 200
    #[error("device returned status {0}")]
    Status(reqwest::StatusCode),

    /// The device answered with a payload that is not JSON
    #[error("unexpected content type: {}", .0.as_deref().unwrap_or("<none>"))]
    ContentType(Option<String>),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Whether the error was raised before the response body was read.
    ///
    /// `Status` and `ContentType` are rejected up front; the body of such
    /// a response is never inspected.
    pub fn is_rejected_response(&self) -> bool {
        matches!(self, Self::Status(_) | Self::ContentType(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_display() {
        let err = Error::ContentType(Some("text/html".to_string()));
        assert_eq!(err.to_string(), "unexpected content type: text/html");

        let err = Error::ContentType(None);
        assert_eq!(err.to_string(), "unexpected content type: <none>");
    }

    #[test]
    fn test_status_display() {
        let err = Error::Status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "device returned status 404 Not Found");
    }
}

//! Error types shared by the transport, session manager, and dispatcher.
//!
//! Page loaders never surface these to the page; they collapse failures into
//! an explicit "unavailable" view state instead.

/// Failure below the HTTP layer: the request never produced a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// A status line arrived but the body could not be read.
    #[error("response body read failed: {0}")]
    Body(String),
}

/// Errors produced by authenticated API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failures propagate unchanged to the caller.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected JSON shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The operation needs a stored session and none is present.
    #[error("not signed in; log in first")]
    NotAuthenticated,
}

impl ApiError {
    /// Build a status error, preferring the server's `{"error": "..."}` message
    /// over the raw body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: String,
        }

        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => "empty response".to_owned(),
            Err(_) => body.trim().to_owned(),
        };
        Self::Status { status, message }
    }
}

/// A configuration value could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The base URL is empty or lacks an http(s) scheme.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

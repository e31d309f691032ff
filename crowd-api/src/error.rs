/// Error types for the crowd API transports
use thiserror::Error;

/// Failure of a single transport call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The caller's cancellation token fired before the call finished
    #[error("request canceled")]
    Canceled,

    /// The client-side deadline elapsed
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("server responded with status {0}")]
    Status(u16),

    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A selection value could not be turned into a request parameter
    #[error("invalid request parameter: {0}")]
    InvalidParam(String),
}

impl TransportError {
    /// Cancellation is not a failure; callers discard it silently.
    pub fn is_cancel(&self) -> bool {
        matches!(self, TransportError::Canceled)
    }

    /// Whether this is the given HTTP status.
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, TransportError::Status(c) if *c == code)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

#[cfg(all(feature = "api", not(target_arch = "wasm32")))]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Type alias for Results using TransportError
pub type Result<T> = std::result::Result<T, TransportError>;

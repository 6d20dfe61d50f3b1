//! Error types for the funnel SDK

use thiserror::Error;

/// Error codes for remote gateway failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// Request never produced a response (connect, DNS, reset)
    NetworkError,
    /// Update target does not exist on the remote side
    NotFound,
    /// Remote rejected the request parameters or method
    ValidationError,
    /// Remote failed while handling the request
    ServerError,
    /// Response arrived but its body did not match the expected shape
    DecodeError,
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError => write!(f, "NETWORK_ERROR"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::ValidationError => write!(f, "VALIDATION_ERROR"),
            Self::ServerError => write!(f, "SERVER_ERROR"),
            Self::DecodeError => write!(f, "DECODE_ERROR"),
        }
    }
}

/// Failure of a single remote gateway call.
///
/// Never fatal: the tracker branches on it and falls back to the local store.
#[derive(Debug, Error)]
#[error("{message} (code: {code})")]
pub struct GatewayError {
    /// Error code
    pub code: GatewayErrorCode,
    /// Human-readable message
    pub message: String,
    /// HTTP status code (for non-success responses)
    pub status_code: Option<u16>,
}

impl GatewayError {
    /// Create a new error
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new error with status code
    pub fn with_status(code: GatewayErrorCode, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            code,
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::DecodeError, message)
    }

    /// Build an error from a non-success HTTP response
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::with_status(map_status_to_error_code(status), message, status)
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Map HTTP status code to error code
pub(crate) fn map_status_to_error_code(status: u16) -> GatewayErrorCode {
    match status {
        404 => GatewayErrorCode::NotFound,
        400 | 405 | 422 => GatewayErrorCode::ValidationError,
        500..=599 => GatewayErrorCode::ServerError,
        _ => GatewayErrorCode::NetworkError,
    }
}

/// Failure while reading or writing the local fallback store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode collection: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to persist local store: {0}")]
    Io(#[from] std::io::Error),
    #[error("local store lock poisoned")]
    Poisoned,
}

/// Result type for local store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

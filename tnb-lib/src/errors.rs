//! Error types for TNB client operations.
//!
//! Every fallible operation in the crate returns [`TnbError`]. Key and
//! signature failures are never retryable: they mean corrupted data or a
//! forged message, and callers must see them.

use std::path::PathBuf;

/// Error codes for FFI and scripting integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TnbErrorCode {
    /// Paginated iterator has no more items
    IteratorEmpty = 1000,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// HTTP 401
    Unauthorized = 3001,
    /// HTTP 403
    Forbidden = 3003,
    /// HTTP 404
    NotFound = 3004,
    /// HTTP 503
    NetworkServerError = 3503,
    /// Any other HTTP error status
    Http = 3999,
    /// Response failed schema validation
    Validation = 4000,
    /// Serialization error
    Serialization = 4001,
    /// Invalid configuration
    Config = 4002,
    /// Generic key signing failure
    Keysign = 5000,
    /// Malformed key material
    InvalidKey = 5001,
    /// Key file missing
    KeyfileNotFound = 5002,
    /// Key file already present
    KeyfileExists = 5003,
    /// Private key could not be loaded
    SigningKeyLoadFailed = 5004,
    /// Public key could not be loaded
    VerifyKeyLoadFailed = 5005,
    /// Signature did not verify
    SignatureVerifyFailed = 5006,
}

/// Error type for TNB client operations.
#[derive(Debug, thiserror::Error)]
pub enum TnbError {
    /// A paginated iterator is exhausted. Expected end-of-sequence signal.
    #[error("iterator is empty")]
    IteratorEmpty,

    /// Transport/network layer error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection failed.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target node URL
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The node did not accept the request signature (HTTP 401).
    #[error("401 Unauthorized: {0}")]
    Unauthorized(String),

    /// The node refused access to the endpoint (HTTP 403).
    #[error("403 Forbidden: {0}")]
    Forbidden(String),

    /// The endpoint or resource does not exist (HTTP 404).
    #[error("404 Not Found: {0}")]
    NotFound(String),

    /// The node failed while handling the request (HTTP 503).
    #[error("503 Service Unavailable: {0}")]
    NetworkServerError(String),

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// A response did not match the expected shape.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Generic key signing failure (unreadable or unwritable key file).
    #[error("keysign error: {0}")]
    Keysign(String),

    /// Malformed key material, such as a seed of the wrong length.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The key file does not exist.
    #[error("keyfile '{}' was not found", .0.display())]
    KeyfileNotFound(PathBuf),

    /// The key file exists and will not be overwritten.
    #[error("keyfile '{}' already exists", .0.display())]
    KeyfileExists(PathBuf),

    /// The private key could not be loaded.
    #[error("signing key load failed: {0}")]
    SigningKeyLoadFailed(String),

    /// The public key could not be loaded.
    #[error("verify key load failed: {0}")]
    VerifyKeyLoadFailed(String),

    /// The signature does not match the message and public key.
    #[error("bad signature: {0}")]
    SignatureVerifyFailed(String),
}

impl TnbError {
    /// Get the error code for FFI/scripting integration.
    pub fn code(&self) -> TnbErrorCode {
        match self {
            Self::IteratorEmpty => TnbErrorCode::IteratorEmpty,
            Self::Transport(_) => TnbErrorCode::Transport,
            Self::ConnectionFailed { .. } => TnbErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => TnbErrorCode::ConnectionTimeout,
            Self::Unauthorized(_) => TnbErrorCode::Unauthorized,
            Self::Forbidden(_) => TnbErrorCode::Forbidden,
            Self::NotFound(_) => TnbErrorCode::NotFound,
            Self::NetworkServerError(_) => TnbErrorCode::NetworkServerError,
            Self::Http { .. } => TnbErrorCode::Http,
            Self::Validation(_) => TnbErrorCode::Validation,
            Self::Serialization(_) => TnbErrorCode::Serialization,
            Self::Config(_) => TnbErrorCode::Config,
            Self::Keysign(_) => TnbErrorCode::Keysign,
            Self::InvalidKey(_) => TnbErrorCode::InvalidKey,
            Self::KeyfileNotFound(_) => TnbErrorCode::KeyfileNotFound,
            Self::KeyfileExists(_) => TnbErrorCode::KeyfileExists,
            Self::SigningKeyLoadFailed(_) => TnbErrorCode::SigningKeyLoadFailed,
            Self::VerifyKeyLoadFailed(_) => TnbErrorCode::VerifyKeyLoadFailed,
            Self::SignatureVerifyFailed(_) => TnbErrorCode::SignatureVerifyFailed,
        }
    }

    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// Key and signature errors always return false.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::NetworkServerError(_)
        )
    }

    /// Returns true for the expected end-of-sequence signal.
    pub fn is_iterator_empty(&self) -> bool {
        matches!(self, Self::IteratorEmpty)
    }

    /// Returns true for any key loading, signing or verification failure.
    pub fn is_keysign(&self) -> bool {
        matches!(
            self,
            Self::Keysign(_)
                | Self::InvalidKey(_)
                | Self::KeyfileNotFound(_)
                | Self::KeyfileExists(_)
                | Self::SigningKeyLoadFailed(_)
                | Self::VerifyKeyLoadFailed(_)
                | Self::SignatureVerifyFailed(_)
        )
    }

    /// Map a non-success HTTP status and body to the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            503 => Self::NetworkServerError(message),
            _ => Self::Http { status, message },
        }
    }

    /// Create a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

impl From<serde_json::Error> for TnbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<hex::FromHexError> for TnbError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidKey(format!("not valid hex: {}", err))
    }
}

impl From<std::io::Error> for TnbError {
    fn from(err: std::io::Error) -> Self {
        Self::Keysign(err.to_string())
    }
}

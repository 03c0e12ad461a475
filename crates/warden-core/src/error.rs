//! Unified error type for the Warden SDK.

use thiserror::Error;
use tonic::{Code, Status};

/// Unified error type for every layer of the SDK.
///
/// Errors raised while building a client are returned to the caller
/// exactly as produced: an initializer's own `WardenError`, a
/// `tonic::transport::Error` lifted through `From`, and so on.
#[derive(Error, Debug)]
pub enum WardenError {
    // ============ Configuration Errors ============
    /// Invalid or missing configuration, including unreadable TLS material
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Authentication Errors ============
    /// Credentials were rejected or could not be obtained
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller is not authorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Token is malformed or otherwise unusable
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired and could not be refreshed
    #[error("Token expired")]
    TokenExpired,

    /// Per-call metadata could not be encoded as a header
    #[error("Invalid request metadata: {0}")]
    InvalidMetadata(String),

    // ============ Transport Errors ============
    /// Dial or handshake failure reported by the transport
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Operation timed out
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WardenError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidMetadata(_) => "INVALID_METADATA",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the gRPC status code a call fails with when this error
    /// occurs while authorizing it.
    #[must_use]
    pub const fn grpc_code(&self) -> Code {
        match self {
            Self::Configuration(_) => Code::FailedPrecondition,
            Self::InvalidCredentials
            | Self::Unauthorized(_)
            | Self::InvalidToken(_)
            | Self::TokenExpired => Code::Unauthenticated,
            Self::InvalidMetadata(_) => Code::InvalidArgument,
            Self::Transport(_) => Code::Unavailable,
            Self::Timeout(_) => Code::DeadlineExceeded,
            Self::Internal(_) | Self::Other(_) => Code::Internal,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an invalid token error.
    #[must_use]
    pub fn invalid_token<T: Into<String>>(message: T) -> Self {
        Self::InvalidToken(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

impl From<WardenError> for Status {
    fn from(err: WardenError) -> Self {
        Self::new(err.grpc_code(), err.to_string())
    }
}

//! SDK error types
//!
//! Unified error handling for everything above the domain layer.

use chat_model::{CommandError, DecodeError, IdParseError, RequestError};

use crate::config::ConfigError;
use crate::telemetry::TracingError;

/// SDK-wide error type
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    // Payload errors
    #[error("Malformed payload: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    InvalidId(#[from] IdParseError),

    // Delegated channel commands
    #[error(transparent)]
    Command(#[from] CommandError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tracing(#[from] TracingError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl SdkError {
    /// Get an error code string
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(e) => e.code(),
            Self::InvalidId(_) => "INVALID_ID",
            Self::Command(e) => e.code(),
            Self::Config(_) => "CONFIG_ERROR",
            Self::Tracing(_) => "TRACING_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if the error came from an incoming payload
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidId(_))
    }

    /// Check if the error came from a delegated channel command
    #[must_use]
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }

    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The network collaborator's error, if one was returned
    #[must_use]
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            Self::Command(CommandError::Request(e)) => Some(e),
            _ => None,
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<RequestError> for SdkError {
    fn from(err: RequestError) -> Self {
        Self::Command(CommandError::Request(err))
    }
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

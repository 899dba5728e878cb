//! Command errors - outcomes of channel operations delegated to the network layer

use thiserror::Error;

use crate::entities::ChannelKind;

/// Result type for delegated channel commands
pub type CommandResult<T> = Result<T, CommandError>;

/// Failure reported by the network collaborator
///
/// Passed through to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with status {status}: {message}")]
pub struct RequestError {
    /// HTTP status code
    pub status: u16,
    /// Platform JSON error code, when the response carried one
    pub code: Option<u32>,
    pub message: String,
}

impl RequestError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    /// Attach a platform error code
    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Channel command errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Not dispatched: the operation has no meaning for this channel kind
    #[error("{operation} is not supported for {kind} channels")]
    Unsupported {
        kind: ChannelKind,
        operation: &'static str,
    },

    /// Not dispatched: the owning client has been torn down
    #[error("channel is not attached to a live client")]
    Detached,

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl CommandError {
    /// Get an error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unsupported { .. } => "UNSUPPORTED_CHANNEL_KIND",
            Self::Detached => "DETACHED",
            Self::Request(_) => "REQUEST_FAILED",
        }
    }

    /// Check if a network call was actually made
    pub fn was_dispatched(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

//! Decode errors - structural problems in a wire payload
//!
//! Only fields an entity cannot exist without produce these. Optional fields
//! that are missing or carry the wrong wire type are replaced by absence.

use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Structural payload errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for field {field}: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// Create an invalid field error
    pub fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidField { field, expected }
    }

    /// Get an error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAnObject => "NOT_AN_OBJECT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
        }
    }

    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject => None,
            Self::MissingField(field) | Self::InvalidField { field, .. } => Some(field),
        }
    }
}

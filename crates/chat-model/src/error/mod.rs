//! Domain errors - error types for the domain layer

mod command_error;
mod decode_error;

pub use command_error::{CommandError, CommandResult, RequestError};
pub use decode_error::{DecodeError, DecodeResult};

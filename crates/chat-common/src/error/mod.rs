//! Error types shared across the SDK

mod sdk_error;

pub use sdk_error::{SdkError, SdkResult};

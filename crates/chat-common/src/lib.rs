//! # chat-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppSettings, ClientSettings, ConfigError, Environment, LoggingConfig, SdkConfig,
    DEFAULT_PENDING_CHANNEL_LIMIT,
};
pub use error::{SdkError, SdkResult};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};

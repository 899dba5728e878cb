//! Configuration structs

mod sdk_config;

pub use sdk_config::{
    AppSettings, ClientSettings, ConfigError, Environment, LoggingConfig, SdkConfig,
    DEFAULT_PENDING_CHANNEL_LIMIT,
};

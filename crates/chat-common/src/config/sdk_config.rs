//! SDK configuration structs
//!
//! Loads configuration from environment variables, after reading `.env`
//! if one is present.

use std::env;
use std::str::FromStr;
use tracing::Level;

use crate::telemetry::TracingConfig;

/// Pending channels kept per client when nothing else is configured
pub const DEFAULT_PENDING_CHANNEL_LIMIT: usize = 256;

/// Main SDK configuration
#[derive(Debug, Clone, Default)]
pub struct SdkConfig {
    pub app: AppSettings,
    pub logging: LoggingConfig,
    pub client: ClientSettings,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Fallback filter level when `RUST_LOG` is unset
    pub level: Level,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
        }
    }
}

/// Client registry settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Channels buffered while their guild is unknown; oldest are dropped first
    pub pending_channel_limit: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            pending_channel_limit: DEFAULT_PENDING_CHANNEL_LIMIT,
        }
    }
}

fn default_app_name() -> String {
    "chat-client".to_string()
}

impl SdkConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_var(&lookup, "APP_ENV")?.unwrap_or_default(),
            },
            logging: LoggingConfig {
                level: parse_var(&lookup, "LOG_LEVEL")?.unwrap_or(Level::INFO),
                json: match lookup("LOG_JSON") {
                    Some(value) => parse_bool(&value)
                        .ok_or(ConfigError::InvalidValue("LOG_JSON", value))?,
                    None => false,
                },
            },
            client: ClientSettings {
                pending_channel_limit: parse_var(&lookup, "PENDING_CHANNEL_LIMIT")?
                    .unwrap_or(DEFAULT_PENDING_CHANNEL_LIMIT),
            },
        })
    }

    /// Tracing setup matching this configuration
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let base = if self.app.env.is_production() {
            TracingConfig::production()
        } else {
            TracingConfig::development()
        };
        TracingConfig {
            level: self.logging.level,
            json: self.logging.json,
            ..base
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::InvalidValue(key, value)),
        },
        None => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

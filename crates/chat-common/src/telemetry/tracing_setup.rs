//! Subscriber setup for applications embedding the SDK
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` always wins; otherwise
//! the filter is built from [`TracingConfig`].

use tracing::Level;
use tracing_subscriber::{
    filter::ParseError,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Crate targets raised to the configured level when `sdk_only` is set
const SDK_TARGETS: [&str; 4] = ["chat_model", "chat_common", "chat_client", "chat_replay"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub level: Level,
    /// Structured JSON lines instead of human-readable output
    pub json: bool,
    /// Log span open and close
    pub span_events: bool,
    /// Attach file and line to every event
    pub source_location: bool,
    /// Apply `level` to SDK crates only, leaving everything else at `warn`
    pub sdk_only: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            source_location: false,
            sdk_only: true,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            source_location: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            ..Self::default()
        }
    }

    /// Filter directives used when `RUST_LOG` is unset
    pub fn directives(&self) -> String {
        let level = self.level.to_string().to_ascii_lowercase();
        if !self.sdk_only {
            return level;
        }
        let mut directives = String::from("warn");
        for target in SDK_TARGETS {
            directives.push(',');
            directives.push_str(target);
            directives.push('=');
            directives.push_str(&level);
        }
        directives
    }

    fn env_filter(&self) -> Result<EnvFilter, ParseError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(self.directives()),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(spans);
        if self.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}

/// Install the default subscriber
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::default())
}

/// Install a subscriber for `config`
///
/// Fails without side effects if a global subscriber is already set.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,

    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),
}

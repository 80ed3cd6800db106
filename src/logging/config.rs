use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Console output format.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One line per event.
    #[default]
    Compact,
    /// Multi-line, human oriented.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's events (`trace` .. `error`).
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `GRAPHBINARY_LOG_*` variables, e.g.
    /// `GRAPHBINARY_LOG_LEVEL=debug` or `GRAPHBINARY_LOG_FORMAT=json`.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(Environment::with_prefix("GRAPHBINARY_LOG").try_parsing(true))
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level
            .parse::<tracing::Level>()
            .map(|_| ())
            .map_err(|_| ConfigError::Message(format!("invalid log level '{}'", self.level)))
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn build_filter_directive(&self) -> String {
        format!("warn,{}={}", env!("CARGO_CRATE_NAME"), self.level)
    }

    pub fn with_level(
        mut self,
        level: impl Into<String>,
    ) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(
        mut self,
        format: LogFormat,
    ) -> Self {
        self.format = format;
        self
    }
}

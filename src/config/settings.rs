use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Nesting limit for composite values.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Upper bound on elements preallocated from a wire count.
pub const DEFAULT_MAX_PREALLOC: usize = 4096;

/// Limits applied by [`Reader`](crate::Reader) and [`Writer`](crate::Writer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Deepest allowed nesting of composite values.
    pub max_depth: usize,
    /// Counted sequences reserve at most this many slots up front; the rest
    /// grows as elements are actually decoded.
    pub max_prealloc: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_prealloc: DEFAULT_MAX_PREALLOC,
        }
    }
}

impl CodecConfig {
    /// Defaults overridden by `GRAPHBINARY_MAX_DEPTH` and
    /// `GRAPHBINARY_MAX_PREALLOC`.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .set_default("max_depth", DEFAULT_MAX_DEPTH as i64)?
            .set_default("max_prealloc", DEFAULT_MAX_PREALLOC as i64)?
            .add_source(Environment::with_prefix("GRAPHBINARY").try_parsing(true))
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Message(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_max_depth(
        mut self,
        max_depth: usize,
    ) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_prealloc(
        mut self,
        max_prealloc: usize,
    ) -> Self {
        self.max_prealloc = max_prealloc;
        self
    }
}

use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// `RUST_LOG` when set, otherwise the directive built from `config`.
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(config.build_filter_directive())
            .unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

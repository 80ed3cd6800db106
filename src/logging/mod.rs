pub mod config;
mod filters;
mod formatter;

pub use config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global console subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails when the config is
/// invalid or a global subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;

    let env_filter = filters::build_filter_from_config(&config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatter::build_formatter_from_config(&config))
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = ?config.format,
        "logging initialized"
    );
    Ok(())
}

//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;
use crate::{CityGuideError, Result};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once keeps the first subscriber.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| CityGuideError::config(format!("invalid log level '{level}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("info")]
    #[case("debug")]
    #[case("warn,cityguide=trace")]
    fn test_level_filter_accepts(#[case] level: &str) {
        assert!(level_filter(level).is_ok());
    }

    #[test]
    fn test_level_filter_rejects_bad_directive() {
        let err = level_filter("info,cityguide=loud").unwrap_err();
        assert!(matches!(err, CityGuideError::Config { .. }));
    }

    #[test]
    fn test_filter_applies_to_scoped_subscriber() {
        let subscriber = tracing_subscriber::registry().with(level_filter("warn").unwrap());
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(tracing::Level::INFO));
            assert!(tracing::enabled!(tracing::Level::WARN));
        });
    }
}

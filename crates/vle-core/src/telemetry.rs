//! Tracing subscriber setup
//!
//! Directive precedence: `RUST_LOG`, then `logging.filter`, then the
//! profile default. Output goes to stderr so command output on stdout
//! stays clean.

use crate::config::LoggingConfig;
use crate::error::VleError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Pick the filter directive for `config`, preferring `env` when set
#[must_use]
pub fn resolve_directive(config: &LoggingConfig, env: Option<&str>) -> String {
    env.map(str::trim)
        .filter(|directive| !directive.is_empty())
        .or_else(|| config.filter.as_deref())
        .unwrap_or_else(|| config.profile.default_filter())
        .to_string()
}

/// Install the global subscriber
///
/// # Errors
/// Returns `VleError::Telemetry` if the directive does not parse or a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), VleError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = resolve_directive(config, env.as_deref());
    let filter =
        EnvFilter::try_new(&directive).map_err(|err| VleError::Telemetry(err.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    };
    installed.map_err(|err| VleError::Telemetry(err.to_string()))?;

    tracing::debug!(%directive, json = config.json, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    #[test]
    fn profile_default_applies_last() {
        let dev = LoggingConfig::default();
        assert_eq!(resolve_directive(&dev, None), "info");

        let prod = LoggingConfig {
            profile: Profile::Production,
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_directive(&prod, None), "warn");
    }

    #[test]
    fn configured_filter_beats_profile() {
        let config = LoggingConfig {
            filter: Some("vle_core=debug".to_string()),
            profile: Profile::Production,
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_directive(&config, None), "vle_core=debug");
    }

    #[test]
    fn environment_beats_everything_unless_blank() {
        let config = LoggingConfig {
            filter: Some("debug".to_string()),
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_directive(&config, Some("trace")), "trace");
        assert_eq!(resolve_directive(&config, Some("  ")), "debug");
    }
}

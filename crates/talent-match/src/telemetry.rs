use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Variable consulted before the configured `APP_LOG_LEVEL`.
pub const FILTER_ENV: &str = "RUST_LOG";

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directive: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directive, .. } => write!(
                f,
                "log filter '{directive}' is not a valid tracing directive (check {FILTER_ENV} or APP_LOG_LEVEL)"
            ),
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a global tracing subscriber is already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Picks the active directive: a non-blank `RUST_LOG` wins over the configured level.
pub fn filter_directive(config: &TelemetryConfig, env_value: Option<String>) -> String {
    env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| config.log_level.trim().to_string())
}

pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directive = filter_directive(config, std::env::var(FILTER_ENV).ok());
    EnvFilter::try_new(&directive)
        .map_err(|source| TelemetryError::InvalidFilter { directive, source })
}

/// Installs the process-wide subscriber. Output goes to stderr so ranked JSON on stdout stays
/// machine-readable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
        }
    }

    #[test]
    fn env_directive_overrides_configured_level() {
        let directive = filter_directive(&config("info"), Some("talent_match=debug".to_string()));
        assert_eq!(directive, "talent_match=debug");
    }

    #[test]
    fn blank_env_directive_falls_back_to_config() {
        assert_eq!(filter_directive(&config(" warn "), Some("   ".to_string())), "warn");
        assert_eq!(filter_directive(&config("error"), None), "error");
    }

    #[test]
    fn configured_directives_parse() {
        for level in ["info", "talent_match=debug,tower_http=warn"] {
            assert!(EnvFilter::try_new(filter_directive(&config(level), None)).is_ok());
        }
    }

    #[test]
    fn invalid_directive_names_the_offending_value() {
        let directive = filter_directive(&config("talent_match=loud"), None);
        let err = EnvFilter::try_new(&directive)
            .map_err(|source| TelemetryError::InvalidFilter {
                directive: directive.clone(),
                source,
            })
            .expect_err("level rejected");

        assert!(err.to_string().contains("talent_match=loud"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over the configured level)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Logs always go to stderr. Returns `false` when a global subscriber was
/// already installed, in which case nothing changes.
pub fn initialize(config: &AppConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    let format = resolve_format(config, std::env::var("LOG_FORMAT").ok().as_deref());

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.is_ok()
}

/// Apply a `LOG_FORMAT` override on top of the configured format
pub fn resolve_format(config: &AppConfig, env_override: Option<&str>) -> LogFormat {
    env_override
        .and_then(|f| match f.to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "human" => Some(LogFormat::Pretty),
            _ => None,
        })
        .unwrap_or_else(|| config.logging.format.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_override() {
        let config = AppConfig::default();

        assert_eq!(resolve_format(&config, Some("JSON")), LogFormat::Json);
        assert_eq!(resolve_format(&config, Some("human")), LogFormat::Pretty);
        assert_eq!(resolve_format(&config, Some("xml")), LogFormat::Pretty);
        assert_eq!(resolve_format(&config, None), LogFormat::Pretty);
    }

    #[test]
    fn test_initialize_only_once() {
        let mut config = AppConfig::default();
        config.logging.level = "debug".to_string();

        initialize(&config);
        assert!(!initialize(&config));
    }
}

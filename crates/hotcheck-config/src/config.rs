//! Configuration management for hotcheck

use hotcheck_api::{HotcheckError, HotcheckResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config files looked up in the base directory, first match wins
pub const CONFIG_FILES: &[&str] = &["hotcheck.toml", ".hotcheck/config.toml"];

/// Prefix of environment variable overrides, `__` separates nested keys
pub const ENV_PREFIX: &str = "HOTCHECK__";

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Base path used to render file paths in diagnostics
    pub project_root: PathBuf,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for production
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Configuration rooted at `project_root` with default logging
    pub fn with_project_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Load configuration relative to the current working directory
    pub fn load() -> HotcheckResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            HotcheckError::config(format!("Failed to resolve working directory: {}", e))
        })?;
        Self::load_from(&cwd)
    }

    /// Load configuration relative to `base_dir`
    ///
    /// Configuration is loaded in the following priority order (highest to lowest):
    /// 1. Environment variables (HOTCHECK__*)
    /// 2. The first of `hotcheck.toml`, `.hotcheck/config.toml` found in `base_dir`
    /// 3. Default values
    ///
    /// A relative `project_root` is resolved against `base_dir`.
    pub fn load_from(base_dir: &Path) -> HotcheckResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for name in CONFIG_FILES {
            let path = base_dir.join(name);
            if path.exists() {
                tracing::info!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut app_config: AppConfig = figment
            .extract()
            .map_err(|e| HotcheckError::config(format!("Failed to load configuration: {}", e)))?;

        if app_config.project_root.is_relative() {
            app_config.project_root = base_dir.join(&app_config.project_root);
        }

        app_config.validate()?;

        tracing::debug!(
            project_root = %app_config.project_root.display(),
            level = %app_config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> HotcheckResult<()> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(HotcheckError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        if self.project_root.as_os_str().is_empty() {
            return Err(HotcheckError::config("Project root cannot be empty"));
        }

        Ok(())
    }
}

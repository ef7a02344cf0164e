//! Layered configuration loader.
//!
//! Layers are applied in order, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. A TOML or JSON file
//! 3. Environment variables (`PREFIX__SECTION__KEY`)

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, StockroomConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "STOCKROOM";

/// Configuration loader.
///
/// # Example
///
/// ```no_run
/// use stockroom_config::ConfigLoader;
///
/// # fn main() -> Result<(), stockroom_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()
///     .with_optional_file("stockroom.toml")?
///     .with_env_prefix("STOCKROOM")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: StockroomConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: StockroomConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    ///
    /// A file or string loaded afterwards replaces the preset. Environment
    /// overrides still apply on top.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = StockroomConfig::development();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension (`.toml` or `.json`). Sections
    /// absent from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed or
    /// contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        self.config = match format.as_deref() {
            Some(format @ ("toml" | "json")) => parse(&content, format)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use stockroom_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [server]
    ///     http_addr = "127.0.0.1:3000"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// assert_eq!(config.server.request_timeout_ms, 30_000);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `STOCKROOM`:
    /// - `STOCKROOM__SERVER__HTTP_ADDR=127.0.0.1:9000`
    /// - `STOCKROOM__LOGGING__FORMAT=pretty`
    /// - `STOCKROOM__ERRORS__EXPOSE_INTERNAL_ERRORS=true`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file into the process environment.
    ///
    /// A missing or unreadable `.env` file is ignored.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Apply environment overrides, validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation fails.
    pub fn load(mut self) -> Result<StockroomConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(&marker))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, &marker)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, marker: &str) -> Result<(), ConfigError> {
        let Some(path) = key.strip_prefix(marker) else {
            return Ok(());
        };
        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_int(key, value)?;
            }

            ["LOGGING", "ENABLED"] => config.logging.enabled = parse_bool(key, value)?,
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }

            ["ERRORS", "EXPOSE_INTERNAL_ERRORS"] => {
                config.errors.expose_internal_errors = parse_bool(key, value)?;
            }
            ["ERRORS", "INTERNAL_ERROR_MESSAGE"] => {
                config.errors.internal_error_message = value.to_string();
            }

            ["DATA", "SEED_PATH"] => {
                config.data.seed_path = (!value.is_empty()).then(|| value.to_string());
            }

            _ => {
                return Err(ConfigError::env_parse_error(key, "unknown configuration key"));
            }
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<StockroomConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_int(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse_error(key, "expected boolean")),
    }
}

//! TOML-based configuration for Heron.
//!
//! Supports a config file (heron.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [limits]
//! max_group_by_cardinality = 5000
//! max_result_rows = 10000
//! max_query_timeout_ms = 30000
//! max_group_by_columns = 5
//!
//! [catalog]
//! identifier_min_rows = 100
//! generate_synonyms = true
//!
//! [logging]
//! filter = "${HERON_LOG_FILTER}"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::QueryLimits;
use crate::catalog::CatalogBuilder;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Validator policy thresholds.
    pub limits: QueryLimits,

    /// Catalog builder options.
    pub catalog: CatalogSettings,

    /// Log filter for the CLI.
    pub logging: LoggingSettings,
}

/// Catalog builder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// A non-numeric, non-date column whose values are all distinct is tagged
    /// as an identifier only when the row count exceeds this.
    pub identifier_min_rows: u64,

    /// Derive natural-language synonyms from column names.
    pub generate_synonyms: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            identifier_min_rows: 100,
            generate_synonyms: true,
        }
    }
}

impl CatalogSettings {
    /// Build a catalog builder configured from these settings.
    pub fn builder(&self) -> CatalogBuilder {
        CatalogBuilder::new()
            .identifier_min_rows(self.identifier_min_rows)
            .generate_synonyms(self.generate_synonyms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive (supports ${ENV_VAR} expansion).
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "heron=info".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Get the filter directive with environment variables expanded.
    pub fn resolved_filter(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.filter)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text and check them.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `HERON_CONFIG`
    /// 2. `./heron.toml`
    /// 3. `~/.config/heron/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("HERON_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("heron.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("heron").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject limits that would make every query invalid or unbounded.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let limits = &self.limits;
        let zeroed = [
            ("max_group_by_cardinality", limits.max_group_by_cardinality == 0),
            ("max_result_rows", limits.max_result_rows == 0),
            ("max_query_timeout_ms", limits.max_query_timeout_ms == 0),
            ("max_group_by_columns", limits.max_group_by_columns == 0),
        ];
        if let Some((name, _)) = zeroed.iter().find(|(_, is_zero)| *is_zero) {
            return Err(SettingsError::InvalidConfig(format!(
                "limits.{} must be greater than zero",
                name
            )));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}

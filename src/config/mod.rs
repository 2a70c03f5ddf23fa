//! Configuration for the purge tool.
//!
//! The tool is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [database]
//! type = "sqlite"
//! path = "${DATA_DIR}/forms.db"
//!
//! [purge]
//! chunk_size = 500
//!
//! [observability.logging]
//! level = "info"
//! format = "compact"
//! ```

mod database;
mod observability;
mod purge;

use std::path::Path;

pub use database::*;
pub use observability::*;
pub use purge::*;
use serde::{Deserialize, Serialize};

/// Root configuration.
///
/// All sections are optional, but a purge needs `[database]` to point
/// somewhere before it can do anything useful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Entity store holding forms and submissions.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Purge job tuning and safety settings.
    #[serde(default)]
    pub purge: PurgeConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: AppConfig = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.purge.validate()?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand `${VAR}` references, leaving anything after a `#` on the line alone.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid");
    let mut expanded = Vec::new();

    for line in input.lines() {
        let comment_start = line.find('#').unwrap_or(line.len());
        let (body, comment) = line.split_at(comment_start);

        let mut out = String::with_capacity(line.len());
        let mut last_end = 0;
        for cap in re.captures_iter(body) {
            let Some(whole) = cap.get(0) else { continue };
            let name = &cap[1];
            let value =
                std::env::var(name).map_err(|_| ConfigError::EnvVarNotFound(name.to_string()))?;
            out.push_str(&body[last_end..whole.start()]);
            out.push_str(&value);
            last_end = whole.end();
        }
        out.push_str(&body[last_end..]);
        out.push_str(comment);
        expanded.push(out);
    }

    let mut result = expanded.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

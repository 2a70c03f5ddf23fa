//! Purge job configuration.
//!
//! Retention periods and purge modes live on each form; this section only
//! tunes how a purge run executes.
//!
//! # Example
//!
//! ```toml
//! [purge]
//! chunk_size = 500
//! dry_run = false
//! lock_ttl_secs = 3600
//! require_confirmation = true
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Upper bound for `lock_ttl_secs` (30 days).
pub const MAX_LOCK_TTL_SECS: u64 = 30 * 86_400;

/// Purge job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurgeConfig {
    /// Number of submissions loaded and deleted per step.
    /// Bounds how many submission handles are held in memory at once.
    /// Default: 500
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// If true, select and report candidates without deleting anything.
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Age after which another run's purge lock is considered abandoned
    /// and may be taken over (in seconds).
    /// Default: 3600
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,

    /// Ask the operator before deleting. `--yes` on the command line
    /// overrides this for a single run.
    /// Default: true
    #[serde(default = "default_true")]
    pub require_confirmation: bool,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            dry_run: false,
            lock_ttl_secs: default_lock_ttl_secs(),
            require_confirmation: true,
        }
    }
}

fn default_chunk_size() -> usize {
    500
}

fn default_lock_ttl_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

impl PurgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "purge.chunk_size must be at least 1".into(),
            ));
        }
        if self.lock_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "purge.lock_ttl_secs must be at least 1".into(),
            ));
        }
        if self.lock_ttl_secs > MAX_LOCK_TTL_SECS {
            return Err(ConfigError::Validation(format!(
                "purge.lock_ttl_secs must be at most {}",
                MAX_LOCK_TTL_SECS
            )));
        }
        Ok(())
    }

    /// Lock age as a chrono Duration, saturating at `TimeDelta::MAX`.
    pub fn lock_ttl(&self) -> chrono::Duration {
        i64::try_from(self.lock_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

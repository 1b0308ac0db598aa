//! # Runtime Configuration
//!
//! Loaded once at startup from TOML; every field has a default so an empty
//! file (or no file) yields a working runtime.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default squared-displacement threshold separating "standing still" from
/// "moving" for the cloak idle machine.
pub const DEFAULT_MOVEMENT_EPSILON: f64 = 0.0025;

/// Default dwell before an idle cloak activates.
pub const DEFAULT_IDLE_DWELL_MILLIS: u64 = 1_500;

/// Failure loading or parsing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("config file unreadable: {0}")]
    Io(#[from] std::io::Error),
    /// The file was not valid TOML for this schema.
    #[error("config file invalid: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for the cosmetic runtime. All fields are optional in the TOML
/// source and fall back to the defaults below.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Squared displacement per tick below which an entity counts as idle.
    pub movement_epsilon: f64,
    /// Milliseconds an entity must stay idle before its cloak activates.
    pub idle_dwell_millis: u64,
    /// Heartbeats per second.
    pub heartbeat_hz: u32,
    /// Heartbeats to skip after startup while the host finishes loading.
    pub warmup_ticks: u32,
    /// Worker threads for geometry computation. `0` sizes the pool
    /// automatically from the machine's parallelism.
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            movement_epsilon: DEFAULT_MOVEMENT_EPSILON,
            idle_dwell_millis: DEFAULT_IDLE_DWELL_MILLIS,
            heartbeat_hz: 20,
            warmup_ticks: 20,
            worker_threads: 0,
        }
    }
}

impl RuntimeConfig {
    /// Parses a TOML document. Missing fields take their defaults; unknown
    /// fields are rejected so typos fail loudly at startup.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the document is not valid for this schema.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// if it is not valid for this schema.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// The pool size to actually spawn: the configured count, or
    /// `max(2, parallelism / 2)` when set to `0`.
    #[must_use]
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads > 0 {
            return self.worker_threads;
        }
        let parallelism = std::thread::available_parallelism()
            .map_or(2, NonZeroUsize::get);
        (parallelism / 2).max(2)
    }

    /// Idle dwell as a [`Duration`].
    #[must_use]
    pub const fn idle_dwell(&self) -> Duration {
        Duration::from_millis(self.idle_dwell_millis)
    }

    /// Interval between heartbeats. A zero `heartbeat_hz` is clamped to the
    /// default 20 Hz rather than dividing by zero.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        let hz = if self.heartbeat_hz == 0 { 20 } else { self.heartbeat_hz };
        Duration::from_secs(1) / hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert!((config.movement_epsilon - 0.0025).abs() < f64::EPSILON);
        assert_eq!(config.idle_dwell(), Duration::from_millis(1_500));
        assert_eq!(config.heartbeat_interval(), Duration::from_millis(50));
        assert_eq!(config.warmup_ticks, 20);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config.idle_dwell_millis, DEFAULT_IDLE_DWELL_MILLIS);
    }

    #[test]
    fn test_partial_document_overrides() {
        let config = RuntimeConfig::from_toml_str(
            "idle_dwell_millis = 250\nworker_threads = 3\n",
        )
        .unwrap();
        assert_eq!(config.idle_dwell_millis, 250);
        assert_eq!(config.effective_worker_threads(), 3);
        assert!((config.movement_epsilon - DEFAULT_MOVEMENT_EPSILON).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(RuntimeConfig::from_toml_str("idle_dwel_millis = 250\n").is_err());
    }

    #[test]
    fn test_auto_pool_size_floor() {
        let config = RuntimeConfig::default();
        assert!(config.effective_worker_threads() >= 2);
    }

    #[test]
    fn test_zero_hz_clamped() {
        let config = RuntimeConfig::from_toml_str("heartbeat_hz = 0\n").unwrap();
        assert_eq!(config.heartbeat_interval(), Duration::from_millis(50));
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::time::Duration;

use crate::common::MAX_ANNOTATION_BYTES;
use crate::version::SchemaVersion;

/// Shortest backoff a crashed instance waits before being restarted.
pub const MIN_BACKOFF: Duration = Duration::from_secs(30);

/// Tunables for restart decisions, validation limits and schema emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelsConfig {
    /// Crashes restarted without any wait
    pub immediate_restarts: i32,
    /// Longest wait between restarts
    pub max_backoff: Duration,
    /// Crash count after which an instance stays down; 0 disables the cap
    pub max_restart_attempts: i32,
    /// Largest annotation accepted on a definition
    pub max_annotation_bytes: usize,
    /// Schema generation to emit for older consumers
    pub target_schema_version: SchemaVersion,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            immediate_restarts: 3,
            max_backoff: Duration::from_secs(16 * 60),
            max_restart_attempts: 200,
            max_annotation_bytes: MAX_ANNOTATION_BYTES,
            target_schema_version: SchemaVersion::LATEST,
        }
    }
}

impl ModelsConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `CARAVAN_IMMEDIATE_RESTARTS`: crashes restarted immediately (default: 3)
    /// - `CARAVAN_MAX_BACKOFF_SECS`: backoff cap in seconds, at least 30 (default: 960)
    /// - `CARAVAN_MAX_RESTART_ATTEMPTS`: give up after this many crashes, 0 = never (default: 200)
    /// - `CARAVAN_MAX_ANNOTATION_BYTES`: annotation size limit (default: 10240)
    /// - `CARAVAN_TARGET_SCHEMA_VERSION`: 0-3 (default: latest)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let immediate_restarts: i32 = std::env::var("CARAVAN_IMMEDIATE_RESTARTS")
            .unwrap_or_else(|_| defaults.immediate_restarts.to_string())
            .parse()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or(ConfigError::Invalid(
                "CARAVAN_IMMEDIATE_RESTARTS",
                "must be a non-negative integer",
            ))?;

        let max_backoff_secs: u64 = std::env::var("CARAVAN_MAX_BACKOFF_SECS")
            .unwrap_or_else(|_| defaults.max_backoff.as_secs().to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("CARAVAN_MAX_BACKOFF_SECS", "must be a positive integer")
            })?;
        if Duration::from_secs(max_backoff_secs) < MIN_BACKOFF {
            return Err(ConfigError::Invalid(
                "CARAVAN_MAX_BACKOFF_SECS",
                "must be at least 30",
            ));
        }

        let max_restart_attempts: i32 = std::env::var("CARAVAN_MAX_RESTART_ATTEMPTS")
            .unwrap_or_else(|_| defaults.max_restart_attempts.to_string())
            .parse()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or(ConfigError::Invalid(
                "CARAVAN_MAX_RESTART_ATTEMPTS",
                "must be a non-negative integer",
            ))?;

        let max_annotation_bytes: usize = std::env::var("CARAVAN_MAX_ANNOTATION_BYTES")
            .unwrap_or_else(|_| defaults.max_annotation_bytes.to_string())
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::Invalid(
                "CARAVAN_MAX_ANNOTATION_BYTES",
                "must be a positive integer",
            ))?;

        let target_schema_version = match std::env::var("CARAVAN_TARGET_SCHEMA_VERSION") {
            Ok(raw) => raw
                .parse::<u8>()
                .ok()
                .and_then(|v| SchemaVersion::try_from(v).ok())
                .ok_or(ConfigError::Invalid(
                    "CARAVAN_TARGET_SCHEMA_VERSION",
                    "must be between 0 and 3",
                ))?,
            Err(_) => defaults.target_schema_version,
        };

        Ok(Self {
            immediate_restarts,
            max_backoff: Duration::from_secs(max_backoff_secs),
            max_restart_attempts,
            max_annotation_bytes,
            target_schema_version,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CARAVAN_IMMEDIATE_RESTARTS",
        "CARAVAN_MAX_BACKOFF_SECS",
        "CARAVAN_MAX_RESTART_ATTEMPTS",
        "CARAVAN_MAX_ANNOTATION_BYTES",
        "CARAVAN_TARGET_SCHEMA_VERSION",
    ];

    /// Helper to set env vars for a test and restore them after
    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        /// Starts from a clean slate: every caravan variable unset.
        fn new() -> Self {
            let mut guard = Self { vars: Vec::new() };
            for key in VARS {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::set_var(key, value) };
        }

        fn remove(&mut self, key: &str) {
            let old = env::var(key).ok();
            self.vars.push((key.to_string(), old));
            // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
            unsafe { env::remove_var(key) };
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.vars.drain(..).rev() {
                // SAFETY: Tests are serialized via ENV_MUTEX, so no concurrent access
                unsafe {
                    match value {
                        Some(v) => env::set_var(&key, v),
                        None => env::remove_var(&key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_config_from_env_with_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new();

        let config = ModelsConfig::from_env().unwrap();

        assert_eq!(config, ModelsConfig::default());
        assert_eq!(config.immediate_restarts, 3);
        assert_eq!(config.max_backoff, Duration::from_secs(960));
        assert_eq!(config.max_restart_attempts, 200);
        assert_eq!(config.max_annotation_bytes, 10 * 1024);
        assert_eq!(config.target_schema_version, SchemaVersion::V3);
    }

    #[test]
    fn test_config_from_env_all_custom() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("CARAVAN_IMMEDIATE_RESTARTS", "0");
        guard.set("CARAVAN_MAX_BACKOFF_SECS", "120");
        guard.set("CARAVAN_MAX_RESTART_ATTEMPTS", "0");
        guard.set("CARAVAN_MAX_ANNOTATION_BYTES", "64");
        guard.set("CARAVAN_TARGET_SCHEMA_VERSION", "1");

        let config = ModelsConfig::from_env().unwrap();

        assert_eq!(config.immediate_restarts, 0);
        assert_eq!(config.max_backoff, Duration::from_secs(120));
        assert_eq!(config.max_restart_attempts, 0);
        assert_eq!(config.max_annotation_bytes, 64);
        assert_eq!(config.target_schema_version, SchemaVersion::V1);
    }

    #[test]
    fn test_config_backoff_below_minimum() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("CARAVAN_MAX_BACKOFF_SECS", "29");

        let err = ModelsConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("CARAVAN_MAX_BACKOFF_SECS", _)
        ));
        assert!(err.to_string().contains("at least 30"));
    }

    #[test]
    fn test_config_invalid_immediate_restarts() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("CARAVAN_IMMEDIATE_RESTARTS", "-1");

        let err = ModelsConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("CARAVAN_IMMEDIATE_RESTARTS", _)
        ));
    }

    #[test]
    fn test_config_invalid_max_restart_attempts() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("CARAVAN_MAX_RESTART_ATTEMPTS", "abc");

        let err = ModelsConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("CARAVAN_MAX_RESTART_ATTEMPTS", _)
        ));
    }

    #[test]
    fn test_config_rejects_zero_annotation_limit() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("CARAVAN_MAX_ANNOTATION_BYTES", "0");

        let err = ModelsConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("CARAVAN_MAX_ANNOTATION_BYTES", _)
        ));
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn test_config_unknown_schema_version() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut guard = EnvGuard::new();

        guard.set("CARAVAN_TARGET_SCHEMA_VERSION", "7");

        let err = ModelsConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("CARAVAN_TARGET_SCHEMA_VERSION", _)
        ));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("CARAVAN_MAX_BACKOFF_SECS", "must be at least 30");
        assert_eq!(
            err.to_string(),
            "invalid value for CARAVAN_MAX_BACKOFF_SECS: must be at least 30"
        );
    }
}

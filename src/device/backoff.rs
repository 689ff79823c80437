// src/device/backoff.rs

use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff with additive jitter, bounded by a cap and an attempt
/// budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
    max_jitter: Duration,
    max_attempts: u32,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration, max_jitter: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            cap,
            max_jitter,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.cap_delay_ms),
            Duration::from_millis(config.max_jitter_ms),
            config.max_attempts,
        )
    }

    /// Total attempts allowed, never less than one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// `min(base * 2^retry + jitter, cap)`, where `retry` counts from zero.
    pub fn delay(&self, retry: u32, jitter: Duration) -> Duration {
        let exponential = self.base.saturating_mul(2u32.saturating_pow(retry));
        exponential.saturating_add(jitter).min(self.cap)
    }

    /// [`Backoff::delay`] with jitter drawn uniformly from `0..=max_jitter`.
    pub fn jittered_delay(&self, retry: u32) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        let jitter_ms = if max_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=max_ms)
        };
        self.delay(retry, Duration::from_millis(jitter_ms))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

//! Inter-bundle pacing and retry backoff
//!
//! Bundles are spaced out so a rate-limited block engine never sees a burst:
//! each gap is the base interval plus up to 100% random jitter. Retries of a
//! single bundle wait an exponentially growing, capped backoff instead.

use crate::config::BundleSettings;
use rand::Rng;
use std::time::Duration;

/// Gap between successive bundles
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
        }
    }

    /// Base interval plus uniform jitter in `[0, interval]`
    pub fn next_delay(&self) -> Duration {
        let base = self.interval.as_millis() as u64;
        if base == 0 {
            return Duration::ZERO;
        }
        let jitter = rand::thread_rng().gen_range(0..=base);
        Duration::from_millis(base.saturating_add(jitter))
    }
}

/// Wait before re-attempting a failed bundle
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    pub fn from_settings(settings: &BundleSettings) -> Self {
        Self::new(settings.retry_backoff_ms, settings.max_backoff_ms)
    }

    /// Delay before retry number `retry` (1-based): `base * 2^(retry-1)`, capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(32);
        let ms = self.base_ms.saturating_mul(1u64 << shift).min(self.max_ms);
        Duration::from_millis(ms)
    }
}

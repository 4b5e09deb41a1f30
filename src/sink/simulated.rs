//! Simulated submission sink
//!
//! Stands in for a real block-engine client in the CLI demo:
//! - Sleeps a random latency inside a configured window
//! - Fails a configurable fraction of submissions
//! - Hands out sequential `sig_<n>` receipts
//!
//! NOTE: This never talks to a network. Nothing in the library depends on it.

use super::{Receipt, SubmissionError, SubmissionSink};
use crate::config::SimulationSettings;
use async_trait::async_trait;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Sink that fakes latency and failures
pub struct SimulatedSink {
    min_latency_ms: u64,
    max_latency_ms: u64,
    failure_rate: f64,
    /// Receipts handed out so far
    issued: AtomicU64,
}

impl SimulatedSink {
    pub fn new(settings: &SimulationSettings) -> Self {
        Self {
            min_latency_ms: settings.min_latency_ms,
            max_latency_ms: settings.max_latency_ms.max(settings.min_latency_ms),
            failure_rate: settings.failure_rate.clamp(0.0, 1.0),
            issued: AtomicU64::new(0),
        }
    }

    /// Number of submissions this sink has accepted
    pub fn accepted(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Roll the latency and the outcome up front so no RNG is held across
    /// the await point.
    fn roll(&self) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        let latency = rng.gen_range(self.min_latency_ms..=self.max_latency_ms);
        let fails = rng.gen_bool(self.failure_rate);
        (Duration::from_millis(latency), fails)
    }
}

#[async_trait]
impl<R: Send + Sync> SubmissionSink<R> for SimulatedSink {
    async fn submit(&self, _request: &R) -> Result<Receipt, SubmissionError> {
        let (latency, fails) = self.roll();
        tokio::time::sleep(latency).await;

        if fails {
            tracing::debug!(latency_ms = latency.as_millis() as u64, "Simulated submission rejected");
            return Err(SubmissionError::new("simulated rejection"));
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(Receipt::new(format!("sig_{}", n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(failure_rate: f64) -> SimulationSettings {
        SimulationSettings {
            min_latency_ms: 50,
            max_latency_ms: 150,
            failure_rate,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_succeeds_at_zero_failure_rate() {
        let sink = SimulatedSink::new(&settings(0.0));
        for i in 0..10u32 {
            let receipt = sink.submit(&i).await.unwrap();
            assert_eq!(receipt.as_str(), format!("sig_{}", i));
        }
        assert_eq!(sink.accepted(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_fails_at_full_failure_rate() {
        let sink = SimulatedSink::new(&settings(1.0));
        let result = sink.submit(&"op").await;
        assert_eq!(result, Err(SubmissionError::new("simulated rejection")));
        assert_eq!(sink.accepted(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_within_window() {
        let sink = SimulatedSink::new(&settings(0.0));
        let start = tokio::time::Instant::now();
        sink.submit(&()).await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed <= Duration::from_millis(151));
    }
}

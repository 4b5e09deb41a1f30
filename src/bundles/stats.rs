//! Summary counters derived from the result log

use super::job::BundleResult;
use serde::{Deserialize, Serialize};

/// Aggregate bundle statistics. Always recomputed from the log.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage, two decimal places; 0 when nothing has completed
    pub success_rate: f64,
}

impl Stats {
    /// Compute from a full result log
    pub fn from_results(results: &[BundleResult]) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self::from_counts(successful, results.len() - successful)
    }

    /// Overall figures across several jobs
    pub fn combine<'a>(stats: impl IntoIterator<Item = &'a Stats>) -> Self {
        let (successful, failed) = stats
            .into_iter()
            .fold((0, 0), |(s, f), st| (s + st.successful, f + st.failed));
        Self::from_counts(successful, failed)
    }

    fn from_counts(successful: usize, failed: usize) -> Self {
        let completed = successful + failed;
        let success_rate = if completed == 0 {
            0.0
        } else {
            round2(successful as f64 / completed as f64 * 100.0)
        };
        Self {
            total: completed,
            successful,
            failed,
            success_rate,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convenience wrapper over [`Stats::from_results`]
pub fn stats(results: &[BundleResult]) -> Stats {
    Stats::from_results(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(successes: usize, failures: usize) -> Vec<BundleResult> {
        let mut results = Vec::new();
        for i in 0..successes {
            results.push(BundleResult::succeeded(format!("b{}", i), i, vec![]));
        }
        for i in 0..failures {
            results.push(BundleResult::failed(format!("f{}", i), successes + i, "boom"));
        }
        results
    }

    #[test]
    fn test_seven_of_ten() {
        let s = stats(&log(7, 3));
        assert_eq!(
            s,
            Stats {
                total: 10,
                successful: 7,
                failed: 3,
                success_rate: 70.0
            }
        );
    }

    #[test]
    fn test_empty_log() {
        let s = stats(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.success_rate, 0.0);
    }

    #[test]
    fn test_rounds_to_two_places() {
        assert_eq!(stats(&log(2, 1)).success_rate, 66.67);
        assert_eq!(stats(&log(1, 2)).success_rate, 33.33);
        assert_eq!(stats(&log(1, 6)).success_rate, 14.29);
    }

    #[test]
    fn test_combine_recomputes_rate() {
        let a = stats(&log(21, 3));
        let b = stats(&log(11, 1));
        let overall = Stats::combine([&a, &b]);

        assert_eq!(overall.total, 36);
        assert_eq!(overall.successful, 32);
        assert_eq!(overall.failed, 4);
        assert_eq!(overall.success_rate, 88.89);
        assert_eq!(Stats::combine([]).success_rate, 0.0);
    }
}

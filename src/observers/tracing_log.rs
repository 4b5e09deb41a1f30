//! Observer that turns run events into structured log lines

use super::{BundleEvent, BundleObserver};
use tracing::{debug, info, warn};

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl BundleObserver for TracingObserver {
    fn on_event(&self, event: &BundleEvent) {
        match event {
            BundleEvent::JobStatusChanged { job_id, status } => {
                debug!(job_id = %job_id, status = ?status, "Job status changed");
            }
            BundleEvent::JobStarted {
                job_id,
                total_requests,
                total_bundles,
            } => {
                info!(
                    job_id = %job_id,
                    total_requests,
                    total_bundles,
                    "Starting bundle processing"
                );
            }
            BundleEvent::BundleStarted {
                index, total, size, ..
            } => {
                info!(bundle = index + 1, total, size, "Processing bundle");
            }
            BundleEvent::BundleRetrying {
                index,
                attempt,
                delay_ms,
                error,
                ..
            } => {
                warn!(
                    bundle = index + 1,
                    attempt,
                    delay_ms,
                    error = %error,
                    "Bundle failed, retrying"
                );
            }
            BundleEvent::BundleCompleted { result, .. } => {
                if result.success {
                    info!(
                        bundle_id = %result.bundle_id,
                        attempts = result.attempts,
                        members = result.member_outcomes.len(),
                        "Bundle landed"
                    );
                } else {
                    warn!(
                        bundle_id = %result.bundle_id,
                        attempts = result.attempts,
                        error = result.error.as_deref().unwrap_or("unknown"),
                        "Bundle failed"
                    );
                }
            }
            BundleEvent::StatsUpdated { stats, .. } => {
                debug!(
                    total = stats.total,
                    successful = stats.successful,
                    failed = stats.failed,
                    success_rate = stats.success_rate,
                    "Stats updated"
                );
            }
            BundleEvent::JobFinished { summary } => {
                let stats = &summary.stats;
                if stats.failed == 0 {
                    info!(
                        job_id = %summary.job.id,
                        status = ?summary.job.status,
                        successful = stats.successful,
                        "All bundles successful"
                    );
                } else {
                    warn!(
                        job_id = %summary.job.id,
                        status = ?summary.job.status,
                        successful = stats.successful,
                        failed = stats.failed,
                        success_rate = stats.success_rate,
                        "Bundle processing complete with failures"
                    );
                }
            }
        }
    }
}

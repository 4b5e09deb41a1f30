//! Paced, retrying, cancellable bundle scheduler
//!
//! A run partitions the requests into bundles and walks them strictly in
//! order: at most one bundle is in flight, consecutive bundles are separated
//! by a jittered pause, and a failed bundle is re-attempted with backoff up
//! to `max_retries` times. The result log is appended in bundle order and
//! can be read at any time; readers get snapshots.

use super::job::{BundleJob, BundleResult, JobStatus, JobSummary};
use super::pacing::{Backoff, Pacer};
use super::splitter::split;
use super::stats::Stats;
use super::submitter::BundleSubmitter;
use crate::config::{BundleSettings, FailurePolicy};
use crate::observers::{BundleEvent, BundleObserver, Observers};
use crate::sink::SubmissionSink;
use crate::{Error, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Cooperative cancellation flag for the current run.
///
/// Cloning shares the flag. It is cleared when a run ends, so a cancel
/// requested while idle stops the next run before its first bundle.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelHandle {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn reset(&self) {
        self.tx.send_replace(false);
    }
}

#[derive(Debug, Default)]
struct RunState {
    job: Option<BundleJob>,
    results: Vec<BundleResult>,
}

/// Held for the lifetime of one `run` call.
///
/// Releases the active flag and clears cancellation however the run ends.
/// If the run future is dropped before finishing, the job is marked
/// cancelled.
struct RunGuard<'a> {
    active: &'a AtomicBool,
    state: &'a RwLock<RunState>,
    observers: &'a Observers,
    cancel: &'a CancelHandle,
    job_id: Uuid,
    finished: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(job_id = %self.job_id, "Run dropped before finishing, marking job cancelled");
            // Only contended by a reader taking a snapshot; the active flag
            // below is what unblocks the scheduler either way.
            if let Ok(mut state) = self.state.try_write() {
                if let Some(job) = state
                    .job
                    .as_mut()
                    .filter(|job| job.id == self.job_id && !job.status.is_terminal())
                {
                    job.status = JobStatus::Cancelled;
                    job.finished_at = Some(Utc::now());
                }
            }
            self.observers.on_event(&BundleEvent::JobStatusChanged {
                job_id: self.job_id,
                status: JobStatus::Cancelled,
            });
        }
        self.cancel.reset();
        self.active.store(false, Ordering::Release);
    }
}

/// Drives bundles of `R` through a [`SubmissionSink`]
pub struct BundleScheduler<R: Send + Sync> {
    submitter: BundleSubmitter<R>,
    observers: Observers,
    state: RwLock<RunState>,
    active: AtomicBool,
    cancel: CancelHandle,
}

impl<R: Send + Sync> BundleScheduler<R> {
    pub fn new(sink: Arc<dyn SubmissionSink<R>>) -> Self {
        Self {
            submitter: BundleSubmitter::new(sink),
            observers: Observers::new(),
            state: RwLock::new(RunState::default()),
            active: AtomicBool::new(false),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_observer(mut self, observer: impl BundleObserver + 'static) -> Self {
        self.observers = self.observers.with(observer);
        self
    }

    pub fn with_observers(mut self, observers: Observers) -> Self {
        self.observers = observers;
        self
    }

    /// Share an externally owned cancel flag
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Request cancellation of the current run.
    ///
    /// No new bundle or retry starts afterwards and the job ends
    /// `Cancelled`. A bundle attempt already in flight is allowed to resolve
    /// and is recorded. When idle, the request applies to the next run.
    pub fn cancel(&self) {
        debug!("Cancellation requested");
        self.cancel.cancel();
    }

    /// Snapshot of the current or last job
    pub async fn job(&self) -> Option<BundleJob> {
        self.state.read().await.job.clone()
    }

    /// Snapshot of the result log, in bundle order
    pub async fn results(&self) -> Vec<BundleResult> {
        self.state.read().await.results.clone()
    }

    pub async fn stats(&self) -> Stats {
        Stats::from_results(&self.state.read().await.results)
    }

    pub async fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Forget the last job and its results
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if self.active.load(Ordering::Acquire) {
            return Err(Error::AlreadyRunning);
        }
        state.job = None;
        state.results.clear();
        Ok(())
    }

    /// Submit `requests` in bundles of `settings.bundle_size`.
    ///
    /// Returns once every bundle has resolved, the failure policy stopped
    /// the run, or cancellation was observed. Only one run may be active.
    pub async fn run(&self, requests: Vec<R>, settings: &BundleSettings) -> Result<JobSummary> {
        settings.validate()?;
        let total_requests = requests.len();
        let bundles = split(requests, settings.bundle_size)?;

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyRunning);
        }

        let job = BundleJob::new(settings, total_requests, bundles.len());
        let mut guard = RunGuard {
            active: &self.active,
            state: &self.state,
            observers: &self.observers,
            cancel: &self.cancel,
            job_id: job.id,
            finished: false,
        };
        {
            let mut state = self.state.write().await;
            state.job = Some(job.clone());
            state.results.clear();
        }

        self.emit(BundleEvent::JobStatusChanged {
            job_id: job.id,
            status: JobStatus::Pending,
        });
        self.set_status(job.id, JobStatus::Running).await;
        self.emit(BundleEvent::JobStarted {
            job_id: job.id,
            total_requests,
            total_bundles: bundles.len(),
        });

        let pacer = Pacer::new(settings.interval_ms);
        let backoff = Backoff::from_settings(settings);
        let total = bundles.len();
        let mut cancelled = false;
        let mut any_failed = false;

        for (index, bundle) in bundles.iter().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            if index > 0 && !self.pause(pacer.next_delay()).await {
                cancelled = true;
                break;
            }

            self.emit(BundleEvent::BundleStarted {
                job_id: job.id,
                index,
                total,
                size: bundle.len(),
            });

            let Some(result) = self
                .submit_with_retry(&job, index, bundle, settings.max_retries, &backoff)
                .await
            else {
                debug!(bundle = index + 1, "Cancelled during backoff, bundle dropped");
                cancelled = true;
                break;
            };

            let success = result.success;
            self.record(job.id, result).await;

            if !success {
                any_failed = true;
                if settings.failure_policy == FailurePolicy::FailFast {
                    info!(bundle = index + 1, "Stopping run after failed bundle");
                    break;
                }
            }
        }

        // A cancel that arrived while the last bundle was in flight
        cancelled |= self.cancel.is_cancelled();

        let status = if cancelled {
            JobStatus::Cancelled
        } else if any_failed {
            JobStatus::Failed
        } else {
            JobStatus::Succeeded
        };
        let job_id = job.id;
        let summary = self.finish(job, status).await;
        guard.finished = true;

        self.emit(BundleEvent::JobStatusChanged { job_id, status });
        self.emit(BundleEvent::JobFinished {
            summary: summary.clone(),
        });

        Ok(summary)
    }

    /// Attempt a bundle up to `max_retries + 1` times.
    ///
    /// `None` means cancellation arrived during a backoff wait; nothing is
    /// recorded for the bundle in that case.
    async fn submit_with_retry(
        &self,
        job: &BundleJob,
        index: usize,
        bundle: &[R],
        max_retries: u32,
        backoff: &Backoff,
    ) -> Option<BundleResult> {
        let mut attempt = 1;
        loop {
            let result = self.submitter.submit(job.bundle_id(index), index, bundle).await;
            if result.success || attempt > max_retries || self.cancel.is_cancelled() {
                return Some(result.with_attempts(attempt));
            }

            let delay = backoff.delay_for(attempt);
            self.emit(BundleEvent::BundleRetrying {
                job_id: job.id,
                index,
                attempt,
                delay_ms: delay.as_millis() as u64,
                error: result.error.unwrap_or_default(),
            });
            if !self.pause(delay).await {
                return None;
            }
            attempt += 1;
        }
    }

    /// Sleep for `delay` unless cancelled first. Returns false on cancel.
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => !self.cancel.is_cancelled(),
            _ = self.cancel.cancelled() => false,
        }
    }

    async fn record(&self, job_id: Uuid, result: BundleResult) {
        let stats = {
            let mut state = self.state.write().await;
            state.results.push(result.clone());
            Stats::from_results(&state.results)
        };
        self.emit(BundleEvent::BundleCompleted { job_id, result });
        self.emit(BundleEvent::StatsUpdated { job_id, stats });
    }

    async fn set_status(&self, job_id: Uuid, status: JobStatus) {
        if let Some(job) = self.state.write().await.job.as_mut() {
            job.status = status;
        }
        self.emit(BundleEvent::JobStatusChanged { job_id, status });
    }

    async fn finish(&self, mut job: BundleJob, status: JobStatus) -> JobSummary {
        job.status = status;
        job.finished_at = Some(Utc::now());

        let mut state = self.state.write().await;
        state.job = Some(job.clone());
        JobSummary {
            job,
            stats: Stats::from_results(&state.results),
        }
    }

    fn emit(&self, event: BundleEvent) {
        self.observers.on_event(&event);
    }
}

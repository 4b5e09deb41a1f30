//! Progress events and the observers that consume them
//!
//! The scheduler reports job status changes, per-bundle outcomes and live
//! stats through [`BundleObserver`]. Observers are for display and audit
//! only; nothing they do feeds back into scheduling.

mod audit_log;
mod channel;
mod tracing_log;

pub use audit_log::AuditLogObserver;
pub use channel::ChannelObserver;
pub use tracing_log::TracingObserver;

use crate::bundles::{BundleResult, JobStatus, JobSummary, Stats};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Something that happened during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BundleEvent {
    JobStatusChanged {
        job_id: Uuid,
        status: JobStatus,
    },
    JobStarted {
        job_id: Uuid,
        total_requests: usize,
        total_bundles: usize,
    },
    BundleStarted {
        job_id: Uuid,
        index: usize,
        total: usize,
        size: usize,
    },
    BundleRetrying {
        job_id: Uuid,
        index: usize,
        /// Retry about to be made (1-based)
        attempt: u32,
        delay_ms: u64,
        error: String,
    },
    BundleCompleted {
        job_id: Uuid,
        result: BundleResult,
    },
    StatsUpdated {
        job_id: Uuid,
        stats: Stats,
    },
    JobFinished {
        summary: JobSummary,
    },
}

impl BundleEvent {
    /// Short name, matches the serialized tag
    pub fn name(&self) -> &'static str {
        match self {
            BundleEvent::JobStatusChanged { .. } => "job_status_changed",
            BundleEvent::JobStarted { .. } => "job_started",
            BundleEvent::BundleStarted { .. } => "bundle_started",
            BundleEvent::BundleRetrying { .. } => "bundle_retrying",
            BundleEvent::BundleCompleted { .. } => "bundle_completed",
            BundleEvent::StatsUpdated { .. } => "stats_updated",
            BundleEvent::JobFinished { .. } => "job_finished",
        }
    }
}

/// Receiver of run events.
///
/// Called inline from the scheduler, so implementations must not block.
pub trait BundleObserver: Send + Sync {
    fn on_event(&self, event: &BundleEvent);
}

/// Fan-out to any number of observers. Empty means events are dropped.
#[derive(Clone, Default)]
pub struct Observers {
    inner: Vec<Arc<dyn BundleObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl BundleObserver + 'static) -> Self {
        self.inner.push(Arc::new(observer));
        self
    }

    pub fn push(&mut self, observer: Arc<dyn BundleObserver>) {
        self.inner.push(observer);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl BundleObserver for Observers {
    fn on_event(&self, event: &BundleEvent) {
        for observer in &self.inner {
            observer.on_event(event);
        }
    }
}

//! Bundle pipeline
//!
//! Requests are partitioned into fixed-size bundles, each bundle is
//! submitted as one concurrent all-or-nothing unit, and the scheduler paces,
//! retries and records the bundles one after another.

mod job;
mod pacing;
mod scheduler;
mod splitter;
mod stats;
mod submitter;

pub use job::{BundleJob, BundleResult, JobStatus, JobSummary};
pub use pacing::{Backoff, Pacer};
pub use scheduler::{BundleScheduler, CancelHandle};
pub use splitter::split;
pub use stats::{stats, Stats};
pub use submitter::BundleSubmitter;

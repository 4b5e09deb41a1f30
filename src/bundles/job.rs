//! Job and result records

use super::stats::Stats;
use crate::config::{BundleSettings, FailurePolicy};
use crate::sink::Receipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a scheduling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// One scheduling run over a list of requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleJob {
    pub id: Uuid,
    pub bundle_size: usize,
    pub interval_ms: u64,
    pub max_retries: u32,
    pub failure_policy: FailurePolicy,
    pub status: JobStatus,
    pub total_requests: usize,
    pub total_bundles: usize,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BundleJob {
    pub(crate) fn new(settings: &BundleSettings, total_requests: usize, total_bundles: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            bundle_size: settings.bundle_size,
            interval_ms: settings.interval_ms,
            max_retries: settings.max_retries,
            failure_policy: settings.failure_policy,
            status: JobStatus::Pending,
            total_requests,
            total_bundles,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Identifier for the bundle at `index` within this job
    pub fn bundle_id(&self, index: usize) -> String {
        format!("bundle_{}_{}", self.id.simple(), index)
    }
}

/// Final outcome of one bundle, after any retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleResult {
    pub bundle_id: String,
    /// Position in the partition order
    pub bundle_index: usize,
    pub success: bool,
    /// One receipt per member, in member order. Empty on failure.
    pub member_outcomes: Vec<Receipt>,
    /// First member error, in member order
    pub error: Option<String>,
    /// Attempts made, including the first
    pub attempts: u32,
    pub completed_at: DateTime<Utc>,
}

impl BundleResult {
    pub fn succeeded(bundle_id: String, bundle_index: usize, member_outcomes: Vec<Receipt>) -> Self {
        Self {
            bundle_id,
            bundle_index,
            success: true,
            member_outcomes,
            error: None,
            attempts: 1,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(bundle_id: String, bundle_index: usize, error: impl Into<String>) -> Self {
        Self {
            bundle_id,
            bundle_index,
            success: false,
            member_outcomes: Vec::new(),
            error: Some(error.into()),
            attempts: 1,
            completed_at: Utc::now(),
        }
    }

    pub(crate) fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

/// What a finished run reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job: BundleJob,
    pub stats: Stats,
}

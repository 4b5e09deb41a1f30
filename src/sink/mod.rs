//! Submission sinks
//!
//! A sink is whatever actually delivers one request (a signed operation) to
//! the outside world. The bundle pipeline calls it once per member per
//! attempt and never looks inside the request. Sinks are expected to bound
//! their own latency; the pipeline imposes no timeout.

mod simulated;

pub use simulated::SimulatedSink;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque token returned by a sink for an accepted request
/// (a signature, a transaction hash, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Receipt(pub String);

impl Receipt {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single member submission failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Submission failed: {reason}")]
pub struct SubmissionError {
    pub reason: String,
}

impl SubmissionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Capability to submit one request
#[async_trait]
pub trait SubmissionSink<R: Send + Sync>: Send + Sync {
    async fn submit(&self, request: &R) -> Result<Receipt, SubmissionError>;
}

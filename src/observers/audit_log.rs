//! Audit log observer
//!
//! Writes every run event as one JSON line for compliance and debugging.

use super::{BundleEvent, BundleObserver};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

/// Entry in the audit log
#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a BundleEvent,
}

/// Observer that appends JSONL entries to any writer
pub struct AuditLogObserver<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> AuditLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Take the writer back, e.g. to inspect a buffer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self, entry: &AuditEntry<'_>) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}

impl<W: Write + Send> BundleObserver for AuditLogObserver<W> {
    fn on_event(&self, event: &BundleEvent) {
        let entry = AuditEntry {
            timestamp: Utc::now(),
            event,
        };

        // Audit logging never interrupts a run
        if let Err(e) = self.write(&entry) {
            tracing::warn!(error = %e, "Failed to write audit log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::{BundleResult, JobStatus};
    use crate::sink::Receipt;
    use uuid::Uuid;

    #[test]
    fn test_logs_events_as_jsonl() {
        let observer = AuditLogObserver::new(Vec::new());
        let job_id = Uuid::new_v4();

        observer.on_event(&BundleEvent::JobStatusChanged {
            job_id,
            status: JobStatus::Running,
        });
        observer.on_event(&BundleEvent::BundleCompleted {
            job_id,
            result: BundleResult::succeeded("b0".to_string(), 0, vec![Receipt::new("sig_0")]),
        });

        let content = String::from_utf8(observer.into_inner()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "job_status_changed");
        assert_eq!(first["status"], "running");
        assert!(first.get("timestamp").is_some());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "bundle_completed");
        assert_eq!(second["result"]["member_outcomes"][0], "sig_0");
    }
}

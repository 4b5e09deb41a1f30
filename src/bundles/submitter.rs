//! Single-attempt submission of one bundle
//!
//! Every member goes to the sink at once and the attempt resolves only when
//! all of them have answered. The bundle is atomic from the caller's point
//! of view: one failed member fails the whole bundle.

use super::job::BundleResult;
use crate::sink::SubmissionSink;
use futures::future::join_all;
use std::sync::Arc;

pub struct BundleSubmitter<R: Send + Sync> {
    sink: Arc<dyn SubmissionSink<R>>,
}

impl<R: Send + Sync> BundleSubmitter<R> {
    pub fn new(sink: Arc<dyn SubmissionSink<R>>) -> Self {
        Self { sink }
    }

    /// Submit every member of `bundle` once and fold the outcomes.
    ///
    /// Calls the sink exactly once per member. On failure the error of the
    /// first failing member (in member order) becomes the bundle error.
    pub async fn submit(&self, bundle_id: String, bundle_index: usize, bundle: &[R]) -> BundleResult {
        let outcomes = join_all(bundle.iter().map(|request| self.sink.submit(request))).await;

        let mut receipts = Vec::with_capacity(outcomes.len());
        for (member, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(receipt) => receipts.push(receipt),
                Err(e) => {
                    tracing::debug!(
                        bundle_id = %bundle_id,
                        member,
                        error = %e,
                        "Bundle member failed"
                    );
                    return BundleResult::failed(bundle_id, bundle_index, e.reason);
                }
            }
        }

        BundleResult::succeeded(bundle_id, bundle_index, receipts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Receipt, SubmissionError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fails requests listed in `failing`; later members finish first
    struct ScriptedSink {
        failing: Vec<u32>,
        calls: Mutex<Vec<u32>>,
        finished: Mutex<Vec<u32>>,
    }

    impl ScriptedSink {
        fn new(failing: Vec<u32>) -> Self {
            Self {
                failing,
                calls: Mutex::new(Vec::new()),
                finished: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SubmissionSink<u32> for ScriptedSink {
        async fn submit(&self, request: &u32) -> Result<Receipt, SubmissionError> {
            self.calls.lock().unwrap().push(*request);
            tokio::time::sleep(Duration::from_millis(100 - *request as u64 * 10)).await;
            self.finished.lock().unwrap().push(*request);
            if self.failing.contains(request) {
                Err(SubmissionError::new(format!("rejected {}", request)))
            } else {
                Ok(Receipt::new(format!("sig_{}", request)))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_keeps_member_order() {
        let sink = Arc::new(ScriptedSink::new(vec![]));
        let submitter = BundleSubmitter::new(sink.clone() as Arc<dyn SubmissionSink<u32>>);

        let result = submitter.submit("b0".to_string(), 0, &[1, 2, 3]).await;

        assert!(result.success);
        assert_eq!(
            result.member_outcomes,
            vec![Receipt::new("sig_1"), Receipt::new("sig_2"), Receipt::new("sig_3")]
        );
        // completed in reverse, reported in order
        assert_eq!(*sink.finished.lock().unwrap(), vec![3, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_run_concurrently() {
        let sink = Arc::new(ScriptedSink::new(vec![]));
        let submitter = BundleSubmitter::new(sink as Arc<dyn SubmissionSink<u32>>);

        let start = tokio::time::Instant::now();
        submitter.submit("b0".to_string(), 0, &[1, 2, 3, 4, 5]).await;

        // sequential would be 90+80+70+60+50 ms
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failure_fails_bundle_with_first_error() {
        let sink = Arc::new(ScriptedSink::new(vec![2, 4]));
        let submitter = BundleSubmitter::new(sink.clone() as Arc<dyn SubmissionSink<u32>>);

        let result = submitter.submit("b1".to_string(), 1, &[1, 2, 3, 4]).await;

        assert!(!result.success);
        assert!(result.member_outcomes.is_empty());
        assert_eq!(result.error.as_deref(), Some("rejected 2"));
        assert_eq!(result.bundle_index, 1);
        // every member was still dispatched exactly once
        assert_eq!(sink.calls.lock().unwrap().len(), 4);
    }
}

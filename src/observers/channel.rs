//! Observer that forwards events to a UI task over a channel

use super::{BundleEvent, BundleObserver};
use tokio::sync::mpsc;

/// Pushes every event into an unbounded mpsc channel.
///
/// A dropped receiver is not an error; events are simply discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<BundleEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<BundleEvent>) -> Self {
        Self { tx }
    }

    /// Observer plus the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BundleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl BundleObserver for ChannelObserver {
    fn on_event(&self, event: &BundleEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(event = event.name(), "Event receiver dropped");
        }
    }
}

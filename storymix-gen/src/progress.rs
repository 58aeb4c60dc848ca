//! Per-job progress channel
//!
//! Each job owns one ordered, unbounded channel of `ProgressEvent`s: the
//! orchestrator task is the only producer, and the progress stream reader
//! is the only consumer. The receiver lives in the job registry until the
//! first read claims it, making the channel a single-shot, single-reader
//! abstraction.

use storymix_common::{ProgressEvent, ProgressStage};
use tokio::sync::mpsc;
use tracing::debug;

/// Producer half of a job's progress channel
///
/// `push` never blocks (the queue is unbounded). Sending after the reader
/// has gone away is silently ignored; the pipeline keeps running to
/// completion regardless of whether anyone is listening.
#[derive(Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

/// Consumer half, claimed once from the registry by the progress stream
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Create a fresh progress channel for one job
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, rx)
}

impl ProgressSender {
    /// Push one event; ordering follows call order
    pub fn push(&self, event: ProgressEvent) {
        debug!("[{}] {}", event.stage, event.message);
        // No receiver is OK (client may never connect or has disconnected)
        let _ = self.tx.send(event);
    }

    /// Convenience for a stage + message pair
    pub fn stage(&self, stage: ProgressStage, message: impl Into<String>) {
        self.push(ProgressEvent::new(stage, message));
    }
}

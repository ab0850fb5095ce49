//! Fetch job dispatch
//!
//! Stages schedule work by sending typed jobs through an unbounded channel
//! whose sender carries the run's outstanding-work counter. The counter is
//! bumped before the send, so the coordinator's drain loop can never
//! observe zero while a job is still sitting in the channel. There is no
//! explicit "done" state: the run ends when the counter converges to zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::context::ContextToken;

/// One unit of fetch work.
#[derive(Debug)]
pub enum FetchJob {
    /// Fetch one page of the listing index.
    Index { page: u32 },

    /// Fetch one listing's detail page, correlated through its token.
    Detail { url: String, token: ContextToken },
}

/// Counted job sender shared by the stages and the coordinator.
#[derive(Debug, Clone)]
pub struct JobSender {
    tx: mpsc::UnboundedSender<FetchJob>,
    outstanding: Arc<AtomicUsize>,
}

impl JobSender {
    /// Creates the job channel and its counted sender.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FetchJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = Self {
            tx,
            outstanding: Arc::new(AtomicUsize::new(0)),
        };
        (sender, rx)
    }

    /// Schedules a job.
    pub fn schedule(&self, job: FetchJob) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(job).is_err() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            tracing::error!("job channel closed, dropping scheduled fetch");
        }
    }

    /// Marks one scheduled job as finished, whether its worker completed or
    /// the coordinator discarded it.
    pub fn complete_one(&self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }

    /// Jobs scheduled but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

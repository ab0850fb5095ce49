//! Periodic progress reporting
//!
//! A single background task ticks on a fixed interval and invokes a
//! caller-supplied callback; the coordinator uses it to log the size of the
//! result collection while the crawl runs. The reporter only ever reads a
//! count, so it races benignly with the writers.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Default)]
pub struct ProgressReporter {
    running: Option<ReporterHandle>,
}

#[derive(Debug)]
struct ReporterHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking. A reporter that is already running is stopped and
    /// replaced, so there is never more than one ticking task.
    pub async fn start<F>(&mut self, period: Duration, callback: F)
    where
        F: Fn() + Send + 'static,
    {
        self.stop().await;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the first report happens
            // one full period in.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => callback(),
                    _ = stop_rx.changed() => return,
                }
            }
        });

        self.running = Some(ReporterHandle {
            stop: stop_tx,
            task,
        });
    }

    /// Stops the ticking task, waiting until it has exited. A no-op when
    /// nothing is running.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.running.take() {
            let _ = handle.stop.send(true);
            let _ = handle.task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn stop_without_start_is_a_noop() {
        let mut reporter = ProgressReporter::new();
        assert!(!reporter.is_running());

        reporter.stop().await;
        assert!(!reporter.is_running());
    }

    #[tokio::test]
    async fn ticks_invoke_the_callback() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let mut reporter = ProgressReporter::new();
        reporter
            .start(Duration::from_millis(20), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(110)).await;
        reporter.stop().await;

        assert!(ticks.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn stop_halts_ticking_before_returning() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let mut reporter = ProgressReporter::new();
        reporter
            .start(Duration::from_millis(10), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(35)).await;
        reporter.stop().await;

        let after_stop = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn second_start_replaces_the_first_ticker() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut reporter = ProgressReporter::new();

        let counter = first.clone();
        reporter
            .start(Duration::from_millis(10), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        let counter = second.clone();
        reporter
            .start(Duration::from_millis(10), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        let first_after_replace = first.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        reporter.stop().await;

        // Only the replacement kept ticking
        assert_eq!(first.load(Ordering::SeqCst), first_after_replace);
        assert!(second.load(Ordering::SeqCst) >= 2);
    }
}

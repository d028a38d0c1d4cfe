use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

/// Observer notified once per simulated trial and once per finished model
/// variant. Purely observational: it never influences the simulation.
pub trait ProgressTracker: Send + Sync {
    fn update(&self);
    fn close(&self);
}

/// Tracker that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressTracker for NoProgress {
    fn update(&self) {}

    fn close(&self) {}
}

/// Tracker that counts trials and reports through `tracing`.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    total: usize,
    log_interval: usize,
    done: AtomicUsize,
    closed: AtomicUsize,
}

impl LogProgress {
    /// `total` is the number of trials expected over the whole run.
    pub fn new(label: impl Into<String>, total: usize, log_interval: usize) -> Self {
        LogProgress {
            label: label.into(),
            total,
            log_interval: log_interval.max(1),
            done: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn trials_done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Number of `close` calls so far (one per model variant).
    pub fn stages_closed(&self) -> usize {
        self.closed.load(Ordering::Relaxed)
    }

    fn percent(&self, done: usize) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        done as f64 / self.total as f64 * 100.0
    }
}

impl ProgressTracker for LogProgress {
    fn update(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.log_interval == 0 {
            info!(
                condition = %self.label,
                "{done}/{} trials ({:.1}%)",
                self.total,
                self.percent(done)
            );
        }
    }

    fn close(&self) {
        let stage = self.closed.fetch_add(1, Ordering::Relaxed) + 1;
        let done = self.trials_done();
        info!(
            condition = %self.label,
            stage,
            "model finished at {done}/{} trials ({:.1}%)",
            self.total,
            self.percent(done)
        );
    }
}

//! Progress tracking and cancellation for long-running simulations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared progress counter and cancellation flag.
///
/// Clones share the same atomics, so a UI or transport thread can hold one
/// clone to poll progress or call [`cancel`](Self::cancel) while the
/// simulator holds another. The simulator checks the flag between trial
/// batches, not inside a batch.
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    /// Completed trials counter
    completed: Arc<AtomicUsize>,
    /// Total trials
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl SimulationProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed fraction in 0..=1, 0 before a run starts
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    pub fn add_completed(&self, trials: usize) {
        self.completed.fetch_add(trials, Ordering::Relaxed);
    }

    /// Reset the counter for a new run of `total` trials.
    ///
    /// The cancellation flag is left untouched so a cancel issued before the
    /// run starts is still honored.
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SimulationProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts() {
        let progress = SimulationProgress::new();
        assert_eq!(progress.fraction(), 0.0);

        progress.reset(200);
        progress.add_completed(50);
        assert_eq!(progress.completed(), 50);
        assert_eq!(progress.total(), 200);
        assert!((progress.fraction() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_clones_share_cancellation() {
        let progress = SimulationProgress::new();
        let handle = progress.clone();
        assert!(!progress.is_cancelled());

        handle.cancel();
        assert!(progress.is_cancelled());

        // reset keeps a pending cancel
        progress.reset(10);
        assert!(progress.is_cancelled());
        assert_eq!(progress.completed(), 0);
    }
}

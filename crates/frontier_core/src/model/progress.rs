use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared progress and cancellation handle for a running simulation.
///
/// Clones share the same counters, so a UI thread can poll a clone while
/// workers update another.
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    /// Completed draws
    completed: Arc<AtomicUsize>,
    /// Total draws
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl SimulationProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
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

    /// Fraction complete in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.completed() as f64 / total as f64).min(1.0)
        }
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Request cancellation; workers stop at the next draw boundary
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
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_shared_between_clones() {
        let progress = SimulationProgress::new(4);
        let worker = progress.clone();

        worker.increment();
        worker.increment();
        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.fraction(), 0.5);

        progress.cancel();
        assert!(worker.is_cancelled());

        progress.reset(10);
        assert_eq!(worker.completed(), 0);
        assert_eq!(worker.total(), 10);
        assert!(!worker.is_cancelled());
    }

    #[test]
    fn test_fraction_with_zero_total() {
        assert_eq!(SimulationProgress::default().fraction(), 0.0);
    }
}

//! Think-time limits shared by the Monte Carlo evaluator and the search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A deadline and/or a cancel flag.
///
/// Cloning shares the cancel flag, so a caller can keep one copy and cancel
/// work running on another thread. Work is checked between Monte Carlo trials
/// and between search candidate expansions; nothing is interrupted mid-step.
#[derive(Clone, Debug, Default)]
pub struct ThinkBudget {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl ThinkBudget {
    /// No deadline; only [`ThinkBudget::cancel`] stops the work.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
            cancelled: Arc::default(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_exhausted(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

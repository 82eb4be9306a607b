use crate::error::{Error, Result};
use std::time::{Duration, Instant};

/// Wall-clock budget for one training run.
///
/// Training is cooperative: every phase calls [`Deadline::check`] between
/// units of work (walk rounds, walks, head epochs) and stops at the first
/// expired check.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock now.
    pub fn start(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Configured budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// `Err(TrainingTimeout)` once the budget is spent. A zero budget is
    /// always spent.
    pub fn check(&self, epochs_completed: usize) -> Result<()> {
        let elapsed = self.elapsed();
        if elapsed >= self.budget {
            Err(Error::TrainingTimeout {
                elapsed,
                budget: self.budget,
                epochs_completed,
            })
        } else {
            Ok(())
        }
    }
}

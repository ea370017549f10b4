//! Wall-clock budget for one engine call.
//!
//! Every loop in the engine calls [`Budget::tick`]; the clock is read on
//! the first tick and then once every `BUDGET_CHECK_INTERVAL` ticks.

use std::time::{Duration, Instant};

use giftmatch_types::{MatchingError, constants};

#[derive(Debug)]
pub struct Budget {
    started: Instant,
    limit: Duration,
    steps: u64,
}

impl Budget {
    /// Start the clock now.
    #[must_use]
    pub fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
            steps: 0,
        }
    }

    /// Count one unit of work, consulting the clock periodically.
    ///
    /// # Errors
    /// Returns [`MatchingError::ComputationTimeout`] once the limit is reached.
    pub fn tick(&mut self) -> Result<(), MatchingError> {
        let due = self.steps % constants::BUDGET_CHECK_INTERVAL == 0;
        self.steps += 1;
        if due { self.check() } else { Ok(()) }
    }

    /// Read the clock unconditionally.
    ///
    /// # Errors
    /// Returns [`MatchingError::ComputationTimeout`] once the limit is reached.
    pub fn check(&self) -> Result<(), MatchingError> {
        let elapsed = self.started.elapsed();
        if elapsed >= self.limit {
            return Err(MatchingError::ComputationTimeout {
                elapsed_ms: millis(elapsed),
                limit_ms: millis(self.limit),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

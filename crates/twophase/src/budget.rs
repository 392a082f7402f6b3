//! Global wall-clock budget, measured from the start of a run.
//!
//! Checked after oracle calls only; a solve already in flight is never
//! interrupted, so a run can overshoot the limit by one solve.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct Budget {
    start: Instant,
    limit: Duration,
}

impl Budget {
    /// Starts the clock now.
    #[inline]
    pub fn start(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn exceeded(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_exceeded_immediately() {
        assert!(Budget::start(Duration::ZERO).exceeded());
        assert!(!Budget::start(Duration::from_secs(3600)).exceeded());
    }
}

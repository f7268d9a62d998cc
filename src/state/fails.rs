//! Consecutive mistake tracking.

use super::config::DEFAULT_MAX_FAILS;

/// Counts rejected submissions since the last accepted word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailCounter {
    fails: u32,
    max_fails: u32,
}

impl Default for FailCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILS)
    }
}

impl FailCounter {
    pub fn new(max_fails: u32) -> Self {
        Self {
            fails: 0,
            max_fails,
        }
    }

    /// Record a mistake. Returns true when the limit has been reached.
    pub fn increment(&mut self) -> bool {
        self.fails = self.fails.saturating_add(1);
        self.is_exhausted()
    }

    pub fn reset(&mut self) {
        self.fails = 0;
    }

    pub fn count(&self) -> u32 {
        self.fails
    }

    pub fn max_fails(&self) -> u32 {
        self.max_fails
    }

    pub fn is_exhausted(&self) -> bool {
        self.fails >= self.max_fails
    }

    /// Mistakes left before the limit.
    pub fn remaining(&self) -> u32 {
        self.max_fails.saturating_sub(self.fails)
    }
}

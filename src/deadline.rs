//! Wall-clock deadline for time-bounded searches.

use std::time::{Duration, Instant};

/// Absolute point in time after which a search must stop.
///
/// Checks the clock only every `check_interval` calls to `tick` to keep the
/// overhead out of hot loops.
#[derive(Debug, Clone)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
    check_interval: usize,
    ticks_since_check: usize,
}

impl Deadline {
    /// Deadline `budget` from now
    pub fn after(budget: Duration, check_interval: usize) -> Self {
        Self::starting_at(Instant::now(), budget, check_interval)
    }

    /// Deadline `budget` after an earlier instant
    pub fn starting_at(started: Instant, budget: Duration, check_interval: usize) -> Self {
        Deadline {
            started,
            budget,
            check_interval: check_interval.max(1),
            ticks_since_check: 0,
        }
    }

    /// Check the clock unconditionally
    #[inline]
    pub fn expired(&self) -> bool {
        self.started.elapsed() > self.budget
    }

    /// Count one unit of work and check the clock every `check_interval` units
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.ticks_since_check += 1;
        if self.ticks_since_check >= self.check_interval {
            self.ticks_since_check = 0;
            self.expired()
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

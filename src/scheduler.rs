//! Cooperative scheduling primitives.
//!
//! The work loop is a step function: each call performs one unit and reports
//! whether more remain. A [`Deadline`] decides when a driver should stop
//! stepping and hand control back to the host (the equivalent of an idle
//! callback running out of time). Commit never consults a deadline.

use std::time::{Duration, Instant};

/// State of a root's work-in-progress render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// Nothing scheduled
    Idle,
    /// Units of work remain
    Pending,
    /// Work loop finished; the tree is ready to commit
    Ready,
}

impl WorkStatus {
    /// Check if more units remain.
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    /// Check if the tree is ready to commit.
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// Decides when a driver should yield between units of work.
pub trait Deadline {
    /// Called before each unit; `true` stops the driver.
    fn should_yield(&mut self) -> bool;
}

/// Never yields: run the work loop to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn should_yield(&mut self) -> bool {
        false
    }
}

/// Yields after a fixed number of units.
#[derive(Debug, Clone, Copy)]
pub struct UnitBudget {
    remaining: usize,
}

impl UnitBudget {
    /// Allow `units` units of work.
    pub fn new(units: usize) -> Self {
        Self { remaining: units }
    }

    /// Units left in this budget.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Deadline for UnitBudget {
    fn should_yield(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Yields once a wall-clock instant has passed.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    until: Instant,
}

impl TimeBudget {
    /// Allow work until `until`.
    pub fn until(until: Instant) -> Self {
        Self { until }
    }

    /// Allow work for `duration` from now.
    pub fn for_duration(duration: Duration) -> Self {
        Self::until(Instant::now() + duration)
    }

    /// Time left before yielding.
    pub fn time_remaining(&self) -> Duration {
        self.until.saturating_duration_since(Instant::now())
    }
}

impl Deadline for TimeBudget {
    fn should_yield(&mut self) -> bool {
        Instant::now() >= self.until
    }
}

impl<D: Deadline + ?Sized> Deadline for &mut D {
    fn should_yield(&mut self) -> bool {
        (**self).should_yield()
    }
}

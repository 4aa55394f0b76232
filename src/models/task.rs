//! Task model.
//!
//! A task is a block of work with a fixed duration and a constant resource
//! demand while it runs. Its start may be moved inside a feasible window
//! (smoothing) or pushed forward without bound (leveling).
//!
//! # Time Representation
//! All times are integer day ticks relative to a project epoch (t=0).
//! The consumer defines what t=0 means; the `records` module maps ticks
//! to calendar dates.

use serde::{Deserialize, Serialize};

/// A task to be repositioned.
///
/// A task occupies the half-open interval `[start, start + duration)`.
/// `is_critical` and `end` are derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Number of time units the task occupies once started.
    pub duration: i64,
    /// Resource consumption per time unit while active.
    pub demand: f64,
    /// Earliest allowed start (inclusive).
    pub earliest_start: i64,
    /// Latest allowed start (inclusive).
    pub latest_start: i64,
    /// Current start.
    pub start: i64,
}

impl Task {
    /// Creates a task placed at t=0 with a zero-width window.
    pub fn new(id: impl Into<String>, duration: i64, demand: f64) -> Self {
        Self {
            id: id.into(),
            duration,
            demand,
            earliest_start: 0,
            latest_start: 0,
            start: 0,
        }
    }

    /// Creates a task occupying `[start, end)` with no movement window.
    ///
    /// This is the leveling input shape: only `start` matters, the window
    /// collapses onto it.
    pub fn spanning(id: impl Into<String>, start: i64, end: i64, demand: f64) -> Self {
        Self {
            id: id.into(),
            duration: end.saturating_sub(start),
            demand,
            earliest_start: start,
            latest_start: start,
            start,
        }
    }

    /// Sets the feasible start window and places the task at its earliest start.
    pub fn with_window(mut self, earliest_start: i64, latest_start: i64) -> Self {
        self.earliest_start = earliest_start;
        self.latest_start = latest_start;
        self.start = earliest_start;
        self
    }

    /// Sets the current start without touching the window.
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    /// Exclusive end of the occupied interval.
    ///
    /// Saturates at `i64::MAX`; validation rejects such tasks before any
    /// engine runs.
    #[inline]
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }

    /// Total float: `latest_start - earliest_start`.
    #[inline]
    pub fn slack(&self) -> i64 {
        self.latest_start.saturating_sub(self.earliest_start)
    }

    /// Zero-slack tasks are immovable during smoothing.
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.earliest_start == self.latest_start
    }

    /// Whether the task consumes resources during unit `t`.
    #[inline]
    pub fn is_active_at(&self, t: i64) -> bool {
        self.start <= t && t < self.end()
    }

    /// Whether `start` lies inside `[earliest_start, latest_start]`.
    pub fn is_within_window(&self) -> bool {
        self.earliest_start <= self.start && self.start <= self.latest_start
    }

    /// Returns a copy of this task moved to `start`.
    ///
    /// Used to build candidate placements without touching committed state.
    pub fn placed_at(&self, start: i64) -> Self {
        Self {
            start,
            ..self.clone()
        }
    }
}

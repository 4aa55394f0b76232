//! Input validation for rescheduling problems.
//!
//! Checks structural integrity of a task set before any engine runs.
//! Detects:
//! - Empty task sets
//! - Duplicate IDs
//! - Non-positive durations
//! - Negative or non-finite demands
//! - Start windows with `earliest_start > latest_start`
//! - Negative or non-finite capacity ceilings
//! - Negative leveling offsets
//! - Placements whose ends overflow `i64`, or whose span exceeds
//!   [`MAX_SPAN`] markers
//!
//! All problems are collected, not only the first.

use crate::models::Task;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Largest supported project span, in day markers.
///
/// Every candidate evaluation allocates one demand slot per marker, so
/// spans above this are rejected before any engine runs.
pub const MAX_SPAN: i64 = 1 << 20;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// The task set is empty.
    EmptyTaskSet,
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task has `duration <= 0`.
    NonPositiveDuration,
    /// A task has a negative or non-finite demand.
    NegativeDemand,
    /// A task has `earliest_start > latest_start`.
    InvertedWindow,
    /// The capacity ceiling is negative or non-finite.
    InvalidCapacity,
    /// The leveling offset is negative.
    InvalidOffset,
    /// A placement overflows the tick range or the supported span.
    OutOfRange,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error reported for an empty task set.
    pub fn empty_task_set() -> Self {
        Self::new(ValidationErrorKind::EmptyTaskSet, "Task set is empty")
    }
}

/// Validates the task fields shared by both engines.
///
/// Checks:
/// 1. At least one task
/// 2. No duplicate task IDs
/// 3. `duration > 0`
/// 4. `demand >= 0` and finite
/// 5. `start + duration` representable for the current start and both
///    window bounds
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();
    collect_task_errors(tasks, &mut errors);
    finish(errors)
}

/// Validates tasks for smoothing: the shared checks plus start windows.
pub fn validate_windows(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();
    collect_task_errors(tasks, &mut errors);

    for task in tasks {
        if task.earliest_start > task.latest_start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedWindow,
                format!(
                    "Task '{}' has earliest start {} after latest start {}",
                    task.id, task.earliest_start, task.latest_start
                ),
            ));
        }
    }

    // The smoothing timeline runs from the earliest start to the latest
    // end of the earliest-start placement.
    if errors.is_empty() {
        let lo = tasks.iter().map(|t| i128::from(t.earliest_start)).min();
        let hi = tasks
            .iter()
            .map(|t| i128::from(t.earliest_start) + i128::from(t.duration))
            .max();
        if let (Some(lo), Some(hi)) = (lo, hi) {
            check_span(lo, hi, &mut errors);
        }
    }

    finish(errors)
}

/// Validates tasks for leveling: the shared checks, the capacity ceiling,
/// and the search horizon `max(start) + max_offset`.
///
/// Every task must be able to end after being pushed one unit past the
/// horizon, and that reach must fit within [`MAX_SPAN`].
pub fn validate_leveling(tasks: &[Task], capacity: f64, max_offset: i64) -> ValidationResult {
    let mut errors = Vec::new();
    collect_task_errors(tasks, &mut errors);
    if let Err(err) = validate_capacity(capacity) {
        errors.push(err);
    }
    if max_offset < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidOffset,
            format!("Leveling offset must be non-negative, got {max_offset}"),
        ));
    }

    if errors.is_empty() {
        let lo = tasks.iter().map(|t| i128::from(t.start)).min();
        let max_start = tasks.iter().map(|t| i128::from(t.start)).max();
        let max_duration = tasks.iter().map(|t| i128::from(t.duration)).max();
        if let (Some(lo), Some(max_start), Some(max_duration)) = (lo, max_start, max_duration) {
            let reach = max_start + i128::from(max_offset) + 1 + max_duration;
            check_span(lo, reach, &mut errors);
        }
    }

    finish(errors)
}

/// Validates a capacity ceiling.
pub fn validate_capacity(capacity: f64) -> Result<(), ValidationError> {
    if capacity.is_finite() && capacity >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::InvalidCapacity,
            format!("Capacity must be a non-negative number, got {capacity}"),
        ))
    }
}

fn collect_task_errors(tasks: &[Task], errors: &mut Vec<ValidationError>) {
    if tasks.is_empty() {
        errors.push(ValidationError::empty_task_set());
        return;
    }

    let mut ids = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.duration <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!("Task '{}' has non-positive duration {}", task.id, task.duration),
            ));
        }

        // NaN fails both comparisons, so test for the valid range.
        if !(task.demand.is_finite() && task.demand >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDemand,
                format!("Task '{}' has invalid demand {}", task.id, task.demand),
            ));
        }

        let overflows = [task.start, task.earliest_start, task.latest_start]
            .iter()
            .any(|s| s.checked_add(task.duration).is_none());
        if overflows {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!(
                    "Task '{}' with duration {} ends past the representable range",
                    task.id, task.duration
                ),
            ));
        }
    }
}

fn check_span(lo: i128, hi: i128, errors: &mut Vec<ValidationError>) {
    if hi > i128::from(i64::MAX) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("Schedule reaches t={hi}, past the representable range"),
        ));
    } else if hi - lo + 1 > i128::from(MAX_SPAN) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!(
                "Schedule spans {} units, more than the supported {MAX_SPAN}",
                hi - lo + 1
            ),
        ));
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

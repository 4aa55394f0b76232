//! Error types.
//!
//! Every failure is detected eagerly and returned to the caller; no engine
//! returns a partially adjusted schedule alongside an error.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors produced by the rescheduling engines.
#[derive(Debug, Error)]
pub enum RescheduleError {
    /// Input failed validation before any scheduling work began.
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// A date field could not be parsed.
    #[error("Invalid date in field '{field}': '{value}'")]
    Parse {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A tick cannot be represented as a calendar date.
    #[error("Day offset {tick} is outside the supported calendar range")]
    DateOutOfRange { tick: i64 },

    /// Leveling could not place a task within the search horizon.
    #[error("Task '{task_id}' cannot be placed at or before t={horizon}")]
    Scheduling { task_id: String, horizon: i64 },

    /// The caller-imposed time limit elapsed between task iterations.
    #[error("Time limit exceeded after {completed} of {total} tasks")]
    TimeLimitExceeded { completed: usize, total: usize },
}

impl RescheduleError {
    /// Validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<Vec<ValidationError>> for RescheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, RescheduleError>;

//! Error types for the focus controller and task store.

use crate::domain::{format_countdown, format_minutes_precise, TaskId};
use chrono::Duration;
use thiserror::Error;

/// An action that is well formed but not allowed in the current state.
///
/// Refusals never change state; the message is meant for the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardRefusal {
    #[error("Task {0} does not exist")]
    TaskNotFound(TaskId),

    #[error("Focus task needs {limit_minutes} minutes of work, {} still remaining", countdown_text(.remaining))]
    TimeRemaining {
        limit_minutes: u32,
        remaining: Duration,
    },

    #[error("Focus task has not been started, start it before completing")]
    NotStarted,

    #[error("Task is not a timed focus task")]
    NotTimed,

    #[error("Task is already completed")]
    AlreadyCompleted,

    #[error("Another focus task ({0}) is already running")]
    SessionActive(TaskId),

    #[error("The window is not locked")]
    NotLocked,
}

fn countdown_text(remaining: &Duration) -> String {
    format!(
        "{} ({} min)",
        format_countdown(*remaining),
        format_minutes_precise(*remaining)
    )
}

/// Core error type for focus operations.
#[derive(Error, Debug)]
pub enum FocusError {
    /// Guarded precondition failure
    #[error(transparent)]
    Guard(#[from] GuardRefusal),

    /// Timed task created without a positive time limit
    #[error("Focus tasks need a positive time limit, got {0} minutes")]
    InvalidTimeLimit(i64),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Task store failure
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl FocusError {
    /// The refusal behind this error, if it is one
    pub fn as_refusal(&self) -> Option<&GuardRefusal> {
        match self {
            FocusError::Guard(refusal) => Some(refusal),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_remaining_message() {
        let refusal = GuardRefusal::TimeRemaining {
            limit_minutes: 30,
            remaining: Duration::seconds(61),
        };
        assert_eq!(
            refusal.to_string(),
            "Focus task needs 30 minutes of work, 1m 1s (1.0 min) still remaining"
        );
    }

    #[test]
    fn test_as_refusal() {
        let err = FocusError::from(GuardRefusal::NotLocked);
        assert_eq!(err.as_refusal(), Some(&GuardRefusal::NotLocked));

        let err = FocusError::InvalidTimeLimit(0);
        assert!(err.as_refusal().is_none());
    }
}

use super::enums::StudyMode;
use crate::error::FocusError;
use crate::focus::countdown::Countdown;
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable task identifier, carried end to end from storage to UI rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for display only
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub subject: String,
    pub content: String,
    pub deadline: String,
    pub priority: u8,
    pub study_mode: StudyMode,
    /// Required minutes of work before completion (focus tasks only)
    pub time_limit_minutes: i64,
}

impl TaskDraft {
    pub fn normal(subject: &str, content: &str, deadline: &str, priority: u8) -> Self {
        Self {
            subject: subject.to_string(),
            content: content.to_string(),
            deadline: deadline.to_string(),
            priority,
            study_mode: StudyMode::Normal,
            time_limit_minutes: 0,
        }
    }

    pub fn focus(subject: &str, content: &str, deadline: &str, priority: u8, minutes: i64) -> Self {
        Self {
            study_mode: StudyMode::Focus,
            time_limit_minutes: minutes,
            ..Self::normal(subject, content, deadline, priority)
        }
    }
}

/// Why a completion request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRefusal {
    NotFound,
    /// Timed task whose timer was never started
    NotStarted,
    /// Timed task with work time still owed
    TimeRemaining(Duration),
}

/// Result of asking to mark a task complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Completed,
    Refused(CompletionRefusal),
}

/// A study task as persisted in tasks.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub subject: String,
    pub content: String,
    pub deadline: String,
    pub priority: u8,
    pub completed: bool,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub study_mode: StudyMode,
    #[serde(rename = "time_limit", default)]
    pub time_limit_minutes: u32,
    #[serde(rename = "start_time", default)]
    pub started_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub close_attempts: u32,
}

impl Task {
    /// Build a task from a draft, rejecting focus tasks without a positive time limit
    pub fn new(draft: TaskDraft, now: DateTime<Local>) -> Result<Self, FocusError> {
        let time_limit_minutes = match draft.study_mode {
            StudyMode::Focus => {
                if draft.time_limit_minutes <= 0 {
                    return Err(FocusError::InvalidTimeLimit(draft.time_limit_minutes));
                }
                u32::try_from(draft.time_limit_minutes)
                    .map_err(|_| FocusError::InvalidTimeLimit(draft.time_limit_minutes))?
            }
            StudyMode::Normal => 0,
        };

        Ok(Self {
            id: TaskId::new(),
            subject: draft.subject,
            content: draft.content,
            deadline: draft.deadline,
            priority: draft.priority.clamp(1, 5),
            completed: false,
            created_at: now,
            completed_at: None,
            study_mode: draft.study_mode,
            time_limit_minutes,
            started_at: None,
            close_attempts: 0,
        })
    }

    /// Focus task with a work-time requirement
    pub fn is_timed(&self) -> bool {
        self.study_mode == StudyMode::Focus && self.time_limit_minutes > 0
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::of(self)
    }

    /// Count one close attempt and return the new total
    pub fn record_close_attempt(&mut self) -> u32 {
        self.close_attempts = self.close_attempts.saturating_add(1);
        self.close_attempts
    }

    /// Mark complete if the time requirement allows it
    pub fn complete(&mut self, now: DateTime<Local>) -> Completion {
        if self.completed {
            return Completion::Completed;
        }

        if self.is_timed() {
            let countdown = self.countdown();
            if !countdown.is_started() {
                return Completion::Refused(CompletionRefusal::NotStarted);
            }
            let remaining = countdown.remaining(now);
            if remaining > Duration::zero() {
                return Completion::Refused(CompletionRefusal::TimeRemaining(remaining));
            }
        }

        self.completed = true;
        self.completed_at = Some(now);
        Completion::Completed
    }
}

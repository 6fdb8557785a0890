use crate::domain::TaskId;
use crate::persistence::TaskRepository;
use anyhow::Result;

/// Default number of close attempts that forces the lock screen
pub const DEFAULT_LOCK_THRESHOLD: u32 = 3;

/// How the controller reacts to a given cumulative close-attempt count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// First attempt: plain refusal
    Warn,
    /// Repeated attempts below the threshold: warn that the lock is coming
    Escalate,
    /// Threshold reached: force full screen and require unlock
    Lock,
}

impl Escalation {
    pub fn for_attempts(attempts: u32, threshold: u32) -> Self {
        if attempts >= threshold {
            Escalation::Lock
        } else if attempts <= 1 {
            Escalation::Warn
        } else {
            Escalation::Escalate
        }
    }
}

/// Count a close attempt against a task and persist it before returning
pub fn record_attempt<R: TaskRepository>(repo: &mut R, id: TaskId) -> Result<u32> {
    repo.increment_close_attempts(id)
}

use crate::domain::TaskId;
use chrono::{DateTime, Local};

/// Kind of deferred work the controller can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    /// Redisplay the remaining time
    CountdownTick,
    /// Re-enable the unlock dialog after a lock-out
    CooldownExpiry,
}

/// A callback due at a point in time, bound to the task it was scheduled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCallback {
    pub task_id: TaskId,
    pub kind: CallbackKind,
    pub due: DateTime<Local>,
}

/// Pending deferred callbacks. Nothing runs on its own; the event loop
/// calls `take_due` and hands the results back to the controller.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<ScheduledCallback>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback, replacing any pending one of the same kind for the task
    pub fn schedule(&mut self, task_id: TaskId, kind: CallbackKind, due: DateTime<Local>) {
        self.cancel_task_kind(task_id, kind);
        self.pending.push(ScheduledCallback { task_id, kind, due });
    }

    /// Drop every callback scheduled for a task
    pub fn cancel_task(&mut self, task_id: TaskId) {
        self.pending.retain(|cb| cb.task_id != task_id);
    }

    pub fn cancel_task_kind(&mut self, task_id: TaskId, kind: CallbackKind) {
        self.pending
            .retain(|cb| !(cb.task_id == task_id && cb.kind == kind));
    }

    /// Remove and return callbacks due at `now`, earliest first
    pub fn take_due(&mut self, now: DateTime<Local>) -> Vec<ScheduledCallback> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|cb| cb.due <= now);
        self.pending = pending;
        due.sort_by_key(|cb| cb.due);
        due
    }

    /// Earliest pending due time (used to size the event-loop poll)
    pub fn next_due(&self) -> Option<DateTime<Local>> {
        self.pending.iter().map(|cb| cb.due).min()
    }
}

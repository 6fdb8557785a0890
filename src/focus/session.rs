use crate::domain::TaskId;

/// Escalation phase of a live session (before the timer elapses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Running,
    /// At least one close attempt was vetoed
    Warned,
    /// Full screen forced, waiting for unlock or completion
    Locked,
}

/// The single in-memory focus session. Not persisted: close attempts and the
/// start time live on the task, everything here is rebuilt on focus entry.
#[derive(Debug, Clone, Default)]
pub struct FocusSession {
    active_task_id: Option<TaskId>,
    phase: SessionPhase,
    ready_announced: bool,
}

impl FocusSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_task_id(&self) -> Option<TaskId> {
        self.active_task_id
    }

    pub fn is_active(&self) -> bool {
        self.active_task_id.is_some()
    }

    pub fn is_active_for(&self, id: TaskId) -> bool {
        self.active_task_id == Some(id)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.is_active() && self.phase == SessionPhase::Locked
    }

    pub(crate) fn begin(&mut self, id: TaskId) {
        self.active_task_id = Some(id);
        self.phase = SessionPhase::Running;
        self.ready_announced = false;
    }

    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
    }

    /// Mark the ready-to-complete announcement as made; true the first time only
    pub(crate) fn announce_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.ready_announced, true)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

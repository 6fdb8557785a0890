//! Focus mode controller.
//!
//! Ties a timed task to window behavior:
//!
//! ```text
//! Idle -> Running -> Warned -> Locked
//!            ^                   |  (correct secret)
//!            +-------------------+
//! Running | Warned | Locked -> ReadyToComplete -> Completed
//! any -> Idle                   (active task deleted)
//! ```
//!
//! Every operation takes `now` explicitly and runs to completion on the
//! caller's thread. Deferred work (countdown redisplay, cool-down expiry) is
//! queued in a [`Scheduler`] and fired through [`FocusController::run_due`];
//! callbacks for a task that no longer holds the session do nothing.

use super::close_guard::{self, Escalation};
use super::schedule::{CallbackKind, ScheduledCallback, Scheduler};
use super::session::{FocusSession, SessionPhase};
use super::unlock::{UnlockChallenge, UnlockOutcome, DEFAULT_COOLDOWN_SECS};
use super::window::{Geometry, WindowControl};
use crate::domain::{
    format_countdown, Completion, CompletionRefusal, StudyMode, Task, TaskId,
};
use crate::error::{FocusError, GuardRefusal};
use crate::persistence::{AppConfig, TaskRepository};
use chrono::{DateTime, Duration, Local};
use tracing::{debug, info, warn};

/// Lock state as the UI sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    /// No active timed task
    Idle,
    /// Timer counting, no close attempt yet
    Running,
    /// Close attempted at least once, not locked
    Warned,
    /// Full screen forced until unlock or completion
    Locked,
    /// Timer elapsed, task waiting for an explicit complete
    ReadyToComplete,
    /// Session finished by completing its task
    Completed,
}

impl FocusState {
    pub fn name(&self) -> &'static str {
        match self {
            FocusState::Idle => "Idle",
            FocusState::Running => "Running",
            FocusState::Warned => "Warned",
            FocusState::Locked => "Locked",
            FocusState::ReadyToComplete => "Ready to complete",
            FocusState::Completed => "Completed",
        }
    }
}

/// Answer to a window-close request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseDecision {
    Allow,
    Veto(String),
}

/// Answer to a mode-toggle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSwitch {
    Allow,
    Refuse(String),
}

/// Something the UI should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    /// Mode bar text changed
    Status(String),
    /// Blocking message box
    Notice { title: String, message: String },
    LockEngaged,
    LockReleased,
    UnlockInputsDisabled { seconds: i64 },
    UnlockInputsEnabled,
    ReadyToComplete { task_id: TaskId, subject: String },
    SessionEnded,
}

/// Unlock dialog contents while locked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockDialog {
    pub failures: u32,
    pub remaining_tries: u32,
    pub inputs_enabled: bool,
    /// Seconds until inputs re-enable (0 when enabled)
    pub cooldown_secs: i64,
}

pub struct FocusController<R: TaskRepository, W: WindowControl> {
    repo: R,
    window: W,
    session: FocusSession,
    mode: StudyMode,
    challenge: UnlockChallenge,
    scheduler: Scheduler,
    /// Window geometry from before the lock screen, restored on release
    saved_geometry: Option<Geometry>,
    lock_threshold: u32,
    tick_interval: Duration,
    last_completed: Option<TaskId>,
    events: Vec<FocusEvent>,
}

impl<R: TaskRepository, W: WindowControl> FocusController<R, W> {
    pub fn new(repo: R, window: W, session: FocusSession, config: &AppConfig) -> Self {
        Self {
            repo,
            window,
            session,
            mode: StudyMode::Normal,
            challenge: UnlockChallenge::new(
                config.unlock_secret.clone(),
                config.max_unlock_failures,
                Duration::try_seconds(config.cooldown_secs)
                    .unwrap_or_else(|| Duration::seconds(DEFAULT_COOLDOWN_SECS)),
            ),
            scheduler: Scheduler::new(),
            saved_geometry: None,
            lock_threshold: config.lock_threshold.max(1),
            tick_interval: Duration::try_milliseconds(config.countdown_interval_ms.max(1))
                .unwrap_or_else(|| Duration::seconds(1)),
            last_completed: None,
            events: Vec::new(),
        }
    }

    // Queries

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Direct store access for edits that don't touch the session (adding tasks)
    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn session(&self) -> &FocusSession {
        &self.session
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.session
            .active_task_id()
            .and_then(|id| self.repo.get(id))
    }

    pub fn current_state(&self, now: DateTime<Local>) -> FocusState {
        let Some(task) = self.active_task() else {
            return if self.last_completed.is_some() {
                FocusState::Completed
            } else {
                FocusState::Idle
            };
        };

        if task.countdown().is_elapsed(now) {
            return FocusState::ReadyToComplete;
        }

        match self.session.phase() {
            SessionPhase::Running => FocusState::Running,
            SessionPhase::Warned => FocusState::Warned,
            SessionPhase::Locked => FocusState::Locked,
        }
    }

    /// Time still owed on the active task (zero without a session)
    pub fn remaining_time(&self, now: DateTime<Local>) -> Duration {
        self.active_task()
            .map(|task| task.countdown().remaining(now))
            .unwrap_or_else(Duration::zero)
    }

    /// Mode bar text for the active task
    pub fn status_text(&self, now: DateTime<Local>) -> String {
        match self.active_task() {
            Some(task) => {
                let countdown = task.countdown();
                if countdown.is_elapsed(now) {
                    format!("✅ Focus task: {} - time reached, ready to complete", task.subject)
                } else {
                    format!(
                        "Focus task: {} - {} remaining",
                        task.subject,
                        format_countdown(countdown.remaining(now))
                    )
                }
            }
            None => String::new(),
        }
    }

    pub fn lock_label(&self) -> &'static str {
        if self.session.is_locked() {
            "⚠️ Forced full screen: finish the task or enter the password to exit"
        } else if self.session.is_active() {
            "⚠️ Focus mode running, the window cannot be closed"
        } else {
            ""
        }
    }

    /// Unlock dialog contents, present only while locked
    pub fn unlock_dialog(&self, now: DateTime<Local>) -> Option<UnlockDialog> {
        if !self.session.is_locked() {
            return None;
        }
        let cooldown_secs = match self.challenge.locked_out_until() {
            Some(until) if now < until => crate::domain::ceil_seconds(until - now),
            _ => 0,
        };
        Some(UnlockDialog {
            failures: self.challenge.failures(),
            remaining_tries: self.challenge.remaining_tries(),
            inputs_enabled: cooldown_secs == 0,
            cooldown_secs,
        })
    }

    /// Earliest pending callback, for sizing the event-loop poll
    pub fn next_due(&self) -> Option<DateTime<Local>> {
        self.scheduler.next_due()
    }

    pub fn drain_events(&mut self) -> Vec<FocusEvent> {
        std::mem::take(&mut self.events)
    }

    // User actions

    /// Toggle between normal and focus mode
    pub fn request_mode_switch(
        &mut self,
        target: StudyMode,
        now: DateTime<Local>,
    ) -> Result<ModeSwitch, FocusError> {
        match target {
            StudyMode::Focus => {
                self.mode = StudyMode::Focus;
                if self.session.is_active() {
                    return Ok(ModeSwitch::Allow);
                }
                match self.repo.pending_timed_task().map(|t| t.id) {
                    Some(id) => self.begin_session(id, now)?,
                    None => self.notice(
                        "Focus mode",
                        "New tasks will carry a time limit and must run that long before they can be completed",
                    ),
                }
                Ok(ModeSwitch::Allow)
            }
            StudyMode::Normal => {
                if let Some(task) = self.active_task() {
                    let countdown = task.countdown();
                    if countdown.is_started() && !countdown.is_elapsed(now) {
                        let message = format!(
                            "Focus task is not finished, cannot switch to normal mode ({} remaining)",
                            format_countdown(countdown.remaining(now))
                        );
                        warn!(task = %task.id, "mode switch refused");
                        self.notice("Mode switch refused", &message);
                        return Ok(ModeSwitch::Refuse(message));
                    }
                }
                self.teardown();
                self.last_completed = None;
                self.mode = StudyMode::Normal;
                info!("switched to normal mode");
                Ok(ModeSwitch::Allow)
            }
        }
    }

    /// Explicitly start a timed task, opening a session for it
    pub fn start_task(&mut self, id: TaskId, now: DateTime<Local>) -> Result<FocusState, FocusError> {
        let task = self.repo.get(id).ok_or(GuardRefusal::TaskNotFound(id))?;
        if task.completed {
            return Err(GuardRefusal::AlreadyCompleted.into());
        }
        if !task.is_timed() {
            return Err(GuardRefusal::NotTimed.into());
        }

        match self.session.active_task_id() {
            Some(active) if active == id => {}
            Some(active) => {
                warn!(task = %id, active = %active, "second focus session refused");
                return Err(GuardRefusal::SessionActive(active).into());
            }
            None => {
                self.mode = StudyMode::Focus;
                self.begin_session(id, now)?;
            }
        }
        Ok(self.current_state(now))
    }

    /// Window-close request. Vetoed while a timed task still owes time.
    pub fn request_close(&mut self, now: DateTime<Local>) -> Result<CloseDecision, FocusError> {
        if self.mode != StudyMode::Focus {
            return Ok(CloseDecision::Allow);
        }
        let Some(task) = self.active_task() else {
            return Ok(CloseDecision::Allow);
        };
        if task.countdown().is_elapsed(now) {
            return Ok(CloseDecision::Allow);
        }
        let id = task.id;

        let attempts = close_guard::record_attempt(&mut self.repo, id)?;
        warn!(task = %id, attempts, "window close vetoed");

        let message = match Escalation::for_attempts(attempts, self.lock_threshold) {
            Escalation::Warn => {
                self.session.set_phase(SessionPhase::Warned);
                let message = String::from(
                    "A focus task is running; finish the required time before closing the window",
                );
                self.notice("Close blocked", &message);
                message
            }
            Escalation::Escalate => {
                self.session.set_phase(SessionPhase::Warned);
                let message = format!(
                    "Close attempted {} times! Keep trying and the window will be forced full screen!",
                    attempts
                );
                self.notice("Warning", &message);
                message
            }
            Escalation::Lock if self.session.is_locked() => String::from(
                "The window is locked: finish the task or enter the password to exit",
            ),
            Escalation::Lock => {
                self.engage_lock(id);
                format!(
                    "Close attempted {} times. Full screen is forced: finish the task or enter the password to exit",
                    attempts
                )
            }
        };
        Ok(CloseDecision::Veto(message))
    }

    /// Submit the unlock secret from the lock dialog
    pub fn submit_unlock(
        &mut self,
        secret: &str,
        now: DateTime<Local>,
    ) -> Result<UnlockOutcome, FocusError> {
        let Some(id) = self.session.active_task_id().filter(|_| self.session.is_locked()) else {
            return Err(GuardRefusal::NotLocked.into());
        };

        let was_locked_out = self.challenge.is_locked_out(now);
        let outcome = self.challenge.submit(secret, now);
        match outcome {
            UnlockOutcome::Accepted => {
                info!(task = %id, "lock released by password");
                self.release_lock(id);
                self.session.set_phase(SessionPhase::Running);
                self.notice("Unlocked", "Full screen released");
            }
            UnlockOutcome::Rejected { remaining_tries } => {
                warn!(task = %id, remaining_tries, "wrong unlock secret");
            }
            UnlockOutcome::LockedOut { cooldown_secs } if !was_locked_out => {
                warn!(task = %id, cooldown_secs, "unlock retries exhausted");
                if let Some(until) = self.challenge.locked_out_until() {
                    self.scheduler.schedule(id, CallbackKind::CooldownExpiry, until);
                }
                self.events.push(FocusEvent::UnlockInputsDisabled {
                    seconds: cooldown_secs,
                });
            }
            UnlockOutcome::LockedOut { .. } => {
                debug!(task = %id, "unlock submission during cool-down ignored");
            }
        }
        Ok(outcome)
    }

    /// Mark a task complete. Refused with the exact remaining time if a
    /// timed task has not run long enough.
    pub fn complete_task(&mut self, id: TaskId, now: DateTime<Local>) -> Result<FocusState, FocusError> {
        let limit_minutes = self
            .repo
            .get(id)
            .map(|t| t.time_limit_minutes)
            .ok_or(GuardRefusal::TaskNotFound(id))?;

        match self.repo.mark_completed(id, now)? {
            Completion::Completed => {
                info!(task = %id, "task completed");
                if self.session.is_active_for(id) {
                    self.teardown();
                    self.last_completed = Some(id);
                }
                Ok(self.current_state(now))
            }
            Completion::Refused(CompletionRefusal::NotFound) => {
                Err(GuardRefusal::TaskNotFound(id).into())
            }
            Completion::Refused(CompletionRefusal::NotStarted) => {
                Err(GuardRefusal::NotStarted.into())
            }
            Completion::Refused(CompletionRefusal::TimeRemaining(remaining)) => {
                warn!(task = %id, remaining_secs = remaining.num_seconds(), "completion refused");
                Err(GuardRefusal::TimeRemaining {
                    limit_minutes,
                    remaining,
                }
                .into())
            }
        }
    }

    /// Delete a task; deleting the active one aborts the session without completing it
    pub fn delete_task(&mut self, id: TaskId) -> Result<bool, FocusError> {
        let deleted = self.repo.delete(id)?;
        if deleted && self.session.is_active_for(id) {
            info!(task = %id, "active focus task deleted, session aborted");
            self.teardown();
        }
        Ok(deleted)
    }

    // Scheduled callbacks

    /// Fire every callback due at `now`
    pub fn run_due(&mut self, now: DateTime<Local>) {
        for callback in self.scheduler.take_due(now) {
            self.fire(callback, now);
        }
    }

    fn fire(&mut self, callback: ScheduledCallback, now: DateTime<Local>) {
        if !self.session.is_active_for(callback.task_id) {
            debug!(task = %callback.task_id, kind = ?callback.kind, "stale callback dropped");
            return;
        }
        match callback.kind {
            CallbackKind::CountdownTick => self.on_countdown_tick(callback.task_id, now),
            CallbackKind::CooldownExpiry => {
                if self.challenge.expire_cooldown(now) {
                    debug!(task = %callback.task_id, "unlock inputs re-enabled");
                    self.events.push(FocusEvent::UnlockInputsEnabled);
                }
            }
        }
    }

    fn on_countdown_tick(&mut self, id: TaskId, now: DateTime<Local>) {
        let Some(task) = self.repo.get(id) else {
            self.teardown();
            return;
        };
        let elapsed = task.countdown().is_elapsed(now);
        let subject = task.subject.clone();

        let status = self.status_text(now);
        self.events.push(FocusEvent::Status(status));
        if elapsed {
            if self.session.announce_ready() {
                info!(task = %id, "focus time reached");
                self.events.push(FocusEvent::ReadyToComplete { task_id: id, subject });
            }
        } else {
            self.scheduler
                .schedule(id, CallbackKind::CountdownTick, now + self.tick_interval);
        }
    }

    // Internals

    fn begin_session(&mut self, id: TaskId, now: DateTime<Local>) -> Result<(), FocusError> {
        self.repo.mark_started(id, now)?;
        self.session.begin(id);
        self.challenge.reset();
        self.last_completed = None;
        info!(task = %id, "focus session started");

        // Close attempts persist across restarts; the phase resumes from them
        let attempts = self
            .repo
            .get(id)
            .filter(|task| !task.countdown().is_elapsed(now))
            .map_or(0, |task| task.close_attempts);
        if attempts > 0 {
            match Escalation::for_attempts(attempts, self.lock_threshold) {
                Escalation::Lock => {
                    info!(task = %id, attempts, "resuming a locked session");
                    self.engage_lock(id);
                }
                Escalation::Warn | Escalation::Escalate => {
                    debug!(task = %id, attempts, "resuming a warned session");
                    self.session.set_phase(SessionPhase::Warned);
                }
            }
        }

        self.on_countdown_tick(id, now);
        Ok(())
    }

    fn engage_lock(&mut self, id: TaskId) {
        if self.saved_geometry.is_none() {
            self.saved_geometry = Some(self.window.geometry());
        }
        self.window.set_fullscreen(true);
        self.window.set_always_on_top(true);
        self.session.set_phase(SessionPhase::Locked);
        self.challenge.reset();
        info!(task = %id, "lock engaged");
        self.events.push(FocusEvent::LockEngaged);
    }

    fn release_lock(&mut self, id: TaskId) {
        self.window.set_fullscreen(false);
        self.window.set_always_on_top(false);
        if let Some(geometry) = self.saved_geometry.take() {
            self.window.set_geometry(geometry);
        }
        self.scheduler.cancel_task_kind(id, CallbackKind::CooldownExpiry);
        self.challenge.reset();
        self.events.push(FocusEvent::LockReleased);
    }

    /// End the session without recording anything on the task
    fn teardown(&mut self) {
        let Some(id) = self.session.active_task_id() else {
            return;
        };
        if self.session.is_locked() {
            self.release_lock(id);
        }
        self.scheduler.cancel_task(id);
        self.session.clear();
        self.events.push(FocusEvent::SessionEnded);
        self.events.push(FocusEvent::Status(String::new()));
    }

    fn notice(&mut self, title: &str, message: &str) {
        self.events.push(FocusEvent::Notice {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use crate::persistence::JsonTaskStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    /// Window double that records flag changes
    #[derive(Debug, Default)]
    struct RecordingWindow {
        geometry: Geometry,
        fullscreen: bool,
        on_top: bool,
    }

    impl WindowControl for RecordingWindow {
        fn geometry(&self) -> Geometry {
            self.geometry
        }
        fn set_geometry(&mut self, geometry: Geometry) {
            self.geometry = geometry;
        }
        fn set_fullscreen(&mut self, enabled: bool) {
            self.fullscreen = enabled;
        }
        fn set_always_on_top(&mut self, enabled: bool) {
            self.on_top = enabled;
        }
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }
        fn is_always_on_top(&self) -> bool {
            self.on_top
        }
    }

    type TestController = FocusController<JsonTaskStore, RecordingWindow>;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn mins(m: i64) -> Duration {
        Duration::minutes(m)
    }

    fn secs(s: i64) -> Duration {
        Duration::seconds(s)
    }

    fn initial_geometry() -> Geometry {
        Geometry {
            x: 40,
            y: 30,
            width: 1400,
            height: 750,
        }
    }

    /// Controller over a temp store holding one 30-minute focus task
    fn setup() -> (tempfile::TempDir, TestController, TaskId) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonTaskStore::open(temp_dir.path().join("tasks.json")).unwrap();
        let task = store
            .create(TaskDraft::focus("Math", "Past paper", "2024-03-05", 3, 30), t0())
            .unwrap();
        let window = RecordingWindow {
            geometry: initial_geometry(),
            ..RecordingWindow::default()
        };
        let controller = FocusController::new(store, window, FocusSession::new(), &AppConfig::default());
        (temp_dir, controller, task.id)
    }

    fn lock(controller: &mut TestController, now: DateTime<Local>) {
        for _ in 0..3 {
            controller.request_close(now).unwrap();
        }
        assert_eq!(controller.current_state(now), FocusState::Locked);
    }

    #[test]
    fn test_entering_focus_mode_starts_pending_task() {
        let (_dir, mut controller, id) = setup();
        assert_eq!(controller.current_state(t0()), FocusState::Idle);

        let switch = controller.request_mode_switch(StudyMode::Focus, t0()).unwrap();
        assert_eq!(switch, ModeSwitch::Allow);
        assert_eq!(controller.current_state(t0()), FocusState::Running);
        assert_eq!(controller.session().active_task_id(), Some(id));
        assert_eq!(controller.repository().get(id).unwrap().started_at, Some(t0()));
        assert_eq!(controller.remaining_time(t0() + mins(10)), mins(20));
    }

    #[test]
    fn test_focus_mode_without_pending_task_stays_idle() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::open(temp_dir.path().join("tasks.json")).unwrap();
        let mut controller =
            FocusController::new(store, RecordingWindow::default(), FocusSession::new(), &AppConfig::default());

        controller.request_mode_switch(StudyMode::Focus, t0()).unwrap();
        assert_eq!(controller.mode(), StudyMode::Focus);
        assert_eq!(controller.current_state(t0()), FocusState::Idle);
        assert_eq!(controller.request_close(t0()).unwrap(), CloseDecision::Allow);
    }

    #[test]
    fn test_scenario_a_premature_completion_reports_remaining() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();

        let err = controller.complete_task(id, t0() + mins(29)).unwrap_err();
        assert_eq!(
            err.as_refusal(),
            Some(&GuardRefusal::TimeRemaining {
                limit_minutes: 30,
                remaining: mins(1),
            })
        );
        assert!(!controller.repository().get(id).unwrap().completed);
        assert_eq!(controller.current_state(t0() + mins(29)), FocusState::Running);

        assert_eq!(controller.current_state(t0() + mins(30)), FocusState::ReadyToComplete);
        let state = controller.complete_task(id, t0() + mins(30)).unwrap();
        assert_eq!(state, FocusState::Completed);
        assert!(controller.repository().get(id).unwrap().completed);
        assert!(!controller.session().is_active());
    }

    #[test]
    fn test_scenario_b_three_closes_lock_the_window() {
        let (_dir, mut controller, id) = setup();
        controller.request_mode_switch(StudyMode::Focus, t0()).unwrap();
        assert_eq!(controller.current_state(t0()), FocusState::Running);

        let first = controller.request_close(t0() + mins(1)).unwrap();
        assert!(matches!(first, CloseDecision::Veto(_)));
        assert_eq!(controller.current_state(t0() + mins(1)), FocusState::Warned);

        controller.request_close(t0() + mins(2)).unwrap();
        assert_eq!(controller.current_state(t0() + mins(2)), FocusState::Warned);
        assert!(!controller.window().is_fullscreen());

        let third = controller.request_close(t0() + mins(3)).unwrap();
        assert!(matches!(third, CloseDecision::Veto(_)));
        assert_eq!(controller.current_state(t0() + mins(3)), FocusState::Locked);
        assert_eq!(controller.repository().get(id).unwrap().close_attempts, 3);
        assert!(controller.window().is_fullscreen());
        assert!(controller.window().is_always_on_top());

        let dialog = controller.unlock_dialog(t0() + mins(3)).unwrap();
        assert_eq!(dialog.failures, 0);
        assert!(dialog.inputs_enabled);
    }

    #[test]
    fn test_scenario_c_unlock_lockout_and_cooldown() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0());

        let now = t0() + mins(1);
        assert_eq!(
            controller.submit_unlock("000000", now).unwrap(),
            UnlockOutcome::Rejected { remaining_tries: 2 }
        );
        assert_eq!(
            controller.submit_unlock("111111", now).unwrap(),
            UnlockOutcome::Rejected { remaining_tries: 1 }
        );
        assert_eq!(
            controller.submit_unlock("222222", now).unwrap(),
            UnlockOutcome::LockedOut { cooldown_secs: 5 }
        );
        assert!(!controller.unlock_dialog(now).unwrap().inputs_enabled);

        // Refused before the cool-down ends, even with the right secret
        let early = controller.submit_unlock("123456", now + secs(3)).unwrap();
        assert!(matches!(early, UnlockOutcome::LockedOut { .. }));
        assert_eq!(controller.current_state(now + secs(3)), FocusState::Locked);

        controller.run_due(now + secs(5));
        assert_eq!(controller.unlock_dialog(now + secs(5)).unwrap().failures, 0);
        assert!(controller.unlock_dialog(now + secs(5)).unwrap().inputs_enabled);
        assert!(controller.drain_events().contains(&FocusEvent::UnlockInputsEnabled));

        assert_eq!(
            controller.submit_unlock("123456", now + secs(6)).unwrap(),
            UnlockOutcome::Accepted
        );
        assert_eq!(controller.current_state(now + secs(6)), FocusState::Running);
        assert!(!controller.window().is_fullscreen());
        assert!(!controller.window().is_always_on_top());
        assert_eq!(controller.window().geometry(), initial_geometry());
    }

    #[test]
    fn test_scenario_d_delete_while_locked() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0() + mins(1));

        assert!(controller.delete_task(id).unwrap());
        assert_eq!(controller.current_state(t0() + mins(2)), FocusState::Idle);
        assert!(!controller.window().is_fullscreen());
        assert!(!controller.window().is_always_on_top());
        assert!(controller.unlock_dialog(t0() + mins(2)).is_none());
        assert!(controller.repository().get(id).is_none());
        assert!(controller.repository().completed().is_empty());
        assert_eq!(controller.request_close(t0() + mins(2)).unwrap(), CloseDecision::Allow);
    }

    #[test]
    fn test_correct_secret_between_failures_resets_count() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0());

        controller.submit_unlock("bad", t0()).unwrap();
        controller.submit_unlock("bad", t0()).unwrap();
        assert_eq!(controller.unlock_dialog(t0()).unwrap().failures, 2);
        assert_eq!(controller.submit_unlock("123456", t0()).unwrap(), UnlockOutcome::Accepted);
        assert!(controller.unlock_dialog(t0()).is_none());
        assert_eq!(controller.current_state(t0()), FocusState::Running);
    }

    #[test]
    fn test_geometry_captured_once_per_lock() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0());

        // Full screen changes the reported geometry; another close must not recapture it
        controller.window_mut().set_geometry(Geometry::sized(2560, 1440));
        let veto = controller.request_close(t0() + mins(1)).unwrap();
        assert!(matches!(veto, CloseDecision::Veto(_)));
        assert_eq!(controller.repository().get(id).unwrap().close_attempts, 4);

        controller.submit_unlock("123456", t0() + mins(1)).unwrap();
        assert_eq!(controller.window().geometry(), initial_geometry());
    }

    #[test]
    fn test_relock_after_unlock() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0());
        controller.submit_unlock("123456", t0()).unwrap();

        controller.request_close(t0() + mins(1)).unwrap();
        assert_eq!(controller.current_state(t0() + mins(1)), FocusState::Locked);
        assert_eq!(controller.unlock_dialog(t0() + mins(1)).unwrap().failures, 0);
    }

    #[test]
    fn test_lock_does_not_pause_timer() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0() + mins(5));
        controller.submit_unlock("123456", t0() + mins(20)).unwrap();

        assert_eq!(controller.remaining_time(t0() + mins(20)), mins(10));
    }

    #[test]
    fn test_mode_switch_refused_until_elapsed() {
        let (_dir, mut controller, id) = setup();
        controller.request_mode_switch(StudyMode::Focus, t0()).unwrap();

        let refused = controller.request_mode_switch(StudyMode::Normal, t0() + mins(10)).unwrap();
        assert!(matches!(refused, ModeSwitch::Refuse(_)));
        assert_eq!(controller.mode(), StudyMode::Focus);
        assert_eq!(controller.current_state(t0() + mins(10)), FocusState::Running);

        let allowed = controller.request_mode_switch(StudyMode::Normal, t0() + mins(30)).unwrap();
        assert_eq!(allowed, ModeSwitch::Allow);
        assert_eq!(controller.mode(), StudyMode::Normal);
        assert_eq!(controller.current_state(t0() + mins(30)), FocusState::Idle);
        // Leaving focus mode does not complete the task
        assert!(!controller.repository().get(id).unwrap().completed);
    }

    #[test]
    fn test_mode_switch_from_locked_ready_clears_lock() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0());

        assert_eq!(controller.current_state(t0() + mins(31)), FocusState::ReadyToComplete);
        let switch = controller.request_mode_switch(StudyMode::Normal, t0() + mins(31)).unwrap();
        assert_eq!(switch, ModeSwitch::Allow);
        assert!(!controller.window().is_fullscreen());
        assert_eq!(controller.window().geometry(), initial_geometry());
    }

    #[test]
    fn test_close_allowed_once_time_is_met() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();

        assert_eq!(controller.request_close(t0() + mins(30)).unwrap(), CloseDecision::Allow);
        assert_eq!(controller.repository().get(id).unwrap().close_attempts, 0);
    }

    #[test]
    fn test_complete_while_locked_clears_lock() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0() + mins(1));

        let state = controller.complete_task(id, t0() + mins(30)).unwrap();
        assert_eq!(state, FocusState::Completed);
        assert!(!controller.window().is_fullscreen());
        assert_eq!(controller.window().geometry(), initial_geometry());
    }

    #[test]
    fn test_second_session_refused() {
        let (_dir, mut controller, first) = setup();
        let second = controller
            .repository_mut()
            .create(TaskDraft::focus("Physics", "Lab", "", 2, 15), t0())
            .unwrap()
            .id;

        controller.start_task(first, t0()).unwrap();
        let err = controller.start_task(second, t0()).unwrap_err();
        assert_eq!(err.as_refusal(), Some(&GuardRefusal::SessionActive(first)));
        assert!(controller.repository().get(second).unwrap().started_at.is_none());

        // Starting the active task again is a no-op
        assert_eq!(controller.start_task(first, t0() + mins(1)).unwrap(), FocusState::Running);
        assert_eq!(controller.repository().get(first).unwrap().started_at, Some(t0()));
    }

    #[test]
    fn test_start_rejects_normal_task() {
        let (_dir, mut controller, _) = setup();
        let normal = controller
            .repository_mut()
            .create(TaskDraft::normal("English", "Essay", "", 1), t0())
            .unwrap()
            .id;

        let err = controller.start_task(normal, t0()).unwrap_err();
        assert_eq!(err.as_refusal(), Some(&GuardRefusal::NotTimed));
        assert!(!controller.session().is_active());
    }

    #[test]
    fn test_unlock_when_not_locked_refused() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        let err = controller.submit_unlock("123456", t0()).unwrap_err();
        assert_eq!(err.as_refusal(), Some(&GuardRefusal::NotLocked));
    }

    #[test]
    fn test_countdown_ticks_until_ready() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        controller.drain_events();

        controller.run_due(t0() + secs(1));
        let events = controller.drain_events();
        assert_eq!(
            events,
            vec![FocusEvent::Status("Focus task: Math - 29m 59s remaining".to_string())]
        );

        controller.run_due(t0() + mins(30));
        let events = controller.drain_events();
        assert!(events.contains(&FocusEvent::ReadyToComplete {
            task_id: id,
            subject: "Math".to_string(),
        }));
        assert_eq!(controller.next_due(), None);
    }

    #[test]
    fn test_close_recorded_before_pending_tick() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        controller.drain_events();

        // A tick is due, but the close request is handled first
        controller.request_close(t0() + secs(1)).unwrap();
        controller.run_due(t0() + secs(1));

        let events = controller.drain_events();
        let notice_at = events
            .iter()
            .position(|e| matches!(e, FocusEvent::Notice { .. }))
            .unwrap();
        let status_at = events
            .iter()
            .position(|e| matches!(e, FocusEvent::Status(_)))
            .unwrap();
        assert!(notice_at < status_at);
    }

    #[test]
    fn test_stale_callbacks_are_noops() {
        let (_dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0());
        for _ in 0..3 {
            controller.submit_unlock("bad", t0()).unwrap();
        }

        // Deleting cancels the cool-down; a fresh session for another task ignores it
        controller.delete_task(id).unwrap();
        let other = controller
            .repository_mut()
            .create(TaskDraft::focus("Physics", "Lab", "", 2, 15), t0())
            .unwrap()
            .id;
        controller.start_task(other, t0()).unwrap();
        controller.drain_events();

        controller.fire(
            ScheduledCallback {
                task_id: id,
                kind: CallbackKind::CooldownExpiry,
                due: t0() + secs(5),
            },
            t0() + secs(5),
        );
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_close_attempts_survive_restart() {
        let (dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        controller.request_close(t0()).unwrap();
        controller.request_close(t0()).unwrap();
        drop(controller);

        let store = JsonTaskStore::open(dir.path().join("tasks.json")).unwrap();
        let mut controller =
            FocusController::new(store, RecordingWindow::default(), FocusSession::new(), &AppConfig::default());
        controller.request_mode_switch(StudyMode::Focus, t0() + mins(5)).unwrap();
        assert_eq!(controller.remaining_time(t0() + mins(5)), mins(25));
        assert_eq!(controller.current_state(t0() + mins(5)), FocusState::Warned);

        // Third cumulative attempt locks straight away
        controller.request_close(t0() + mins(5)).unwrap();
        assert_eq!(controller.current_state(t0() + mins(5)), FocusState::Locked);
    }

    #[test]
    fn test_lock_resumes_after_restart() {
        let (dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0() + mins(1));
        drop(controller);

        let store = JsonTaskStore::open(dir.path().join("tasks.json")).unwrap();
        let window = RecordingWindow {
            geometry: initial_geometry(),
            ..RecordingWindow::default()
        };
        let mut controller =
            FocusController::new(store, window, FocusSession::new(), &AppConfig::default());
        controller.start_task(id, t0() + mins(2)).unwrap();
        assert_eq!(controller.current_state(t0() + mins(2)), FocusState::Locked);
        assert!(controller.window().is_fullscreen());
        assert!(controller
            .drain_events()
            .iter()
            .any(|e| matches!(e, FocusEvent::LockEngaged)));

        controller.submit_unlock("123456", t0() + mins(3)).unwrap();
        assert_eq!(controller.window().geometry(), initial_geometry());
    }

    #[test]
    fn test_elapsed_task_resumes_without_lock() {
        let (dir, mut controller, id) = setup();
        controller.start_task(id, t0()).unwrap();
        lock(&mut controller, t0() + mins(1));
        drop(controller);

        let store = JsonTaskStore::open(dir.path().join("tasks.json")).unwrap();
        let mut controller =
            FocusController::new(store, RecordingWindow::default(), FocusSession::new(), &AppConfig::default());
        controller.start_task(id, t0() + mins(31)).unwrap();
        assert_eq!(controller.current_state(t0() + mins(31)), FocusState::ReadyToComplete);
        assert!(!controller.window().is_fullscreen());
    }

    #[test]
    fn test_out_of_range_durations_fall_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::open(temp_dir.path().join("tasks.json")).unwrap();
        let config = AppConfig {
            cooldown_secs: i64::MAX,
            countdown_interval_ms: i64::MAX,
            ..AppConfig::default()
        };
        let controller =
            FocusController::new(store, RecordingWindow::default(), FocusSession::new(), &config);
        assert_eq!(controller.tick_interval, Duration::seconds(1));
    }

    #[test]
    fn test_close_allowed_in_normal_mode() {
        let (_dir, mut controller, _) = setup();
        assert_eq!(controller.request_close(t0()).unwrap(), CloseDecision::Allow);
    }
}

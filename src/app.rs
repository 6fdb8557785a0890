use crate::domain::{
    suggest_priority, suggest_subject, Mistake, MistakeDraft, MistakeId, StudyMode, Tab, Task,
    TaskDraft, TaskId, UiMode,
};
use crate::error::FocusError;
use crate::focus::{
    CloseDecision, FocusController, FocusEvent, FocusSession, FocusState, ModeSwitch,
    TerminalWindow, UnlockOutcome, WindowControl,
};
use crate::notifications;
use crate::persistence::{AppConfig, JsonMistakeStore, JsonTaskStore, TaskRepository};
use crate::report::{calculate_task_stats, TaskStats};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::VecDeque;
use tracing::error;

/// Controller type the terminal front end runs
pub type Controller = FocusController<JsonTaskStore, TerminalWindow>;

/// Default focus time offered by the add-task form
pub const DEFAULT_FOCUS_MINUTES: &str = "30";

/// Priority used when the form leaves it blank and the content gives no hint
pub const DEFAULT_PRIORITY: u8 = 3;

/// Blocking message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeState {
    pub title: String,
    pub message: String,
}

/// Input form state for adding tasks
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub subject: String,
    pub content: String,
    pub deadline: String,
    pub priority: String,
    pub time_limit: String, // Minutes, focus mode only
    pub study_mode: StudyMode,
    pub editing_field: usize, // 0 = subject, 1 = content, 2 = deadline, 3 = priority, 4 = minutes
    pub error: Option<String>,
}

impl InputFormState {
    pub fn new(study_mode: StudyMode, today: NaiveDate) -> Self {
        Self {
            subject: String::new(),
            content: String::new(),
            deadline: today.format("%Y-%m-%d").to_string(),
            priority: String::new(),
            time_limit: String::from(DEFAULT_FOCUS_MINUTES),
            study_mode,
            editing_field: 0,
            error: None,
        }
    }

    /// Number of editable fields (the time limit only exists in focus mode)
    pub fn field_count(&self) -> usize {
        match self.study_mode {
            StudyMode::Focus => 5,
            StudyMode::Normal => 4,
        }
    }

    fn current_field_mut(&mut self) -> &mut String {
        match self.editing_field {
            0 => &mut self.subject,
            1 => &mut self.content,
            2 => &mut self.deadline,
            3 => &mut self.priority,
            _ => &mut self.time_limit,
        }
    }

    /// Validate the fields into a draft. A blank subject or priority is
    /// guessed from the content.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let content = self.content.trim();
        let subject = match self.subject.trim() {
            "" => suggest_subject(content).unwrap_or_default(),
            subject => subject,
        };
        let deadline = self.deadline.trim();
        if subject.is_empty() || content.is_empty() || deadline.is_empty() {
            return Err("Subject, content and deadline are required".to_string());
        }
        NaiveDate::parse_from_str(deadline, "%Y-%m-%d")
            .map_err(|_| "Deadline must use YYYY-MM-DD".to_string())?;

        let priority = match self.priority.trim() {
            "" => suggest_priority(content).unwrap_or(DEFAULT_PRIORITY),
            text => text
                .parse::<u8>()
                .ok()
                .filter(|p| (1..=5).contains(p))
                .ok_or_else(|| "Priority must be a number from 1 to 5".to_string())?,
        };

        match self.study_mode {
            StudyMode::Normal => Ok(TaskDraft::normal(subject, content, deadline, priority)),
            StudyMode::Focus => {
                let minutes = self
                    .time_limit
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|m| *m > 0)
                    .ok_or_else(|| "Enter a positive whole number of minutes".to_string())?;
                Ok(TaskDraft::focus(subject, content, deadline, priority, minutes))
            }
        }
    }
}

/// Input form state for logging a mistake
#[derive(Debug, Clone, Default)]
pub struct MistakeFormState {
    pub subject: String,
    pub question: String,
    pub answer: String,
    pub mistake: String,
    pub category: String,
    pub editing_field: usize, // 0 = subject, 1 = question, 2 = answer, 3 = mistake, 4 = category
    pub error: Option<String>,
}

impl MistakeFormState {
    pub const FIELD_COUNT: usize = 5;

    fn current_field_mut(&mut self) -> &mut String {
        match self.editing_field {
            0 => &mut self.subject,
            1 => &mut self.question,
            2 => &mut self.answer,
            3 => &mut self.mistake,
            _ => &mut self.category,
        }
    }

    /// Validate the fields into a draft; a blank subject is guessed from the question
    pub fn to_draft(&self) -> Result<MistakeDraft, String> {
        let subject = match self.subject.trim() {
            "" => suggest_subject(&self.question).unwrap_or_default(),
            subject => subject,
        };
        let draft = MistakeDraft::new(
            subject,
            &self.question,
            &self.answer,
            &self.mistake,
            &self.category,
        );
        draft.validate()?;
        Ok(draft)
    }
}

/// Main application state
pub struct AppState {
    pub controller: Controller,
    pub mistakes: JsonMistakeStore,
    pub tab: Tab,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub notices: VecDeque<NoticeState>,
    pub input_form: Option<InputFormState>,
    pub mistake_form: Option<MistakeFormState>,
    pub unlock_input: String,  // Masked password buffer
    pub unlock_message: String, // Feedback line in the unlock dialog
    pub status: String,         // Mode bar text
    pub stats_days: i64,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(controller: Controller, mistakes: JsonMistakeStore, stats_days: i64) -> Self {
        Self {
            controller,
            mistakes,
            tab: Tab::Pending,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            notices: VecDeque::new(),
            input_form: None,
            mistake_form: None,
            unlock_input: String::new(),
            unlock_message: String::new(),
            status: String::new(),
            stats_days,
            should_quit: false,
        }
    }

    /// Build the app around opened task and mistake stores
    pub fn open(
        store: JsonTaskStore,
        mistakes: JsonMistakeStore,
        window: TerminalWindow,
        config: &AppConfig,
        stats_days: i64,
    ) -> Self {
        let controller = FocusController::new(store, window, FocusSession::new(), config);
        Self::new(controller, mistakes, stats_days)
    }

    pub fn tasks(&self) -> &[Task] {
        self.controller.repository().list()
    }

    /// Rows of the current tab, each carrying its full task id
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let repo = self.controller.repository();
        match self.tab {
            Tab::Pending => repo.pending(),
            Tab::Completed => repo.completed(),
            Tab::Mistakes | Tab::Stats => Vec::new(),
        }
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.visible_tasks().get(self.selected_index).map(|t| t.id)
    }

    /// Mistake log rows, newest first
    pub fn visible_mistakes(&self) -> Vec<&Mistake> {
        match self.tab {
            Tab::Mistakes => self.mistakes.list().iter().rev().collect(),
            _ => Vec::new(),
        }
    }

    pub fn selected_mistake_id(&self) -> Option<MistakeId> {
        self.visible_mistakes().get(self.selected_index).map(|m| m.id)
    }

    fn visible_len(&self) -> usize {
        match self.tab {
            Tab::Mistakes => self.mistakes.list().len(),
            _ => self.visible_tasks().len(),
        }
    }

    pub fn stats(&self, now: DateTime<Local>) -> TaskStats {
        calculate_task_stats(self.tasks(), self.stats_days, now)
    }

    pub fn focus_state(&self, now: DateTime<Local>) -> FocusState {
        self.controller.current_state(now)
    }

    /// The lock screen owns the whole frame and nothing draws over it
    pub fn is_lock_screen(&self) -> bool {
        let window = self.controller.window();
        window.is_fullscreen() || window.is_always_on_top()
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        let count = self.visible_len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.selected_index = 0;
    }

    // Focus actions

    /// Toggle between normal and focus mode
    pub fn toggle_mode(&mut self, now: DateTime<Local>) {
        let target = self.controller.mode().toggled();
        let result = self.controller.request_mode_switch(target, now);
        // The refusal notice and the countdown status arrive as events
        self.process_events();
        match result {
            Ok(ModeSwitch::Allow) if !self.controller.session().is_active() => {
                self.status = format!("Switched to {} mode", target.name());
            }
            Ok(_) => {}
            Err(err) => self.report_error(err),
        }
    }

    pub fn start_selected(&mut self, now: DateTime<Local>) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Err(err) = self.controller.start_task(id, now) {
            self.report_error(err);
        }
        self.process_events();
    }

    pub fn complete_selected(&mut self, now: DateTime<Local>) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        self.complete(id, now);
    }

    /// Complete the active task from the lock screen
    pub fn complete_active(&mut self, now: DateTime<Local>) {
        let Some(id) = self.controller.session().active_task_id() else {
            return;
        };
        if let Err(err) = self.controller.complete_task(id, now) {
            self.unlock_message = err.to_string();
        }
        self.process_events();
    }

    fn complete(&mut self, id: TaskId, now: DateTime<Local>) {
        match self.controller.complete_task(id, now) {
            Ok(_) => {
                self.status = String::from("Task completed");
                self.clamp_selection();
            }
            Err(err) => self.report_error(err),
        }
        self.process_events();
    }

    /// Ask before deleting the selected task or mistake
    pub fn request_delete_selected(&mut self) {
        if self.selected_task_id().is_some() || self.selected_mistake_id().is_some() {
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.ui_mode = UiMode::Normal;
        if let Some(id) = self.selected_mistake_id() {
            match self.mistakes.delete(id) {
                Ok(true) => self.status = String::from("Mistake deleted"),
                Ok(false) => {}
                Err(err) => self.report_storage_error(err),
            }
            self.clamp_selection();
            return;
        }
        if let Some(id) = self.selected_task_id() {
            match self.controller.delete_task(id) {
                Ok(true) => self.status = String::from("Task deleted"),
                Ok(false) => {}
                Err(err) => self.report_error(err),
            }
        }
        self.clamp_selection();
        self.process_events();
    }

    pub fn cancel_confirm(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Close request from q / Esc / Ctrl+C
    pub fn request_quit(&mut self, now: DateTime<Local>) {
        let decision = self.controller.request_close(now);
        match decision {
            Ok(CloseDecision::Allow) if self.ui_mode == UiMode::Unlock => self.should_quit = true,
            Ok(CloseDecision::Allow) => self.ui_mode = UiMode::ConfirmQuit,
            Ok(CloseDecision::Veto(message)) => {
                if self.ui_mode == UiMode::Unlock {
                    self.unlock_message = message;
                }
            }
            Err(err) => self.report_error(err),
        }
        self.process_events();
    }

    pub fn confirm_quit(&mut self) {
        self.should_quit = true;
    }

    // Unlock dialog

    pub fn unlock_add_char(&mut self, c: char, now: DateTime<Local>) {
        if self.unlock_inputs_enabled(now) {
            self.unlock_input.push(c);
        }
    }

    pub fn unlock_backspace(&mut self, now: DateTime<Local>) {
        if self.unlock_inputs_enabled(now) {
            self.unlock_input.pop();
        }
    }

    fn unlock_inputs_enabled(&self, now: DateTime<Local>) -> bool {
        self.controller
            .unlock_dialog(now)
            .map_or(false, |dialog| dialog.inputs_enabled)
    }

    pub fn submit_unlock(&mut self, now: DateTime<Local>) {
        if !self.unlock_inputs_enabled(now) {
            return;
        }
        let secret = std::mem::take(&mut self.unlock_input);
        match self.controller.submit_unlock(&secret, now) {
            Ok(UnlockOutcome::Accepted) => {}
            Ok(UnlockOutcome::Rejected { remaining_tries }) => {
                self.unlock_message =
                    format!("Wrong password, {} tries left", remaining_tries);
            }
            Ok(UnlockOutcome::LockedOut { cooldown_secs }) => {
                self.unlock_message = format!(
                    "Too many wrong entries, try again in {} seconds",
                    cooldown_secs
                );
            }
            Err(err) => self.report_error(err),
        }
        self.process_events();
    }

    // Add form

    /// Open the add form for the current tab
    pub fn start_add(&mut self, today: NaiveDate) {
        match self.tab {
            Tab::Mistakes => self.start_add_mistake(),
            _ => self.start_add_task(today),
        }
    }

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self, today: NaiveDate) {
        self.input_form = Some(InputFormState::new(self.controller.mode(), today));
        self.ui_mode = UiMode::AddingTask;
    }

    /// Cycle through the form fields
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % form.field_count();
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.current_field_mut().push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.current_field_mut().pop();
        }
    }

    /// Validate and create the task; the form stays open on bad input
    pub fn submit_input_form(&mut self, now: DateTime<Local>) {
        let Some(form) = &mut self.input_form else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                form.error = Some(message);
                return;
            }
        };

        let mode = draft.study_mode;
        match self.controller.repository_mut().create(draft, now) {
            Ok(task) => {
                self.input_form = None;
                self.ui_mode = UiMode::Normal;
                self.status = format!("Added {} task: {}", mode.name(), task.subject);
            }
            Err(err) => {
                if let Some(form) = &mut self.input_form {
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    // Mistake log

    pub fn start_add_mistake(&mut self) {
        self.mistake_form = Some(MistakeFormState::default());
        self.ui_mode = UiMode::AddingMistake;
    }

    pub fn mistake_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.mistake_form {
            form.editing_field = (form.editing_field + 1) % MistakeFormState::FIELD_COUNT;
        }
    }

    pub fn mistake_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.mistake_form {
            form.current_field_mut().push(c);
        }
    }

    pub fn mistake_form_backspace(&mut self) {
        if let Some(form) = &mut self.mistake_form {
            form.current_field_mut().pop();
        }
    }

    /// Validate and log the mistake; the form stays open on bad input
    pub fn submit_mistake_form(&mut self, now: DateTime<Local>) {
        let Some(form) = &mut self.mistake_form else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                form.error = Some(message);
                return;
            }
        };

        match self.mistakes.add(draft, now) {
            Ok(mistake) => {
                self.mistake_form = None;
                self.ui_mode = UiMode::Normal;
                self.status = format!("Logged {} mistake", mistake.subject);
            }
            Err(err) => {
                error!(%err, "failed to log mistake");
                if let Some(form) = &mut self.mistake_form {
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn cancel_mistake_form(&mut self) {
        self.mistake_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Count one more review of the selected mistake
    pub fn review_selected(&mut self, now: DateTime<Local>) {
        let Some(id) = self.selected_mistake_id() else {
            return;
        };
        match self.mistakes.review(id, now) {
            Ok(Some(count)) => {
                let plural = if count == 1 { "" } else { "s" };
                self.status = format!("Reviewed, {} time{} so far", count, plural);
            }
            Ok(None) => {}
            Err(err) => self.report_storage_error(err),
        }
    }

    // Notices and events

    pub fn push_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notices.push_back(NoticeState {
            title: title.into(),
            message: message.into(),
        });
        if self.ui_mode == UiMode::Normal {
            self.ui_mode = UiMode::Notice;
        }
    }

    pub fn current_notice(&self) -> Option<&NoticeState> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
        if self.ui_mode == UiMode::Notice && self.notices.is_empty() {
            self.ui_mode = UiMode::Normal;
        }
    }

    fn report_error(&mut self, err: FocusError) {
        match err.as_refusal() {
            Some(_) => self.push_notice("Not allowed", err.to_string()),
            None => {
                error!(%err, "focus operation failed");
                self.push_notice("Error", err.to_string());
            }
        }
    }

    fn report_storage_error(&mut self, err: anyhow::Error) {
        error!(%err, "mistake log update failed");
        self.push_notice("Error", err.to_string());
    }

    /// Fire due callbacks, then apply what the controller emitted
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.controller.run_due(now);
        self.process_events();
    }

    fn process_events(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                FocusEvent::Status(text) => self.status = text,
                FocusEvent::Notice { title, message } => self.push_notice(title, message),
                FocusEvent::LockEngaged => {
                    self.input_form = None;
                    self.mistake_form = None;
                    self.notices.clear();
                    self.ui_mode = UiMode::Unlock;
                    self.unlock_input.clear();
                    self.unlock_message =
                        String::from("Enter the password to exit full screen");
                    if let Some(task) = self.controller.active_task() {
                        notifications::notify_lock_engaged(&task.subject);
                    }
                }
                FocusEvent::LockReleased => {
                    self.unlock_input.clear();
                    self.unlock_message.clear();
                    self.ui_mode = if self.notices.is_empty() {
                        UiMode::Normal
                    } else {
                        UiMode::Notice
                    };
                }
                FocusEvent::UnlockInputsDisabled { seconds } => {
                    self.unlock_input.clear();
                    self.unlock_message = format!(
                        "Too many wrong entries, try again in {} seconds",
                        seconds
                    );
                }
                FocusEvent::UnlockInputsEnabled => {
                    self.unlock_message = String::from("You can try the password again");
                }
                FocusEvent::ReadyToComplete { subject, .. } => {
                    notifications::notify_ready_to_complete(&subject);
                    self.push_notice(
                        "Time reached",
                        format!("{} reached its required time and can be marked complete", subject),
                    );
                }
                FocusEvent::SessionEnded => self.clamp_selection(),
            }
        }
    }
}

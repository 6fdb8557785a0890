use crate::app::AppState;
use crate::domain::UiMode;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should exit.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) -> bool {
    // Ctrl+C is a close request everywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.request_quit(now);
        return app.should_quit;
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key, now),
        UiMode::AddingTask => handle_input_form_mode(app, key, now),
        UiMode::AddingMistake => handle_mistake_form_mode(app, key, now),
        UiMode::Notice => handle_notice_mode(app, key),
        UiMode::ConfirmQuit => handle_confirm_quit_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
        UiMode::Unlock => handle_unlock_mode(app, key, now),
    }
    app.should_quit
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Tab => app.next_tab(),

        // Mode toggle
        KeyCode::Char('m') | KeyCode::Char('M') => app.toggle_mode(now),

        // Start the selected focus task
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => app.start_selected(now),

        // Mark done
        KeyCode::Char('d') | KeyCode::Char('D') => app.complete_selected(now),

        // Delete (asks first)
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.request_delete_selected(),

        // Add a task, or a mistake on the mistakes tab
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add(now.date_naive()),

        // Review the selected mistake
        KeyCode::Char('r') | KeyCode::Char('R') => app.review_selected(now),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.request_quit(now),

        _ => {}
    }
}

/// Handle keys in the add-task form
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) {
    match key.code {
        KeyCode::Tab => app.input_form_toggle_field(),
        KeyCode::Enter => app.submit_input_form(now),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
}

fn handle_mistake_form_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) {
    match key.code {
        KeyCode::Tab => app.mistake_form_toggle_field(),
        KeyCode::Enter => app.submit_mistake_form(now),
        KeyCode::Esc => app.cancel_mistake_form(),
        KeyCode::Backspace => app.mistake_form_backspace(),
        KeyCode::Char(c) => app.mistake_form_add_char(c),
        _ => {}
    }
}

fn handle_notice_mode(app: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_notice();
    }
}

fn handle_confirm_quit_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_quit(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
}

fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
}

/// Lock screen: every printable key goes to the password field
fn handle_unlock_mode(app: &mut AppState, key: KeyEvent, now: DateTime<Local>) {
    if key.code == KeyCode::Char('d') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.complete_active(now);
        return;
    }

    match key.code {
        KeyCode::Enter => app.submit_unlock(now),
        KeyCode::Backspace => app.unlock_backspace(now),
        KeyCode::Esc => app.request_quit(now),
        KeyCode::Char(c) => app.unlock_add_char(c, now),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StudyMode, TaskDraft};
    use crate::focus::TerminalWindow;
    use crate::persistence::{AppConfig, JsonMistakeStore, JsonTaskStore, TaskRepository};
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn create_test_app() -> (tempfile::TempDir, AppState) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonTaskStore::open(temp_dir.path().join("tasks.json")).unwrap();
        store
            .create(TaskDraft::focus("Math", "Past paper", "2024-03-05", 4, 30), t0())
            .unwrap();
        let mistakes = JsonMistakeStore::open(temp_dir.path().join("mistakes.json")).unwrap();
        let app = AppState::open(
            store,
            mistakes,
            TerminalWindow::new(120, 40),
            &AppConfig::default(),
            7,
        );
        (temp_dir, app)
    }

    #[test]
    fn test_q_quits_after_confirmation_in_normal_mode() {
        let (_dir, mut app) = create_test_app();
        assert!(!handle_key(&mut app, press(KeyCode::Char('q')), t0()));
        assert_eq!(app.ui_mode, UiMode::ConfirmQuit);
        assert!(handle_key(&mut app, press(KeyCode::Char('y')), t0()));
    }

    #[test]
    fn test_m_toggles_focus_mode() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('m')), t0());
        assert_eq!(app.controller.mode(), StudyMode::Focus);
        assert!(app.controller.session().is_active());
    }

    #[test]
    fn test_ctrl_c_is_vetoed_during_focus() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('m')), t0());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_key(&mut app, ctrl_c, t0()));
        assert_eq!(app.ui_mode, UiMode::Notice);

        handle_key(&mut app, press(KeyCode::Enter), t0());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_lock_screen_typing_goes_to_password() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('m')), t0());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for _ in 0..3 {
            handle_key(&mut app, ctrl_c, t0());
        }
        assert_eq!(app.ui_mode, UiMode::Unlock);

        // 'q' and 'm' are password characters here, not commands
        for c in ['q', 'm'] {
            handle_key(&mut app, press(KeyCode::Char(c)), t0());
        }
        assert_eq!(app.unlock_input, "qm");
        assert_eq!(app.controller.mode(), StudyMode::Focus);

        handle_key(&mut app, press(KeyCode::Backspace), t0());
        handle_key(&mut app, press(KeyCode::Backspace), t0());
        for c in "123456".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)), t0());
        }
        handle_key(&mut app, press(KeyCode::Enter), t0());
        assert!(!app.is_lock_screen());
    }

    #[test]
    fn test_delete_asks_first() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, press(KeyCode::Char('x')), t0());
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        handle_key(&mut app, press(KeyCode::Char('n')), t0());
        assert_eq!(app.visible_tasks().len(), 1);

        handle_key(&mut app, press(KeyCode::Char('x')), t0());
        handle_key(&mut app, press(KeyCode::Char('y')), t0());
        assert!(app.visible_tasks().is_empty());
    }

    #[test]
    fn test_mistake_tab_keys() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, press(KeyCode::Tab), t0());
        handle_key(&mut app, press(KeyCode::Tab), t0());
        assert_eq!(app.tab, crate::domain::Tab::Mistakes);

        handle_key(&mut app, press(KeyCode::Char('a')), t0());
        assert_eq!(app.ui_mode, UiMode::AddingMistake);
        for field in ["Physics", "Unit of force?", "Newton", "Wrote joule", "Units"] {
            for c in field.chars() {
                handle_key(&mut app, press(KeyCode::Char(c)), t0());
            }
            handle_key(&mut app, press(KeyCode::Tab), t0());
        }
        handle_key(&mut app, press(KeyCode::Enter), t0());
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.mistakes.list().len(), 1);

        handle_key(&mut app, press(KeyCode::Char('r')), t0());
        assert_eq!(app.mistakes.list()[0].review_count, 1);
    }
}

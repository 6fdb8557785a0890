use crate::app::AppState;
use crate::focus::FocusState;
use crate::ui::{
    layout::create_unlock_area,
    styles::{done_style, error_style, lock_screen_style, modal_bg_style, modal_title_style},
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the full-frame lock screen with the unlock dialog on top.
/// Nothing else is drawn while it is up.
pub fn render_lock_screen(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    f.render_widget(Clear, area);

    let mut lines = vec![Line::raw(""), Line::raw("")];
    if let Some(task) = app.controller.active_task() {
        lines.push(Line::from(Span::styled(
            format!("{} · {}", task.subject, task.content),
            modal_title_style(),
        )));
        lines.push(Line::raw(""));
        lines.push(Line::raw(app.status.clone()));
        lines.push(Line::raw(format!("Close attempts: {}", task.close_attempts)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(app.controller.lock_label()));

    let background = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" 🔒 Focus Lock ", error_style()))
                .style(lock_screen_style()),
        );
    f.render_widget(background, area);

    render_unlock_dialog(f, app, area, now);
}

fn render_unlock_dialog(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let Some(dialog) = app.controller.unlock_dialog(now) else {
        return;
    };
    let dialog_area = create_unlock_area(area);
    f.render_widget(Clear, dialog_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));

    let masked = "*".repeat(app.unlock_input.chars().count());
    if dialog.inputs_enabled {
        lines.push(Line::from(vec![
            Span::raw("  Password: "),
            Span::styled(masked, modal_title_style()),
            Span::styled("█", modal_title_style()),
        ]));
        lines.push(Line::raw(format!("  Tries left: {}", dialog.remaining_tries)));
    } else {
        lines.push(Line::from(Span::styled(
            "  Password: (disabled)",
            error_style(),
        )));
        lines.push(Line::raw(format!(
            "  Input re-enables in {} seconds",
            dialog.cooldown_secs
        )));
    }
    lines.push(Line::raw(""));
    if !app.unlock_message.is_empty() {
        lines.push(Line::raw(format!("  {}", app.unlock_message)));
        lines.push(Line::raw(""));
    }

    if app.focus_state(now) == FocusState::ReadyToComplete {
        lines.push(Line::from(Span::styled(
            "  Time reached: press Ctrl+D to complete the task",
            done_style(),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", modal_title_style()),
        Span::raw(" Unlock  "),
        Span::styled("[Ctrl+D]", modal_title_style()),
        Span::raw(" Complete task"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Unlock ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, dialog_area);
}

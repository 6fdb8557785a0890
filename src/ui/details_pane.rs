use crate::app::AppState;
use crate::domain::{format_countdown, format_duration};
use crate::ui::styles::{border_style, default_style, focus_style, title_style, warning_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app
        .selected_task_id()
        .and_then(|id| app.tasks().iter().find(|t| t.id == id))
    else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Subject: ", title_style()),
        Span::raw(task.subject.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Id:      ", title_style()),
        Span::raw(task.id.short()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Mode:    ", title_style()),
        Span::raw(task.study_mode.name()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Created: ", title_style()),
        Span::raw(task.created_at.format("%Y-%m-%d %H:%M").to_string()),
    ]));
    lines.push(Line::raw(""));

    if task.is_timed() {
        let countdown = task.countdown();
        lines.push(Line::from(vec![
            Span::styled("Required: ", title_style()),
            Span::raw(format_duration(countdown.limit())),
        ]));
        if let Some(started) = task.started_at {
            lines.push(Line::from(vec![
                Span::styled("Started:  ", title_style()),
                Span::raw(started.format("%H:%M:%S").to_string()),
            ]));
        }
        if !task.completed {
            lines.push(Line::from(vec![
                Span::styled("Left:     ", title_style()),
                Span::styled(format_countdown(countdown.remaining(now)), focus_style()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("Close attempts: ", title_style()),
            Span::styled(task.close_attempts.to_string(), warning_style()),
        ]));
        lines.push(Line::raw(""));
    }

    lines.push(Line::from(Span::styled("Content:", title_style())));
    for content_line in task.content.lines() {
        lines.push(Line::styled(format!("  {}", content_line), default_style()));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

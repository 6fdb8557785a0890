use crate::app::AppState;
use crate::domain::{format_countdown, mode_badge, priority_stars, StudyMode, Tab, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, focus_style, idle_style, priority_style,
    selected_style, title_style, warning_style,
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task list for the pending or completed tab
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let active = app.controller.session().active_task_id();
    let tasks = app.visible_tasks();

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let line = create_task_line(task, Some(task.id) == active, now);
            let style = if idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = match app.tab {
        Tab::Completed => format!(" Completed ({}) ", tasks.len()),
        _ => format!(" Pending ({}) ", tasks.len()),
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}

/// Create a single line for a task
/// Format: ▶ [FOCUS 30m] Math · Past paper  ★★★★  due 2024-03-05  ⏱ 12m 3s left
fn create_task_line(task: &Task, is_active: bool, now: DateTime<Local>) -> Line<'static> {
    let mut spans = Vec::new();

    if task.completed {
        spans.push(Span::styled("✓ ".to_string(), done_style()));
    } else if is_active {
        spans.push(Span::styled("▶ ".to_string(), focus_style()));
    } else {
        spans.push(Span::raw("  ".to_string()));
    }

    let badge_style = match task.study_mode {
        StudyMode::Focus => focus_style(),
        StudyMode::Normal => idle_style(),
    };
    spans.push(Span::styled(mode_badge(task), badge_style));
    spans.push(Span::raw(format!(" {} · {}", task.subject, task.content)));
    spans.push(Span::styled(
        format!("  {}", priority_stars(task.priority)),
        priority_style(),
    ));
    if !task.deadline.is_empty() {
        spans.push(Span::raw(format!("  due {}", task.deadline)));
    }

    if task.is_timed() && !task.completed {
        let countdown = task.countdown();
        let timer = if !countdown.is_started() {
            String::from("  (not started)")
        } else if countdown.is_elapsed(now) {
            String::from("  ✅ time reached")
        } else {
            format!("  ⏱ {} left", format_countdown(countdown.remaining(now)))
        };
        spans.push(Span::styled(timer, warning_style()));
    }

    if let Some(completed_at) = task.completed_at {
        spans.push(Span::styled(
            format!("  done {}", completed_at.format("%Y-%m-%d %H:%M")),
            done_style(),
        ));
    }

    Line::from(spans)
}

use crate::app::AppState;
use crate::domain::StudyMode;
use crate::focus::FocusState;
use crate::ui::styles::{border_style, done_style, focus_style, idle_style, warning_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the mode bar: current mode, countdown status and lock label
pub fn render_mode_bar(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let mode = app.controller.mode();
    let state = app.focus_state(now);

    let mode_span = match mode {
        StudyMode::Focus => Span::styled(" 🎯 FOCUS MODE ", focus_style()),
        StudyMode::Normal => Span::styled(" NORMAL MODE ", idle_style()),
    };
    let status_style = match state {
        FocusState::ReadyToComplete | FocusState::Completed => done_style(),
        _ => focus_style(),
    };

    let lines = vec![
        Line::from(vec![
            mode_span,
            Span::raw(format!(" [{}]  ", state.name())),
            Span::styled(app.status.clone(), status_style),
        ]),
        Line::from(Span::styled(
            format!(" {}", app.controller.lock_label()),
            warning_style(),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(border_style()),
    );

    f.render_widget(paragraph, area);
}

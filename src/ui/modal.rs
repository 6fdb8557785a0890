use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn render_box(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let modal_area = create_modal_area(area);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the front notice, if any
pub fn render_notice_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::Notice {
        return;
    }
    if let Some(notice) = app.current_notice() {
        let mut lines = vec![Line::raw("")];
        for message_line in notice.message.lines() {
            lines.push(Line::raw(format!("  {}", message_line)));
        }
        lines.push(Line::raw(""));
        if app.notices.len() > 1 {
            lines.push(Line::raw(format!("  ({} more)", app.notices.len() - 1)));
        }
        lines.push(Line::from(vec![
            Span::styled("  [Enter]", modal_title_style()),
            Span::raw(" OK"),
        ]));

        render_box(f, area, &notice.title, lines);
    }
}

/// Render the quit confirmation
pub fn render_confirm_quit_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode == UiMode::ConfirmQuit {
        let lines = vec![
            Line::raw(""),
            Line::raw("  Quit studylock?"),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [y]", modal_title_style()),
                Span::raw(" Quit  "),
                Span::styled("[n]", modal_title_style()),
                Span::raw(" Stay"),
            ]),
        ];
        render_box(f, area, "Quit", lines);
    }
}

/// Render the delete confirmation for the selected task or mistake
pub fn render_confirm_delete_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::ConfirmDelete {
        return;
    }
    if let Some(mistake) = app.selected_mistake_id().and_then(|id| app.mistakes.get(id)) {
        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  Delete the {} mistake \"{}\"?", mistake.subject, mistake.question)),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [y]", modal_title_style()),
                Span::raw(" Delete  "),
                Span::styled("[n]", modal_title_style()),
                Span::raw(" Keep"),
            ]),
        ];
        render_box(f, area, "Delete Mistake", lines);
        return;
    }
    let Some(task) = app
        .selected_task_id()
        .and_then(|id| app.tasks().iter().find(|t| t.id == id))
    else {
        return;
    };

    let mut lines = vec![
        Line::raw(""),
        Line::raw(format!("  Delete \"{} · {}\"?", task.subject, task.content)),
        Line::raw(""),
    ];
    if app.controller.session().is_active_for(task.id) {
        lines.push(Line::raw("  This ends the running focus session without completing it."));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(vec![
        Span::styled("  [y]", modal_title_style()),
        Span::raw(" Delete  "),
        Span::styled("[n]", modal_title_style()),
        Span::raw(" Keep"),
    ]));
    render_box(f, area, "Delete Task", lines);
}

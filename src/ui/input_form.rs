use crate::app::AppState;
use crate::domain::StudyMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the input form for adding tasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let title_text = match form.study_mode {
            StudyMode::Focus => " Add Focus Task ",
            StudyMode::Normal => " Add Task ",
        };

        let mut fields = vec![
            ("Subject (blank to guess)", &form.subject),
            ("Content", &form.content),
            ("Deadline (YYYY-MM-DD)", &form.deadline),
            ("Priority (1-5, blank to guess)", &form.priority),
        ];
        if form.study_mode == StudyMode::Focus {
            fields.push(("Time limit (minutes)", &form.time_limit));
        }

        render_form(f, area, title_text, &fields, form.editing_field, form.error.as_deref());
    }
}

/// Render the input form for logging a mistake
pub fn render_mistake_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.mistake_form {
        let fields = [
            ("Subject (blank to guess)", &form.subject),
            ("Question", &form.question),
            ("Correct answer", &form.answer),
            ("What went wrong", &form.mistake),
            ("Category", &form.category),
        ];
        render_form(f, area, " Log Mistake ", &fields, form.editing_field, form.error.as_deref());
    }
}

fn render_form(
    f: &mut Frame,
    area: Rect,
    title: &str,
    fields: &[(&str, &String)],
    editing_field: usize,
    error: Option<&str>,
) {
    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    for (idx, (label, value)) in fields.iter().enumerate() {
        let editing = idx == editing_field;
        lines.push(Line::from(vec![
            Span::raw(format!("{}: ", label)),
            Span::styled(value.to_string(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]));
    }
    lines.push(Line::raw(""));

    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error.to_string(), error_style())));
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw("Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

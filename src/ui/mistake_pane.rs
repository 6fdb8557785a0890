use crate::app::AppState;
use crate::domain::Mistake;
use crate::ui::styles::{
    border_style, default_style, done_style, hint_style, selected_style, title_style,
    warning_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Longest question prefix shown in a list row
const QUESTION_PREVIEW_CHARS: usize = 60;

/// Render the mistake log list
pub fn render_mistake_list(f: &mut Frame, app: &AppState, area: Rect) {
    let mistakes = app.visible_mistakes();

    let items: Vec<ListItem> = mistakes
        .iter()
        .enumerate()
        .map(|(idx, mistake)| {
            let style = if idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(create_mistake_line(mistake)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(
                format!(" Mistakes ({}) ", mistakes.len()),
                title_style(),
            )),
    );

    f.render_widget(list, area);
}

/// Format: Math [Functions] Solve 2x = 6  ↻2
fn create_mistake_line(mistake: &Mistake) -> Line<'static> {
    let mut question: String = mistake.question.chars().take(QUESTION_PREVIEW_CHARS).collect();
    if mistake.question.chars().count() > QUESTION_PREVIEW_CHARS {
        question.push_str("...");
    }

    Line::from(vec![
        Span::raw(format!("  {} ", mistake.subject)),
        Span::styled(format!("[{}] ", mistake.category_label()), hint_style()),
        Span::raw(question),
        Span::styled(format!("  ↻{}", mistake.review_count), done_style()),
    ])
}

/// Render the selected mistake in full
pub fn render_mistake_details(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Mistake ", title_style()));

    let Some(mistake) = app.selected_mistake_id().and_then(|id| app.mistakes.get(id)) else {
        let hint = "No mistakes logged. Press a to add one.";
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    };

    let field = |label: &str, value: String| {
        Line::from(vec![Span::styled(format!("{:<10}", label), title_style()), Span::raw(value)])
    };

    let mut lines = vec![
        field("Subject:", mistake.subject.clone()),
        field("Category:", mistake.category_label().to_string()),
        field("Id:", mistake.id.short()),
        field("Logged:", mistake.created_at.format("%Y-%m-%d %H:%M").to_string()),
        field("Reviews:", mistake.review_count.to_string()),
    ];
    if let Some(reviewed) = mistake.last_reviewed {
        lines.push(field("Last:", reviewed.format("%Y-%m-%d %H:%M").to_string()));
    }
    lines.push(Line::raw(""));

    for (label, text, style) in [
        ("Question:", &mistake.question, default_style()),
        ("Answer:", &mistake.answer, done_style()),
        ("Mistake:", &mistake.mistake, warning_style()),
    ] {
        lines.push(Line::from(Span::styled(label, title_style())));
        for text_line in text.lines() {
            lines.push(Line::styled(format!("  {}", text_line), style));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

use crate::domain::Tab;
use crate::ui::styles::{hint_style, title_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("Tab switch view   "),
        Span::raw("m mode   "),
        Span::raw("s start   "),
        Span::raw("d done   "),
        Span::raw("x delete   "),
        Span::raw("a add   "),
        Span::raw("r review   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the tab strip, highlighting the current tab
pub fn render_tabs(f: &mut Frame, area: Rect, current: Tab) {
    let mut spans = vec![Span::raw(" ")];
    for &tab in Tab::all() {
        let label = format!(" {} ", tab.title());
        if tab == current {
            spans.push(Span::styled(label, title_style()));
        } else {
            spans.push(Span::styled(label, hint_style()));
        }
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

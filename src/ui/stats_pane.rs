use crate::app::AppState;
use crate::report::stats::{calculate_focus_stats, calculate_mistake_stats};
use crate::domain::format_duration;
use crate::ui::styles::{border_style, default_style, done_style, title_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render completion statistics for the recent window
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let stats = app.stats(now);
    let focus = calculate_focus_stats(app.tasks(), app.stats_days, now);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));

    if stats.total == 0 {
        lines.push(Line::raw("  No tasks created in this period."));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Tasks:      ", title_style()),
            Span::raw(format!("{} total, {} completed", stats.total, stats.completed)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Completion: ", title_style()),
            Span::styled(format!("{:.1}%", stats.completion_rate), done_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Focus:      ", title_style()),
            Span::raw(format!(
                "{} of {} focus tasks done, {} of focus time, {} close attempts",
                focus.timed_completed,
                focus.timed_tasks,
                format_duration(focus.focus_time),
                focus.close_attempts
            )),
        ]));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  By subject", title_style())));

        for (subject, subject_stats) in &stats.by_subject {
            let ratio = subject_stats.completed as f64 / subject_stats.total as f64;
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<16}", subject), default_style()),
                Span::styled(progress_bar(ratio, 20), done_style()),
                Span::raw(format!(
                    " {}/{}",
                    subject_stats.completed, subject_stats.total
                )),
            ]));
        }
    }

    let mistakes = calculate_mistake_stats(app.mistakes.list());
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  Mistakes:   ", title_style()),
        Span::raw(format!("{} logged, {} reviews", mistakes.total, mistakes.reviews)),
    ]));
    for (subject, subject_mistakes) in &mistakes.by_subject {
        let categories: Vec<String> = subject_mistakes
            .categories
            .iter()
            .map(|(category, count)| format!("{} {}", category, count))
            .collect();
        lines.push(Line::raw(format!(
            "  {:<16}{}  ({})",
            subject,
            subject_mistakes.count,
            categories.join(", ")
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(
                    format!(" Last {} days ", app.stats_days),
                    title_style(),
                )),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Text progress bar, e.g. "█████░░░░░"
fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(1.0, 4), "████");
        assert_eq!(progress_bar(3.0, 4), "████");
    }
}

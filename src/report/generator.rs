use crate::domain::{format_duration, Mistake, Task};
use crate::report::stats::{calculate_focus_stats, calculate_mistake_stats, calculate_task_stats};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::Path;

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Render a markdown study report: task completion for the last `days` days
/// and the whole mistake log
pub fn generate_report(
    tasks: &[Task],
    mistakes: &[Mistake],
    days: i64,
    now: DateTime<Local>,
) -> String {
    let mut report = String::new();

    // Header
    report.push_str(&format!(
        "# Study Report - last {} days (to {})\n\n",
        days,
        now.format("%Y-%m-%d")
    ));

    push_task_sections(&mut report, tasks, days, now);
    push_mistake_section(&mut report, mistakes);

    report
}

fn push_task_sections(report: &mut String, tasks: &[Task], days: i64, now: DateTime<Local>) {
    let stats = calculate_task_stats(tasks, days, now);
    let focus = calculate_focus_stats(tasks, days, now);

    // Summary Section
    report.push_str("## Summary\n\n");
    if stats.total == 0 {
        report.push_str("No tasks created in this period.\n\n");
        return;
    }
    report.push_str(&format!("- **Total Tasks:** {}\n", stats.total));
    report.push_str(&format!("- **Completed:** {}\n", stats.completed));
    report.push_str(&format!(
        "- **Completion Rate:** {}\n\n",
        format_percent(stats.completion_rate)
    ));

    // Focus Mode Section
    if focus.timed_tasks > 0 {
        report.push_str("## Focus Mode\n\n");
        report.push_str(&format!(
            "- **Focus Tasks:** {} ({} completed)\n",
            focus.timed_tasks, focus.timed_completed
        ));
        report.push_str(&format!(
            "- **Focus Time Completed:** {}\n",
            format_duration(focus.focus_time)
        ));
        report.push_str(&format!("- **Close Attempts:** {}\n\n", focus.close_attempts));
    }

    // Subject Section
    report.push_str("## By Subject\n\n");
    for (subject, subject_stats) in &stats.by_subject {
        let rate = (subject_stats.completed as f64 / subject_stats.total as f64) * 100.0;
        report.push_str(&format!(
            "- **{}:** {}/{} done ({})\n",
            subject,
            subject_stats.completed,
            subject_stats.total,
            format_percent(rate)
        ));
    }
    report.push('\n');
}

fn push_mistake_section(report: &mut String, mistakes: &[Mistake]) {
    let stats = calculate_mistake_stats(mistakes);

    report.push_str("## Mistake Log\n\n");
    if stats.total == 0 {
        report.push_str("No mistakes logged.\n");
        return;
    }
    report.push_str(&format!(
        "- **Total Mistakes:** {} ({} reviews)\n",
        stats.total, stats.reviews
    ));
    for (subject, subject_stats) in &stats.by_subject {
        report.push_str(&format!("- **{}:** {}\n", subject, subject_stats.count));
        for (category, count) in &subject_stats.categories {
            report.push_str(&format!("  - {}: {}\n", category, count));
        }
    }
}

/// Write a rendered report to disk
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    std::fs::write(path, report)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MistakeDraft, TaskDraft};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let report = generate_report(&[], &[], 7, now());
        assert!(report.contains("No tasks created in this period."));
        assert!(report.contains("No mistakes logged."));
    }

    #[test]
    fn test_report_sections() {
        let created = now() - Duration::days(1);
        let mut math = Task::new(TaskDraft::focus("Math", "paper", "", 3, 90), created).unwrap();
        math.started_at = Some(created);
        math.complete(created + Duration::minutes(90));
        let english = Task::new(TaskDraft::normal("English", "essay", "", 2), created).unwrap();

        let report = generate_report(&[math, english], &[], 7, now());
        assert!(report.contains("- **Completion Rate:** 50.0%"));
        assert!(report.contains("- **Focus Time Completed:** 1h 30m"));
        assert!(report.contains("- **English:** 0/1 done (0.0%)"));
        assert!(report.contains("- **Math:** 1/1 done (100.0%)"));
    }

    #[test]
    fn test_mistake_section_without_tasks() {
        let mut mistake = Mistake::new(
            MistakeDraft::new("Physics", "Unit of force?", "Newton", "Wrote joule", "Units"),
            now(),
        )
        .unwrap();
        mistake.review(now());

        let report = generate_report(&[], &[mistake], 7, now());
        assert!(report.contains("No tasks created in this period."));
        assert!(report.contains("- **Total Mistakes:** 1 (1 reviews)"));
        assert!(report.contains("- **Physics:** 1\n  - Units: 1"));
    }

    #[test]
    fn test_report_with_unbounded_window() {
        let report = generate_report(&[], &[], i64::MAX, now());
        assert!(report.starts_with("# Study Report - last 9223372036854775807 days"));
    }

    #[test]
    fn test_write_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("report.md");
        write_report(&path, "# Report\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report\n");
    }
}

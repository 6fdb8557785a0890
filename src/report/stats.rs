use crate::domain::{Mistake, Task};
use chrono::{DateTime, Duration, Local};
use std::collections::BTreeMap;

/// Default look-back window for completion statistics
pub const DEFAULT_STATS_DAYS: i64 = 7;

/// Completion statistics over tasks created in a recent window
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStats {
    pub days: i64,
    pub total: usize,
    pub completed: usize,
    /// Percentage of tasks completed (0-100)
    pub completion_rate: f64,
    pub by_subject: BTreeMap<String, SubjectStats>,
}

/// Per-subject statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectStats {
    pub total: usize,
    pub completed: usize,
}

/// Focus mode statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusStats {
    pub timed_tasks: usize,
    pub timed_completed: usize,
    /// Required focus time of completed timed tasks
    pub focus_time: Duration,
    pub close_attempts: u32,
}

/// Mistake log totals, per subject and per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MistakeStats {
    pub total: usize,
    pub reviews: u32,
    pub by_subject: BTreeMap<String, SubjectMistakes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectMistakes {
    pub count: usize,
    pub categories: BTreeMap<String, usize>,
}

/// Tasks created within the last `days` days, up to `now`.
/// A window reaching past the representable range covers the whole history.
fn recent<'a>(tasks: &'a [Task], days: i64, now: DateTime<Local>) -> impl Iterator<Item = &'a Task> {
    let start = Duration::try_days(days.max(0)).and_then(|span| now.checked_sub_signed(span));
    tasks.iter().filter(move |t| {
        start.map_or(true, |start| t.created_at >= start) && t.created_at <= now
    })
}

/// Calculate completion statistics for the last `days` days
pub fn calculate_task_stats(tasks: &[Task], days: i64, now: DateTime<Local>) -> TaskStats {
    let mut total = 0;
    let mut completed = 0;
    let mut by_subject: BTreeMap<String, SubjectStats> = BTreeMap::new();

    for task in recent(tasks, days, now) {
        total += 1;
        let entry = by_subject.entry(task.subject.clone()).or_default();
        entry.total += 1;
        if task.completed {
            completed += 1;
            entry.completed += 1;
        }
    }

    let completion_rate = if total > 0 {
        (completed as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    TaskStats {
        days,
        total,
        completed,
        completion_rate,
        by_subject,
    }
}

/// Calculate focus-mode statistics for the last `days` days
pub fn calculate_focus_stats(tasks: &[Task], days: i64, now: DateTime<Local>) -> FocusStats {
    let mut stats = FocusStats {
        timed_tasks: 0,
        timed_completed: 0,
        focus_time: Duration::zero(),
        close_attempts: 0,
    };

    for task in recent(tasks, days, now).filter(|t| t.is_timed()) {
        stats.timed_tasks += 1;
        stats.close_attempts += task.close_attempts;
        if task.completed {
            stats.timed_completed += 1;
            stats.focus_time = stats.focus_time + task.countdown().limit();
        }
    }

    stats
}

/// Count logged mistakes by subject and category (the whole log, no time window)
pub fn calculate_mistake_stats(mistakes: &[Mistake]) -> MistakeStats {
    let mut stats = MistakeStats::default();

    for mistake in mistakes {
        stats.total += 1;
        stats.reviews = stats.reviews.saturating_add(mistake.review_count);
        let subject = stats.by_subject.entry(mistake.subject.clone()).or_default();
        subject.count += 1;
        *subject
            .categories
            .entry(mistake.category_label().to_string())
            .or_insert(0) += 1;
    }

    stats
}

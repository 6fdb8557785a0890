use super::enums::StudyMode;
use super::task::Task;
use chrono::Duration;

/// Whole seconds in a duration, rounded up so unfinished time never shows as zero
pub fn ceil_seconds(duration: Duration) -> i64 {
    let millis = duration.num_milliseconds().max(0);
    (millis + 999) / 1000
}

/// Format a countdown as "Xm Ys" (e.g., "29m 5s", "0m 12s")
pub fn format_countdown(duration: Duration) -> String {
    let secs = ceil_seconds(duration);
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Format a duration as "Xh Ym" (omits 0 values)
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

/// Remaining minutes with one decimal, as shown in refusal messages
pub fn format_minutes_precise(duration: Duration) -> String {
    let minutes = duration.num_milliseconds().max(0) as f64 / 60_000.0;
    format!("{:.1}", minutes)
}

/// Priority as a row of stars
pub fn priority_stars(priority: u8) -> String {
    "★".repeat(priority.clamp(1, 5) as usize)
}

/// Get mode badge text for a task row
pub fn mode_badge(task: &Task) -> String {
    match task.study_mode {
        StudyMode::Focus => format!("[FOCUS {}m]", task.time_limit_minutes),
        StudyMode::Normal => String::from("[NORMAL]"),
    }
}

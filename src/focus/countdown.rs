//! Countdown against a focus task's required work time.
//!
//! Progress is measured from the persisted start timestamp, so restarting the
//! app (or leaving it closed for a while) never resets it.

use crate::domain::Task;
use chrono::{DateTime, Duration, Local};

/// Read-only view of a task's timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    limit: Duration,
    started_at: Option<DateTime<Local>>,
}

impl Countdown {
    pub fn new(limit_minutes: u32, started_at: Option<DateTime<Local>>) -> Self {
        Self {
            limit: Duration::minutes(i64::from(limit_minutes)),
            started_at,
        }
    }

    pub fn of(task: &Task) -> Self {
        Self::new(task.time_limit_minutes, task.started_at)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// When the requirement is met, if the timer is running
    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.started_at.map(|started| started + self.limit)
    }

    /// Time still owed; the full limit if never started, zero once elapsed
    pub fn remaining(&self, now: DateTime<Local>) -> Duration {
        match self.deadline() {
            Some(deadline) if now < deadline => deadline - now,
            Some(_) => Duration::zero(),
            None => self.limit,
        }
    }

    /// Started and no time remaining
    pub fn is_elapsed(&self, now: DateTime<Local>) -> bool {
        self.is_started() && self.remaining(now) == Duration::zero()
    }
}

/// Record the start time once. Returns false if the task was already started.
pub fn start(task: &mut Task, now: DateTime<Local>) -> bool {
    if task.started_at.is_some() {
        return false;
    }
    task.started_at = Some(now);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn timed_task(minutes: i64) -> Task {
        Task::new(TaskDraft::focus("Math", "Drills", "", 3, minutes), t0()).unwrap()
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut task = timed_task(30);
        assert!(start(&mut task, t0()));
        assert!(!start(&mut task, t0() + Duration::minutes(5)));
        assert_eq!(task.started_at, Some(t0()));
    }

    #[test]
    fn test_unstarted_reports_full_limit() {
        let task = timed_task(30);
        let countdown = Countdown::of(&task);
        assert_eq!(countdown.remaining(t0() + Duration::hours(3)), Duration::minutes(30));
        assert!(!countdown.is_elapsed(t0() + Duration::hours(3)));
        assert!(countdown.deadline().is_none());
    }

    #[test]
    fn test_remaining_reaches_zero_exactly_at_limit() {
        let mut task = timed_task(30);
        start(&mut task, t0());
        let countdown = Countdown::of(&task);

        assert_eq!(countdown.remaining(t0() + Duration::minutes(29)), Duration::minutes(1));
        assert!(!countdown.is_elapsed(t0() + Duration::minutes(29)));
        assert_eq!(
            countdown.remaining(t0() + Duration::minutes(30) - Duration::milliseconds(1)),
            Duration::milliseconds(1)
        );
        assert_eq!(countdown.remaining(t0() + Duration::minutes(30)), Duration::zero());
        assert!(countdown.is_elapsed(t0() + Duration::minutes(30)));
        assert_eq!(countdown.remaining(t0() + Duration::hours(5)), Duration::zero());
    }

    #[test]
    fn test_remaining_is_non_increasing() {
        let mut task = timed_task(10);
        start(&mut task, t0());
        let countdown = Countdown::of(&task);

        let mut previous = countdown.remaining(t0() - Duration::minutes(1));
        for step in 0..30 {
            let now = t0() + Duration::seconds(step * 37);
            let remaining = countdown.remaining(now);
            assert!(remaining <= previous);
            assert!(remaining >= Duration::zero());
            previous = remaining;
        }
    }

    #[test]
    fn test_remaining_keeps_subsecond_precision() {
        let mut task = timed_task(1);
        start(&mut task, t0());
        let countdown = Countdown::of(&task);
        assert_eq!(
            countdown.remaining(t0() + Duration::milliseconds(500)),
            Duration::milliseconds(59_500)
        );
        assert_eq!(countdown.remaining(t0() + Duration::seconds(60)), Duration::zero());
        assert!(!countdown.is_elapsed(t0() + Duration::seconds(59)));
    }
}

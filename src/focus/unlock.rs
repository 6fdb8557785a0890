//! Password challenge that can release the lock screen early.
//!
//! The secret is one static value from configuration, not a credential store.

use crate::domain::ceil_seconds;
use chrono::{DateTime, Duration, Local};

/// Default wrong entries allowed before the cool-down
pub const DEFAULT_MAX_FAILURES: u32 = 3;

/// Default cool-down after the failure budget is spent
pub const DEFAULT_COOLDOWN_SECS: i64 = 5;

/// Result of one unlock submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Accepted,
    Rejected { remaining_tries: u32 },
    /// Input disabled; seconds until it re-enables
    LockedOut { cooldown_secs: i64 },
}

#[derive(Debug, Clone)]
pub struct UnlockChallenge {
    secret: String,
    max_failures: u32,
    cooldown: Duration,
    failures: u32,
    locked_out_until: Option<DateTime<Local>>,
}

impl UnlockChallenge {
    pub fn new(secret: impl Into<String>, max_failures: u32, cooldown: Duration) -> Self {
        Self {
            secret: secret.into(),
            max_failures: max_failures.max(1),
            cooldown,
            failures: 0,
            locked_out_until: None,
        }
    }

    /// Start a fresh dialog lifetime
    pub fn reset(&mut self) {
        self.failures = 0;
        self.locked_out_until = None;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn remaining_tries(&self) -> u32 {
        self.max_failures.saturating_sub(self.failures)
    }

    pub fn locked_out_until(&self) -> Option<DateTime<Local>> {
        self.locked_out_until
    }

    pub fn is_locked_out(&self, now: DateTime<Local>) -> bool {
        matches!(self.locked_out_until, Some(until) if now < until)
    }

    /// End a cool-down that has run its course. Returns true if one ended.
    pub fn expire_cooldown(&mut self, now: DateTime<Local>) -> bool {
        match self.locked_out_until {
            Some(until) if now >= until => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    pub fn submit(&mut self, secret: &str, now: DateTime<Local>) -> UnlockOutcome {
        if let Some(until) = self.locked_out_until {
            if now < until {
                return UnlockOutcome::LockedOut {
                    cooldown_secs: ceil_seconds(until - now),
                };
            }
            self.reset();
        }

        if secret == self.secret {
            self.failures = 0;
            return UnlockOutcome::Accepted;
        }

        self.failures += 1;
        if self.failures >= self.max_failures {
            self.locked_out_until = Some(now + self.cooldown);
            UnlockOutcome::LockedOut {
                cooldown_secs: ceil_seconds(self.cooldown),
            }
        } else {
            UnlockOutcome::Rejected {
                remaining_tries: self.remaining_tries(),
            }
        }
    }
}

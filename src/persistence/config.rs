use crate::error::FocusError;
use crate::focus::close_guard::DEFAULT_LOCK_THRESHOLD;
use crate::focus::unlock::{DEFAULT_COOLDOWN_SECS, DEFAULT_MAX_FAILURES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides the configured unlock secret
pub const UNLOCK_SECRET_ENV: &str = "STUDYLOCK_UNLOCK_SECRET";

/// Longest allowed unlock cool-down (one day)
pub const MAX_COOLDOWN_SECS: i64 = 86_400;

/// Longest allowed countdown redisplay interval (one hour)
pub const MAX_COUNTDOWN_INTERVAL_MS: i64 = 3_600_000;

/// App configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared secret that releases the lock screen early
    #[serde(default = "default_unlock_secret")]
    pub unlock_secret: String,

    /// Close attempts that force the lock screen
    #[serde(default = "default_lock_threshold")]
    pub lock_threshold: u32,

    /// Wrong secrets allowed before the cool-down
    #[serde(default = "default_max_unlock_failures")]
    pub max_unlock_failures: u32,

    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: i64,

    /// Countdown redisplay interval
    #[serde(default = "default_countdown_interval_ms")]
    pub countdown_interval_ms: i64,
}

fn default_unlock_secret() -> String {
    String::from("123456")
}

fn default_lock_threshold() -> u32 {
    DEFAULT_LOCK_THRESHOLD
}

fn default_max_unlock_failures() -> u32 {
    DEFAULT_MAX_FAILURES
}

fn default_cooldown_secs() -> i64 {
    DEFAULT_COOLDOWN_SECS
}

fn default_countdown_interval_ms() -> i64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            unlock_secret: default_unlock_secret(),
            lock_threshold: default_lock_threshold(),
            max_unlock_failures: default_max_unlock_failures(),
            cooldown_secs: default_cooldown_secs(),
            countdown_interval_ms: default_countdown_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<(), FocusError> {
        if self.unlock_secret.is_empty() {
            return Err(FocusError::InvalidConfig("unlock_secret must not be empty".into()));
        }
        if self.lock_threshold == 0 {
            return Err(FocusError::InvalidConfig("lock_threshold must be at least 1".into()));
        }
        if self.max_unlock_failures == 0 {
            return Err(FocusError::InvalidConfig(
                "max_unlock_failures must be at least 1".into(),
            ));
        }
        if !(1..=MAX_COOLDOWN_SECS).contains(&self.cooldown_secs) {
            return Err(FocusError::InvalidConfig(format!(
                "cooldown_secs must be between 1 and {}",
                MAX_COOLDOWN_SECS
            )));
        }
        if !(1..=MAX_COUNTDOWN_INTERVAL_MS).contains(&self.countdown_interval_ms) {
            return Err(FocusError::InvalidConfig(format!(
                "countdown_interval_ms must be between 1 and {}",
                MAX_COUNTDOWN_INTERVAL_MS
            )));
        }
        Ok(())
    }

    /// Apply the secret override, if one is set
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.unlock_secret = secret;
        }
        self
    }
}

/// Load config from config.json, falling back to defaults if the file doesn't exist
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str::<AppConfig>(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?
    } else {
        AppConfig::default()
    };
    let config = config.with_secret_override(std::env::var(UNLOCK_SECRET_ENV).ok());
    config.validate()?;
    Ok(config)
}

/// Save config to config.json
pub fn save_config<P: AsRef<Path>>(path: P, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a mistake log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MistakeId(Uuid);

impl MistakeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for display only
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for MistakeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MistakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MistakeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Input for logging a mistake
#[derive(Debug, Clone, Default)]
pub struct MistakeDraft {
    pub subject: String,
    pub question: String,
    pub answer: String,
    /// What went wrong
    pub mistake: String,
    /// Knowledge point, free text
    pub category: String,
}

impl MistakeDraft {
    pub fn new(subject: &str, question: &str, answer: &str, mistake: &str, category: &str) -> Self {
        Self {
            subject: subject.trim().to_string(),
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
            mistake: mistake.trim().to_string(),
            category: category.trim().to_string(),
        }
    }

    /// Subject, question, answer and mistake are required; the category is optional
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.is_empty()
            || self.question.is_empty()
            || self.answer.is_empty()
            || self.mistake.is_empty()
        {
            return Err("Subject, question, answer and mistake are required".to_string());
        }
        Ok(())
    }
}

/// A wrong answer kept for later review, as persisted in mistakes.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mistake {
    pub id: MistakeId,
    pub subject: String,
    pub question: String,
    pub answer: String,
    pub mistake: String,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Local>>,
}

impl Mistake {
    pub fn new(draft: MistakeDraft, now: DateTime<Local>) -> Result<Self, String> {
        draft.validate()?;
        Ok(Self {
            id: MistakeId::new(),
            subject: draft.subject,
            question: draft.question,
            answer: draft.answer,
            mistake: draft.mistake,
            category: draft.category,
            created_at: now,
            review_count: 0,
            last_reviewed: None,
        })
    }

    /// Record one more review; returns the new count
    pub fn review(&mut self, now: DateTime<Local>) -> u32 {
        self.review_count += 1;
        self.last_reviewed = Some(now);
        self.review_count
    }

    /// Category for grouping, with a placeholder when none was given
    pub fn category_label(&self) -> &str {
        if self.category.is_empty() {
            "Uncategorized"
        } else {
            &self.category
        }
    }
}

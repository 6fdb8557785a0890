use crate::domain::{Mistake, MistakeDraft, MistakeId};
use crate::persistence::{atomic_write, read_file};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Mistake log kept in a pretty-printed JSON array on disk
#[derive(Debug)]
pub struct JsonMistakeStore {
    path: PathBuf,
    mistakes: Vec<Mistake>,
}

impl JsonMistakeStore {
    /// Load the log from `path`; a missing file is an empty log
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path)?;
        let mistakes = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse mistakes from {}", path.display()))?
        };
        Ok(Self { path, mistakes })
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.mistakes)
            .context("Failed to serialize mistakes")?;
        atomic_write(&self.path, &json)
    }

    pub fn list(&self) -> &[Mistake] {
        &self.mistakes
    }

    pub fn get(&self, id: MistakeId) -> Option<&Mistake> {
        self.mistakes.iter().find(|m| m.id == id)
    }

    pub fn add(&mut self, draft: MistakeDraft, now: DateTime<Local>) -> Result<Mistake> {
        let mistake = Mistake::new(draft, now).map_err(anyhow::Error::msg)?;
        self.mistakes.push(mistake.clone());
        self.save()?;
        Ok(mistake)
    }

    /// Count a review; `None` when the entry does not exist
    pub fn review(&mut self, id: MistakeId, now: DateTime<Local>) -> Result<Option<u32>> {
        let Some(mistake) = self.mistakes.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        let count = mistake.review(now);
        self.save()?;
        Ok(Some(count))
    }

    pub fn delete(&mut self, id: MistakeId) -> Result<bool> {
        let initial_count = self.mistakes.len();
        self.mistakes.retain(|m| m.id != id);
        if self.mistakes.len() < initial_count {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Entries for one subject; an empty subject means all of them
    pub fn by_subject(&self, subject: &str) -> Vec<&Mistake> {
        self.mistakes
            .iter()
            .filter(|m| subject.is_empty() || m.subject == subject)
            .collect()
    }

    /// Distinct subjects, sorted
    pub fn subjects(&self) -> Vec<&str> {
        self.mistakes
            .iter()
            .map(|m| m.subject.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

use crate::domain::{Completion, CompletionRefusal, Task, TaskDraft, TaskId};
use crate::error::FocusError;
use crate::focus::countdown;
use crate::persistence::{atomic_write, read_file};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Task storage as seen by the focus controller and the UI.
///
/// Every mutating call is persisted before it returns.
pub trait TaskRepository {
    fn create(&mut self, draft: TaskDraft, now: DateTime<Local>) -> Result<Task, FocusError>;
    fn list(&self) -> &[Task];
    fn update(&mut self, task: Task) -> Result<bool>;
    fn delete(&mut self, id: TaskId) -> Result<bool>;

    /// Record the start time once; true if this call started the timer
    fn mark_started(&mut self, id: TaskId, now: DateTime<Local>) -> Result<bool> {
        let mut task = self.fetch(id)?;
        let started = countdown::start(&mut task, now);
        if started {
            self.update(task)?;
        }
        Ok(started)
    }

    /// Complete the task if its time requirement is met
    fn mark_completed(&mut self, id: TaskId, now: DateTime<Local>) -> Result<Completion> {
        let Some(mut task) = self.get(id).cloned() else {
            return Ok(Completion::Refused(CompletionRefusal::NotFound));
        };
        let was_completed = task.completed;
        let outcome = task.complete(now);
        if outcome == Completion::Completed && !was_completed {
            self.update(task)?;
        }
        Ok(outcome)
    }

    fn increment_close_attempts(&mut self, id: TaskId) -> Result<u32> {
        let mut task = self.fetch(id)?;
        let attempts = task.record_close_attempt();
        self.update(task)?;
        Ok(attempts)
    }

    /// Owned copy of a task, failing if it does not exist
    fn fetch(&self, id: TaskId) -> Result<Task> {
        self.get(id)
            .cloned()
            .with_context(|| format!("Task {} not found", id))
    }

    fn get(&self, id: TaskId) -> Option<&Task> {
        self.list().iter().find(|t| t.id == id)
    }

    /// First unfinished focus task with a time limit, in creation order
    fn pending_timed_task(&self) -> Option<&Task> {
        self.list().iter().find(|t| !t.completed && t.is_timed())
    }

    fn pending(&self) -> Vec<&Task> {
        self.list().iter().filter(|t| !t.completed).collect()
    }

    fn completed(&self) -> Vec<&Task> {
        self.list().iter().filter(|t| t.completed).collect()
    }
}

/// Tasks kept in a pretty-printed JSON array on disk
#[derive(Debug)]
pub struct JsonTaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl JsonTaskStore {
    /// Load tasks from `path`; a missing file is an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path)?;
        let tasks = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse tasks from {}", path.display()))?
        };
        Ok(Self { path, tasks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.tasks)
            .context("Failed to serialize tasks")?;
        atomic_write(&self.path, &json)
    }
}

impl TaskRepository for JsonTaskStore {
    fn create(&mut self, draft: TaskDraft, now: DateTime<Local>) -> Result<Task, FocusError> {
        let task = Task::new(draft, now)?;
        self.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    fn list(&self) -> &[Task] {
        &self.tasks
    }

    fn update(&mut self, task: Task) -> Result<bool> {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task;
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: TaskId) -> Result<bool> {
        let initial_count = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() < initial_count {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, JsonTaskStore) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::open(temp_dir.path().join("tasks.json")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(JsonTaskStore::open(&path).is_err());
    }

    #[test]
    fn test_crud_survives_reopen() {
        let (dir, mut store) = temp_store();
        let a = store.create(TaskDraft::normal("Math", "Ex 1", "2024-03-05", 2), t0()).unwrap();
        let b = store.create(TaskDraft::focus("Physics", "Ch 4", "2024-03-06", 4, 30), t0()).unwrap();

        let mut edited = a.clone();
        edited.content = "Ex 1 and 2".to_string();
        assert!(store.update(edited.clone()).unwrap());
        assert!(store.delete(b.id).unwrap());
        assert!(!store.delete(b.id).unwrap());

        let reopened = JsonTaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert_eq!(reopened.list(), &[edited][..]);
    }

    #[test]
    fn test_create_rejects_invalid_time_limit() {
        let (_dir, mut store) = temp_store();
        let result = store.create(TaskDraft::focus("Math", "Ex", "", 1, 0), t0());
        assert!(matches!(result, Err(FocusError::InvalidTimeLimit(0))));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_pending_timed_task_picks_first_in_order() {
        let (_dir, mut store) = temp_store();
        store.create(TaskDraft::normal("Math", "Ex", "", 1), t0()).unwrap();
        let first = store.create(TaskDraft::focus("Physics", "A", "", 1, 10), t0()).unwrap();
        store.create(TaskDraft::focus("Chemistry", "B", "", 1, 20), t0()).unwrap();

        assert_eq!(store.pending_timed_task().map(|t| t.id), Some(first.id));
    }

    #[test]
    fn test_mark_started_once() {
        let (_dir, mut store) = temp_store();
        let task = store.create(TaskDraft::focus("Physics", "A", "", 1, 10), t0()).unwrap();

        assert!(store.mark_started(task.id, t0()).unwrap());
        assert!(!store.mark_started(task.id, t0() + Duration::minutes(3)).unwrap());
        assert_eq!(store.get(task.id).unwrap().started_at, Some(t0()));
    }

    #[test]
    fn test_mark_completed_enforces_time_limit() {
        let (dir, mut store) = temp_store();
        let task = store.create(TaskDraft::focus("Physics", "A", "", 1, 10), t0()).unwrap();
        store.mark_started(task.id, t0()).unwrap();

        assert_eq!(
            store.mark_completed(task.id, t0() + Duration::minutes(4)).unwrap(),
            Completion::Refused(CompletionRefusal::TimeRemaining(Duration::minutes(6)))
        );
        assert_eq!(
            store.mark_completed(task.id, t0() + Duration::minutes(10)).unwrap(),
            Completion::Completed
        );

        let reopened = JsonTaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert!(reopened.get(task.id).unwrap().completed);
        assert_eq!(reopened.completed().len(), 1);
        assert!(reopened.pending_timed_task().is_none());
    }

    #[test]
    fn test_mark_completed_unknown_task() {
        let (_dir, mut store) = temp_store();
        assert_eq!(
            store.mark_completed(TaskId::new(), t0()).unwrap(),
            Completion::Refused(CompletionRefusal::NotFound)
        );
    }

    #[test]
    fn test_increment_close_attempts_unknown_task_fails() {
        let (_dir, mut store) = temp_store();
        assert!(store.increment_close_attempts(TaskId::new()).is_err());
    }
}

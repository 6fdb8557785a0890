pub mod enums;
pub mod mistake;
pub mod recognize;
pub mod task;
pub mod views;

pub use enums::{StudyMode, Tab, UiMode};
pub use mistake::{Mistake, MistakeDraft, MistakeId};
pub use recognize::{suggest_priority, suggest_subject};
pub use task::{Completion, CompletionRefusal, Task, TaskDraft, TaskId};
pub use views::{ceil_seconds, format_countdown, format_duration, format_minutes_precise, mode_badge, priority_stars};

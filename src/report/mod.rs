pub mod generator;
pub mod stats;

pub use generator::{generate_report, write_report};
pub use stats::{calculate_mistake_stats, calculate_task_stats, MistakeStats, TaskStats, DEFAULT_STATS_DAYS};

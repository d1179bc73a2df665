pub mod sqlite;
pub mod tables;

pub use sqlite::{Database, now_local};
pub use tables::gantt_tasks::{DailyCount, TaskStatusCounts};

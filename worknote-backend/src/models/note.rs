use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A note written to the vault and recorded in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkNote {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// meeting, work_log, schedule or general
    pub category: String,
    /// Path of the markdown file, relative to the notes directory
    pub file_path: String,
    pub created_at: NaiveDateTime,
    pub user_id: String,
}

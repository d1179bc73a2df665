//! Chart-task sink: one gantt task per work log, updated in place on repeats

use chrono::Duration;
use std::sync::Arc;

use super::truncate_title;
use crate::db::{Database, now_local};
use crate::error::ToolResult;
use crate::models::{AnalyzedText, GanttTask, TaskPriority, TaskStatus};

const DEFAULT_DURATION_DAYS: i64 = 7;

const URGENT_KEYWORDS: [&str; 4] = ["긴급", "urgent", "즉시", "asap"];
const IMPORTANT_KEYWORDS: [&str; 4] = ["중요", "important", "높음", "high"];
const COMPLETED_KEYWORDS: [&str; 3] = ["완료", "마쳤", "끝냈"];

pub struct GanttTool {
    db: Arc<Database>,
}

impl GanttTool {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create the task for this note, or update the user's task with the same title
    pub async fn update_tasks(&self, analyzed: &AnalyzedText) -> ToolResult<Vec<GanttTask>> {
        let text = &analyzed.original_text;
        let title = truncate_title(text);
        let start = now_local();
        let end = start + Duration::days(parse_duration(text));

        let (task, created) = self.db.upsert_gantt_task(
            &title,
            Some(text),
            start,
            end,
            determine_status(text),
            determine_priority(text),
            &analyzed.user_id,
        )?;

        if created {
            log::info!("[GANTT] Created task {} '{}'", task.id, task.title);
        } else {
            log::info!("[GANTT] Updated task {} -> {}", task.id, task.status.as_ref());
        }

        Ok(vec![task])
    }

    pub fn list_tasks(&self) -> ToolResult<Vec<GanttTask>> {
        Ok(self.db.list_gantt_tasks()?)
    }

    /// None when the task does not exist
    pub fn update_task_status(&self, id: i64, status: TaskStatus) -> ToolResult<Option<GanttTask>> {
        Ok(self.db.update_gantt_task_status(id, status)?)
    }

    /// False when the task does not exist
    pub fn delete_task(&self, id: i64) -> ToolResult<bool> {
        Ok(self.db.delete_gantt_task(id)?)
    }
}

/// Task length in days: 주/week 7, 일/day 1, 월/month 30, otherwise 7
pub fn parse_duration(text: &str) -> i64 {
    let lower = text.to_lowercase();
    if text.contains('주') || lower.contains("week") {
        7
    } else if text.contains('일') || lower.contains("day") {
        1
    } else if text.contains('월') || lower.contains("month") {
        30
    } else {
        DEFAULT_DURATION_DAYS
    }
}

pub fn determine_priority(text: &str) -> TaskPriority {
    let lower = text.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        TaskPriority::High
    } else if IMPORTANT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        TaskPriority::Medium
    } else {
        TaskPriority::Low
    }
}

pub fn determine_status(text: &str) -> TaskStatus {
    if COMPLETED_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        TaskStatus::Completed
    } else if text.contains("진행") {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    }
}

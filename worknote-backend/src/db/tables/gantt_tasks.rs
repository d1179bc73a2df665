//! Gantt task database operations

use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, OptionalExtension, Result as SqliteResult};
use serde::Serialize;

use crate::db::sqlite::{format_timestamp, now_local, parse_timestamp};
use crate::models::{GanttTask, TaskPriority, TaskStatus};
use super::super::Database;

const SELECT_COLUMNS: &str = "SELECT id, title, description, start_date, end_date, status, priority,
     created_at, updated_at, user_id FROM gantt_task";

/// Number of tasks per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl TaskStatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.in_progress + self.completed
    }
}

/// Tasks completed on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

impl Database {
    pub fn get_gantt_task(&self, id: i64) -> SqliteResult<Option<GanttTask>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id],
            |row| Self::row_to_gantt_task(row),
        )
        .optional()
    }

    /// Create-or-update keyed on (title, user_id), under one lock so concurrent
    /// writers cannot both insert. An existing task keeps its dates; its
    /// description, status and priority are overwritten. Returns the task and
    /// whether it was newly created.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_gantt_task(
        &self,
        title: &str,
        description: Option<&str>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        status: TaskStatus,
        priority: TaskPriority,
        user_id: &str,
    ) -> SqliteResult<(GanttTask, bool)> {
        let conn = self.conn.lock().unwrap();
        let now_str = format_timestamp(&now_local());

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM gantt_task WHERE title = ?1 AND user_id = ?2 ORDER BY id LIMIT 1",
                params![title, user_id],
                |row| row.get(0),
            )
            .optional()?;

        let (id, created) = match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE gantt_task SET description = ?1, status = ?2, priority = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![description, status.as_ref(), priority.as_ref(), &now_str, id],
                )?;
                (id, false)
            }
            None => {
                conn.execute(
                    "INSERT INTO gantt_task (title, description, start_date, end_date, status, priority, created_at, updated_at, user_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8)",
                    params![
                        title,
                        description,
                        format_timestamp(&start_date),
                        format_timestamp(&end_date),
                        status.as_ref(),
                        priority.as_ref(),
                        &now_str,
                        user_id,
                    ],
                )?;
                (conn.last_insert_rowid(), true)
            }
        };

        let task = conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id],
            |row| Self::row_to_gantt_task(row),
        )?;
        Ok((task, created))
    }

    /// List all tasks, newest first
    pub fn list_gantt_tasks(&self) -> SqliteResult<Vec<GanttTask>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))?;
        let tasks = stmt
            .query_map([], |row| Self::row_to_gantt_task(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Set a task's status. Returns None if the task does not exist.
    pub fn update_gantt_task_status(&self, id: i64, status: TaskStatus) -> SqliteResult<Option<GanttTask>> {
        let updated = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE gantt_task SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_ref(), format_timestamp(&now_local()), id],
            )?
        };

        if updated == 0 {
            return Ok(None);
        }
        self.get_gantt_task(id)
    }

    pub fn delete_gantt_task(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM gantt_task WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    pub fn count_gantt_tasks_by_status(&self) -> SqliteResult<TaskStatusCounts> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM gantt_task GROUP BY status")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts = TaskStatusCounts::default();
        for row in rows {
            let (status, count) = row?;
            match TaskStatus::from_str_or_default(&status) {
                TaskStatus::Pending => counts.pending += count,
                TaskStatus::InProgress => counts.in_progress += count,
                TaskStatus::Completed => counts.completed += count,
            }
        }
        Ok(counts)
    }

    /// Completed tasks per day (by last update) over the last `days` calendar
    /// days ending today. Days without completions are absent.
    pub fn daily_completed_tasks(&self, days: i64) -> SqliteResult<Vec<DailyCount>> {
        let since = now_local().date() - Duration::days(days.max(1) - 1);
        let since = since.format("%Y-%m-%d").to_string();

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT substr(updated_at, 1, 10) AS day, COUNT(*) FROM gantt_task
             WHERE status = 'completed' AND updated_at >= ?1
             GROUP BY day ORDER BY day",
        )?;
        let counts = stmt
            .query_map([since], |row| {
                Ok(DailyCount {
                    date: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(counts)
    }

    fn row_to_gantt_task(row: &rusqlite::Row) -> rusqlite::Result<GanttTask> {
        let start_date: String = row.get(3)?;
        let end_date: String = row.get(4)?;
        let status: String = row.get(5)?;
        let priority: String = row.get(6)?;
        let created_at: String = row.get(7)?;
        let updated_at: String = row.get(8)?;

        Ok(GanttTask {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            start_date: parse_timestamp(&start_date)?,
            end_date: parse_timestamp(&end_date)?,
            status: TaskStatus::from_str_or_default(&status),
            priority: TaskPriority::from_str_or_default(&priority),
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
            user_id: row.get(9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn open_db(dir: &tempfile::TempDir) -> Database {
        let db_path = dir.path().join("test.db");
        Database::new(db_path.to_str().unwrap()).expect("Failed to open database")
    }

    fn insert(db: &Database, title: &str, user: &str, status: TaskStatus) -> GanttTask {
        db.upsert_gantt_task(
            title,
            Some("desc"),
            ts("2024-01-01T09:00:00"),
            ts("2024-01-08T09:00:00"),
            status,
            TaskPriority::Low,
            user,
        )
        .unwrap()
        .0
    }

    #[test]
    fn test_update_status() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let task = insert(&db, "report", "u1", TaskStatus::Pending);
        let updated = db
            .update_gantt_task_status(task.id, TaskStatus::Completed)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert!(db.update_gantt_task_status(999, TaskStatus::Completed).unwrap().is_none());
    }

    #[test]
    fn test_counts_and_daily_completed() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        insert(&db, "a", "u1", TaskStatus::Pending);
        insert(&db, "b", "u1", TaskStatus::InProgress);
        insert(&db, "c", "u1", TaskStatus::Completed);
        insert(&db, "d", "u1", TaskStatus::Completed);

        let counts = db.count_gantt_tasks_by_status().unwrap();
        assert_eq!(counts, TaskStatusCounts { pending: 1, in_progress: 1, completed: 2 });
        assert_eq!(counts.total(), 4);

        let daily = db.daily_completed_tasks(7).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].count, 2);
        assert_eq!(daily[0].date, now_local().format("%Y-%m-%d").to_string());
    }

    #[test]
    fn test_daily_completed_only_counts_recent_days() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let old = insert(&db, "old", "u1", TaskStatus::Completed);
        let edge = insert(&db, "edge", "u1", TaskStatus::Completed);
        insert(&db, "today", "u1", TaskStatus::Completed);

        let today = now_local().date();
        let stamp = |days_ago: i64| format!("{}T23:00:00", today - Duration::days(days_ago));
        {
            let conn = db.conn.lock().unwrap();
            conn.execute("UPDATE gantt_task SET updated_at = ?1 WHERE id = ?2", params![stamp(30), old.id])
                .unwrap();
            conn.execute("UPDATE gantt_task SET updated_at = ?1 WHERE id = ?2", params![stamp(6), edge.id])
                .unwrap();
        }

        // A completion a month ago falls outside a week even though it is a distinct day
        let week = db.daily_completed_tasks(7).unwrap();
        let dates: Vec<String> = week.iter().map(|d| d.date.clone()).collect();
        assert_eq!(
            dates,
            vec![
                (today - Duration::days(6)).format("%Y-%m-%d").to_string(),
                today.format("%Y-%m-%d").to_string(),
            ]
        );

        let two_days = db.daily_completed_tasks(2).unwrap();
        assert_eq!(two_days.len(), 1);
        assert_eq!(two_days[0].count, 1);

        assert_eq!(db.daily_completed_tasks(31).unwrap().len(), 3);
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let (first, created) = db
            .upsert_gantt_task(
                "API 개발",
                Some("v1"),
                ts("2024-01-01T09:00:00"),
                ts("2024-01-08T09:00:00"),
                TaskStatus::InProgress,
                TaskPriority::Low,
                "u1",
            )
            .unwrap();
        assert!(created);

        let (second, created) = db
            .upsert_gantt_task(
                "API 개발",
                Some("v2"),
                ts("2024-02-01T09:00:00"),
                ts("2024-02-02T09:00:00"),
                TaskStatus::Completed,
                TaskPriority::High,
                "u1",
            )
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.description.as_deref(), Some("v2"));
        assert_eq!(second.status, TaskStatus::Completed);
        assert_eq!(second.priority, TaskPriority::High);
        assert_eq!(second.start_date, first.start_date);
        assert_eq!(second.end_date, first.end_date);

        let (_, created) = db
            .upsert_gantt_task(
                "API 개발",
                None,
                ts("2024-01-01T09:00:00"),
                ts("2024-01-08T09:00:00"),
                TaskStatus::Pending,
                TaskPriority::Low,
                "u2",
            )
            .unwrap();
        assert!(created);
        assert_eq!(db.list_gantt_tasks().unwrap().len(), 2);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let db = open_db(&dir);

        let task = insert(&db, "a", "u1", TaskStatus::Pending);
        assert!(db.delete_gantt_task(task.id).unwrap());
        assert!(!db.delete_gantt_task(task.id).unwrap());
        assert!(db.list_gantt_tasks().unwrap().is_empty());
    }
}

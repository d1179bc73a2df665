//! Work note records (the markdown body lives in the notes directory)

use rusqlite::{params, Result as SqliteResult};

use crate::db::sqlite::{format_timestamp, now_local, parse_timestamp};
use crate::models::WorkNote;
use super::super::Database;

impl Database {
    pub fn create_work_note(
        &self,
        title: &str,
        content: &str,
        category: &str,
        file_path: &str,
        user_id: &str,
    ) -> SqliteResult<WorkNote> {
        let conn = self.conn.lock().unwrap();
        let now = now_local();

        conn.execute(
            "INSERT INTO work_note (title, content, category, file_path, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![title, content, category, file_path, format_timestamp(&now), user_id],
        )?;

        Ok(WorkNote {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            file_path: file_path.to_string(),
            created_at: now,
            user_id: user_id.to_string(),
        })
    }

    /// List all notes, newest first
    pub fn list_work_notes(&self) -> SqliteResult<Vec<WorkNote>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, title, content, category, file_path, created_at, user_id
             FROM work_note ORDER BY created_at DESC, id DESC",
        )?;

        let notes = stmt
            .query_map([], |row| {
                let created_at: String = row.get(5)?;
                Ok(WorkNote {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    category: row.get(3)?,
                    file_path: row.get(4)?,
                    created_at: parse_timestamp(&created_at)?,
                    user_id: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(notes)
    }

    pub fn count_work_notes(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM work_note", [], |row| row.get(0))
    }
}

//! SQLite database handle and schema

use chrono::{NaiveDateTime, Timelike};
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::Mutex;

use crate::models::TIMESTAMP_FORMAT;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS calendar_event (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        summary TEXT NOT NULL,
        description TEXT,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        created_at TEXT NOT NULL,
        user_id TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_calendar_event_start ON calendar_event(start_time);

    CREATE TABLE IF NOT EXISTS work_note (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT 'general',
        file_path TEXT NOT NULL,
        created_at TEXT NOT NULL,
        user_id TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS gantt_task (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        priority TEXT NOT NULL DEFAULT 'low',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        user_id TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_gantt_task_title ON gantt_task(user_id, title);

    CREATE TABLE IF NOT EXISTS contact (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        emails TEXT,
        phones TEXT,
        company TEXT,
        position TEXT,
        department TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        user_id TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_contact_name ON contact(name);
";

/// Main application database (calendar, notes, gantt, contacts)
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `path` and make sure every table exists
    pub fn new(path: &str) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Format a timestamp the way every table stores it
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp column
pub fn parse_timestamp(raw: &str) -> SqliteResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Current local time truncated to whole seconds
pub fn now_local() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_creates_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("worknote.db");
        let db = Database::new(db_path.to_str().unwrap()).expect("Failed to open database");

        let conn = db.conn.lock().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<SqliteResult<_>>()
            .unwrap();

        for table in ["calendar_event", "contact", "gantt_task", "work_note"] {
            assert!(tables.iter().any(|t| t == table), "missing table {}", table);
        }
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("worknote.db");
        Database::new(db_path.to_str().unwrap()).unwrap();
        assert!(Database::new(db_path.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_timestamp_format_round_trip() {
        let ts = parse_timestamp("2024-01-15T14:30:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-15T14:30:00");
        assert!(parse_timestamp("15/01/2024").is_err());
    }
}

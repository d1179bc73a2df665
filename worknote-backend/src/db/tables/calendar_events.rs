//! Calendar event database operations

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Result as SqliteResult};

use crate::db::sqlite::{format_timestamp, now_local, parse_timestamp};
use crate::models::{CalendarEvent, CalendarEventRequest};
use super::super::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, summary, description, start_time, end_time, created_at, user_id FROM calendar_event";

impl Database {
    /// Insert a calendar event
    pub fn create_calendar_event(
        &self,
        summary: &str,
        description: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        user_id: &str,
    ) -> SqliteResult<CalendarEvent> {
        let conn = self.conn.lock().unwrap();
        let now = now_local();

        conn.execute(
            "INSERT INTO calendar_event (summary, description, start_time, end_time, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                summary,
                description,
                format_timestamp(&start),
                format_timestamp(&end),
                format_timestamp(&now),
                user_id,
            ],
        )?;

        Ok(CalendarEvent {
            id: conn.last_insert_rowid(),
            summary: summary.to_string(),
            description: description.map(|s| s.to_string()),
            start,
            end,
            created_at: now,
            user_id: user_id.to_string(),
        })
    }

    /// Get a calendar event by ID
    pub fn get_calendar_event(&self, id: i64) -> SqliteResult<Option<CalendarEvent>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id],
            |row| Self::row_to_calendar_event(row),
        )
        .optional()
    }

    /// List all calendar events, latest start first
    pub fn list_calendar_events(&self) -> SqliteResult<Vec<CalendarEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{} ORDER BY start_time DESC, id DESC", SELECT_COLUMNS))?;
        let events = stmt
            .query_map([], |row| Self::row_to_calendar_event(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(events)
    }

    /// Events starting in `[start, end)`, latest start first
    pub fn list_calendar_events_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> SqliteResult<Vec<CalendarEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE start_time >= ?1 AND start_time < ?2 ORDER BY start_time DESC, id DESC",
            SELECT_COLUMNS
        ))?;
        let events = stmt
            .query_map(params![format_timestamp(&start), format_timestamp(&end)], |row| {
                Self::row_to_calendar_event(row)
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(events)
    }

    /// Replace an event's fields. A missing description keeps the stored one.
    /// Returns None if the event does not exist.
    pub fn update_calendar_event(
        &self,
        id: i64,
        request: &CalendarEventRequest,
    ) -> SqliteResult<Option<CalendarEvent>> {
        let updated = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE calendar_event
                 SET summary = ?1, description = COALESCE(?2, description), start_time = ?3, end_time = ?4, user_id = ?5
                 WHERE id = ?6",
                params![
                    request.summary,
                    request.description,
                    format_timestamp(&request.start),
                    format_timestamp(&request.end),
                    request.user_id,
                    id,
                ],
            )?
        };

        if updated == 0 {
            return Ok(None);
        }
        self.get_calendar_event(id)
    }

    /// Delete an event. Returns false if nothing was deleted.
    pub fn delete_calendar_event(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM calendar_event WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    pub fn count_calendar_events(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM calendar_event", [], |row| row.get(0))
    }

    fn row_to_calendar_event(row: &rusqlite::Row) -> rusqlite::Result<CalendarEvent> {
        let start: String = row.get(3)?;
        let end: String = row.get(4)?;
        let created_at: String = row.get(5)?;

        Ok(CalendarEvent {
            id: row.get(0)?,
            summary: row.get(1)?,
            description: row.get(2)?,
            start: parse_timestamp(&start)?,
            end: parse_timestamp(&end)?,
            created_at: parse_timestamp(&created_at)?,
            user_id: row.get(6)?,
        })
    }
}

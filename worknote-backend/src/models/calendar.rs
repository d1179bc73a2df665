use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Stored calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub summary: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub user_id: String,
}

/// Body of POST/PUT /calendar/events
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEventRequest {
    pub summary: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub user_id: String,
}

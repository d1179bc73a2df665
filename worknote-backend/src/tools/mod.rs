//! Write sinks fed by the pipeline: calendar, notes, gantt chart and contacts.

pub mod calendar;
pub mod contacts;
pub mod gantt;
pub mod notes;

pub use calendar::CalendarTool;
pub use contacts::ContactTool;
pub use gantt::GanttTool;
pub use notes::NotesTool;

const TITLE_MAX_CHARS: usize = 50;

/// Text itself, or its first 50 characters followed by "..."
pub fn truncate_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

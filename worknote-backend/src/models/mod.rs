pub mod calendar;
pub mod contact;
pub mod gantt;
pub mod note;
pub mod work;

pub use calendar::{CalendarEvent, CalendarEventRequest};
pub use contact::{Contact, NewContact};
pub use gantt::{GanttTask, TaskPriority, TaskStatus};
pub use note::WorkNote;
pub use work::{
    AnalysisSummary, AnalyzedText, Category, Classification, ClassificationSource, Entities,
    Sentiment, WorkInput, WorkOutput,
};

/// Serialization format for naive local timestamps stored in SQLite
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

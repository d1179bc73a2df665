//! Table operations - one module per table.
//!
//! Each module contains an `impl Database` block for its table.

pub mod calendar_events;
pub mod contacts;
pub mod gantt_tasks;
pub mod work_notes;

//! Notes sink: writes a markdown note per meeting and records it in the database

use std::sync::Arc;

use super::truncate_title;
use crate::analysis::date_utils::{format_date_for_display, format_time_for_display};
use crate::db::Database;
use crate::error::{ToolError, ToolResult};
use crate::models::{AnalyzedText, WorkNote};
use crate::notes::NoteStore;
use crate::notes::store::NoteSearchResult;
use crate::tools::calendar::event_window;

pub struct NotesTool {
    db: Arc<Database>,
    store: Arc<NoteStore>,
}

impl NotesTool {
    pub fn new(db: Arc<Database>, store: Arc<NoteStore>) -> Self {
        Self { db, store }
    }

    pub async fn create_notes(&self, analyzed: &AnalyzedText) -> ToolResult<Vec<WorkNote>> {
        let title = truncate_title(&analyzed.original_text);
        let content = generate_content(analyzed);
        let category = determine_category(&analyzed.original_text);

        let mut tags = vec![category.to_string()];
        for keyword in &analyzed.keywords {
            let tag = keyword.replace(',', "");
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let file_path = self
            .store
            .create_note(&title, &content, &tags, category, Some(category), analyzed.processed_at)
            .map_err(ToolError::Notes)?;

        let note = self
            .db
            .create_work_note(&title, &content, category, &file_path, &analyzed.user_id)?;

        Ok(vec![note])
    }

    pub fn search(&self, query: &str, limit: i32) -> ToolResult<Vec<NoteSearchResult>> {
        self.store.search(query, limit).map_err(ToolError::from)
    }
}

pub fn generate_content(analyzed: &AnalyzedText) -> String {
    let mut parts = vec![format!("# {}", analyzed.original_text), String::new()];

    let mut section = |heading: &str, body: String| {
        parts.push(format!("## {}", heading));
        parts.push(body);
        parts.push(String::new());
    };

    if !analyzed.keywords.is_empty() {
        section("키워드", analyzed.keywords.join(", "));
    }
    if !analyzed.entities.persons.is_empty() {
        section("관련 인물", analyzed.entities.persons.join(", "));
    }
    if !analyzed.entities.organizations.is_empty() {
        section("관련 조직", analyzed.entities.organizations.join(", "));
    }
    if !analyzed.dates.is_empty() {
        section("날짜", analyzed.dates.join(", "));
    }
    if !analyzed.dates.is_empty() || !analyzed.times.is_empty() {
        let (start, _) = event_window(analyzed);
        section(
            "일시",
            format!("{} {}", format_date_for_display(&start), format_time_for_display(&start)),
        );
    }
    section("감정", format!("감정: {}", analyzed.sentiment.as_ref()));

    parts.join("\n")
}

/// Note category from keywords; anything else is "general"
pub fn determine_category(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has_any(&["회의", "미팅", "meeting"]) {
        "meeting"
    } else if has_any(&["작업", "업무", "work", "task"]) {
        "work_log"
    } else if has_any(&["일정", "스케줄", "schedule"]) {
        "schedule"
    } else {
        "general"
    }
}

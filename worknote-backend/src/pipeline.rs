//! Work-input pipeline: analyze, classify, then fan out to the sinks the
//! category calls for. Sinks run concurrently and fail independently.

use futures_util::future::join4;
use std::future::Future;
use std::sync::Arc;

use crate::analysis::{ContentClassifier, TextAnalyzer};
use crate::db::{Database, now_local};
use crate::error::ToolResult;
use crate::models::{AnalyzedText, Category, Classification, WorkInput, WorkOutput};
use crate::notes::NoteStore;
use crate::tools::{CalendarTool, ContactTool, GanttTool, NotesTool};

pub struct WorkPipeline {
    analyzer: TextAnalyzer,
    classifier: ContentClassifier,
    pub calendar: CalendarTool,
    pub notes: NotesTool,
    pub gantt: GanttTool,
    pub contacts: ContactTool,
}

/// Run `sink` only when `enabled`; a skipped sink yields the empty value
async fn run_if<T, F>(enabled: bool, sink: F) -> ToolResult<T>
where
    T: Default,
    F: Future<Output = ToolResult<T>>,
{
    if enabled { sink.await } else { Ok(T::default()) }
}

/// Log a failed sink and fall back to its empty value
fn settle<T: Default>(sink: &str, result: ToolResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("[PIPELINE] {} sink failed: {}", sink, e);
            T::default()
        }
    }
}

impl WorkPipeline {
    pub fn new(db: Arc<Database>, store: Arc<NoteStore>) -> Self {
        Self {
            analyzer: TextAnalyzer::new(),
            classifier: ContentClassifier::new(),
            calendar: CalendarTool::new(db.clone()),
            notes: NotesTool::new(db.clone(), store),
            gantt: GanttTool::new(db.clone()),
            contacts: ContactTool::new(db),
        }
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// Analysis and classification only, nothing is written
    pub fn analyze(&self, input: &WorkInput) -> (AnalyzedText, Classification) {
        let reference = input.timestamp.unwrap_or_else(now_local);
        let analyzed = self.analyzer.analyze(&input.text, &input.user_id, reference);
        let classification = self.classifier.classify(&input.text);
        (analyzed, classification)
    }

    pub async fn process_work_input(&self, input: &WorkInput) -> WorkOutput {
        let (analyzed, classification) = self.analyze(input);
        let category = classification.category;

        log::info!(
            "[PIPELINE] user={} category={} confidence={:.2}",
            input.user_id,
            category,
            classification.confidence
        );

        let wants_calendar = matches!(category, Category::Schedule | Category::Meeting);
        let wants_notes = category == Category::Meeting;
        let wants_gantt = category == Category::WorkLog;
        let wants_contact = !analyzed.entities.persons.is_empty();

        let (calendar_events, obsidian_notes, gantt_tasks, contact_info) = join4(
            run_if(wants_calendar, self.calendar.create_events(&analyzed)),
            run_if(wants_notes, self.notes.create_notes(&analyzed)),
            run_if(wants_gantt, self.gantt.update_tasks(&analyzed)),
            run_if(wants_contact, self.contacts.extract_and_save_contact(&analyzed)),
        )
        .await;

        WorkOutput {
            category,
            confidence: classification.confidence,
            calendar_events: settle("calendar", calendar_events),
            obsidian_notes: settle("notes", obsidian_notes),
            gantt_tasks: settle("gantt", gantt_tasks),
            contact_info: settle("contacts", contact_info),
            original_text: analyzed.original_text,
            keywords: analyzed.keywords,
            entities: analyzed.entities,
            dates: analyzed.dates,
            times: analyzed.times,
            sentiment: analyzed.sentiment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn setup(dir: &tempfile::TempDir, notes_dir: &str) -> (Arc<Database>, WorkPipeline) {
        let db = Arc::new(Database::new(dir.path().join("test.db").to_str().unwrap()).unwrap());
        let store = Arc::new(
            NoteStore::new(dir.path().join(notes_dir), dir.path().join(".notes.db").to_str().unwrap())
                .unwrap(),
        );
        (db.clone(), WorkPipeline::new(db, store))
    }

    fn input(text: &str) -> WorkInput {
        WorkInput {
            text: text.to_string(),
            user_id: "u1".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_hms_opt(10, 0, 0),
        }
    }

    #[tokio::test]
    async fn test_meeting_goes_to_calendar_and_notes() {
        let dir = tempdir().unwrap();
        let (_db, pipeline) = setup(&dir, "notes");

        let output = pipeline
            .process_work_input(&input("내일 오후 2시에 팀 미팅이 있습니다"))
            .await;

        assert_eq!(output.category, Category::Meeting);
        assert_eq!(output.calendar_events.len(), 1);
        assert_eq!(output.obsidian_notes.len(), 1);
        assert!(output.gantt_tasks.is_empty());
        assert!(output.contact_info.is_none());
        assert_eq!(output.dates, vec!["내일"]);
    }

    #[tokio::test]
    async fn test_schedule_goes_to_calendar_only() {
        let dir = tempdir().unwrap();
        let (db, pipeline) = setup(&dir, "notes");

        let output = pipeline.process_work_input(&input("모레 오전 10시 치과 예약")).await;

        assert_eq!(output.category, Category::Schedule);
        assert_eq!(output.calendar_events.len(), 1);
        assert!(output.obsidian_notes.is_empty());
        assert_eq!(db.count_work_notes().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_work_log_updates_one_task() {
        let dir = tempdir().unwrap();
        let (db, pipeline) = setup(&dir, "notes");

        let first = pipeline.process_work_input(&input("API 개발 작업 진행")).await;
        assert_eq!(first.category, Category::WorkLog);
        assert_eq!(first.gantt_tasks.len(), 1);
        assert!(first.calendar_events.is_empty());

        pipeline.process_work_input(&input("API 개발 작업 진행")).await;
        assert_eq!(db.list_gantt_tasks().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_person_triggers_contact_sink() {
        let dir = tempdir().unwrap();
        let (_db, pipeline) = setup(&dir, "notes");

        let output = pipeline
            .process_work_input(&input("김철수님과 보고서 작업 완료, kim@ace.com"))
            .await;
        let contact = output.contact_info.unwrap();
        assert_eq!(contact.name, "김철수");
        assert_eq!(contact.emails, vec!["kim@ace.com"]);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_block_others() {
        let dir = tempdir().unwrap();
        // A plain file where the notes directory should be
        std::fs::write(dir.path().join("blocked"), "not a directory").unwrap();
        let (_db, pipeline) = setup(&dir, "blocked");

        let output = pipeline.process_work_input(&input("내일 10시 회의")).await;

        assert_eq!(output.category, Category::Meeting);
        assert!(output.obsidian_notes.is_empty());
        assert_eq!(output.calendar_events.len(), 1);
    }

    #[test]
    fn test_analyze_uses_given_reference() {
        let dir = tempdir().unwrap();
        let (_db, pipeline) = setup(&dir, "notes");

        let (analyzed, classification) = pipeline.analyze(&input("다음주 월요일 발표"));
        assert_eq!(analyzed.reference.to_string(), "2024-03-06 10:00:00");
        assert_eq!(classification.category, Category::Schedule);
    }
}

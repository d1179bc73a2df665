//! Calendar sink: one event per schedule/meeting note

use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::sync::Arc;

use crate::analysis::date_utils::{resolve_event_date, resolve_event_time};
use crate::db::Database;
use crate::error::ToolResult;
use crate::models::{AnalyzedText, CalendarEvent};

const SUMMARY_MAX_CHARS: usize = 128;
const EMAIL_KEYWORDS: [&str; 7] = ["메일", "이메일", "email", "mail", "보냈", "발송", "전송"];

pub struct CalendarTool {
    db: Arc<Database>,
}

impl CalendarTool {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create_events(&self, analyzed: &AnalyzedText) -> ToolResult<Vec<CalendarEvent>> {
        let (start, end) = event_window(analyzed);

        let (summary, description) = if is_email_related(&analyzed.original_text) {
            (email_summary(analyzed), email_description(analyzed))
        } else {
            (
                analyzed.original_text.chars().take(SUMMARY_MAX_CHARS).collect(),
                analyzed.original_text.clone(),
            )
        };

        let event = self.db.create_calendar_event(
            &summary,
            Some(description.as_str()),
            start,
            end,
            &analyzed.user_id,
        )?;
        log::info!("[CALENDAR] Created event {} at {}", event.id, event.start);

        Ok(vec![event])
    }
}

/// Start from the first date/time expression (seconds zeroed), one hour long
pub fn event_window(analyzed: &AnalyzedText) -> (NaiveDateTime, NaiveDateTime) {
    let date = resolve_event_date(&analyzed.dates, analyzed.reference);
    let (hour, minute) = resolve_event_time(&analyzed.times, analyzed.reference);
    let start = date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN));
    (start, start + Duration::hours(1))
}

fn is_email_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    EMAIL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn email_summary(analyzed: &AnalyzedText) -> String {
    match analyzed.entities.first_person() {
        Some(person) => format!("📧 {}님에게 업무 메일 발송", person),
        None => "📧 업무 메일 발송".to_string(),
    }
}

fn email_description(analyzed: &AnalyzedText) -> String {
    let mut description = format!("원본: {}\n\n", analyzed.original_text);

    if !analyzed.entities.persons.is_empty() {
        description.push_str(&format!("수신자: {}\n", analyzed.entities.persons.join(", ")));
    }
    if !analyzed.times.is_empty() {
        description.push_str(&format!("발송 시간: {}\n", analyzed.times.join(", ")));
    }
    if !analyzed.dates.is_empty() {
        description.push_str(&format!("발송 날짜: {}\n", analyzed.dates.join(", ")));
    }

    description.push_str("\n📧 이메일 발송 완료");
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TextAnalyzer;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn reference() -> NaiveDateTime {
        // Wednesday
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(10, 30, 45)
            .unwrap()
    }

    fn setup(dir: &tempfile::TempDir) -> (Arc<Database>, CalendarTool) {
        let db = Arc::new(Database::new(dir.path().join("test.db").to_str().unwrap()).unwrap());
        (db.clone(), CalendarTool::new(db))
    }

    fn analyze(text: &str) -> AnalyzedText {
        TextAnalyzer::new().analyze(text, "u1", reference())
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[tokio::test]
    async fn test_schedule_event_resolves_date_and_time() {
        let dir = tempdir().unwrap();
        let (db, tool) = setup(&dir);

        let events = tool.create_events(&analyze("내일 오후 2시에 치과 예약")).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, ts("2024-03-07T14:00:00"));
        assert_eq!(events[0].end, ts("2024-03-07T15:00:00"));
        assert_eq!(events[0].summary, "내일 오후 2시에 치과 예약");
        assert_eq!(events[0].user_id, "u1");
        assert_eq!(db.count_calendar_events().unwrap(), 1);
    }

    #[test]
    fn test_event_window_defaults_to_reference_clock() {
        let (start, end) = event_window(&analyze("치과 예약"));
        assert_eq!(start, ts("2024-03-06T10:30:00"));
        assert_eq!(end, ts("2024-03-06T11:30:00"));
    }

    #[test]
    fn test_event_window_next_week_weekday() {
        let (start, _) = event_window(&analyze("다음주 금요일 10시 30분 워크샵"));
        assert_eq!(start, ts("2024-03-15T10:30:00"));
    }

    #[tokio::test]
    async fn test_summary_is_truncated() {
        let dir = tempdir().unwrap();
        let (_db, tool) = setup(&dir);

        let text = "가".repeat(200);
        let events = tool.create_events(&analyze(&text)).await.unwrap();
        assert_eq!(events[0].summary.chars().count(), 128);
        assert_eq!(events[0].description.as_deref(), Some(text.as_str()));
    }

    #[tokio::test]
    async fn test_email_event() {
        let dir = tempdir().unwrap();
        let (_db, tool) = setup(&dir);

        let events = tool
            .create_events(&analyze("내일 오전 9시 김철수님에게 견적 메일 발송"))
            .await
            .unwrap();
        let event = &events[0];
        assert_eq!(event.summary, "📧 김철수님에게 업무 메일 발송");

        let description = event.description.as_deref().unwrap();
        assert!(description.starts_with("원본: 내일 오전 9시"));
        assert!(description.contains("수신자: 김철수"));
        assert!(description.contains("발송 날짜: 내일"));
        assert!(description.ends_with("📧 이메일 발송 완료"));
    }

    #[test]
    fn test_email_detection_is_case_insensitive() {
        assert!(is_email_related("Sent the EMAIL"));
        assert!(!is_email_related("점심 약속"));
    }
}

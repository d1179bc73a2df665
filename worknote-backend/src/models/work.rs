//! Request/response records of the work-input pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::{CalendarEvent, Contact, GanttTask, WorkNote};

/// Category assigned to a work note
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Schedule,
    WorkLog,
    Meeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Named entities found in the text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
}

impl Entities {
    pub fn count(&self) -> usize {
        self.persons.len() + self.organizations.len() + self.locations.len() + self.misc.len()
    }

    pub fn first_person(&self) -> Option<&str> {
        self.persons.first().map(|s| s.as_str())
    }
}

/// Everything the text analyzer extracted from one input
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedText {
    pub original_text: String,
    pub user_id: String,
    /// Reference instant used for relative dates ("내일", "다음주")
    pub reference: NaiveDateTime,
    pub dates: Vec<String>,
    pub times: Vec<String>,
    pub entities: Entities,
    pub tasks: Vec<String>,
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    pub processed_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub text_length: usize,
    pub word_count: usize,
    pub has_dates: bool,
    pub has_times: bool,
    pub entity_count: usize,
    pub keyword_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// A keyword rule matched
    Rule,
    /// No rule matched; the naive-Bayes fallback decided
    Bayes,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Classification {
    pub category: Category,
    pub confidence: f32,
    pub source: ClassificationSource,
}

fn default_user_id() -> String {
    "default".to_string()
}

/// Body of POST /process_work_input
#[derive(Debug, Clone, Deserialize)]
pub struct WorkInput {
    pub text: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Reference time for relative dates; the server clock when omitted
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

/// Response of POST /process_work_input
#[derive(Debug, Clone, Serialize)]
pub struct WorkOutput {
    pub category: Category,
    pub confidence: f32,
    pub original_text: String,
    pub keywords: Vec<String>,
    pub entities: Entities,
    pub dates: Vec<String>,
    pub times: Vec<String>,
    pub sentiment: Sentiment,
    pub calendar_events: Vec<CalendarEvent>,
    pub obsidian_notes: Vec<WorkNote>,
    pub gantt_tasks: Vec<GanttTask>,
    pub contact_info: Option<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_strings() {
        assert_eq!("work_log".parse::<Category>().unwrap(), Category::WorkLog);
        assert_eq!(Category::Meeting.as_ref(), "meeting");
        assert_eq!(Category::WorkLog.to_string(), "work_log");
        assert_eq!(format!("{}", Category::Schedule), "schedule");
        assert_eq!(
            serde_json::to_string(&Category::Schedule).unwrap(),
            "\"schedule\""
        );
        assert!("general".parse::<Category>().is_err());
    }

    #[test]
    fn test_work_input_defaults() {
        let input: WorkInput = serde_json::from_str(r#"{"text": "내일 회의"}"#).unwrap();
        assert_eq!(input.user_id, "default");
        assert!(input.timestamp.is_none());

        let input: WorkInput = serde_json::from_str(
            r#"{"text": "x", "user_id": "kim", "timestamp": "2024-03-04T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(input.user_id, "kim");
        assert_eq!(input.timestamp.unwrap().to_string(), "2024-03-04 10:00:00");
    }
}

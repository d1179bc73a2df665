use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Contact card. E-mails and phones are stored comma-joined in SQLite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: String,
}

/// Contact fields extracted from text, before insertion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub user_id: String,
}

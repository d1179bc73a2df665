//! Contact sink: saves a contact card for the first person named in a note

use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::db::Database;
use crate::error::ToolResult;
use crate::models::{AnalyzedText, Contact, NewContact};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\d{2,3}-\d{3,4}-\d{4}", r"\d{10,11}"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});
static COMPANY_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["회사", "기업", "corporation", "inc", "ltd", "co"]
        .iter()
        .map(|suffix| Regex::new(&format!(r"(?i)([가-힣A-Za-z0-9]+{})", suffix)).unwrap())
        .collect()
});
static POSITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(대표|팀장|부장|과장|사원|매니저|director|manager)").unwrap());

pub struct ContactTool {
    db: Arc<Database>,
}

impl ContactTool {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Save a contact for the first extracted person. A stored contact with
    /// the same name that already holds every extracted e-mail is returned
    /// as-is instead of inserting a duplicate.
    pub async fn extract_and_save_contact(&self, analyzed: &AnalyzedText) -> ToolResult<Option<Contact>> {
        let Some(name) = analyzed.entities.first_person() else {
            return Ok(None);
        };

        let mut contact = extract_contact_info(&analyzed.original_text, name);
        contact.user_id = analyzed.user_id.clone();

        let (saved, created) = self.db.find_or_create_contact(&contact)?;
        if created {
            log::info!("[CONTACTS] Saved contact {} (id {})", saved.name, saved.id);
        } else {
            log::debug!("[CONTACTS] {} already known (id {})", saved.name, saved.id);
        }
        Ok(Some(saved))
    }

    pub fn list_contacts(&self) -> ToolResult<Vec<Contact>> {
        Ok(self.db.list_contacts()?)
    }

    pub fn search_contacts(&self, query: &str) -> ToolResult<Vec<Contact>> {
        Ok(self.db.search_contacts(query)?)
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// Pull e-mails, phone numbers, company and position out of free text
pub fn extract_contact_info(text: &str, name: &str) -> NewContact {
    let mut emails = Vec::new();
    for m in EMAIL_RE.find_iter(text) {
        push_unique(&mut emails, m.as_str());
    }

    // Addresses would otherwise feed digits and domains to the patterns below
    let scrubbed = EMAIL_RE.replace_all(text, " ");

    let mut phones = Vec::new();
    for re in PHONE_RES.iter() {
        for m in re.find_iter(&scrubbed) {
            push_unique(&mut phones, m.as_str());
        }
    }

    let company = COMPANY_RES
        .iter()
        .find_map(|re| re.captures(&scrubbed).map(|caps| caps[1].to_string()));
    let position = POSITION_RE.captures(&scrubbed).map(|caps| caps[1].to_string());

    NewContact {
        name: name.to_string(),
        emails,
        phones,
        company,
        position,
        department: None,
        notes: Some(format!("자동 추출: {}", text)),
        user_id: "default".to_string(),
    }
}

//! Contact database operations

use rusqlite::{params, Connection, Result as SqliteResult};

use crate::db::sqlite::{format_timestamp, now_local, parse_timestamp};
use crate::models::{Contact, NewContact};
use super::super::Database;

const SELECT_COLUMNS: &str = "SELECT id, name, emails, phones, company, position, department, notes,
     created_at, updated_at, user_id FROM contact";

fn join_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(","))
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

impl Database {
    /// Return the contact with this name that already holds every extracted
    /// e-mail, or insert a new one. Lookup and insert share one lock so two
    /// identical concurrent requests cannot both insert. The flag is true when
    /// a row was created.
    pub fn find_or_create_contact(&self, contact: &NewContact) -> SqliteResult<(Contact, bool)> {
        let conn = self.conn.lock().unwrap();

        if let Some(existing) = Self::find_contact_in(&conn, &contact.name, &contact.emails)? {
            return Ok((existing, false));
        }
        Ok((Self::insert_contact(&conn, contact)?, true))
    }

    fn insert_contact(conn: &Connection, contact: &NewContact) -> SqliteResult<Contact> {
        let now = now_local();
        let now_str = format_timestamp(&now);

        conn.execute(
            "INSERT INTO contact (name, emails, phones, company, position, department, notes, created_at, updated_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, ?9)",
            params![
                contact.name,
                join_list(&contact.emails),
                join_list(&contact.phones),
                contact.company,
                contact.position,
                contact.department,
                contact.notes,
                &now_str,
                contact.user_id,
            ],
        )?;

        Ok(Contact {
            id: conn.last_insert_rowid(),
            name: contact.name.clone(),
            emails: contact.emails.clone(),
            phones: contact.phones.clone(),
            company: contact.company.clone(),
            position: contact.position.clone(),
            department: contact.department.clone(),
            notes: contact.notes.clone(),
            created_at: now,
            updated_at: now,
            user_id: contact.user_id.clone(),
        })
    }

    /// First contact with this name whose stored e-mails contain every given address
    fn find_contact_in(conn: &Connection, name: &str, emails: &[String]) -> SqliteResult<Option<Contact>> {
        let mut stmt = conn.prepare(&format!("{} WHERE name = ?1 ORDER BY id", SELECT_COLUMNS))?;
        let candidates = stmt
            .query_map([name], |row| Self::row_to_contact(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(candidates
            .into_iter()
            .find(|c| emails.iter().all(|e| c.emails.iter().any(|stored| stored == e))))
    }

    /// List all contacts ordered by name
    pub fn list_contacts(&self) -> SqliteResult<Vec<Contact>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{} ORDER BY name, id", SELECT_COLUMNS))?;
        let contacts = stmt
            .query_map([], |row| Self::row_to_contact(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(contacts)
    }

    /// Substring search over name, e-mails and company
    pub fn search_contacts(&self, query: &str) -> SqliteResult<Vec<Contact>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE instr(name, ?1) > 0
                OR instr(IFNULL(emails, ''), ?1) > 0
                OR instr(IFNULL(company, ''), ?1) > 0
             ORDER BY name, id",
            SELECT_COLUMNS
        ))?;
        let contacts = stmt
            .query_map([query], |row| Self::row_to_contact(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(contacts)
    }

    pub fn count_contacts(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM contact", [], |row| row.get(0))
    }

    fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
        let created_at: String = row.get(8)?;
        let updated_at: String = row.get(9)?;

        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            emails: split_list(row.get(2)?),
            phones: split_list(row.get(3)?),
            company: row.get(4)?,
            position: row.get(5)?,
            department: row.get(6)?,
            notes: row.get(7)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
            user_id: row.get(10)?,
        })
    }
}

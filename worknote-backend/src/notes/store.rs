//! NoteStore: FTS5-indexed note storage
//!
//! Manages a separate `.notes.db` SQLite database with an FTS5 virtual table
//! indexing file_path, title, tags, and content for full-text search.

use super::{file_ops, frontmatter};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Search result from the note store
#[derive(Debug, Clone, Serialize)]
pub struct NoteSearchResult {
    pub file_path: String,
    pub title: String,
    pub tags: String,
    pub snippet: String,
    pub score: f64,
}

/// NoteStore wrapping SQLite FTS5 for markdown note indexing
pub struct NoteStore {
    notes_dir: PathBuf,
    conn: Mutex<Connection>,
}

impl NoteStore {
    /// Create a new note store, initializing the FTS5 table and performing initial reindex
    pub fn new(notes_dir: PathBuf, db_path: &str) -> SqliteResult<Self> {
        std::fs::create_dir_all(&notes_dir).ok();

        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
                file_path,
                title,
                tags,
                content,
                tokenize='porter'
            )",
            [],
        )?;

        let store = Self {
            notes_dir,
            conn: Mutex::new(conn),
        };

        store.reindex()?;

        Ok(store)
    }

    pub fn notes_dir(&self) -> &PathBuf {
        &self.notes_dir
    }

    /// Reindex all markdown files in the notes directory
    pub fn reindex(&self) -> SqliteResult<usize> {
        let conn = self.conn.lock().unwrap();

        conn.execute("DELETE FROM notes_fts", [])?;

        let files = file_ops::list_notes(&self.notes_dir).unwrap_or_default();

        let mut count = 0;
        for file_path in files {
            if Self::insert_file(&conn, &self.notes_dir, &file_path)? {
                count += 1;
            }
        }

        log::info!("[NOTES] Indexed {} note files", count);
        Ok(count)
    }

    /// Full-text search across notes. Each query word also matches as a prefix,
    /// so "회의" finds "회의에서".
    pub fn search(&self, query: &str, limit: i32) -> SqliteResult<Vec<NoteSearchResult>> {
        let conn = self.conn.lock().unwrap();

        let escaped_query = escape_fts5_query(query);
        if escaped_query.is_empty() {
            return Ok(vec![]);
        }

        let mut stmt = conn.prepare(
            "SELECT file_path, title, tags,
                    snippet(notes_fts, 3, '>>>', '<<<', '...', 64) as snippet,
                    bm25(notes_fts) as score
             FROM notes_fts
             WHERE notes_fts MATCH ?1
             ORDER BY score
             LIMIT ?2",
        )?;

        let results = stmt
            .query_map(params![escaped_query, limit], |row| {
                Ok(NoteSearchResult {
                    file_path: row.get(0)?,
                    title: row.get(1)?,
                    tags: row.get(2)?,
                    snippet: row.get(3)?,
                    score: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(results)
    }

    /// All unique tags across all notes, most used first
    pub fn list_tags(&self) -> SqliteResult<Vec<(String, usize)>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare("SELECT tags FROM notes_fts WHERE tags != ''")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tag_counts: HashMap<String, usize> = HashMap::new();
        for tags_str in rows.flatten() {
            for tag in tags_str.split(',') {
                let tag = tag.trim().to_lowercase();
                if !tag.is_empty() {
                    *tag_counts.entry(tag).or_insert(0) += 1;
                }
            }
        }

        let mut tags: Vec<(String, usize)> = tag_counts.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(tags)
    }

    /// Write a new note with generated frontmatter and index it. An existing
    /// file is never overwritten; a colliding title gets a timestamped name.
    /// Returns the path relative to the notes directory.
    pub fn create_note(
        &self,
        title: &str,
        body: &str,
        tags: &[String],
        note_type: &str,
        subdir: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<String, String> {
        let slug = file_ops::slugify(title);
        let rel_path = file_ops::unique_note_path(&self.notes_dir, subdir, &slug, created_at);
        let full_path = self.notes_dir.join(&rel_path);

        let date = created_at.format("%Y-%m-%dT%H:%M:%S").to_string();
        let fm = frontmatter::generate_frontmatter(title, tags, note_type, &date);
        let full_content = format!("{}\n\n{}\n", fm, body.trim_end());

        file_ops::write_new_note(&full_path, &full_content)
            .map_err(|e| format!("Failed to write note {}: {}", rel_path, e))?;

        if let Err(e) = self.index_file(&full_path) {
            log::warn!("[NOTES] Failed to index {}: {}", rel_path, e);
        }

        log::info!("[NOTES] Created note {}", rel_path);
        Ok(rel_path)
    }

    /// Index or update a single file in the FTS index
    fn index_file(&self, file_path: &Path) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        if let Some(rel_path) = file_ops::relative_path(&self.notes_dir, file_path) {
            conn.execute("DELETE FROM notes_fts WHERE file_path = ?1", params![rel_path])?;
        }
        Self::insert_file(&conn, &self.notes_dir, file_path)?;

        Ok(())
    }

    /// Insert one file's parsed content; returns false for unreadable/empty files
    fn insert_file(conn: &Connection, notes_dir: &Path, file_path: &Path) -> SqliteResult<bool> {
        let Some(rel_path) = file_ops::relative_path(notes_dir, file_path) else {
            return Ok(false);
        };
        let content = match file_ops::read_note(file_path) {
            Ok(content) if !content.is_empty() => content,
            _ => return Ok(false),
        };

        let parsed = frontmatter::parse_note(&content);
        let title = if parsed.frontmatter.title.is_empty() {
            // Fall back to filename without extension
            file_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        } else {
            parsed.frontmatter.title.clone()
        };
        let tags = parsed.all_tags.join(", ");

        conn.execute(
            "INSERT INTO notes_fts (file_path, title, tags, content) VALUES (?1, ?2, ?3, ?4)",
            params![rel_path, title, tags, parsed.body],
        )?;
        Ok(true)
    }
}

/// Quote every word and mark it as a prefix term, OR-ed together
fn escape_fts5_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|word| format!("\"{}\"*", word.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" OR ")
}

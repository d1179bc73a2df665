//! File operations for the notes directory
//!
//! Reading/writing markdown note files, slugification, and collision-free paths.

use chrono::NaiveDateTime;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Slug used when a title has no alphanumeric characters
const FALLBACK_SLUG: &str = "note";

/// Slugify a title for use as a filename (e.g. "Weekly Sync 회의" -> "weekly-sync-회의")
pub fn slugify(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-");

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Pick a relative path for a new note that does not exist yet. A taken
/// `slug.md` becomes `slug-YYYYMMDD-HHMMSS.md`, then `...-2.md` and so on.
pub fn unique_note_path(notes_dir: &Path, subdir: Option<&str>, slug: &str, now: NaiveDateTime) -> String {
    let with_dir = |filename: String| match subdir {
        Some(dir) => format!("{}/{}", dir, filename),
        None => filename,
    };

    let plain = with_dir(format!("{}.md", slug));
    if !notes_dir.join(&plain).exists() {
        return plain;
    }

    let stamped_slug = format!("{}-{}", slug, now.format("%Y%m%d-%H%M%S"));
    let stamped = with_dir(format!("{}.md", stamped_slug));
    if !notes_dir.join(&stamped).exists() {
        return stamped;
    }

    let mut n = 2;
    loop {
        let candidate = with_dir(format!("{}-{}.md", stamped_slug, n));
        if !notes_dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Write a note file (creates parent directories as needed). Fails if the file exists.
pub fn write_new_note(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Read a note file, returning empty string if not found
pub fn read_note(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

/// List all markdown files in the notes directory (recursively)
pub fn list_notes(notes_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !notes_dir.exists() {
        return Ok(files);
    }

    fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            // Skip hidden files/dirs (like .notes.db)
            if path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
            {
                continue;
            }
            if path.is_dir() {
                visit_dir(&path, files)?;
            } else if path.extension().map(|e| e == "md").unwrap_or(false) {
                files.push(path);
            }
        }
        Ok(())
    }

    visit_dir(notes_dir, &mut files)?;
    Ok(files)
}

/// Get relative path from notes_dir for a file
pub fn relative_path(notes_dir: &Path, file_path: &Path) -> Option<String> {
    file_path
        .strip_prefix(notes_dir)
        .ok()
        .map(|p| p.to_string_lossy().to_string())
}

//! Parse and generate YAML frontmatter for notes.
//!
//! Hand-rolled YAML (no serde_yaml). Also extracts #tags from body content.

use regex::Regex;
use std::sync::LazyLock;

/// Parsed note frontmatter
#[derive(Debug, Clone, Default)]
pub struct NoteFrontmatter {
    pub title: String,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub note_type: String, // meeting, work_log, schedule, general
}

/// A fully parsed note (frontmatter + body)
#[derive(Debug, Clone)]
pub struct ParsedNote {
    pub frontmatter: NoteFrontmatter,
    pub body: String,
    /// #tags extracted from body (merged with frontmatter tags, deduplicated)
    pub all_tags: Vec<String>,
}

// Letters of any script, so Hangul tags work too
static INLINE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#(\p{L}[\p{L}\p{N}_-]*)").unwrap());

/// Parse a complete note file (frontmatter + body)
pub fn parse_note(content: &str) -> ParsedNote {
    let (frontmatter, body) = split_frontmatter(content);
    let fm = parse_frontmatter(&frontmatter);

    let mut all_tags = fm.tags.clone();
    for tag in extract_inline_tags(&body) {
        let lower = tag.to_lowercase();
        if !all_tags.iter().any(|t| t.to_lowercase() == lower) {
            all_tags.push(tag);
        }
    }

    ParsedNote {
        frontmatter: fm,
        body,
        all_tags,
    }
}

/// Split content into (frontmatter_yaml, body). Returns empty frontmatter if none found.
fn split_frontmatter(content: &str) -> (String, String) {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("---") {
        return (String::new(), content.to_string());
    }

    let after_open = &trimmed[3..];
    if let Some(close_idx) = after_open.find("\n---") {
        let yaml = after_open[..close_idx].trim().to_string();
        let body_start = close_idx + 4; // skip \n---
        let body = if body_start < after_open.len() {
            after_open[body_start..].trim_start_matches('\n').to_string()
        } else {
            String::new()
        };
        (yaml, body)
    } else {
        (String::new(), content.to_string())
    }
}

fn parse_frontmatter(yaml: &str) -> NoteFrontmatter {
    let mut fm = NoteFrontmatter {
        note_type: "general".to_string(),
        ..Default::default()
    };

    for line in yaml.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once(':') {
            let value = value.trim();
            match key.trim() {
                "title" => fm.title = unescape(&unquote(value)),
                "date" => fm.date = Some(unquote(value)),
                "type" => fm.note_type = unquote(value),
                "tags" if value.starts_with('[') => fm.tags = parse_inline_list(value),
                _ => {}
            }
        }
    }

    fm
}

/// Generate YAML frontmatter string from parts
pub fn generate_frontmatter(title: &str, tags: &[String], note_type: &str, date: &str) -> String {
    let mut lines = Vec::new();
    lines.push("---".to_string());
    lines.push(format!("title: \"{}\"", title.replace('"', "\\\"")));
    lines.push(format!("date: {}", date));
    lines.push(format!("tags: [{}]", tags.join(", ")));
    lines.push(format!("type: {}", note_type));
    lines.push("---".to_string());

    lines.join("\n")
}

/// Extract #inline-tags from text
pub fn extract_inline_tags(text: &str) -> Vec<String> {
    INLINE_TAG_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Remove surrounding quotes from a string
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"")
}

/// Parse an inline YAML list like [foo, bar, "baz qux"]
fn parse_inline_list(s: &str) -> Vec<String> {
    let s = s.trim();
    let inner = if s.starts_with('[') && s.ends_with(']') {
        &s[1..s.len() - 1]
    } else {
        s
    };

    inner
        .split(',')
        .map(|item| unquote(item.trim()))
        .filter(|item| !item.is_empty())
        .collect()
}

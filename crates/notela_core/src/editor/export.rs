//! Markdown export naming.

use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+(.*)$").expect("valid heading line regex"));

/// File produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

/// Text of the first heading line in `content`, if any.
pub fn first_heading(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        HEADING_LINE_RE
            .captures(line.trim_end())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|title| !title.is_empty())
    })
}

/// Lowercases, keeps ASCII letters, digits, spaces and hyphens, then joins
/// whitespace runs with `-`.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace() || *ch == '-')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Export filename for `content` using the current local time as fallback.
pub fn export_filename(content: &str) -> String {
    export_filename_at(content, Local::now().naive_local())
}

/// Export filename with an explicit fallback timestamp.
///
/// Uses the slug of the first heading; falls back to
/// `note-<YYYY-MM-DDTHH-MM-SS>.md` when there is none or it slugs to empty.
pub fn export_filename_at(content: &str, now: NaiveDateTime) -> String {
    match first_heading(content).map(slugify) {
        Some(slug) if !slug.is_empty() => format!("{slug}.md"),
        _ => format!("note-{}.md", now.format("%Y-%m-%dT%H-%M-%S")),
    }
}

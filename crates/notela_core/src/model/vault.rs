//! Vault file model.
//!
//! The vault is a directory of markdown files gated by an access check. Files
//! are not stored in SQLite; these types describe what the vault store
//! returns.

use serde::{Deserialize, Serialize};

/// Extension of files listed by the vault.
pub const VAULT_FILE_EXTENSION: &str = ".md";

const PREVIEW_CHARS: usize = 200;

/// Listing entry for one vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultFileSummary {
    pub filename: String,
    pub title: String,
    /// Epoch milliseconds of the last modification.
    pub last_modified: i64,
    /// Size in bytes.
    pub size: u64,
    pub preview: String,
}

/// Full content of one vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDocument {
    pub filename: String,
    pub content: String,
}

/// Filename without the `.md` extension.
pub fn filename_stem(filename: &str) -> &str {
    filename
        .strip_suffix(VAULT_FILE_EXTENSION)
        .unwrap_or(filename)
}

/// Derives a display title for a vault file.
///
/// Uses the first line with its leading `#` run stripped when that line
/// starts with `#`; otherwise, or when the stripped title is empty, the
/// filename stem.
pub fn derive_vault_title(filename: &str, content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.starts_with('#') {
        let title = first_line.trim_start_matches('#').trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }
    filename_stem(filename).to_string()
}

/// First 200 characters of `content`, with `...` appended when truncated.
pub fn derive_vault_preview(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().nth(PREVIEW_CHARS).is_some() {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::{derive_vault_preview, derive_vault_title, filename_stem};

    #[test]
    fn title_comes_from_heading_first_line() {
        assert_eq!(derive_vault_title("a.md", "## Groceries\n- milk"), "Groceries");
    }

    #[test]
    fn title_falls_back_to_filename_stem() {
        assert_eq!(derive_vault_title("ideas.md", "plain first line"), "ideas");
        assert_eq!(derive_vault_title("empty.md", "#   \nbody"), "empty");
        assert_eq!(derive_vault_title("none.md", ""), "none");
        assert_eq!(filename_stem("README"), "README");
    }

    #[test]
    fn preview_truncates_at_200_chars() {
        let short = "short body";
        assert_eq!(derive_vault_preview(short), short);

        let long = "é".repeat(250);
        let preview = derive_vault_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 203);

        let exact = "x".repeat(200);
        assert_eq!(derive_vault_preview(&exact), exact);
    }
}

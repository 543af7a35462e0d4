//! Paste interception for image URLs.

use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://.*\.(jpg|jpeg|png|gif|webp|svg|bmp|ico)(\?.*)?$")
        .expect("valid image url regex")
});

/// Result of offering pasted text to the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Pasted text was rewritten and inserted; `caret` follows the insertion.
    Intercepted { inserted: String, caret: usize },
    /// Not an image URL; the host performs its default paste.
    PassThrough,
}

/// Markdown image embed for a pasted image URL, if it is one.
///
/// Surrounding whitespace is ignored. The alt text is the last path segment
/// without its extension.
pub fn image_markdown_for_paste(pasted: &str) -> Option<String> {
    let url = pasted.trim();
    if !IMAGE_URL_RE.is_match(url) {
        return None;
    }
    Some(format!("![{}]({url})", image_stem(url)))
}

fn image_stem(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment
        .rsplit_once('.')
        .map_or(segment, |(stem, _)| stem)
}

//! Path routing and URL decoding.

/// Matched API route. Path parameters are percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Notes,
    NoteSearch,
    Note(String),
    Tasks,
    Task(String),
    TaskToggle(String),
    Tags,
    Status,
    Vault,
    VaultFile(String),
}

impl Route {
    /// Matches `path` (without query). A trailing `/` is ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let rest = trimmed.strip_prefix("/api/")?;
        let segments: Vec<&str> = rest.split('/').collect();

        let route = match segments.as_slice() {
            ["notes"] => Self::Notes,
            ["notes", "search"] => Self::NoteSearch,
            ["notes", id] => Self::Note(percent_decode(id)),
            ["tasks"] => Self::Tasks,
            ["tasks", id] => Self::Task(percent_decode(id)),
            ["tasks", id, "toggle"] => Self::TaskToggle(percent_decode(id)),
            ["tags"] => Self::Tags,
            ["status"] => Self::Status,
            ["vault"] => Self::Vault,
            ["vault", filename] => Self::VaultFile(percent_decode(filename)),
            _ => return None,
        };
        Some(route)
    }
}

/// Parses `a=1&b=two%20words`. `+` decodes to a space.
pub(crate) fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Decodes `%XX` escapes. Malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
pub fn percent_decode(input: &str) -> String {
    percent_encoding::percent_decode_str(input)
        .decode_utf8_lossy()
        .into_owned()
}

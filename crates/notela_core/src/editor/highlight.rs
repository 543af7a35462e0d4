//! Markdown highlighting transform.
//!
//! # Responsibility
//! - Turn raw markdown into styled lines for the editor overlay.
//! - Render styled lines as `<span class="md-…">` markup.
//!
//! # Invariants
//! - Pure and deterministic; never fails. Malformed markdown stays literal.
//! - One output line per input line. A trailing `\r` is carried through.
//! - A matched block rule owns its whole line; inline rules never run on it.
//! - Inline matching takes the leftmost match across the rule table; ties go
//!   to the earlier rule and matched text is never re-scanned.
//! - `&`, `<` and `>` from the source are always entity-escaped in markup.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Line-level style owning a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Level 1..=6.
    Heading(u8),
    HorizontalRule,
    Blockquote,
    TaskItem { done: bool },
    UnorderedItem,
    OrderedItem,
}

impl BlockStyle {
    pub fn class(self) -> Cow<'static, str> {
        match self {
            Self::Heading(level) => Cow::Owned(format!("md-h{level}")),
            Self::HorizontalRule => Cow::Borrowed("md-hr"),
            Self::Blockquote => Cow::Borrowed("md-quote"),
            Self::TaskItem { done: false } => Cow::Borrowed("md-task"),
            Self::TaskItem { done: true } => Cow::Borrowed("md-task md-task-done"),
            Self::UnorderedItem => Cow::Borrowed("md-ul"),
            Self::OrderedItem => Cow::Borrowed("md-ol"),
        }
    }
}

/// Style of one inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineStyle {
    /// `![alt](src)`. Visible text stays the literal markdown.
    Image { alt: String, src: String },
    FenceMarker,
    Code,
    Bold,
    Italic,
    Strikethrough,
    Link,
    Url,
    Mention,
    Hashtag,
}

impl InlineStyle {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Image { .. } => "md-image",
            Self::FenceMarker => "md-fence",
            Self::Code => "md-code",
            Self::Bold => "md-bold",
            Self::Italic => "md-italic",
            Self::Strikethrough => "md-strike",
            Self::Link => "md-link",
            Self::Url => "md-url",
            Self::Mention => "md-mention",
            Self::Hashtag => "md-hashtag",
        }
    }
}

/// Run of source text with an optional inline style. `text` is unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Option<InlineStyle>,
}

impl Span {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: None,
        }
    }

    fn styled(text: &str, style: InlineStyle) -> Self {
        Self {
            text: text.to_string(),
            style: Some(style),
        }
    }
}

/// Highlighted form of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub block: Option<BlockStyle>,
    /// Empty for an empty line. Block lines carry one unstyled span.
    pub spans: Vec<Span>,
    /// Source line ended with `\r` (CRLF input).
    pub carriage_return: bool,
}

impl StyledLine {
    /// Source text of the line without the line terminator.
    pub fn source_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Renders the line as overlay markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        match self.block {
            Some(block) => {
                out.push_str("<span class=\"");
                out.push_str(&block.class());
                out.push_str("\">");
                out.push_str(&escape_html(&self.source_text()));
                out.push_str("</span>");
            }
            None => {
                for span in &self.spans {
                    push_span_markup(&mut out, span);
                }
            }
        }
        if self.carriage_return {
            out.push('\r');
        }
        out
    }
}

/// Label shown by the overlay when an image fails to load.
pub fn image_fallback_label(alt: &str) -> String {
    if alt.trim().is_empty() {
        "[image unavailable]".to_string()
    } else {
        format!("[image unavailable: {alt}]")
    }
}

/// Escapes `&`, `<` and `>`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

fn push_span_markup(out: &mut String, span: &Span) {
    let Some(style) = span.style.as_ref() else {
        out.push_str(&escape_html(&span.text));
        return;
    };

    out.push_str("<span class=\"");
    out.push_str(style.class());
    out.push('"');
    if let InlineStyle::Image { alt, src } = style {
        out.push_str(&format!(
            " data-src=\"{}\" data-alt=\"{}\" data-fallback=\"{}\"",
            escape_attr(src),
            escape_attr(alt),
            escape_attr(&image_fallback_label(alt))
        ));
    }
    out.push('>');
    out.push_str(&escape_html(&span.text));
    out.push_str("</span>");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading,
    HorizontalRule,
    Blockquote,
    TaskItem,
    UnorderedItem,
    OrderedItem,
}

struct BlockRule {
    kind: BlockKind,
    pattern: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineKind {
    Image,
    FenceMarker,
    Code,
    BoldStar,
    BoldUnderscore,
    ItalicStar,
    ItalicUnderscore,
    Strikethrough,
    Link,
    Url,
    Mention,
    Hashtag,
}

/// Extra context a match must satisfy beyond the regex itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    None,
    /// Preceding char must not be a word char.
    Start,
    /// Neither neighbour may be a word char.
    Both,
}

struct InlineRule {
    kind: InlineKind,
    pattern: Regex,
    boundary: Boundary,
}

fn rule_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid highlight rule regex")
}

/// Block rules in priority order.
static BLOCK_RULES: Lazy<Vec<BlockRule>> = Lazy::new(|| {
    vec![
        BlockRule {
            kind: BlockKind::Heading,
            pattern: rule_regex(r"^(#{1,6})\s"),
        },
        BlockRule {
            kind: BlockKind::HorizontalRule,
            pattern: rule_regex(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$"),
        },
        BlockRule {
            kind: BlockKind::Blockquote,
            pattern: rule_regex(r"^>\s"),
        },
        BlockRule {
            kind: BlockKind::TaskItem,
            pattern: rule_regex(r"^\s*[-*+]\s+\[([ xX])\](?:\s|$)"),
        },
        BlockRule {
            kind: BlockKind::UnorderedItem,
            pattern: rule_regex(r"^\s*[-*+]\s"),
        },
        BlockRule {
            kind: BlockKind::OrderedItem,
            pattern: rule_regex(r"^\s*\d+\.\s"),
        },
    ]
});

/// Inline rules in precedence order.
static INLINE_RULES: Lazy<Vec<InlineRule>> = Lazy::new(|| {
    let rule = |kind, pattern, boundary| InlineRule {
        kind,
        pattern: rule_regex(pattern),
        boundary,
    };
    vec![
        rule(InlineKind::Image, r"!\[([^\]]*)\]\(([^)\s]+)\)", Boundary::None),
        rule(InlineKind::FenceMarker, r"`{3,}[\w+-]*", Boundary::None),
        rule(InlineKind::Code, r"`[^`]+`", Boundary::None),
        rule(InlineKind::BoldStar, r"\*\*[^*]+?\*\*", Boundary::None),
        rule(InlineKind::BoldUnderscore, r"__[^_]+?__", Boundary::Both),
        rule(InlineKind::ItalicStar, r"\*[^*]+\*", Boundary::None),
        rule(InlineKind::ItalicUnderscore, r"_[^_]+_", Boundary::Both),
        rule(InlineKind::Strikethrough, r"~~[^~]+?~~", Boundary::None),
        rule(InlineKind::Link, r"\[[^\]]*\]\([^)]*\)", Boundary::None),
        rule(InlineKind::Url, r"https?://[^\s<>]+", Boundary::None),
        rule(InlineKind::Mention, r"@\w+", Boundary::Start),
        rule(InlineKind::Hashtag, r"#\w+", Boundary::Start),
    ]
});

/// Highlights `text` into overlay markup.
///
/// Lines are joined with `\n`; CRLF input keeps its `\r`.
pub fn highlight(text: &str) -> String {
    highlight_lines(text)
        .iter()
        .map(StyledLine::to_markup)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highlights `text` into structured lines.
///
/// Empty input yields no lines.
pub fn highlight_lines(text: &str) -> Vec<StyledLine> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(highlight_line).collect()
}

/// Highlights one line. A trailing `\r` is split off first.
pub fn highlight_line(raw: &str) -> StyledLine {
    let (line, carriage_return) = match raw.strip_suffix('\r') {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };

    if line.is_empty() {
        return StyledLine {
            block: None,
            spans: Vec::new(),
            carriage_return,
        };
    }

    if let Some(block) = classify_block(line) {
        return StyledLine {
            block: Some(block),
            spans: vec![Span::plain(line)],
            carriage_return,
        };
    }

    StyledLine {
        block: None,
        spans: tokenize_inline(line),
        carriage_return,
    }
}

fn classify_block(line: &str) -> Option<BlockStyle> {
    BLOCK_RULES.iter().find_map(|rule| {
        let caps = rule.pattern.captures(line)?;
        let style = match rule.kind {
            BlockKind::Heading => {
                let level = caps.get(1).map_or(1, |m| m.as_str().len());
                BlockStyle::Heading(level as u8)
            }
            BlockKind::HorizontalRule => BlockStyle::HorizontalRule,
            BlockKind::Blockquote => BlockStyle::Blockquote,
            BlockKind::TaskItem => BlockStyle::TaskItem {
                done: caps.get(1).is_some_and(|m| m.as_str() != " "),
            },
            BlockKind::UnorderedItem => BlockStyle::UnorderedItem,
            BlockKind::OrderedItem => BlockStyle::OrderedItem,
        };
        Some(style)
    })
}

fn tokenize_inline(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let next = INLINE_RULES
            .iter()
            .filter_map(|rule| find_rule_match(rule, line, pos).map(|(start, end)| (start, end, rule)))
            // `min_by_key` keeps the first minimum, so ties go to the earlier rule.
            .min_by_key(|(start, _, _)| *start);

        let Some((start, end, rule)) = next else {
            break;
        };

        if start > pos {
            spans.push(Span::plain(&line[pos..start]));
        }
        let matched = &line[start..end];
        spans.push(Span::styled(matched, inline_style(rule, matched)));
        pos = end;
    }

    if pos < line.len() {
        spans.push(Span::plain(&line[pos..]));
    }
    spans
}

/// First match of `rule` at or after `from` that satisfies its boundary.
fn find_rule_match(rule: &InlineRule, line: &str, from: usize) -> Option<(usize, usize)> {
    let mut search_from = from;
    while search_from <= line.len() {
        let found = rule.pattern.find_at(line, search_from)?;
        if boundary_ok(rule.boundary, line, found.start(), found.end()) {
            return Some((found.start(), found.end()));
        }
        let step = line[found.start()..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        search_from = found.start() + step;
    }
    None
}

fn boundary_ok(boundary: Boundary, line: &str, start: usize, end: usize) -> bool {
    let before_ok = || !line[..start].chars().next_back().is_some_and(is_word_char);
    let after_ok = || !line[end..].chars().next().is_some_and(is_word_char);
    match boundary {
        Boundary::None => true,
        Boundary::Start => before_ok(),
        Boundary::Both => before_ok() && after_ok(),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn inline_style(rule: &InlineRule, matched: &str) -> InlineStyle {
    match rule.kind {
        InlineKind::Image => {
            let (alt, src) = rule
                .pattern
                .captures(matched)
                .map(|caps| {
                    (
                        caps.get(1).map_or("", |m| m.as_str()).to_string(),
                        caps.get(2).map_or("", |m| m.as_str()).to_string(),
                    )
                })
                .unwrap_or_default();
            InlineStyle::Image { alt, src }
        }
        InlineKind::FenceMarker => InlineStyle::FenceMarker,
        InlineKind::Code => InlineStyle::Code,
        InlineKind::BoldStar | InlineKind::BoldUnderscore => InlineStyle::Bold,
        InlineKind::ItalicStar | InlineKind::ItalicUnderscore => InlineStyle::Italic,
        InlineKind::Strikethrough => InlineStyle::Strikethrough,
        InlineKind::Link => InlineStyle::Link,
        InlineKind::Url => InlineStyle::Url,
        InlineKind::Mention => InlineStyle::Mention,
        InlineKind::Hashtag => InlineStyle::Hashtag,
    }
}

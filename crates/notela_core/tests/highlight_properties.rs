use notela_core::editor::highlight::escape_html;
use notela_core::{highlight, highlight_lines};
use proptest::prelude::*;

fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(" "), Just("\n")]
}

/// Text built from words with no markdown syntax characters.
fn plain_text() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-zA-Z][a-zA-Z&<>]{0,7}", separator()), 1..24).prop_map(|parts| {
        let mut text = String::new();
        for (word, sep) in parts {
            text.push_str(&word);
            text.push_str(sep);
        }
        text
    })
}

proptest! {
    #[test]
    fn line_count_matches_input(text in "[ -~\n]{1,200}") {
        prop_assert_eq!(highlight_lines(&text).len(), text.split('\n').count());
        prop_assert_eq!(highlight(&text).matches('\n').count(), text.matches('\n').count());
    }

    #[test]
    fn plain_text_is_only_escaped(text in plain_text()) {
        prop_assert_eq!(highlight(&text), escape_html(&text).into_owned());
    }

    #[test]
    fn markup_never_contains_raw_angle_brackets_from_input(text in "[a-z<> ]{1,80}") {
        let markup = highlight(&text);
        let stripped = markup
            .replace("<span class=\"", "")
            .replace("</span>", "");
        prop_assert!(!stripped.contains('<'));
    }
}

//! Scroll synchronization between the input surface, overlay and gutter.

/// Scroll position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffsets {
    pub top: f32,
    pub left: f32,
}

/// Mirrors input-surface scrolling onto the overlay and gutter.
///
/// Every event is applied immediately; there is no debounce.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSync {
    overlay: ScrollOffsets,
    gutter_top: f32,
}

impl ScrollSync {
    pub fn on_scroll(&mut self, input: ScrollOffsets) {
        self.overlay = input;
        self.gutter_top = input.top;
    }

    pub fn overlay(&self) -> ScrollOffsets {
        self.overlay
    }

    /// The gutter only scrolls vertically.
    pub fn gutter_top(&self) -> f32 {
        self.gutter_top
    }
}

/// Number of display lines in `text`. Empty text still shows one line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Gutter labels `1..=line_count`.
pub fn gutter_labels(line_count: usize) -> Vec<String> {
    (1..=line_count.max(1)).map(|n| n.to_string()).collect()
}

pub fn content_height(line_height: f32, line_count: usize) -> f32 {
    line_height * line_count as f32
}

#[cfg(test)]
mod tests {
    use super::{content_height, gutter_labels, line_count, ScrollOffsets, ScrollSync};

    #[test]
    fn scroll_copies_offsets_to_overlay_and_top_to_gutter() {
        let mut sync = ScrollSync::default();
        sync.on_scroll(ScrollOffsets {
            top: 120.0,
            left: 8.0,
        });
        assert_eq!(
            sync.overlay(),
            ScrollOffsets {
                top: 120.0,
                left: 8.0
            }
        );
        assert_eq!(sync.gutter_top(), 120.0);

        sync.on_scroll(ScrollOffsets::default());
        assert_eq!(sync.gutter_top(), 0.0);
    }

    #[test]
    fn gutter_and_height_follow_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("a\nb\n"), 3);
        assert_eq!(gutter_labels(3), vec!["1", "2", "3"]);
        assert_eq!(content_height(20.0, 3), 60.0);
    }
}

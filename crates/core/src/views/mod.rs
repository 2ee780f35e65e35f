//! Views turn tracker output and content into render commands.
//!
//! Every view is a pure function. Coordinates are in the renderer's units;
//! [`ViewMetrics`] says how large a text line, a character, and the thin
//! progress bar are in those units.

pub mod hero;
pub mod progress_bar;
pub mod section_dots;
pub mod showcase;

use folio_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMetrics {
    pub line: f64,
    pub char_width: f64,
    pub bar: f64,
    pub font_size: f64,
}

impl ViewMetrics {
    /// One unit per terminal cell.
    pub const CELLS: Self = Self {
        line: 1.0,
        char_width: 1.0,
        bar: 1.0,
        font_size: 1.0,
    };

    /// CSS pixels at a 14px body size.
    pub const PIXELS: Self = Self {
        line: 20.0,
        char_width: 7.5,
        bar: 2.0,
        font_size: 14.0,
    };

    /// How many characters fit in `width` units.
    pub fn chars_in(&self, width: f64) -> usize {
        if self.char_width <= 0.0 || width <= 0.0 {
            return 0;
        }
        (width / self.char_width).floor() as usize
    }
}

/// Greedy word wrap to `max_chars` columns. Words longer than a line are
/// split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Cut `text` to `max_chars`, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text(
    x: f64,
    y: f64,
    content: impl Into<String>,
    color: ThemeToken,
    metrics: &ViewMetrics,
    align: TextAlign,
) -> RenderCommand {
    RenderCommand::DrawText {
        position: Point::new(x, y),
        text: content.into(),
        color,
        font_size: metrics.font_size,
        align,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("scroll driven section tracking", 14),
            vec!["scroll driven", "section", "tracking"]
        );
    }

    #[test]
    fn splits_overlong_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert!(wrap_text("anything", 0).is_empty());
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("Experience", 5), "Expe…");
        assert_eq!(truncate("Skills", 6), "Skills");
    }
}

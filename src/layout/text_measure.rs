//! Text Measurement
//!
//! Text is measured in cells: one unit per column as reported by
//! `unicode-width` (CJK and most emoji take two, combining marks zero).
//! Hosts that render proportional fonts scale the result themselves.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a single line of text.
pub fn string_width(s: &str) -> f32 {
    s.lines().map(UnicodeWidthStr::width).max().unwrap_or(0) as f32
}

/// Number of lines `text` occupies when wrapped at `available_width`.
///
/// Returns 0 for empty text and at least 1 otherwise.
pub fn measure_text_height(text: &str, available_width: f32) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    if available_width < 1.0 {
        return 1.0;
    }

    let mut lines = 0u32;
    for line in text.split('\n') {
        let mut current = 0.0f32;
        let mut line_count = 1u32;
        for c in line.chars() {
            let w = c.width().unwrap_or(0) as f32;
            if current + w > available_width && current > 0.0 {
                line_count += 1;
                current = w;
            } else {
                current += w;
            }
        }
        lines += line_count;
    }
    lines as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width(""), 0.0);
        assert_eq!(string_width("Home"), 4.0);
        assert_eq!(string_width("设置"), 4.0);
        assert_eq!(string_width("ab\nabcd"), 4.0);
    }

    #[test]
    fn test_measure_text_height() {
        assert_eq!(measure_text_height("", 10.0), 0.0);
        assert_eq!(measure_text_height("hello", 10.0), 1.0);
        assert_eq!(measure_text_height("hello world", 5.0), 3.0);
        assert_eq!(measure_text_height("a\nb", 10.0), 2.0);
        assert_eq!(measure_text_height("hello", 0.0), 1.0);
    }
}

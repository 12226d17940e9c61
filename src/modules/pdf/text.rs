//! Text measurement and wrapping.
//!
//! Glyph widths are estimated as a fixed fraction of the font size so that a
//! layout depends only on its input, not on the font file loaded at render time.

/// Average glyph advance as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;

/// Points to millimeters
const PT_TO_MM: f32 = 0.352_778;

/// Estimated rendered width of `text` in millimeters
pub fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * glyph_width_mm(font_size)
}

fn glyph_width_mm(font_size: f32) -> f32 {
    font_size * AVG_GLYPH_EM * PT_TO_MM
}

/// Split `text` into lines no wider than `max_width_mm`.
///
/// Words are kept whole where possible; a word longer than a full line is cut.
/// Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size: f32) -> Vec<String> {
    let capacity = ((max_width_mm / glyph_width_mm(font_size)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-cut words that cannot fit on a line of their own
            while word.len() > capacity {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(capacity);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if word.is_empty() {
                continue;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };

            if needed > capacity {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        if current_len > 0 || lines.is_empty() || paragraph.trim().is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // 12pt glyphs are ~2.117mm wide: a 66mm cell fits 31 characters
    const DESC_WIDTH: f32 = 66.0;

    #[test]
    fn test_empty_text_yields_one_line() {
        assert_eq!(wrap_text("", DESC_WIDTH, 12.0), vec![String::new()]);
    }

    #[test]
    fn test_short_text_is_not_wrapped() {
        assert_eq!(
            wrap_text("asphalt patch", DESC_WIDTH, 12.0),
            vec!["asphalt patch".to_string()]
        );
    }

    #[test]
    fn test_long_text_wraps_on_word_boundaries() {
        let text = "replace damaged concrete barrier section including anchoring bolts and reflective markers";
        let lines = wrap_text(text, DESC_WIDTH, 12.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 31, "line too long: {:?}", line);
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_overlong_word_is_cut() {
        let word = "x".repeat(70);
        let lines = wrap_text(&word, DESC_WIDTH, 12.0);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 31);
        assert_eq!(lines[1].len(), 31);
        assert_eq!(lines[2].len(), 8);
    }

    #[test]
    fn test_explicit_newlines_are_kept() {
        let lines = wrap_text("first\nsecond", DESC_WIDTH, 12.0);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_width_scales_with_length_and_size() {
        let narrow = text_width_mm("abc", 12.0);
        assert!((text_width_mm("abcdef", 12.0) - 2.0 * narrow).abs() < 1e-4);
        assert!(text_width_mm("abc", 16.0) > narrow);
    }
}

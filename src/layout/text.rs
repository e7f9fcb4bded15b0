use crate::theme::Theme;

use super::TextBlock;

const LINE_HEIGHT: f32 = 1.25;

/// Approximate glyph advance as a fraction of the font size. Calibrated
/// against Inter/Segoe at 14px; good enough to size the legend column.
pub(crate) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.28,
        '.' | ',' | ':' | ';' | '|' | '!' | '\'' | 'i' | 'j' | 'l' | 'I' => 0.26,
        '(' | ')' | '[' | ']' | 'f' | 't' | 'r' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.9,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.56,
        _ if ch.is_alphabetic() => 0.56,
        _ => 0.6,
    }
}

pub(crate) fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

pub fn measure_label(text: &str, theme: &Theme) -> TextBlock {
    TextBlock {
        text: text.to_string(),
        width: text_width(text, theme.font_size),
        height: theme.font_size * LINE_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_measure_wider() {
        assert!(text_width("WWW", 14.0) > text_width("iii", 14.0));
        assert_eq!(text_width("", 14.0), 0.0);
    }

    #[test]
    fn accented_letters_count_as_letters() {
        let theme = Theme::light();
        let plain = measure_label("Evopoli", &theme);
        let accented = measure_label("Evópoli", &theme);
        assert!((plain.width - accented.width).abs() < theme.font_size);
    }
}

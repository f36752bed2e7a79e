use crate::core::Size;
use crate::render::{FontSpec, FontWeight};

/// Measures label text. Hosts with a real text stack plug theirs in.
pub trait TextMeasurer: Send {
    fn measure(&self, text: &str, font: FontSpec) -> Size;
}

/// Deterministic, backend-independent width estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasurer {
    /// Line height as a multiple of the font size.
    pub line_height_ratio: f64,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self {
            line_height_ratio: 1.2,
        }
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, font: FontSpec) -> Size {
        let weight = match font.weight {
            FontWeight::Regular => 1.0,
            FontWeight::Semibold => 1.06,
        };
        Size::new(
            estimate_label_text_width_px(text, font.size_px) * weight,
            font.size_px * self.line_height_ratio,
        )
    }
}

pub(crate) fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' | '\u{2009}' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

#[cfg(test)]
mod tests {
    use super::{EstimatedTextMeasurer, TextMeasurer};
    use crate::render::FontSpec;

    #[test]
    fn semibold_measures_wider_than_regular() {
        let measurer = EstimatedTextMeasurer::default();
        let regular = measurer.measure("42%", FontSpec::regular(20.0));
        let bold = measurer.measure("42%", FontSpec::semibold(20.0));
        assert!((regular.width - 33.2).abs() <= 1e-9);
        assert!(bold.width > regular.width);
        assert!((regular.height - 24.0).abs() <= 1e-9);
    }
}

use unicode_width::UnicodeWidthStr;

/// Font-agnostic size estimate for cluster captions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    pub font_size: f64,
    /// Advance per display column, as a fraction of the font size.
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self::with_font_size(14.0)
    }
}

impl LabelMetrics {
    pub fn with_font_size(font_size: f64) -> Self {
        Self {
            font_size,
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }

    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width_factor * self.font_size
    }

    pub fn line_height(&self) -> f64 {
        self.line_height_factor * self.font_size
    }

    /// (width, height) of a single-line label.
    pub fn label_size(&self, text: &str) -> (f64, f64) {
        (self.text_width(text), self.line_height())
    }
}

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Approximate text metrics for requirement labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_label_width: f64,
    pub max_label_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 6.5,
            line_height: 14.0,
            padding_x: 20.0,
            padding_y: 12.0,
            min_label_width: 100.0,
            max_label_width: 200.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Split label text into display lines. Text is only broken at explicit
    /// newlines; each line is trimmed.
    pub fn label_lines(&self, text: &str) -> Vec<String> {
        if text.contains('\n') {
            text.split('\n').map(|l| l.trim().to_string()).collect()
        } else {
            vec![text.to_string()]
        }
    }

    /// Box size for the given lines, width clamped to the label range.
    pub fn label_size(&self, lines: &[String]) -> (f64, f64) {
        let widest = lines
            .iter()
            .map(|l| self.text_width(l))
            .fold(0.0, f64::max);
        let width = (widest + self.padding_x).clamp(self.min_label_width, self.max_label_width);
        let height = lines.len().max(1) as f64 * self.line_height + self.padding_y;
        (width, height)
    }
}

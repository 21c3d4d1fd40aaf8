//! Requirement label boxes.

use crate::measure::TextMetrics;

use super::types::LabelBox;

/// Label box for `text` centered on `center`. Blank text gets no label.
pub fn place_label(metrics: &TextMetrics, text: &str, center: (f64, f64)) -> Option<LabelBox> {
    if text.trim().is_empty() {
        return None;
    }
    let lines = metrics.label_lines(text);
    let (width, height) = metrics.label_size(&lines);
    Some(LabelBox {
        x: center.0 - width / 2.0,
        y: center.1 - height / 2.0,
        width,
        height,
        center_x: center.0,
        center_y: center.1,
        lines,
        line_height: metrics.line_height,
    })
}

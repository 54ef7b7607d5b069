use serde::Serialize;

use crate::layout::Frame;

/// Where to draw an arc's label, relative to the chart center.
///
/// The adapter applies `rotate(rotate_deg) translate(radius × ring_radius, 0)`
/// and then, when `flipped`, an extra half turn so the text stays upright.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub rotate_deg: f64,
    /// Radial offset in ring units (multiply by the ring radius in pixels)
    pub radius: f64,
    pub flipped: bool,
}

impl LabelPlacement {
    pub fn for_frame(frame: &Frame) -> Self {
        let angle_deg = frame.mid_angle().to_degrees();
        Self {
            rotate_deg: angle_deg - 90.0,
            radius: frame.mid_depth(),
            flipped: angle_deg >= 180.0,
        }
    }
}

/// Shorten a label to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

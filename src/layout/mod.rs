mod partition;

pub use partition::{compute_layout, PartitionSummary};

use std::f64::consts::TAU;

use serde::Serialize;

/// Angular extent of the full chart.
pub const FULL_CIRCLE: f64 = TAU;

/// Minimum ring-units × radians area for an arc to carry a label.
pub const LABEL_MIN_AREA: f64 = 0.03;

/// Angular and radial extent of a node: angles in radians, depths in ring units.
///
/// The root occupies the degenerate depth interval `[0, 0]`; a node at tree
/// depth `d >= 1` occupies `[d, d + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Frame {
    pub angle_start: f64,
    pub angle_end: f64,
    pub depth_start: f64,
    pub depth_end: f64,
}

impl Frame {
    pub const fn new(angle_start: f64, angle_end: f64, depth_start: f64, depth_end: f64) -> Self {
        Self {
            angle_start,
            angle_end,
            depth_start,
            depth_end,
        }
    }

    pub fn angle_span(&self) -> f64 {
        self.angle_end - self.angle_start
    }

    pub fn depth_span(&self) -> f64 {
        self.depth_end - self.depth_start
    }

    pub fn mid_angle(&self) -> f64 {
        (self.angle_start + self.angle_end) / 2.0
    }

    pub fn mid_depth(&self) -> f64 {
        (self.depth_start + self.depth_end) / 2.0
    }

    /// Arc is drawn: inside the outermost ring, outside the hidden center, non-empty.
    pub fn arc_visible(&self, max_depth: u16) -> bool {
        self.depth_end <= f64::from(max_depth) + 1.0
            && self.depth_start >= 1.0
            && self.angle_end > self.angle_start
    }

    /// Arc is visible and large enough to hold a readable label.
    pub fn label_visible(&self, max_depth: u16, min_area: f64) -> bool {
        self.arc_visible(max_depth) && self.depth_span() * self.angle_span() > min_area
    }

    /// This frame normalized against a focus frame: the focus angle interval is
    /// stretched to the full circle and depths shift so the focus ring becomes
    /// the center.
    pub fn relative_to(&self, focus: &Frame, focus_depth: u16) -> Frame {
        let span = focus.angle_span();
        let normalize = |angle: f64| {
            if span > 0.0 {
                ((angle - focus.angle_start) / span).clamp(0.0, 1.0) * FULL_CIRCLE
            } else {
                0.0
            }
        };
        let shift = f64::from(focus_depth);
        Frame {
            angle_start: normalize(self.angle_start),
            angle_end: normalize(self.angle_end),
            depth_start: (self.depth_start - shift).max(0.0),
            depth_end: (self.depth_end - shift).max(0.0),
        }
    }

    /// Whether a polar point (angle in radians, radius in ring units) falls inside.
    pub fn contains(&self, angle: f64, radius: f64) -> bool {
        angle >= self.angle_start
            && angle < self.angle_end
            && radius >= self.depth_start
            && radius < self.depth_end
    }
}

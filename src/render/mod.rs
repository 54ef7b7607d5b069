pub mod colors;
pub mod scene;
pub mod text;
pub mod transition;

use compact_str::CompactString;
use serde::Serialize;

use crate::layout::Frame;
use crate::tree::arena::{AggregatedDetail, NodeId};
use crate::tree::path::PathKey;
use text::LabelPlacement;

/// Drawing backend fed by the chart.
///
/// The chart never draws itself; it pushes snapshots through this trait so
/// any timer or rendering primitive can sit on the other side.
pub trait RenderAdapter {
    /// Redraw everything (after a rebuild or on first draw).
    fn draw(&mut self, scene: &SunburstScene);

    /// Interpolated geometry for one animation frame. `progress` is the eased
    /// transition progress; the final call of a transition carries 1.0.
    fn update_frames(&mut self, updates: &[FrameUpdate], progress: f64);

    /// The focus moved: refresh the center label and the legend.
    fn focus_changed(&mut self, focus: &FocusInfo, legend: &[LegendEntry]);

    /// Nothing to draw.
    fn show_empty_state(&mut self, message: &str);
}

/// One drawable arc (every node except the root).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcView {
    pub node: NodeId,
    /// Data-join key, stable across rebuilds
    pub uid: String,
    pub path_key: PathKey,
    pub name: CompactString,
    pub value: f64,
    pub depth: u16,
    pub is_aggregated: bool,
    pub aggregated_details: Vec<AggregatedDetail>,
    /// Clickable for zoom
    pub has_children: bool,
    /// Current (possibly mid-transition) frame
    pub frame: Frame,
    pub visible: bool,
    pub label: Option<LabelPlacement>,
    pub color_slot: Option<usize>,
}

/// Geometry-only update pushed on each animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameUpdate {
    pub node: NodeId,
    pub frame: Frame,
    pub visible: bool,
    pub label: Option<LabelPlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusInfo {
    pub node: NodeId,
    pub name: CompactString,
    pub path_key: PathKey,
    /// Text for the center circle
    pub center_label: String,
    pub is_root: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub node: NodeId,
    pub name: CompactString,
    pub value: f64,
    pub color_slot: usize,
    /// Clicking the entry zooms into it
    pub clickable: bool,
}

impl LegendEntry {
    pub fn display_name(&self, max_chars: usize) -> String {
        text::truncate_label(&self.name, max_chars)
    }
}

/// Everything needed for a full redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstScene {
    pub arcs: Vec<ArcView>,
    pub focus: FocusInfo,
    pub legend: Vec<LegendEntry>,
    pub max_depth: u16,
}

impl SunburstScene {
    pub fn visible_arcs(&self) -> impl Iterator<Item = &ArcView> {
        self.arcs.iter().filter(|a| a.visible)
    }
}

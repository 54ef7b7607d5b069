use std::f64::consts::TAU;

use crate::tree::arena::{CategoryTree, NodeId};
use crate::ui::navigation::ZoomState;

/// Input action produced from pointer events on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Pointer over an arc (or over nothing)
    Hover { node: Option<NodeId> },
    /// Click on an arc or legend entry with children
    Focus { node: NodeId },
    /// Click on the center circle
    ZoomOut,
    /// No action
    None,
}

/// Convert a pointer offset from the chart center (screen coordinates, y down)
/// into polar coordinates: angle clockwise from 12 o'clock in [0, 2π), radius
/// in ring units.
pub fn pointer_to_polar(dx: f64, dy: f64, ring_radius: f64) -> (f64, f64) {
    let angle = dx.atan2(-dy).rem_euclid(TAU);
    let radius = if ring_radius > 0.0 {
        dx.hypot(dy) / ring_radius
    } else {
        0.0
    };
    (angle, radius)
}

/// Hit-test: find the visible arc containing the given polar point.
/// Returns the deepest match.
pub fn hit_test(tree: &CategoryTree, zoom: &ZoomState, angle: f64, radius: f64) -> Option<NodeId> {
    let max_depth = tree.height();
    tree.preorder()
        .into_iter()
        .rev()
        .filter(|&id| id != tree.root)
        .find(|&id| {
            let frame = zoom.current_frame(id);
            frame.arc_visible(max_depth) && frame.contains(angle, radius)
        })
}

/// Process a pointer move.
pub fn process_hover(
    tree: &CategoryTree,
    zoom: &ZoomState,
    angle: f64,
    radius: f64,
) -> InputAction {
    InputAction::Hover {
        node: hit_test(tree, zoom, angle, radius),
    }
}

/// Process a click. The center circle (inside the first ring) zooms out;
/// arcs with children zoom in; leaves do nothing.
pub fn process_click(
    tree: &CategoryTree,
    zoom: &ZoomState,
    angle: f64,
    radius: f64,
) -> InputAction {
    if radius < 1.0 {
        return if zoom.focus() != tree.root {
            InputAction::ZoomOut
        } else {
            InputAction::None
        };
    }
    match hit_test(tree, zoom, angle, radius) {
        Some(node) if tree.get(node).has_children() => InputAction::Focus { node },
        _ => InputAction::None,
    }
}

/// Process a click on a legend entry.
pub fn process_legend_click(tree: &CategoryTree, node: NodeId) -> InputAction {
    match tree.try_get(node) {
        Some(entry) if entry.has_children() => InputAction::Focus { node },
        _ => InputAction::None,
    }
}

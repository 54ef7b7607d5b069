use super::colors::color_slot;
use super::text::LabelPlacement;
use super::{ArcView, FocusInfo, FrameUpdate, LegendEntry, SunburstScene};
use crate::layout::Frame;
use crate::tree::arena::{CategoryTree, NodeId};
use crate::tree::path::PathKey;
use crate::ui::navigation::ZoomState;

/// Center text shown while the root is in focus.
pub const ROOT_CENTER_LABEL: &str = "Click to explore";

/// Build the full scene for the current zoom state. The root is not drawn.
pub fn build_scene(tree: &CategoryTree, zoom: &ZoomState, label_min_area: f64) -> SunburstScene {
    let max_depth = tree.height();
    let focus = zoom.focus();

    let arcs = tree
        .preorder()
        .into_iter()
        .filter(|&id| id != tree.root)
        .map(|id| {
            let node = tree.get(id);
            let frame = zoom.current_frame(id);
            let path_key = PathKey::of(tree, id);
            ArcView {
                node: id,
                uid: path_key.uid(),
                path_key,
                name: node.name.clone(),
                value: node.value,
                depth: node.depth,
                is_aggregated: node.is_aggregated,
                aggregated_details: node.aggregated_details.clone(),
                has_children: node.has_children(),
                frame,
                visible: frame.arc_visible(max_depth),
                label: label_for(&frame, max_depth, label_min_area),
                color_slot: color_slot(tree, focus, id),
            }
        })
        .collect();

    SunburstScene {
        arcs,
        focus: focus_info(tree, focus),
        legend: build_legend(tree, focus),
        max_depth,
    }
}

/// Per-frame geometry for every drawn arc, in scene order.
pub fn frame_updates(
    tree: &CategoryTree,
    zoom: &ZoomState,
    label_min_area: f64,
) -> Vec<FrameUpdate> {
    let max_depth = tree.height();
    tree.preorder()
        .into_iter()
        .filter(|&id| id != tree.root)
        .map(|id| {
            let frame = zoom.current_frame(id);
            FrameUpdate {
                node: id,
                frame,
                visible: frame.arc_visible(max_depth),
                label: label_for(&frame, max_depth, label_min_area),
            }
        })
        .collect()
}

pub fn focus_info(tree: &CategoryTree, focus: NodeId) -> FocusInfo {
    let node = tree.get(focus);
    let is_root = focus == tree.root;
    FocusInfo {
        node: focus,
        name: node.name.clone(),
        path_key: PathKey::of(tree, focus),
        center_label: if is_root {
            ROOT_CENTER_LABEL.to_string()
        } else {
            node.name.to_string()
        },
        is_root,
    }
}

/// Legend keyed by the focus node's direct children, in display order.
pub fn build_legend(tree: &CategoryTree, focus: NodeId) -> Vec<LegendEntry> {
    tree.children(focus)
        .enumerate()
        .map(|(slot, id)| {
            let node = tree.get(id);
            LegendEntry {
                node: id,
                name: node.name.clone(),
                value: node.value,
                color_slot: slot,
                clickable: node.has_children(),
            }
        })
        .collect()
}

fn label_for(frame: &Frame, max_depth: u16, min_area: f64) -> Option<LabelPlacement> {
    frame
        .label_visible(max_depth, min_area)
        .then(|| LabelPlacement::for_frame(frame))
}

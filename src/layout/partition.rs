use super::{Frame, FULL_CIRCLE};
use crate::error::SunburstError;
use crate::tree::arena::{CategoryTree, NodeId};
use crate::tree::path::PathKey;

/// What a layout pass found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSummary {
    /// Tree height; the outermost ring ends at `max_depth + 1`
    pub max_depth: u16,
    /// Inner nodes whose value was zero and whose children were split evenly
    pub degenerate_nodes: usize,
}

/// Annotate every node with its angular / radial extent.
///
/// Root gets the full circle at depth `[0, 0]`. Children split the parent's
/// angle interval in proportion to value (descending, stable on ties), or
/// evenly when the parent's value is zero. The last child is pinned to the
/// parent's end angle so sibling widths sum to the parent width. Idempotent.
pub fn compute_layout(tree: &mut CategoryTree) -> PartitionSummary {
    let root = tree.root;
    tree.get_mut(root).layout = Frame::new(0.0, FULL_CIRCLE, 0.0, 0.0);

    let mut degenerate_nodes = 0;
    let mut stack = vec![root];

    while let Some(parent) = stack.pop() {
        let mut children: Vec<NodeId> = tree.children(parent).collect();
        if children.is_empty() {
            continue;
        }
        children.sort_by(|a, b| tree.get(*b).value.total_cmp(&tree.get(*a).value));

        let frame = tree.get(parent).layout;
        let parent_value = tree.get(parent).value;
        let degenerate = parent_value <= 0.0;
        if degenerate {
            degenerate_nodes += 1;
            let err = SunburstError::DegenerateValue {
                path: PathKey::of(tree, parent).uid(),
            };
            if parent == root {
                tracing::warn!("{}", err);
            } else {
                tracing::debug!("{}", err);
            }
        }

        let depth_start = frame.depth_start + 1.0;
        let span = frame.angle_span();
        let count = children.len();
        let mut cursor = frame.angle_start;

        for (i, &child) in children.iter().enumerate() {
            let share = if degenerate {
                1.0 / count as f64
            } else {
                tree.get(child).value / parent_value
            };
            let end = if i + 1 == count {
                frame.angle_end
            } else {
                (cursor + span * share).min(frame.angle_end)
            };
            tree.get_mut(child).layout = Frame::new(cursor, end, depth_start, depth_start + 1.0);
            cursor = end;
            stack.push(child);
        }
    }

    let summary = PartitionSummary {
        max_depth: tree.height(),
        degenerate_nodes,
    };
    tracing::debug!(
        "Partition layout: {} nodes, max depth {}, {} zero-valued parents",
        tree.len(),
        summary.max_depth,
        summary.degenerate_nodes
    );
    summary
}

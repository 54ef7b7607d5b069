use crate::tree::arena::{CategoryTree, NodeId};

/// Categorical palette; slots index into it modulo its length.
pub const CATEGORICAL: [&str; 15] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
    "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5",
];

/// Hex color for a palette slot.
pub fn palette_color(slot: usize) -> &'static str {
    CATEGORICAL[slot % CATEGORICAL.len()]
}

/// Color slot of a node under the current focus.
///
/// Arcs take the slot of their ancestor one level below the focus, which is
/// that ancestor's position among the focus's children. Nodes outside the
/// focus subtree, and the focus itself, have no slot.
pub fn color_slot(tree: &CategoryTree, focus: NodeId, node: NodeId) -> Option<usize> {
    let band_depth = tree.get(focus).depth + 1;
    let band = tree.ancestor_at_depth(node, band_depth)?;
    if tree.get(band).parent != Some(focus) {
        return None;
    }
    tree.children(focus).position(|child| child == band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::CategoryNode;

    #[test]
    fn slots_follow_focus_children() {
        let mut tree = CategoryTree::new("Total");
        let root = tree.root;
        let b = tree.add_child(root, CategoryNode::new("b", 1.0));
        let a = tree.add_child(root, CategoryNode::new("a", 2.0));
        let a1 = tree.add_child(a, CategoryNode::new("a1", 2.0));
        let b1 = tree.add_child(b, CategoryNode::new("b1", 1.0));

        // child order is a, b (prepend)
        assert_eq!(color_slot(&tree, root, a1), Some(0));
        assert_eq!(color_slot(&tree, root, b1), Some(1));
        assert_eq!(color_slot(&tree, root, root), None);

        assert_eq!(color_slot(&tree, a, a1), Some(0));
        assert_eq!(color_slot(&tree, a, b1), None);
        assert_eq!(color_slot(&tree, a, a), None);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(palette_color(0), "#1f77b4");
        assert_eq!(palette_color(15), palette_color(0));
    }
}

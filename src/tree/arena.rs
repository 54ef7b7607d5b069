use compact_str::CompactString;
use serde::Serialize;

use crate::layout::Frame;

/// Index into the arena `Vec<CategoryNode>`. Parent links are plain indices, never ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One category folded into a synthetic "Other" node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedDetail {
    pub name: CompactString,
    pub value: f64,
}

/// A single node in the category tree, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    /// Category label, unique among siblings
    pub name: CompactString,
    /// Sum of the measure over the subtree
    pub value: f64,
    /// True only for synthetic "Other" nodes
    pub is_aggregated: bool,
    /// Folded categories, empty unless `is_aggregated`
    pub aggregated_details: Vec<AggregatedDetail>,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for leaves)
    pub first_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u16,
    /// Position in the full-tree partition layout
    pub layout: Frame,
}

impl CategoryNode {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: CompactString::new(name),
            value,
            is_aggregated: false,
            aggregated_details: Vec::new(),
            parent: None,
            first_child: None,
            next_sibling: None,
            depth: 0,
            layout: Frame::default(),
        }
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// The category tree stored as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    /// All nodes in contiguous memory; children always sit after their parent
    pub nodes: Vec<CategoryNode>,
    /// Root node index
    pub root: NodeId,
}

impl CategoryTree {
    /// Create a tree holding only a root node.
    pub fn new(root_name: &str) -> Self {
        CategoryTree {
            nodes: vec![CategoryNode::new(root_name, 0.0)],
            root: NodeId(0),
        }
    }

    /// Add a child node under the given parent. Returns the new node's ID.
    /// The child is prepended to the parent's child list.
    pub fn add_child(&mut self, parent: NodeId, mut node: CategoryNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;

        // Prepend to parent's child list (O(1))
        node.next_sibling = self.nodes[parent.index()].first_child;
        self.nodes[parent.index()].first_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    pub fn get(&self, id: NodeId) -> &CategoryNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut CategoryNode {
        &mut self.nodes[id.index()]
    }

    /// Bounds-checked lookup for ids coming from outside the engine.
    pub fn try_get(&self, id: NodeId) -> Option<&CategoryNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent).find(|&id| self.get(id).name.as_str() == name)
    }

    /// Walk from a node up to the root (node first).
    pub fn ancestors(&self, id: NodeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    /// Ancestor of `id` sitting at `depth`, if `id` is at least that deep.
    pub fn ancestor_at_depth(&self, id: NodeId, depth: u16) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.get(a).depth == depth)
    }

    /// Tree height (deepest node depth).
    pub fn height(&self) -> u16 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Node ids in depth-first pre-order, children in list order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children: Vec<NodeId> = self.children(id).collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a CategoryTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}

/// Iterator from a node up through its parents.
pub struct AncestorIter<'a> {
    tree: &'a CategoryTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].parent;
        Some(id)
    }
}

use std::fmt;

use compact_str::CompactString;
use serde::Serialize;

use super::arena::{CategoryTree, NodeId};
use crate::error::{Result, SunburstError};

/// Names from the root down to a node.
///
/// Two nodes in different tree instances are the same category iff their
/// path keys are equal; this is what carries the zoom focus across rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PathKey(Vec<CompactString>);

impl PathKey {
    /// Build the path of a node by walking up the tree.
    pub fn of(tree: &CategoryTree, node_id: NodeId) -> Self {
        let mut parts: Vec<CompactString> = tree
            .ancestors(node_id)
            .map(|id| tree.get(id).name.clone())
            .collect();
        parts.reverse();
        PathKey(parts)
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        PathKey(names.iter().map(|n| CompactString::new(n.as_ref())).collect())
    }

    pub fn segments(&self) -> &[CompactString] {
        &self.0
    }

    /// Whether this is the root path (or empty).
    pub fn is_root(&self) -> bool {
        self.0.len() <= 1
    }

    /// Last segment, the node's own name.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }

    /// Stable data-join key: all names joined by '-'.
    pub fn uid(&self) -> String {
        self.join("-")
    }

    /// Names below the root joined by `separator` (breadcrumb / tooltip form).
    pub fn below_root(&self, separator: &str) -> String {
        self.0
            .iter()
            .skip(1)
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn join(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uid())
    }
}

/// Locate the node with the given path in `tree`.
///
/// The whole path must match, root name included; a partial match is an
/// [`SunburstError::UnresolvedFocus`]. An empty path resolves to the root.
pub fn resolve(tree: &CategoryTree, key: &PathKey) -> Result<NodeId> {
    let Some((root_name, rest)) = key.segments().split_first() else {
        return Ok(tree.root);
    };

    let unresolved = || SunburstError::UnresolvedFocus { path: key.uid() };

    if tree.get(tree.root).name != *root_name {
        return Err(unresolved());
    }

    let mut current = tree.root;
    for segment in rest {
        current = tree.child_by_name(current, segment).ok_or_else(unresolved)?;
    }
    Ok(current)
}

use compact_str::CompactString;

use super::arena::{AggregatedDetail, CategoryTree, NodeId};
use super::GroupDraft;
use crate::config::AggregationPolicy;

/// Name of the synthetic node that collects small siblings.
pub const OTHER_NAME: &str = "Other";

/// Recompute values for all inner nodes (bottom-up).
/// After this, each inner node's `value` equals the sum of its children in list order.
pub fn aggregate_values(tree: &mut CategoryTree) {
    // Children always have higher indices than their parents in the arena,
    // guaranteed by the add_child insertion order.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let Some(first) = tree.nodes[i].first_child else {
            continue;
        };

        let mut total = 0.0;
        let mut child = Some(first);
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].value;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].value = total;
    }
}

/// Sort children of each inner node by value (descending).
/// The sort is stable, so equal values keep first-encountered order.
/// This re-links the sibling list without moving nodes in the arena.
pub fn sort_children_by_value(tree: &mut CategoryTree) {
    let len = tree.nodes.len();
    for i in 0..len {
        if tree.nodes[i].first_child.is_none() {
            continue;
        }

        let mut children: Vec<NodeId> = tree.children(NodeId(i as u32)).collect();
        children.sort_by(|a, b| {
            tree.nodes[b.index()]
                .value
                .total_cmp(&tree.nodes[a.index()].value)
        });

        tree.nodes[i].first_child = children.first().copied();
        for w in children.windows(2) {
            tree.nodes[w[0].index()].next_sibling = Some(w[1]);
        }
        if let Some(last) = children.last() {
            tree.nodes[last.index()].next_sibling = None;
        }
    }
}

/// Fold siblings holding less than `policy.threshold` of their combined value
/// into a single "Other" node.
///
/// Sibling sets with `min_fan_out` or fewer members pass through untouched,
/// as does everything when the policy is disabled. A sibling exactly at the
/// threshold stays. Folded subtrees are flattened into the detail list, so an
/// existing "Other" is merged rather than nested.
///
/// A real category named "Other" is folded whenever anything else is, even
/// when it is above the threshold: it is merged into the synthetic node as a
/// detail entry so sibling names stay unique. When nothing is small it is
/// left alone.
pub fn fold_small_groups(
    children: Vec<GroupDraft>,
    policy: &AggregationPolicy,
) -> Vec<GroupDraft> {
    if !policy.enabled || children.len() <= policy.min_fan_out {
        return children;
    }

    let total: f64 = children.iter().map(|c| c.value).sum();
    // Compare shares rather than `total * threshold`: the product can round
    // above a sibling sitting exactly on the boundary.
    let is_major = |c: &GroupDraft| total <= 0.0 || c.value / total >= policy.threshold;
    let (mut major, mut small): (Vec<GroupDraft>, Vec<GroupDraft>) =
        children.into_iter().partition(is_major);

    if small.is_empty() {
        return major;
    }

    // A real category called "Other" would collide with the synthetic one.
    if let Some(pos) = major.iter().position(|c| c.name.as_str() == OTHER_NAME) {
        small.push(major.remove(pos));
    }

    let mut details: Vec<AggregatedDetail> = Vec::with_capacity(small.len());
    for group in small {
        match group.folded {
            Some(folded) => details.extend(folded),
            None => details.push(AggregatedDetail {
                name: group.name,
                value: group.value,
            }),
        }
    }
    details.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

    let value = details.iter().map(|d| d.value).sum();
    tracing::debug!(
        "Folded {} of {} categories ({:.1}% cutoff) into '{}'",
        details.len(),
        details.len() + major.len(),
        policy.threshold * 100.0,
        OTHER_NAME
    );

    major.push(GroupDraft {
        name: CompactString::new(OTHER_NAME),
        value,
        children: Vec::new(),
        folded: Some(details),
    });
    major
}

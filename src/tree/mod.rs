pub mod aggregate;
pub mod arena;
pub mod path;

use std::collections::HashMap;

use compact_str::CompactString;

use self::arena::{AggregatedDetail, CategoryNode, CategoryTree, NodeId};
use crate::config::{validate_dimensions, AggregationPolicy};
use crate::dataset::types::{DimensionId, GroupKey, Record};
use crate::dataset::RecordStore;
use crate::error::{Result, SunburstError};

/// Label of the synthetic root node.
pub const ROOT_NAME: &str = "Total";

/// A grouped category before it is placed in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDraft {
    pub name: CompactString,
    pub value: f64,
    pub children: Vec<GroupDraft>,
    /// Folded categories; `Some` only for a synthetic "Other"
    pub folded: Option<Vec<AggregatedDetail>>,
}

impl GroupDraft {
    pub fn leaf(name: &str, value: f64) -> Self {
        Self {
            name: CompactString::new(name),
            value,
            children: Vec::new(),
            folded: None,
        }
    }

    pub fn branch(name: &str, children: Vec<GroupDraft>) -> Self {
        Self {
            name: CompactString::new(name),
            value: children.iter().map(|c| c.value).sum(),
            children,
            folded: None,
        }
    }

    pub fn is_aggregated(&self) -> bool {
        self.folded.is_some()
    }
}

/// Build the category tree for the given grouping dimensions.
///
/// Levels are the dimensions in order followed by the terminal category.
/// Every sibling set is passed through the small-group folder, then children
/// are sorted by value and inner values are recomputed from the final child
/// lists. An empty store yields a root-only tree of value 0.
pub fn build_tree(
    store: &RecordStore,
    dimensions: &[DimensionId],
    policy: &AggregationPolicy,
) -> Result<CategoryTree> {
    validate_dimensions(dimensions)?;
    for &id in dimensions {
        if store.dimension_name(id).is_none() {
            return Err(SunburstError::UnknownDimension(format!("#{}", id.0)));
        }
    }

    let mut levels: Vec<GroupKey> = dimensions.iter().map(|&id| GroupKey::Dimension(id)).collect();
    levels.push(GroupKey::TerminalCategory);

    tracing::info!(
        "Building category tree from {} records ({} levels, aggregation {})",
        store.len(),
        levels.len(),
        if policy.enabled { "on" } else { "off" }
    );

    let records: Vec<&Record> = store.records().iter().collect();
    let groups = group_level(&records, &levels, policy);

    let mut tree = CategoryTree::new(ROOT_NAME);
    let root = tree.root;
    attach(&mut tree, root, groups);

    aggregate::sort_children_by_value(&mut tree);
    aggregate::aggregate_values(&mut tree);

    tracing::info!(
        "Tree built: {} total nodes, {} direct children of root, height {}, total {}",
        tree.len(),
        tree.children(root).count(),
        tree.height(),
        tree.get(root).value
    );

    Ok(tree)
}

/// Group records by the first level key, recursing into the remaining levels.
fn group_level(
    records: &[&Record],
    levels: &[GroupKey],
    policy: &AggregationPolicy,
) -> Vec<GroupDraft> {
    let Some((key, rest)) = levels.split_first() else {
        return Vec::new();
    };

    // First-encountered order is kept so later stable sorting breaks ties by it.
    let mut order: Vec<(&str, Vec<&Record>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for &record in records {
        let label = key.label(record);
        let slot = *index.entry(label).or_insert_with(|| {
            order.push((label, Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(record);
    }

    let groups = order
        .into_iter()
        .map(|(label, members)| {
            if rest.is_empty() {
                GroupDraft::leaf(label, members.iter().map(|r| r.measure).sum())
            } else {
                GroupDraft::branch(label, group_level(&members, rest, policy))
            }
        })
        .collect();

    aggregate::fold_small_groups(groups, policy)
}

/// Move drafts into the arena under `parent`, keeping draft order.
fn attach(tree: &mut CategoryTree, parent: NodeId, groups: Vec<GroupDraft>) {
    // add_child prepends, so insert back to front
    for group in groups.into_iter().rev() {
        let mut node = CategoryNode::new(&group.name, group.value);
        if let Some(details) = group.folded {
            node.is_aggregated = true;
            node.aggregated_details = details;
        }
        let id = tree.add_child(parent, node);
        attach(tree, id, group.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::aggregate::OTHER_NAME;

    fn store_with(rows: &[(&str, &str, &str, f64)]) -> RecordStore {
        let mut store = RecordStore::new(&["age", "gender"]);
        for &(category, age, gender, measure) in rows {
            let mut record = Record::new(category, measure);
            if !age.is_empty() {
                record = record.with_attribute(DimensionId(0), age);
            }
            if !gender.is_empty() {
                record = record.with_attribute(DimensionId(1), gender);
            }
            store.push(record).unwrap();
        }
        store
    }

    fn child_summary(tree: &CategoryTree, id: NodeId) -> Vec<(String, f64)> {
        tree.children(id)
            .map(|c| (tree.get(c).name.to_string(), tree.get(c).value))
            .collect()
    }

    #[test]
    fn zero_dimensions_gives_single_level() {
        let store = store_with(&[
            ("driver", "", "", 5.0),
            ("cyclist", "", "", 2.0),
            ("driver", "", "", 1.0),
            ("", "", "", 3.0),
        ]);
        let tree = build_tree(&store, &[], &AggregationPolicy::disabled()).unwrap();

        assert_eq!(tree.get(tree.root).name.as_str(), ROOT_NAME);
        assert_eq!(tree.height(), 1);
        assert_eq!(
            child_summary(&tree, tree.root),
            vec![("driver".into(), 6.0), ("unknown".into(), 3.0), ("cyclist".into(), 2.0)]
        );
        assert_eq!(tree.get(tree.root).value, 11.0);
    }

    #[test]
    fn two_dimensions_give_three_levels() {
        let store = store_with(&[
            ("driver", "17_to_25", "Male", 4.0),
            ("driver", "17_to_25", "Female", 2.0),
            ("cyclist", "26_to_39", "Male", 1.0),
        ]);
        let dims = [DimensionId(0), DimensionId(1)];
        let tree = build_tree(&store, &dims, &AggregationPolicy::disabled()).unwrap();

        assert_eq!(tree.height(), 3);
        let young = tree.child_by_name(tree.root, "17_to_25").unwrap();
        assert_eq!(tree.get(young).value, 6.0);
        let male = tree.child_by_name(young, "Male").unwrap();
        assert_eq!(child_summary(&tree, male), vec![("driver".into(), 4.0)]);
    }

    #[test]
    fn dimension_order_controls_level_order() {
        let store = store_with(&[("driver", "17_to_25", "Male", 4.0)]);
        let tree = build_tree(&store, &[DimensionId(1)], &AggregationPolicy::disabled()).unwrap();
        let first = tree.children(tree.root).next().unwrap();
        assert_eq!(tree.get(first).name.as_str(), "Male");
    }

    #[test]
    fn folding_applies_below_dimension_levels() {
        let store = store_with(&[
            ("driver", "", "Male", 85.0),
            ("pedestrian", "", "Male", 10.0),
            ("cyclist", "", "Male", 1.0),
            ("passenger", "", "Male", 4.0),
        ]);
        let tree = build_tree(&store, &[DimensionId(1)], &AggregationPolicy::default()).unwrap();
        let male = tree.child_by_name(tree.root, "Male").unwrap();
        assert_eq!(
            child_summary(&tree, male),
            vec![("driver".into(), 85.0), ("pedestrian".into(), 10.0), (OTHER_NAME.into(), 5.0)]
        );
        let other = tree.child_by_name(male, OTHER_NAME).unwrap();
        assert!(tree.get(other).is_aggregated);
        assert!(!tree.get(other).has_children());
    }

    #[test]
    fn empty_store_yields_root_only() {
        let store = RecordStore::new(&[]);
        let tree = build_tree(&store, &[], &AggregationPolicy::default()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.get(tree.root).value, 0.0);
    }

    #[test]
    fn rejects_unknown_or_excess_dimensions() {
        let store = RecordStore::new(&["age"]);
        assert!(matches!(
            build_tree(&store, &[DimensionId(3)], &AggregationPolicy::default()),
            Err(SunburstError::UnknownDimension(_))
        ));
        assert!(matches!(
            build_tree(&store, &[DimensionId(0); 3], &AggregationPolicy::default()),
            Err(SunburstError::TooManyDimensions { .. })
        ));
    }
}

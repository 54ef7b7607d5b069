//! Property-based invariant tests for the tree, layout and zoom pipeline.
//!
//! 1. Every inner node's value equals the sum of its children.
//! 2. Sibling angle intervals partition their parent within 1e-9.
//! 3. Folding an already folded sibling set changes nothing.
//! 4. A sibling exactly at the threshold is never folded.
//! 5. Zoom in then out restores every target frame.

use std::time::Duration;

use proptest::prelude::*;
use sunburst_rs::layout::compute_layout;
use sunburst_rs::render::transition::Easing;
use sunburst_rs::tree::aggregate::fold_small_groups;
use sunburst_rs::tree::arena::CategoryTree;
use sunburst_rs::tree::{build_tree, GroupDraft};
use sunburst_rs::ui::navigation::ZoomState;
use sunburst_rs::{AggregationPolicy, DimensionId, Record, RecordStore};

// ── Helpers ─────────────────────────────────────────────────────────────

const CATEGORIES: [&str; 6] = [
    "driver",
    "pedestrian",
    "cyclist",
    "passenger",
    "motorcyclist",
    "",
];
const AGES: [&str; 4] = ["17_to_25", "26_to_39", "40_to_64", ""];
const GENDERS: [&str; 3] = ["Male", "Female", ""];

fn record_strategy() -> impl Strategy<Value = Record> {
    let indices = (0..CATEGORIES.len(), 0..AGES.len(), 0..GENDERS.len());
    (indices, 0u32..10_000).prop_map(|((c, a, g), m)| {
        Record::new(CATEGORIES[c], m as f64 / 4.0)
            .with_attribute(DimensionId(0), AGES[a])
            .with_attribute(DimensionId(1), GENDERS[g])
    })
}

fn dimensions_strategy() -> impl Strategy<Value = Vec<DimensionId>> {
    prop_oneof![
        Just(vec![]),
        Just(vec![DimensionId(0)]),
        Just(vec![DimensionId(1)]),
        Just(vec![DimensionId(0), DimensionId(1)]),
        Just(vec![DimensionId(1), DimensionId(0)]),
    ]
}

fn policy_strategy() -> impl Strategy<Value = AggregationPolicy> {
    prop_oneof![
        Just(AggregationPolicy::disabled()),
        Just(AggregationPolicy::default()),
        (1u32..50).prop_map(|pct| AggregationPolicy {
            threshold: pct as f64 / 100.0,
            ..AggregationPolicy::default()
        }),
    ]
}

fn built_tree(
    records: Vec<Record>,
    dims: &[DimensionId],
    policy: &AggregationPolicy,
) -> CategoryTree {
    let mut store = RecordStore::new(&["age", "gender"]);
    for record in records {
        store.push(record).unwrap();
    }
    let mut tree = build_tree(&store, dims, policy).unwrap();
    compute_layout(&mut tree);
    tree
}

fn drafts_strategy() -> impl Strategy<Value = Vec<GroupDraft>> {
    prop::collection::vec(0u32..1_000, 0..12).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| GroupDraft::leaf(&format!("category-{i}"), v as f64))
            .collect()
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Value sums are exact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn inner_values_equal_child_sums(
        records in prop::collection::vec(record_strategy(), 0..60),
        dims in dimensions_strategy(),
        policy in policy_strategy(),
    ) {
        let tree = built_tree(records, &dims, &policy);
        for id in tree.preorder() {
            let node = tree.get(id);
            if node.has_children() {
                let sum: f64 = tree.children(id).map(|c| tree.get(c).value).sum();
                prop_assert_eq!(node.value, sum, "value mismatch at '{}'", node.name);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Sibling intervals partition the parent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn siblings_partition_parent_angle(
        records in prop::collection::vec(record_strategy(), 0..60),
        dims in dimensions_strategy(),
        policy in policy_strategy(),
    ) {
        let tree = built_tree(records, &dims, &policy);
        for id in tree.preorder() {
            let parent = tree.get(id).layout;
            let kids: Vec<_> = tree.children(id).map(|c| tree.get(c).layout).collect();
            if kids.is_empty() {
                continue;
            }
            let widths: f64 = kids.iter().map(|f| f.angle_span()).sum();
            prop_assert!(kids.iter().all(|f| f.angle_span() >= 0.0));
            prop_assert!((widths - parent.angle_span()).abs() < 1e-9);
            prop_assert!((kids[0].angle_start - parent.angle_start).abs() < 1e-9);
            for pair in kids.windows(2) {
                prop_assert!((pair[0].angle_end - pair[1].angle_start).abs() < 1e-9);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Folding is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn folding_twice_changes_nothing(drafts in drafts_strategy(), pct in 1u32..50) {
        let policy = AggregationPolicy {
            threshold: pct as f64 / 100.0,
            ..AggregationPolicy::default()
        };
        let once = fold_small_groups(drafts, &policy);
        let twice = fold_small_groups(once.clone(), &policy);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().filter(|g| g.is_aggregated()).count() <= 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Threshold boundary is major
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sibling_at_threshold_is_kept(pct in 1u32..50, scale in 1u32..200) {
        // Total is 100 × scale and the boundary sibling holds exactly pct %.
        let policy = AggregationPolicy {
            threshold: pct as f64 / 100.0,
            ..AggregationPolicy::default()
        };
        let rest = (100 - pct) * scale;
        let drafts = vec![
            GroupDraft::leaf("bulk", (rest - 2) as f64),
            GroupDraft::leaf("boundary", (pct * scale) as f64),
            GroupDraft::leaf("tiny-a", 1.0),
            GroupDraft::leaf("tiny-b", 1.0),
        ];

        let folded = fold_small_groups(drafts, &policy);
        prop_assert!(
            folded.iter().any(|g| g.name.as_str() == "boundary"),
            "boundary folded at threshold {}",
            policy.threshold
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Zoom round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zoom_in_then_out_restores_targets(
        records in prop::collection::vec(record_strategy(), 1..60),
        dims in dimensions_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = built_tree(records, &dims, &AggregationPolicy::default());
        let mut zoom = ZoomState::new(&tree, Duration::from_millis(750), Easing::Linear);
        let before = zoom.target_frames().to_vec();

        let candidates: Vec<_> = tree
            .children(tree.root)
            .filter(|&id| tree.get(id).layout.angle_span() > 0.0)
            .collect();
        prop_assume!(!candidates.is_empty());
        let node = candidates[pick.index(candidates.len())];

        prop_assert!(zoom.focus_on(&tree, node));
        zoom.tick(Duration::from_millis(400));
        prop_assert!(zoom.zoom_out(&tree));
        prop_assert_eq!(zoom.target_frames(), before.as_slice());

        zoom.tick(Duration::from_secs(1));
        prop_assert_eq!(zoom.current_frames(), before.as_slice());
    }
}

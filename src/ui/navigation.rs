use std::time::Duration;

use crate::layout::Frame;
use crate::render::transition::{interpolate, Easing, Transition};
use crate::tree::arena::{CategoryTree, NodeId};
use crate::tree::path::PathKey;

/// Whether a zoom transition is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPhase {
    Idle,
    Transitioning,
}

/// Result of advancing the zoom clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing in flight
    Idle,
    /// Frames moved; eased progress in (0, 1)
    Advanced(f64),
    /// Frames reached their targets and the machine is idle again
    Completed,
}

/// Zoom state: the focused node plus current / target frames for every node.
///
/// Frames are indexed by `NodeId` and belong to one tree instance; after a
/// rebuild a new state is created and the focus re-applied with [`jump_to`].
///
/// [`jump_to`]: ZoomState::jump_to
#[derive(Debug, Clone)]
pub struct ZoomState {
    focus: NodeId,
    current: Vec<Frame>,
    target: Vec<Frame>,
    /// Frames at the moment the running transition started
    origin: Vec<Frame>,
    transition: Option<Transition>,
    duration: Duration,
    easing: Easing,
}

impl ZoomState {
    /// Idle state focused on the root, frames normalized to the full circle.
    pub fn new(tree: &CategoryTree, duration: Duration, easing: Easing) -> Self {
        let frames = target_frames(tree, tree.root);
        Self {
            focus: tree.root,
            current: frames.clone(),
            origin: frames.clone(),
            target: frames,
            transition: None,
            duration,
            easing,
        }
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn phase(&self) -> ZoomPhase {
        if self.transition.is_some() {
            ZoomPhase::Transitioning
        } else {
            ZoomPhase::Idle
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Eased progress of the running transition, if any.
    pub fn progress(&self) -> Option<f64> {
        self.transition.as_ref().map(|t| t.progress())
    }

    pub fn current_frame(&self, id: NodeId) -> Frame {
        self.current[id.index()]
    }

    pub fn target_frame(&self, id: NodeId) -> Frame {
        self.target[id.index()]
    }

    pub fn current_frames(&self) -> &[Frame] {
        &self.current
    }

    pub fn target_frames(&self) -> &[Frame] {
        &self.target
    }

    /// Start an animated zoom onto `node`. Any node with angular extent can be
    /// focused; restricting clicks to nodes with children is up to the caller.
    ///
    /// A request during a running transition pre-empts it: the old target is
    /// discarded and the new transition starts from the mid-flight frames.
    /// Returns true if a transition was started.
    pub fn focus_on(&mut self, tree: &CategoryTree, node: NodeId) -> bool {
        if !self.can_focus(tree, node) {
            return false;
        }
        if self.transition.is_some() {
            tracing::debug!(
                "Zoom pre-empted: retargeting from '{}' to '{}'",
                tree.get(self.focus).name,
                tree.get(node).name
            );
        }

        self.origin.clone_from(&self.current);
        self.target = target_frames(tree, node);
        self.focus = node;
        self.transition = Some(Transition::new(self.duration, self.easing));
        true
    }

    /// Animate back to the focus's parent (or the root).
    /// Returns false when the focus already is the root.
    pub fn zoom_out(&mut self, tree: &CategoryTree) -> bool {
        if self.focus == tree.root {
            return false;
        }
        let parent = tree.get(self.focus).parent.unwrap_or(tree.root);
        self.focus_on(tree, parent)
    }

    /// Move the focus without animation, cancelling any running transition.
    pub fn jump_to(&mut self, tree: &CategoryTree, node: NodeId) -> bool {
        if !self.can_focus(tree, node) {
            return false;
        }
        self.target = target_frames(tree, node);
        self.current.clone_from(&self.target);
        self.origin.clone_from(&self.target);
        self.focus = node;
        self.transition = None;
        true
    }

    /// Advance the running transition by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let Some(transition) = self.transition.as_mut() else {
            return TickOutcome::Idle;
        };
        transition.tick(dt);

        if transition.is_complete() {
            self.current.clone_from(&self.target);
            self.transition = None;
            return TickOutcome::Completed;
        }

        let t = transition.progress();
        let frames = self.current.iter_mut().zip(&self.origin).zip(&self.target);
        for ((current, origin), target) in frames {
            *current = interpolate(origin, target, t);
        }
        TickOutcome::Advanced(t)
    }

    fn can_focus(&self, tree: &CategoryTree, node: NodeId) -> bool {
        let Some(target) = tree.try_get(node) else {
            tracing::warn!("Zoom request for unknown node {:?} ignored", node);
            return false;
        };
        // Don't zoom into the node already in focus
        if node == self.focus {
            return false;
        }
        if target.layout.angle_span() <= 0.0 {
            tracing::warn!(
                "Zoom onto '{}' ignored: node has no angular extent",
                PathKey::of(tree, node)
            );
            return false;
        }
        true
    }
}

/// Frames for every node, normalized so `focus` fills the full circle.
pub fn target_frames(tree: &CategoryTree, focus: NodeId) -> Vec<Frame> {
    let focus_node = tree.get(focus);
    let focus_frame = focus_node.layout;
    tree.nodes
        .iter()
        .map(|node| node.layout.relative_to(&focus_frame, focus_node.depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, FULL_CIRCLE};
    use crate::tree::aggregate::{aggregate_values, sort_children_by_value};
    use crate::tree::arena::CategoryNode;

    /// Total -> {a(3) -> {a1(2), a2(1)}, b(1) -> {b1(1)}}
    fn laid_out() -> (CategoryTree, NodeId, NodeId, NodeId) {
        let mut tree = CategoryTree::new("Total");
        let root = tree.root;
        let a = tree.add_child(root, CategoryNode::new("a", 0.0));
        let b = tree.add_child(root, CategoryNode::new("b", 0.0));
        let a1 = tree.add_child(a, CategoryNode::new("a1", 2.0));
        tree.add_child(a, CategoryNode::new("a2", 1.0));
        tree.add_child(b, CategoryNode::new("b1", 1.0));
        aggregate_values(&mut tree);
        sort_children_by_value(&mut tree);
        compute_layout(&mut tree);
        (tree, a, b, a1)
    }

    fn state(tree: &CategoryTree) -> ZoomState {
        ZoomState::new(tree, Duration::from_millis(750), Easing::Linear)
    }

    #[test]
    fn starts_idle_on_root() {
        let (tree, a, ..) = laid_out();
        let zoom = state(&tree);
        assert_eq!(zoom.phase(), ZoomPhase::Idle);
        assert_eq!(zoom.focus(), tree.root);
        assert_eq!(zoom.current_frame(a), zoom.target_frame(a));
    }

    #[test]
    fn focus_stretches_subtree_and_completes_exactly() {
        let (tree, a, b, a1) = laid_out();
        let mut zoom = state(&tree);

        assert!(zoom.focus_on(&tree, a));
        assert_eq!(zoom.phase(), ZoomPhase::Transitioning);

        let fa = zoom.target_frame(a);
        assert_eq!((fa.angle_start, fa.angle_end), (0.0, FULL_CIRCLE));
        assert_eq!((fa.depth_start, fa.depth_end), (0.0, 1.0));
        let fb = zoom.target_frame(b);
        assert!(!fb.arc_visible(tree.height()));
        assert!(zoom.target_frame(a1).arc_visible(tree.height()));

        assert!(matches!(zoom.tick(Duration::from_millis(375)), TickOutcome::Advanced(_)));
        let mid = zoom.current_frame(a);
        assert!(mid.angle_end > tree.get(a).layout.angle_end && mid.angle_end < FULL_CIRCLE);

        assert_eq!(zoom.tick(Duration::from_millis(400)), TickOutcome::Completed);
        assert_eq!(zoom.phase(), ZoomPhase::Idle);
        assert_eq!(zoom.current_frames(), zoom.target_frames());
        assert_eq!(zoom.tick(Duration::from_millis(16)), TickOutcome::Idle);
    }

    #[test]
    fn unknown_nodes_and_current_focus_are_not_zoomable() {
        let (tree, a, _, a1) = laid_out();
        let mut zoom = state(&tree);
        assert!(!zoom.focus_on(&tree, tree.root));
        assert!(!zoom.focus_on(&tree, NodeId(500)));
        assert!(zoom.focus_on(&tree, a));
        assert!(!zoom.focus_on(&tree, a));

        // a leaf fills the circle on its own
        assert!(zoom.focus_on(&tree, a1));
        assert_eq!(zoom.target_frame(a1).angle_span(), FULL_CIRCLE);
    }

    #[test]
    fn zoom_out_round_trip_restores_targets() {
        let (tree, a, ..) = laid_out();
        let mut zoom = state(&tree);
        let before = zoom.target_frames().to_vec();

        zoom.focus_on(&tree, a);
        zoom.tick(Duration::from_secs(1));
        assert!(zoom.zoom_out(&tree));
        assert_eq!(zoom.focus(), tree.root);
        assert_eq!(zoom.target_frames(), before.as_slice());

        zoom.tick(Duration::from_secs(1));
        assert!(!zoom.zoom_out(&tree));
    }

    #[test]
    fn preemption_restarts_from_mid_flight_frames() {
        let (tree, a, b, _) = laid_out();
        let mut zoom = state(&tree);

        zoom.focus_on(&tree, a);
        zoom.tick(Duration::from_millis(300));
        let mid_flight = zoom.current_frames().to_vec();

        assert!(zoom.focus_on(&tree, b));
        assert_eq!(zoom.focus(), b);
        assert_eq!(zoom.progress(), Some(0.0));
        // nothing jumps at the moment of pre-emption
        assert_eq!(zoom.current_frames(), mid_flight.as_slice());

        zoom.tick(Duration::from_millis(750));
        let fb = zoom.current_frame(b);
        assert_eq!((fb.angle_start, fb.angle_end), (0.0, FULL_CIRCLE));
    }

    #[test]
    fn jump_to_is_instant() {
        let (tree, a, ..) = laid_out();
        let mut zoom = state(&tree);
        assert!(zoom.jump_to(&tree, a));
        assert_eq!(zoom.phase(), ZoomPhase::Idle);
        assert_eq!(zoom.current_frame(a), zoom.target_frame(a));
        assert_eq!(zoom.focus(), a);
    }
}

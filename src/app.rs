use std::time::Duration;

use crate::config::{AggregationPolicy, SunburstConfig};
use crate::dataset::types::DimensionId;
use crate::dataset::RecordStore;
use crate::error::{Result, SunburstError};
use crate::layout::compute_layout;
use crate::render::scene::{build_legend, build_scene, focus_info, frame_updates};
use crate::render::{RenderAdapter, SunburstScene};
use crate::tree::arena::{CategoryTree, NodeId};
use crate::tree::build_tree;
use crate::tree::path::{self, PathKey};
use crate::ui::input::{self, InputAction};
use crate::ui::navigation::{TickOutcome, ZoomState};
use crate::ui::tooltip::{build_tooltip, TooltipInfo};

/// Message pushed to the adapter when there is nothing to draw.
pub const EMPTY_STATE_MESSAGE: &str = "No data available";

/// Chart phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPhase {
    /// No records loaded
    Empty,
    /// Tree built and laid out
    Ready,
}

/// Top-level chart state: records, configuration, the current tree and its zoom.
///
/// Every change to records or configuration rebuilds the tree wholesale and
/// re-locates the focus by path, so the user stays where they were when the
/// same path still exists.
pub struct SunburstChart {
    pub phase: ChartPhase,
    store: RecordStore,
    config: SunburstConfig,
    tree: CategoryTree,
    zoom: ZoomState,
    hover_node: Option<NodeId>,
}

impl SunburstChart {
    pub fn new(store: RecordStore, config: SunburstConfig) -> Result<Self> {
        config.validate()?;
        let tree = layout_tree(&store, &config)?;
        let zoom = ZoomState::new(&tree, config.transition, config.easing);
        Ok(Self {
            phase: phase_for(&store),
            store,
            config,
            tree,
            zoom,
            hover_node: None,
        })
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn config(&self) -> &SunburstConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn focus(&self) -> NodeId {
        self.zoom.focus()
    }

    pub fn focus_path(&self) -> PathKey {
        PathKey::of(&self.tree, self.zoom.focus())
    }

    pub fn hover_node(&self) -> Option<NodeId> {
        self.hover_node
    }

    /// Snapshot of everything drawable at the current zoom.
    pub fn scene(&self) -> SunburstScene {
        build_scene(&self.tree, &self.zoom, self.config.label_min_area)
    }

    /// Full redraw, or the empty state when no records are loaded.
    pub fn render(&self, adapter: &mut dyn RenderAdapter) {
        match self.phase {
            ChartPhase::Empty => {
                tracing::debug!("{}", SunburstError::EmptyDataset);
                adapter.show_empty_state(EMPTY_STATE_MESSAGE);
            }
            ChartPhase::Ready => {
                let scene = self.scene();
                adapter.draw(&scene);
                adapter.focus_changed(&scene.focus, &scene.legend);
            }
        }
    }

    /// Change the grouping dimensions (ordered, at most two).
    pub fn set_dimensions(
        &mut self,
        dimensions: &[DimensionId],
        adapter: &mut dyn RenderAdapter,
    ) -> Result<()> {
        let mut config = self.config.clone();
        config.active_dimensions = dimensions.to_vec();
        self.apply_config(config, adapter)
    }

    /// Change the grouping dimensions by name, e.g. `["age", "gender"]`.
    pub fn set_dimensions_by_name(
        &mut self,
        names: &[&str],
        adapter: &mut dyn RenderAdapter,
    ) -> Result<()> {
        let dimensions = self.store.resolve_dimensions(names)?;
        self.set_dimensions(&dimensions, adapter)
    }

    /// Toggle small-group folding.
    pub fn set_aggregation(
        &mut self,
        enabled: bool,
        adapter: &mut dyn RenderAdapter,
    ) -> Result<()> {
        let mut config = self.config.clone();
        config.aggregation.enabled = enabled;
        self.apply_config(config, adapter)
    }

    /// Change the folding threshold (fraction of the sibling total).
    pub fn set_threshold(&mut self, threshold: f64, adapter: &mut dyn RenderAdapter) -> Result<()> {
        let mut config = self.config.clone();
        config.aggregation = AggregationPolicy {
            threshold,
            ..config.aggregation
        };
        self.apply_config(config, adapter)
    }

    /// Swap the record set (e.g. after an external filter change).
    pub fn replace_records(
        &mut self,
        store: RecordStore,
        adapter: &mut dyn RenderAdapter,
    ) -> Result<()> {
        let tree = layout_tree(&store, &self.config)?;
        self.store = store;
        self.install(tree, adapter);
        Ok(())
    }

    fn apply_config(
        &mut self,
        config: SunburstConfig,
        adapter: &mut dyn RenderAdapter,
    ) -> Result<()> {
        config.validate()?;
        let tree = layout_tree(&self.store, &config)?;
        self.config = config;
        self.install(tree, adapter);
        Ok(())
    }

    /// Replace the tree, carrying the focus over by path, then redraw.
    fn install(&mut self, tree: CategoryTree, adapter: &mut dyn RenderAdapter) {
        let focus_key = self.focus_path();
        let mut zoom = ZoomState::new(&tree, self.config.transition, self.config.easing);

        match path::resolve(&tree, &focus_key) {
            Ok(node) if node != tree.root => {
                if !zoom.jump_to(&tree, node) {
                    tracing::warn!("Focus '{}' can no longer be zoomed, reset to root", focus_key);
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("{}; focus reset to root", err),
        }

        self.tree = tree;
        self.zoom = zoom;
        self.hover_node = None;
        self.phase = phase_for(&self.store);
        self.render(adapter);
    }

    /// Animate onto `node`. Unknown nodes and the current focus are ignored;
    /// clicks and legend entries only reach here for nodes with children.
    pub fn activate(&mut self, node: NodeId, adapter: &mut dyn RenderAdapter) -> bool {
        if self.phase != ChartPhase::Ready || !self.zoom.focus_on(&self.tree, node) {
            return false;
        }
        self.focus_changed(adapter);
        true
    }

    /// Animate back to the focus's parent.
    pub fn zoom_out(&mut self, adapter: &mut dyn RenderAdapter) -> bool {
        if self.phase != ChartPhase::Ready || !self.zoom.zoom_out(&self.tree) {
            return false;
        }
        self.focus_changed(adapter);
        true
    }

    pub fn legend_click(&mut self, node: NodeId, adapter: &mut dyn RenderAdapter) -> bool {
        let action = input::process_legend_click(&self.tree, node);
        self.handle(action, adapter)
    }

    /// Click at polar coordinates (angle clockwise from 12 o'clock, radius in rings).
    pub fn click(&mut self, angle: f64, radius: f64, adapter: &mut dyn RenderAdapter) -> bool {
        let action = input::process_click(&self.tree, &self.zoom, angle, radius);
        self.handle(action, adapter)
    }

    /// Pointer move at polar coordinates. Returns the tooltip for the arc
    /// under the pointer, if any.
    pub fn hover(&mut self, angle: f64, radius: f64) -> Option<TooltipInfo> {
        let action = input::process_hover(&self.tree, &self.zoom, angle, radius);
        if let InputAction::Hover { node } = action {
            self.hover_node = if self.zoom.is_transitioning() { None } else { node };
        }
        self.hover_node.and_then(|node| self.tooltip(node))
    }

    /// Apply an input action. Returns true if a zoom started.
    pub fn handle(&mut self, action: InputAction, adapter: &mut dyn RenderAdapter) -> bool {
        match action {
            InputAction::Focus { node } => self.activate(node, adapter),
            InputAction::ZoomOut => self.zoom_out(adapter),
            InputAction::Hover { node } => {
                if !self.zoom.is_transitioning() {
                    self.hover_node = node;
                }
                false
            }
            InputAction::None => false,
        }
    }

    /// Advance the zoom clock and push the interpolated frames.
    pub fn tick(&mut self, dt: Duration, adapter: &mut dyn RenderAdapter) -> TickOutcome {
        let outcome = self.zoom.tick(dt);
        let progress = match outcome {
            TickOutcome::Idle => return outcome,
            TickOutcome::Advanced(t) => t,
            TickOutcome::Completed => 1.0,
        };
        let updates = frame_updates(&self.tree, &self.zoom, self.config.label_min_area);
        adapter.update_frames(&updates, progress);
        outcome
    }

    /// Tooltip for a drawn arc. Suppressed while a transition is running.
    pub fn tooltip(&self, node: NodeId) -> Option<TooltipInfo> {
        if self.zoom.is_transitioning() || node == self.tree.root {
            return None;
        }
        self.tree.try_get(node)?;
        Some(build_tooltip(&self.tree, node))
    }

    /// Tooltip rendered as text, values suffixed with the configured measure label.
    pub fn tooltip_text(&self, node: NodeId) -> Option<String> {
        self.tooltip(node).map(|info| info.text(&self.config.measure_label))
    }

    fn focus_changed(&mut self, adapter: &mut dyn RenderAdapter) {
        self.hover_node = None;
        let focus = self.zoom.focus();
        tracing::debug!("Focus moved to '{}'", PathKey::of(&self.tree, focus));
        let info = focus_info(&self.tree, focus);
        let legend = build_legend(&self.tree, focus);
        adapter.focus_changed(&info, &legend);
    }
}

fn layout_tree(store: &RecordStore, config: &SunburstConfig) -> Result<CategoryTree> {
    let mut tree = build_tree(store, &config.active_dimensions, &config.aggregation)?;
    let summary = compute_layout(&mut tree);
    tracing::info!(
        "Layout computed: {} arcs over {} rings",
        tree.len().saturating_sub(1),
        summary.max_depth
    );
    Ok(tree)
}

fn phase_for(store: &RecordStore) -> ChartPhase {
    if store.is_empty() {
        ChartPhase::Empty
    } else {
        ChartPhase::Ready
    }
}

//! Pointer-driven perturbation of the simulation plus hover/selection overlays.
//!
//! The controller only ever writes pins and reheats; velocities and unpinned
//! positions stay owned by [`Simulation`].

mod emphasis;

use eframe::egui::Vec2;
use tracing::debug;

use crate::graph::SubgraphEdge;
use crate::physics::Simulation;
pub use emphasis::{EdgeStroke, Emphasis, HoverTarget, edge_emphasis};

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    dragging: Option<usize>,
    hover: HoverTarget,
    /// Store index, so the selection can outlive a filter change.
    selected: Option<usize>,
}

impl InteractionController {
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn hover(&self) -> HoverTarget {
        self.hover
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn drag_start(&mut self, simulation: &mut Simulation, local: usize) {
        let Some(position) = simulation.node(local).map(|node| node.position) else {
            return;
        };

        if let Some(previous) = self.dragging.take()
            && previous != local
        {
            simulation.unpin(previous);
        }

        simulation.pin(local, position);
        simulation.reheat(simulation.config().reheat_alpha_target);
        self.dragging = Some(local);
        debug!(vertex = local, "drag started");
    }

    pub fn drag_move(&mut self, simulation: &mut Simulation, local: usize, to: Vec2) {
        if self.dragging != Some(local) {
            return;
        }
        simulation.pin(local, to);
    }

    pub fn drag_end(&mut self, simulation: &mut Simulation, local: usize) {
        if self.dragging != Some(local) {
            return;
        }

        simulation.unpin(local);
        simulation.release_heat();
        self.dragging = None;
        debug!(vertex = local, "drag ended");
    }

    pub fn set_hover(&mut self, hover: HoverTarget) {
        self.hover = hover;
    }

    pub fn select(&mut self, store_index: Option<usize>) {
        self.selected = store_index;
    }

    pub fn emphasis(&self, edges: &[SubgraphEdge]) -> Vec<Emphasis> {
        edge_emphasis(self.hover, edges)
    }

    /// Drop state tied to the previous visible subgraph.
    pub fn reset_transient(&mut self) {
        self.dragging = None;
        self.hover = HoverTarget::None;
    }
}

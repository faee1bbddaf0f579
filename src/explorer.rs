use eframe::egui::vec2;
use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::{
    Category, Edge, EdgeId, EdgeIssue, Filter, GraphStore, Subgraph, Vertex, derive_subgraph,
};
use crate::interaction::{Emphasis, HoverTarget, InteractionController};
use crate::layout::{Viewport, project};
use crate::physics::{Link, NodeSpec, QuadtreeCell, Simulation, SimulationConfig, TickOutcome};

/// Pointer target as reported by the UI, by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget<'a> {
    None,
    Vertex(&'a str),
    Edge(EdgeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Outgoing,
    Incoming,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IncidentEdge {
    pub id: EdgeId,
    pub direction: EdgeDirection,
    pub other_id: String,
    pub other_label: String,
    pub relation: String,
    pub weight: f32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectionDetails {
    pub vertex: Vertex,
    pub incident: Vec<IncidentEdge>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameVertex {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameEdge {
    pub id: EdgeId,
    /// Index into [`Frame::vertices`].
    pub source: usize,
    pub target: usize,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub relation: String,
    pub weight: f32,
    pub emphasis: Emphasis,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub vertices: Vec<FrameVertex>,
    pub edges: Vec<FrameEdge>,
    pub selection: Option<SelectionDetails>,
}

struct VisibleGraph {
    subgraph: Subgraph,
    simulation: Simulation,
}

/// Owns the store, the current visible subgraph with its simulation, and the
/// interaction state. Filter changes replace the visible graph wholesale.
pub struct GraphExplorer {
    store: GraphStore,
    config: SimulationConfig,
    viewport: Viewport,
    visible: VisibleGraph,
    controller: InteractionController,
}

impl GraphExplorer {
    pub fn new(store: GraphStore, config: SimulationConfig, viewport: Viewport) -> Self {
        Self::with_filter(store, config, viewport, Filter::All)
    }

    pub fn with_filter(
        store: GraphStore,
        config: SimulationConfig,
        viewport: Viewport,
        filter: Filter,
    ) -> Self {
        let visible = Self::build_visible(&store, filter, config, viewport);
        Self {
            store,
            config,
            viewport,
            visible,
            controller: InteractionController::default(),
        }
    }

    fn build_visible(
        store: &GraphStore,
        filter: Filter,
        config: SimulationConfig,
        viewport: Viewport,
    ) -> VisibleGraph {
        let subgraph = derive_subgraph(store, filter);
        for issue in &subgraph.issues {
            warn!(
                edge = issue.edge,
                source = %issue.source,
                target = %issue.target,
                reason = %issue.kind,
                "excluding malformed edge from layout"
            );
        }

        let specs = subgraph
            .vertices
            .iter()
            .map(|&store_index| {
                let vertex = &store.vertices()[store_index];
                let style = vertex.category().style();
                NodeSpec {
                    key: vertex.id.clone(),
                    radius: style.radius,
                    mass: style.mass,
                    position: None,
                }
            })
            .collect::<Vec<_>>();
        let links = subgraph
            .edges
            .iter()
            .map(|edge| Link {
                source: edge.source,
                target: edge.target,
                weight: edge.weight,
            })
            .collect();

        let simulation = Simulation::new(&specs, links, config, viewport.center());
        debug!(
            filter = filter.label(),
            vertices = subgraph.vertex_count(),
            edges = subgraph.edge_count(),
            "rebuilt visible subgraph"
        );

        VisibleGraph {
            subgraph,
            simulation,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.visible.subgraph.filter
    }

    pub fn subgraph(&self) -> &Subgraph {
        &self.visible.subgraph
    }

    pub fn simulation(&self) -> &Simulation {
        &self.visible.simulation
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn issues(&self) -> &[EdgeIssue] {
        &self.visible.subgraph.issues
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if filter == self.filter() {
            return;
        }

        self.visible = Self::build_visible(&self.store, filter, self.config, self.viewport);
        self.controller.reset_transient();
        if let Some(selected) = self.controller.selected()
            && self.visible.subgraph.local_index(selected).is_none()
        {
            self.controller.select(None);
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.visible.simulation.set_center(viewport.center());
    }

    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.visible.simulation.tick();
        if outcome == TickOutcome::TickCapReached {
            debug!(
                ticks = self.visible.simulation.ticks_since_start(),
                alpha = self.visible.simulation.alpha(),
                "tick cap reached before settling"
            );
        }
        outcome
    }

    /// Jump alpha to `alpha` for a fresh layout pass over the current positions.
    pub fn restart(&mut self, alpha: f32) {
        self.visible.simulation.restart(alpha);
        debug!(alpha, "layout restarted");
    }

    pub fn settle(&mut self) -> usize {
        let ticks = self.visible.simulation.run_to_rest();
        debug!(ticks, alpha = self.visible.simulation.alpha(), "layout settled");
        ticks
    }

    pub fn quadtree_cells(&mut self) -> Vec<QuadtreeCell> {
        self.visible.simulation.quadtree_cells()
    }

    fn local_index(&self, vertex_id: &str) -> Option<usize> {
        self.visible.subgraph.local_index_of(&self.store, vertex_id)
    }

    pub fn on_drag_start(&mut self, vertex_id: &str) {
        if let Some(local) = self.local_index(vertex_id) {
            self.controller
                .drag_start(&mut self.visible.simulation, local);
        }
    }

    pub fn on_drag_move(&mut self, vertex_id: &str, x: f32, y: f32) {
        if let Some(local) = self.local_index(vertex_id) {
            self.controller
                .drag_move(&mut self.visible.simulation, local, vec2(x, y));
        }
    }

    pub fn on_drag_end(&mut self, vertex_id: &str) {
        if let Some(local) = self.local_index(vertex_id) {
            self.controller.drag_end(&mut self.visible.simulation, local);
        }
    }

    pub fn on_hover(&mut self, target: PointerTarget<'_>) {
        let hover = match target {
            PointerTarget::None => HoverTarget::None,
            PointerTarget::Vertex(vertex_id) => match self.local_index(vertex_id) {
                Some(local) => HoverTarget::Vertex(local),
                None => return,
            },
            PointerTarget::Edge(edge_id) => match self.visible.subgraph.local_edge(edge_id) {
                Some(local) => HoverTarget::Edge(local),
                None => return,
            },
        };
        self.controller.set_hover(hover);
    }

    pub fn on_select(&mut self, vertex_id: Option<&str>) {
        let Some(vertex_id) = vertex_id else {
            self.controller.select(None);
            return;
        };

        if let Some(store_index) = self.store.index_of(vertex_id)
            && self.visible.subgraph.local_index(store_index).is_some()
        {
            self.controller.select(Some(store_index));
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        let store_index = self.controller.selected()?;
        self.store
            .vertices()
            .get(store_index)
            .map(|vertex| vertex.id.as_str())
    }

    pub fn hovered_edge(&self) -> Option<(EdgeId, &Edge)> {
        let HoverTarget::Edge(local) = self.controller.hover() else {
            return None;
        };
        let edge_id = self.visible.subgraph.edges.get(local)?.id;
        self.store.edge(edge_id).map(|edge| (edge_id, edge))
    }

    pub fn selection(&self) -> Option<SelectionDetails> {
        let store_index = self.controller.selected()?;
        let vertex = self.store.vertices().get(store_index)?;

        let incident = self
            .store
            .incident_edges(store_index)
            .iter()
            .filter_map(|&edge_id| {
                let edge = self.store.edge(edge_id)?;
                let (direction, other_id) = if edge.source == vertex.id {
                    (EdgeDirection::Outgoing, &edge.target)
                } else {
                    (EdgeDirection::Incoming, &edge.source)
                };
                let other = self.store.vertex(other_id)?;
                Some(IncidentEdge {
                    id: edge_id,
                    direction,
                    other_id: other.id.clone(),
                    other_label: other.label.clone(),
                    relation: edge.relation.clone(),
                    weight: edge.weight,
                    visible: self.visible.subgraph.local_edge(edge_id).is_some(),
                })
            })
            .collect();

        Some(SelectionDetails {
            vertex: vertex.clone(),
            incident,
        })
    }

    pub fn frame(&self) -> Frame {
        let simulation = &self.visible.simulation;
        let subgraph = &self.visible.subgraph;
        let rendered = project(simulation.nodes(), self.viewport);

        let vertices = subgraph
            .vertices
            .iter()
            .zip(simulation.nodes())
            .zip(&rendered)
            .map(|((&store_index, node), position)| {
                let vertex = &self.store.vertices()[store_index];
                FrameVertex {
                    id: vertex.id.clone(),
                    label: vertex.label.clone(),
                    category: vertex.category(),
                    x: position.x,
                    y: position.y,
                    radius: node.radius,
                    pinned: node.pin.is_some(),
                }
            })
            .collect();

        let emphasis = self.controller.emphasis(&subgraph.edges);
        let edges = subgraph
            .edges
            .iter()
            .zip(emphasis)
            .map(|(edge, emphasis)| {
                let from = rendered[edge.source];
                let to = rendered[edge.target];
                FrameEdge {
                    id: edge.id,
                    source: edge.source,
                    target: edge.target,
                    x1: from.x,
                    y1: from.y,
                    x2: to.x,
                    y2: to.y,
                    relation: self.store.edges()[edge.id].relation.clone(),
                    weight: edge.weight,
                    emphasis,
                }
            })
            .collect();

        Frame {
            vertices,
            edges,
            selection: self.selection(),
        }
    }
}

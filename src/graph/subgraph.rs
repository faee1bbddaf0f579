use std::fmt;

use serde::Serialize;

use super::{EdgeId, Filter, GraphStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeIssueKind {
    MissingSource,
    MissingTarget,
    SelfLoop,
    InvalidWeight,
}

impl fmt::Display for EdgeIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingSource => "source vertex does not exist",
            Self::MissingTarget => "target vertex does not exist",
            Self::SelfLoop => "source and target are the same vertex",
            Self::InvalidWeight => "weight is not a positive number",
        })
    }
}

/// A malformed edge excluded from the subgraph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeIssue {
    pub edge: EdgeId,
    pub source: String,
    pub target: String,
    pub kind: EdgeIssueKind,
}

/// An edge of the visible subgraph with endpoints resolved to local indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubgraphEdge {
    pub id: EdgeId,
    pub source: usize,
    pub target: usize,
    pub weight: f32,
}

impl SubgraphEdge {
    pub fn touches(&self, local: usize) -> bool {
        self.source == local || self.target == local
    }
}

/// Vertices and edges induced by a filter. Vertices are store indices in
/// store order; position in `vertices` is the local index used everywhere
/// downstream.
#[derive(Clone, Debug, Default)]
pub struct Subgraph {
    pub filter: Filter,
    pub vertices: Vec<usize>,
    pub edges: Vec<SubgraphEdge>,
    pub issues: Vec<EdgeIssue>,
    local_by_store: Vec<Option<usize>>,
    edge_by_store: Vec<Option<usize>>,
}

impl Subgraph {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn local_index(&self, store_index: usize) -> Option<usize> {
        self.local_by_store.get(store_index).copied().flatten()
    }

    pub fn local_index_of(&self, store: &GraphStore, id: &str) -> Option<usize> {
        store
            .index_of(id)
            .and_then(|store_index| self.local_index(store_index))
    }

    pub fn local_edge(&self, edge_id: EdgeId) -> Option<usize> {
        self.edge_by_store.get(edge_id).copied().flatten()
    }
}

/// Derive the visible subgraph for `filter` in O(V + E).
pub fn derive_subgraph(store: &GraphStore, filter: Filter) -> Subgraph {
    let mut local_by_store = vec![None; store.vertex_count()];
    let mut vertices = Vec::new();
    for (store_index, vertex) in store.vertices().iter().enumerate() {
        if filter.admits(vertex.category()) {
            local_by_store[store_index] = Some(vertices.len());
            vertices.push(store_index);
        }
    }

    let mut edges = Vec::new();
    let mut issues = Vec::new();
    let mut edge_by_store = vec![None; store.edge_count()];
    for (edge_id, edge) in store.edges().iter().enumerate() {
        if let Some(kind) = store.edge_issue(edge_id) {
            issues.push(EdgeIssue {
                edge: edge_id,
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind,
            });
            continue;
        }

        let source = store
            .index_of(&edge.source)
            .and_then(|index| local_by_store[index]);
        let target = store
            .index_of(&edge.target)
            .and_then(|index| local_by_store[index]);

        if let (Some(source), Some(target)) = (source, target) {
            edge_by_store[edge_id] = Some(edges.len());
            edges.push(SubgraphEdge {
                id: edge_id,
                source,
                target,
                weight: edge.weight,
            });
        }
    }

    Subgraph {
        filter,
        vertices,
        edges,
        issues,
        local_by_store,
        edge_by_store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Attributes, Category, Edge, Vertex};

    fn vertex(id: &str, attributes: Attributes) -> Vertex {
        Vertex {
            id: id.to_string(),
            label: id.to_string(),
            full_name: None,
            attributes,
        }
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
            relation: "KEY_TARGET".to_string(),
            label: None,
            weight: 4.0,
        }
    }

    fn sample() -> GraphStore {
        GraphStore::new(
            vec![
                vertex(
                    "A",
                    Attributes::Area {
                        market: Vec::new(),
                        papers: None,
                    },
                ),
                vertex("B", Attributes::Target { pathway: None }),
                vertex(
                    "C",
                    Attributes::Compound {
                        moa: None,
                        approved: Vec::new(),
                    },
                ),
            ],
            vec![edge("A", "B"), edge("B", "C")],
        )
        .unwrap()
    }

    #[test]
    fn area_filter_keeps_only_area_vertex_and_no_edges() {
        let store = sample();
        let subgraph = derive_subgraph(&store, Filter::Only(Category::Area));

        assert_eq!(subgraph.vertices, vec![0]);
        assert!(subgraph.edges.is_empty());
        assert!(subgraph.issues.is_empty());
        assert_eq!(subgraph.local_index_of(&store, "B"), None);
    }

    #[test]
    fn all_filter_yields_full_graph_in_store_order() {
        let store = sample();
        let subgraph = derive_subgraph(&store, Filter::All);

        assert_eq!(subgraph.vertices, vec![0, 1, 2]);
        assert_eq!(subgraph.edge_count(), 2);
        assert_eq!(subgraph.edges[1].source, 1);
        assert_eq!(subgraph.edges[1].target, 2);
        assert_eq!(subgraph.local_edge(1), Some(1));
    }

    #[test]
    fn malformed_edges_are_reported_not_applied() {
        let store = GraphStore::new(
            sample().vertices().to_vec(),
            vec![edge("A", "B"), edge("A", "NOPE"), edge("C", "C")],
        )
        .unwrap();
        let subgraph = derive_subgraph(&store, Filter::All);

        assert_eq!(subgraph.edge_count(), 1);
        assert_eq!(subgraph.issues.len(), 2);
        assert_eq!(subgraph.issues[0].kind, EdgeIssueKind::MissingTarget);
        assert_eq!(subgraph.issues[0].target, "NOPE");
        assert_eq!(subgraph.issues[1].kind, EdgeIssueKind::SelfLoop);
        assert_eq!(subgraph.local_edge(1), None);
    }
}

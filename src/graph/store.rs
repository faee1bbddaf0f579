use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::{Category, Edge, EdgeIssueKind, GraphError, Vertex};

/// Index of an edge in the store's edge list; stable across filter changes.
pub type EdgeId = usize;

/// The full, immutable vertex/edge set supplied by the data source.
#[derive(Clone, Debug)]
pub struct GraphStore {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    incident: Vec<Vec<EdgeId>>,
}

impl GraphStore {
    pub fn new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut index_by_id = HashMap::with_capacity(vertices.len());
        for (index, vertex) in vertices.iter().enumerate() {
            match index_by_id.entry(vertex.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(GraphError::DuplicateVertex {
                        id: vertex.id.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }

        let mut store = Self {
            incident: vec![Vec::new(); vertices.len()],
            vertices,
            edges,
            index_by_id,
        };

        for edge_id in 0..store.edges.len() {
            if store.edge_issue(edge_id).is_some() {
                continue;
            }

            let edge = &store.edges[edge_id];
            let source = store.index_by_id[&edge.source];
            let target = store.index_by_id[&edge.target];
            store.incident[source].push(edge_id);
            store.incident[target].push(edge_id);
        }

        Ok(store)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.index_of(id).map(|index| &self.vertices[index])
    }

    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    /// Well-formed edges touching the vertex at `index`, in store order.
    pub fn incident_edges(&self, index: usize) -> &[EdgeId] {
        self.incident.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_by_category(&self, category: Category) -> usize {
        self.vertices
            .iter()
            .filter(|vertex| vertex.category() == category)
            .count()
    }

    /// Why the edge cannot take part in any subgraph, if it is malformed.
    pub fn edge_issue(&self, edge_id: EdgeId) -> Option<EdgeIssueKind> {
        let edge = self.edges.get(edge_id)?;
        if !self.index_by_id.contains_key(&edge.source) {
            return Some(EdgeIssueKind::MissingSource);
        }
        if !self.index_by_id.contains_key(&edge.target) {
            return Some(EdgeIssueKind::MissingTarget);
        }
        if edge.source == edge.target {
            return Some(EdgeIssueKind::SelfLoop);
        }
        if !edge.weight.is_finite() || edge.weight <= 0.0 {
            return Some(EdgeIssueKind::InvalidWeight);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Attributes;

    fn vertex(id: &str) -> Vertex {
        Vertex {
            id: id.to_string(),
            label: id.to_string(),
            full_name: None,
            attributes: Attributes::Target { pathway: None },
        }
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
            relation: "ASSOCIATED".to_string(),
            label: None,
            weight: 2.0,
        }
    }

    #[test]
    fn duplicate_vertex_ids_are_rejected() {
        let error = GraphStore::new(vec![vertex("A"), vertex("A")], Vec::new()).unwrap_err();
        assert!(matches!(error, GraphError::DuplicateVertex { id } if id == "A"));
    }

    #[test]
    fn incident_lists_skip_malformed_edges() {
        let store = GraphStore::new(
            vec![vertex("A"), vertex("B")],
            vec![edge("A", "B"), edge("A", "GHOST"), edge("B", "B"), edge("B", "A")],
        )
        .unwrap();

        assert_eq!(store.incident_edges(0), &[0, 3]);
        assert_eq!(store.incident_edges(1), &[0, 3]);
        assert_eq!(store.edge_issue(1), Some(EdgeIssueKind::MissingTarget));
        assert_eq!(store.edge_issue(2), Some(EdgeIssueKind::SelfLoop));
        assert_eq!(store.edge_issue(3), None);
        assert!(store.incident_edges(7).is_empty());
    }

    #[test]
    fn non_positive_weight_is_an_issue() {
        let mut heavy = edge("A", "B");
        heavy.weight = 0.0;
        let store = GraphStore::new(vec![vertex("A"), vertex("B")], vec![heavy]).unwrap();
        assert_eq!(store.edge_issue(0), Some(EdgeIssueKind::InvalidWeight));
    }
}

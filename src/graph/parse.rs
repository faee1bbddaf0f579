use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::{Edge, GraphStore, Vertex};

const DEMO_GRAPH: &str = include_str!("../../data/therapeutic_graph.json");

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<Value>,
    #[serde(default)]
    edges: Vec<Edge>,
}

pub fn load_graph_json(raw: &str) -> Result<GraphStore> {
    let parsed: RawGraph = serde_json::from_str(raw).context("invalid graph JSON")?;
    if parsed.nodes.is_empty() {
        return Err(anyhow!("graph payload contains no nodes"));
    }

    let mut vertices = Vec::with_capacity(parsed.nodes.len());
    for (position, value) in parsed.nodes.into_iter().enumerate() {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<missing id>")
            .to_string();
        let vertex = Vertex::deserialize(value)
            .with_context(|| format!("invalid node #{position} ({id})"))?;
        vertices.push(vertex);
    }

    GraphStore::new(vertices, parsed.edges).context("graph payload violates store invariants")
}

pub fn load_graph_file(path: &Path) -> Result<GraphStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    load_graph_json(&raw).with_context(|| format!("failed to load graph from {}", path.display()))
}

/// The bundled therapeutic knowledge graph.
pub fn demo_graph() -> Result<GraphStore> {
    load_graph_json(DEMO_GRAPH).context("bundled demo graph is invalid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Category;

    #[test]
    fn demo_graph_loads_every_node_and_edge() {
        let store = demo_graph().unwrap();
        assert_eq!(store.vertex_count(), 24);
        assert_eq!(store.edge_count(), 35);
        assert_eq!(store.count_by_category(Category::Area), 3);
        assert_eq!(store.count_by_category(Category::Regulator), 2);
        assert!((0..store.edge_count()).all(|edge| store.edge_issue(edge).is_none()));
    }

    #[test]
    fn bad_node_reports_its_position_and_id() {
        let raw = r#"{ "nodes": [ { "id": "X", "label": "X", "type": "gene" } ], "edges": [] }"#;
        let error = load_graph_json(raw).unwrap_err();
        assert!(format!("{error:#}").contains("invalid node #0 (X)"));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(load_graph_json(r#"{ "nodes": [], "edges": [] }"#).is_err());
        assert!(load_graph_json("not json").is_err());
    }

    #[test]
    fn duplicate_ids_surface_as_load_error() {
        let raw = r#"{ "nodes": [
            { "id": "FDA", "label": "FDA", "type": "regulator" },
            { "id": "FDA", "label": "FDA again", "type": "regulator" }
        ] }"#;
        let error = load_graph_json(raw).unwrap_err();
        assert!(format!("{error:#}").contains("duplicate vertex id: FDA"));
    }
}

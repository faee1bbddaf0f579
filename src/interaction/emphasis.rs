use serde::Serialize;

use crate::graph::SubgraphEdge;

/// What the pointer is over, in local (visible-subgraph) indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverTarget {
    #[default]
    None,
    Vertex(usize),
    Edge(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Neutral,
    Emphasized,
    DeEmphasized,
    /// The hovered edge whose details are called out.
    Callout,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStroke {
    pub opacity: f32,
    pub width: f32,
}

impl Emphasis {
    pub fn stroke(self, weight: f32) -> EdgeStroke {
        match self {
            Self::Neutral => EdgeStroke {
                opacity: 0.35,
                width: (weight * 0.4).max(0.5),
            },
            Self::Emphasized | Self::Callout => EdgeStroke {
                opacity: 0.9,
                width: weight * 0.7 + 1.0,
            },
            Self::DeEmphasized => EdgeStroke {
                opacity: 0.1,
                width: weight * 0.4,
            },
        }
    }
}

/// Emphasis of every edge for the given hover target.
pub fn edge_emphasis(hover: HoverTarget, edges: &[SubgraphEdge]) -> Vec<Emphasis> {
    match hover {
        HoverTarget::None => vec![Emphasis::Neutral; edges.len()],
        HoverTarget::Vertex(vertex) => edges
            .iter()
            .map(|edge| {
                if edge.touches(vertex) {
                    Emphasis::Emphasized
                } else {
                    Emphasis::DeEmphasized
                }
            })
            .collect(),
        HoverTarget::Edge(hovered) => (0..edges.len())
            .map(|index| {
                if index == hovered {
                    Emphasis::Callout
                } else {
                    Emphasis::Neutral
                }
            })
            .collect(),
    }
}

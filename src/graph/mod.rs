mod model;
mod parse;
mod store;
mod style;
mod subgraph;

pub use model::{AttributeValue, Attributes, Category, Edge, Filter, Vertex};
pub use parse::{demo_graph, load_graph_file, load_graph_json};
pub use store::{EdgeId, GraphStore};
pub use style::{CategoryStyle, relation_color};
pub use subgraph::{EdgeIssue, EdgeIssueKind, Subgraph, SubgraphEdge, derive_subgraph};

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate vertex id: {id}")]
    DuplicateVertex { id: String },
    #[error("unknown category filter: {tag} (expected \"all\" or a category tag)")]
    UnknownFilter { tag: String },
}

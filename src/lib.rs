//! Force-directed layout and interactive exploration of typed knowledge graphs.
//!
//! [`GraphExplorer`] is the entry point: it derives the visible subgraph for a
//! category filter, runs the force simulation one tick per frame, and turns
//! pointer input into pins, reheats, hover emphasis and selection.

#![forbid(unsafe_code)]

pub mod explorer;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod physics;
pub mod util;

pub use explorer::{Frame, FrameEdge, FrameVertex, GraphExplorer, PointerTarget, SelectionDetails};
pub use graph::{Category, Filter, GraphError, GraphStore};
pub use layout::Viewport;
pub use physics::{SimulationConfig, TickOutcome};

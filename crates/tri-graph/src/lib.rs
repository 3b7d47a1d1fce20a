#![deny(missing_docs)]

//! Trivalent signed multigraphs: construction, notation, traces, sign fan-out
//! and pure enumeration.

mod generators;
mod graph;
mod input;
pub mod notation;
mod permute;
mod serialization;
pub mod traces;

pub use generators::PureEnumerator;
pub use graph::{Bond, Graph, GraphBuilder, GraphInfo, Primitive, Units, VertexBreakdown};
pub use input::GraphInput;
pub use notation::parse_graph;
pub use permute::{SignFanout, SignMode, SignPermuter};
pub use traces::{compute_traces, Traces};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};

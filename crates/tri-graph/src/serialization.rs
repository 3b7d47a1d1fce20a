use serde::{Deserialize, Serialize};
use tri_core::errors::{ErrorInfo, TriError};

use crate::graph::{Graph, Units};

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &Graph) -> Result<Vec<u8>, TriError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| TriError::Serde(ErrorInfo::new("graph.serialize_bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Graph, TriError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes).map_err(|err| {
        TriError::Serde(ErrorInfo::new("graph.deserialize_bytes", err.to_string()))
    })?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &Graph) -> Result<String, TriError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| TriError::Serde(ErrorInfo::new("graph.serialize_json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<Graph, TriError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| TriError::Serde(ErrorInfo::new("graph.deserialize_json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    verts: usize,
    loops: Vec<Units>,
    bonds: Vec<SerializableBond>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableBond {
    a: u8,
    b: u8,
    units: Units,
}

impl SerializableGraph {
    fn from_graph(graph: &Graph) -> Self {
        let n = graph.num_verts();
        Self {
            verts: n,
            loops: (0..n).map(|i| graph.units(i, i)).collect(),
            bonds: graph
                .bonds()
                .map(|bond| SerializableBond {
                    a: bond.a.as_raw(),
                    b: bond.b.as_raw(),
                    units: bond.units,
                })
                .collect(),
        }
    }

    fn into_graph(self) -> Result<Graph, TriError> {
        let n = self.verts;
        if self.loops.len() != n {
            return Err(TriError::Serde(
                ErrorInfo::new("graph.deserialize", "loop table does not match vertex count")
                    .with_context("verts", n.to_string())
                    .with_context("loops", self.loops.len().to_string()),
            ));
        }
        let mut cells = vec![Units::default(); n * n];
        for (i, loops) in self.loops.into_iter().enumerate() {
            cells[i * n + i] = loops;
        }
        for bond in self.bonds {
            let (a, b) = (usize::from(bond.a), usize::from(bond.b));
            if a == 0 || b == 0 || a > n || b > n || a == b {
                return Err(TriError::Serde(
                    ErrorInfo::new("graph.deserialize", "bond endpoints are invalid")
                        .with_context("a", a.to_string())
                        .with_context("b", b.to_string()),
                ));
            }
            cells[(a - 1) * n + (b - 1)] = bond.units;
            cells[(b - 1) * n + (a - 1)] = bond.units;
        }
        Graph::from_unit_matrix(n, cells)
    }
}

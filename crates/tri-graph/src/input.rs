use tri_core::errors::TriError;

use crate::graph::Graph;
use crate::notation::parse_graph;

/// Anything that can be resolved into a single graph by concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphInput {
    /// Text in the graph notation.
    RawSpec(String),
    /// An already validated graph.
    Existing(Graph),
    /// Inputs concatenated in order.
    ListOf(Vec<GraphInput>),
}

impl GraphInput {
    /// Resolves the input, concatenating lists left to right.
    pub fn resolve(&self) -> Result<Graph, TriError> {
        match self {
            GraphInput::RawSpec(text) => parse_graph(text),
            GraphInput::Existing(graph) => Ok(graph.clone()),
            GraphInput::ListOf(items) => {
                if items.is_empty() {
                    return Err(TriError::structural(
                        "graph.empty",
                        "cannot resolve an empty input list",
                    ));
                }
                let parts = items
                    .iter()
                    .map(GraphInput::resolve)
                    .collect::<Result<Vec<_>, _>>()?;
                Graph::concat_all(&parts)
            }
        }
    }
}

impl From<&str> for GraphInput {
    fn from(text: &str) -> Self {
        GraphInput::RawSpec(text.to_string())
    }
}

impl From<String> for GraphInput {
    fn from(text: String) -> Self {
        GraphInput::RawSpec(text)
    }
}

impl From<Graph> for GraphInput {
    fn from(graph: Graph) -> Self {
        GraphInput::Existing(graph)
    }
}

impl<T: Into<GraphInput>> From<Vec<T>> for GraphInput {
    fn from(items: Vec<T>) -> Self {
        GraphInput::ListOf(items.into_iter().map(Into::into).collect())
    }
}

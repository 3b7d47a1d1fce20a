//! Structured error types shared across the `tri-*` crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TriError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (vertex ids, counts, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the particle graph engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TriError {
    /// Degree invariant, multiplicity or sign violations while building a graph.
    #[error("structural error: {0}")]
    Structural(ErrorInfo),
    /// Vertex count or trace length beyond the supported envelope.
    #[error("capacity error: {0}")]
    Capacity(ErrorInfo),
    /// Text notation that could not be tokenised.
    #[error("notation error: {0}")]
    Notation(ErrorInfo),
    /// Operation attempted on a catalog that was closed.
    #[error("closed catalog: {0}")]
    ClosedCatalog(ErrorInfo),
    /// Durable store open, read or write failures.
    #[error("storage error: {0}")]
    Storage(ErrorInfo),
    /// Serialization and configuration parsing errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl TriError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TriError::Structural(info)
            | TriError::Capacity(info)
            | TriError::Notation(info)
            | TriError::ClosedCatalog(info)
            | TriError::Storage(info)
            | TriError::Serde(info) => info,
        }
    }

    /// Shorthand for a [`TriError::Structural`] error.
    pub fn structural(code: impl Into<String>, message: impl Into<String>) -> Self {
        TriError::Structural(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`TriError::Storage`] error.
    pub fn storage(code: impl Into<String>, message: impl Into<String>) -> Self {
        TriError::Storage(ErrorInfo::new(code, message))
    }

    /// Returns a [`TriError::Capacity`] error for a vertex count above `limit`.
    pub fn too_many_vertices(found: usize, limit: usize) -> Self {
        TriError::Capacity(
            ErrorInfo::new(
                "graph.capacity",
                format!("{found} vertices exceeds the supported maximum of {limit}"),
            )
            .with_context("verts", found.to_string())
            .with_context("limit", limit.to_string()),
        )
    }
}

#![deny(missing_docs)]
#![doc = "Core types shared by the trivalent particle graph engine: errors, vertex ids, hard limits and configuration."]

use serde::{Deserialize, Serialize};

pub mod config;
pub mod errors;

pub use config::EngineConfig;
pub use errors::{ErrorInfo, TriError};

/// Largest vertex count any graph may carry; fixes the width of canonical identities.
pub const MAX_VTX: usize = 12;

/// Connection units carried by every vertex.
pub const VTX_CAPACITY: u8 = 3;

/// Longest trace vector computable without overflowing `i64` for `MAX_VTX` vertices.
pub const MAX_TRACES: usize = 36;

/// One-based vertex identifier scoped to a single graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VtxId(u8);

impl VtxId {
    /// Creates an identifier from its one-based raw value.
    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a zero-based vertex index.
    pub fn from_index(index: usize) -> Self {
        Self((index + 1) as u8)
    }

    /// Returns the one-based raw value.
    pub fn as_raw(&self) -> u8 {
        self.0
    }

    /// Returns the zero-based index of the vertex.
    pub fn index(&self) -> usize {
        usize::from(self.0).saturating_sub(1)
    }
}

/// Sign carried by a loop or edge unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Positive unit (`-` in the notation).
    Pos,
    /// Negative unit (`~` or `^` in the notation).
    Neg,
}

impl TryFrom<i8> for Sign {
    type Error = TriError;

    fn try_from(raw: i8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Sign::Pos),
            -1 => Ok(Sign::Neg),
            other => Err(TriError::Structural(
                ErrorInfo::new("graph.sign", format!("sign must be +1 or -1, got {other}"))
                    .with_context("sign", other.to_string()),
            )),
        }
    }
}

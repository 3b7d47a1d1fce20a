//! Matrix-power trace invariants.
//!
//! `T[k] = tr(A^k)` for the signed weighted adjacency matrix `A`. Entries of
//! `A` are bounded by 3 in absolute value and every row's absolute sum is at
//! most 3, so `|T[k]| <= N * 3^k`. With `i64` and `N <= MAX_VTX` every
//! `k <= MAX_TRACES` is exact; arithmetic is still checked.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::MAX_TRACES;

use crate::graph::Graph;

/// Trace vector `T[1..=K]`, stored zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traces(Vec<i64>);

impl Traces {
    /// Wraps raw trace values.
    pub fn from_vec(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// Number of traces held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no traces are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw values.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Consumes the vector.
    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// The first `len` traces (or all of them when shorter).
    pub fn truncated(&self, len: usize) -> Traces {
        Traces(self.0.iter().copied().take(len).collect())
    }

    /// Returns `true` when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&value| value == 0)
    }
}

impl Index<usize> for Traces {
    type Output = i64;

    fn index(&self, idx: usize) -> &i64 {
        &self.0[idx]
    }
}

impl fmt::Display for Traces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(i64::to_string).collect();
        write!(f, "[{}]", parts.join(","))
    }
}

/// Computes `len` traces, defaulting to the vertex count.
pub fn compute_traces(graph: &Graph, len: Option<usize>) -> Result<Traces, TriError> {
    let k = len.unwrap_or_else(|| graph.num_verts());
    if k > MAX_TRACES {
        return Err(TriError::Capacity(
            ErrorInfo::new(
                "traces.length",
                format!("{k} traces requested, at most {MAX_TRACES} are exact"),
            )
            .with_context("len", k.to_string())
            .with_context("limit", MAX_TRACES.to_string()),
        ));
    }
    let adjacency = graph.adjacency();
    let n = adjacency.len();
    let mut values = Vec::with_capacity(k);
    let mut power = adjacency.clone();
    for step in 0..k {
        if step > 0 {
            power = multiply(&power, &adjacency)?;
        }
        let mut trace = 0i64;
        for (i, row) in power.iter().enumerate().take(n) {
            trace = trace.checked_add(row[i]).ok_or_else(overflow)?;
        }
        values.push(trace);
    }
    Ok(Traces(values))
}

fn multiply(lhs: &[Vec<i64>], rhs: &[Vec<i64>]) -> Result<Vec<Vec<i64>>, TriError> {
    let n = lhs.len();
    let mut out = vec![vec![0i64; n]; n];
    for i in 0..n {
        for k in 0..n {
            let a = lhs[i][k];
            if a == 0 {
                continue;
            }
            for j in 0..n {
                let term = a.checked_mul(rhs[k][j]).ok_or_else(overflow)?;
                out[i][j] = out[i][j].checked_add(term).ok_or_else(overflow)?;
            }
        }
    }
    Ok(out)
}

fn overflow() -> TriError {
    TriError::Capacity(ErrorInfo::new(
        "traces.overflow",
        "trace arithmetic overflowed i64",
    ))
}

impl Graph {
    /// Trace vector of length `len`, or of the vertex count when `None`.
    pub fn traces(&self, len: Option<usize>) -> Result<Traces, TriError> {
        compute_traces(self, len)
    }
}

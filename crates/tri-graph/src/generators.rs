//! Constructive enumeration of pure (all-positive) connected graphs.

use tri_core::errors::{ErrorInfo, TriError};
use tri_core::{MAX_VTX, VTX_CAPACITY};

use crate::graph::{Graph, Units};

/// Walks every connected pure graph for vertex counts `lo..=hi`.
///
/// Raw output is labeled: isomorphic graphs appear several times and must be
/// deduplicated by canonical form downstream. Within a level, vertices are
/// constrained to non-increasing edge degree, which every isomorphism class
/// admits, so no class is missed.
#[derive(Debug, Clone)]
pub struct PureEnumerator {
    lo: usize,
    hi: usize,
    level: Option<LevelWalker>,
    next_level: usize,
}

impl PureEnumerator {
    /// Creates an enumerator over `[lo, hi]`; an inverted range yields nothing.
    pub fn new(lo: usize, hi: usize) -> Result<Self, TriError> {
        if lo == 0 {
            return Err(TriError::Structural(
                ErrorInfo::new("enumerate.range", "vertex counts start at 1")
                    .with_context("lo", lo.to_string()),
            ));
        }
        if hi > MAX_VTX {
            return Err(TriError::too_many_vertices(hi, MAX_VTX));
        }
        Ok(Self {
            lo,
            hi,
            level: None,
            next_level: lo,
        })
    }

    /// Rewinds to the first graph of the lowest level.
    pub fn restart(&mut self) {
        self.level = None;
        self.next_level = self.lo;
    }
}

impl Iterator for PureEnumerator {
    type Item = Graph;

    fn next(&mut self) -> Option<Graph> {
        loop {
            if let Some(walker) = self.level.as_mut() {
                if let Some(graph) = walker.next() {
                    return Some(graph);
                }
                self.level = None;
            }
            if self.next_level > self.hi {
                return None;
            }
            self.level = Some(LevelWalker::new(self.next_level));
            self.next_level += 1;
        }
    }
}

/// Depth-first walk over edge multiplicities of every vertex pair.
#[derive(Debug, Clone)]
struct LevelWalker {
    n: usize,
    pairs: Vec<(usize, usize)>,
    values: Vec<u8>,
    degree: Vec<u8>,
    depth: usize,
    backtrack: bool,
    finished: bool,
}

impl LevelWalker {
    fn new(n: usize) -> Self {
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        Self {
            n,
            values: vec![0; pairs.len()],
            pairs,
            degree: vec![0; n],
            depth: 0,
            backtrack: false,
            finished: false,
        }
    }

    fn assign(&mut self, depth: usize, value: u8) {
        let (i, j) = self.pairs[depth];
        self.values[depth] = value;
        self.degree[i] += value;
        self.degree[j] += value;
    }

    fn unassign(&mut self, depth: usize) -> u8 {
        let (i, j) = self.pairs[depth];
        let value = self.values[depth];
        self.degree[i] -= value;
        self.degree[j] -= value;
        value
    }

    fn fits(&self, depth: usize, value: u8) -> bool {
        let (i, j) = self.pairs[depth];
        self.degree[i] + value <= VTX_CAPACITY && self.degree[j] + value <= VTX_CAPACITY
    }

    /// Checks vertices whose pairs are all assigned once `depth` is set.
    fn prefix_ok(&self, depth: usize) -> bool {
        let (i, j) = self.pairs[depth];
        if j != self.n - 1 {
            return true;
        }
        let settled = |v: usize| {
            self.degree[v] >= 1 && (v == 0 || self.degree[v] <= self.degree[v - 1])
        };
        if !settled(i) {
            return false;
        }
        i + 2 != self.n || settled(self.n - 1)
    }

    fn connected(&self) -> bool {
        let mut seen = vec![false; self.n];
        let mut stack = vec![0usize];
        seen[0] = true;
        while let Some(v) = stack.pop() {
            for (depth, &(i, j)) in self.pairs.iter().enumerate() {
                if self.values[depth] == 0 {
                    continue;
                }
                let other = if i == v {
                    j
                } else if j == v {
                    i
                } else {
                    continue;
                };
                if !seen[other] {
                    seen[other] = true;
                    stack.push(other);
                }
            }
        }
        seen.into_iter().all(|flag| flag)
    }

    fn emit(&self) -> Graph {
        let n = self.n;
        let mut cells = vec![Units::default(); n * n];
        for (depth, &(i, j)) in self.pairs.iter().enumerate() {
            let units = Units::new(self.values[depth], 0);
            cells[i * n + j] = units;
            cells[j * n + i] = units;
        }
        for v in 0..n {
            cells[v * n + v] = Units::new(VTX_CAPACITY - self.degree[v], 0);
        }
        Graph::from_cells(n, cells)
    }
}

impl Iterator for LevelWalker {
    type Item = Graph;

    fn next(&mut self) -> Option<Graph> {
        if self.finished {
            return None;
        }
        if self.pairs.is_empty() {
            self.finished = true;
            return Some(Graph::single_vertex());
        }
        loop {
            if self.backtrack {
                if self.depth == 0 {
                    self.finished = true;
                    return None;
                }
                self.depth -= 1;
                let depth = self.depth;
                let next = self.unassign(depth) + 1;
                if self.fits(depth, next) {
                    self.assign(depth, next);
                    self.depth += 1;
                    self.backtrack = !self.prefix_ok(depth);
                }
                continue;
            }
            if self.depth == self.pairs.len() {
                self.backtrack = true;
                if self.connected() {
                    return Some(self.emit());
                }
                continue;
            }
            let depth = self.depth;
            self.assign(depth, 0);
            self.depth += 1;
            self.backtrack = !self.prefix_ok(depth);
        }
    }
}

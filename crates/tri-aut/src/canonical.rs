use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::MAX_VTX;
use tri_graph::{Graph, Units};

use crate::refine::refine_colors;
use crate::uid::GraphUid;

/// Options for canonicalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonOpts {
    /// Largest vertex count accepted.
    pub max_vertices: usize,
}

impl Default for CanonOpts {
    fn default() -> Self {
        Self {
            max_vertices: MAX_VTX,
        }
    }
}

/// Minimal relabeled unit matrix of a graph.
///
/// Cells are the lower triangle, row-major, diagonal included; each cell is a
/// [`Units::code`] nibble. Two graphs are isomorphic iff their forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalForm {
    n: usize,
    cells: Vec<u8>,
}

impl CanonicalForm {
    /// Vertex count.
    pub fn num_verts(&self) -> usize {
        self.n
    }

    /// Lower-triangle cell codes.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Exact fixed-width identity.
    pub fn uid(&self) -> GraphUid {
        GraphUid::pack(self.n, &self.cells)
    }

    /// Rebuilds a form from its identity.
    pub fn from_uid(uid: &GraphUid) -> Self {
        let (n, cells) = uid.unpack();
        Self { n, cells }
    }

    /// The graph in canonical labeling.
    pub fn to_graph(&self) -> Result<Graph, TriError> {
        let n = self.n;
        let mut matrix = vec![Units::default(); n * n];
        let mut idx = 0;
        for i in 0..n {
            for j in 0..=i {
                let units = Units::from_code(self.cells[idx]);
                matrix[i * n + j] = units;
                matrix[j * n + i] = units;
                idx += 1;
            }
        }
        Graph::from_unit_matrix(n, matrix)
    }
}

/// Result of a canonical search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLabeling {
    /// The canonical form.
    pub form: CanonicalForm,
    /// `labeling[v]` is the canonical position of original vertex index `v`.
    pub labeling: Vec<usize>,
    /// Order of the automorphism group (permutations reproducing the form).
    pub automorphisms: u64,
}

/// Canonicalises a graph, rejecting vertex counts above `opts.max_vertices`.
pub fn canonicalize(graph: &Graph, opts: &CanonOpts) -> Result<CanonicalLabeling, TriError> {
    let limit = opts.max_vertices.min(MAX_VTX);
    if graph.num_verts() > limit {
        return Err(TriError::too_many_vertices(graph.num_verts(), limit));
    }
    Ok(search(graph))
}

/// Canonical form of a graph; graphs never exceed `MAX_VTX`, so this cannot fail.
pub fn canonical_form(graph: &Graph) -> CanonicalForm {
    search(graph).form
}

/// The graph relabeled into canonical order.
pub fn canonical_graph(graph: &Graph) -> Result<Graph, TriError> {
    let result = search(graph);
    graph.permuted(&result.labeling)
}

/// Reference form computed by trying every permutation, for small graphs.
pub fn exhaustive_canonical_form(
    graph: &Graph,
    exhaustive_limit: usize,
) -> Result<CanonicalForm, TriError> {
    let n = graph.num_verts();
    if n > exhaustive_limit {
        return Err(TriError::Capacity(
            ErrorInfo::new("canonical.exhaustive", "graph too large for exhaustive search")
                .with_context("verts", n.to_string())
                .with_context("limit", exhaustive_limit.to_string()),
        ));
    }
    let best = (0..n)
        .permutations(n)
        .map(|order| lower_triangle(graph, &order))
        .min()
        .unwrap_or_default();
    Ok(CanonicalForm { n, cells: best })
}

fn lower_triangle(graph: &Graph, order: &[usize]) -> Vec<u8> {
    let mut cells = Vec::with_capacity(order.len() * (order.len() + 1) / 2);
    for (pos, &v) in order.iter().enumerate() {
        for &u in &order[..=pos] {
            cells.push(graph.units(v, u).code());
        }
    }
    cells
}

struct Search<'a> {
    graph: &'a Graph,
    n: usize,
    colors: Vec<u32>,
    slot_colors: Vec<u32>,
    placed: Vec<usize>,
    used: Vec<bool>,
    cur: Vec<u8>,
    best: Option<Vec<u8>>,
    best_order: Vec<usize>,
    automorphisms: u64,
}

fn search(graph: &Graph) -> CanonicalLabeling {
    let n = graph.num_verts();
    let colors = refine_colors(graph);
    let mut slot_colors = colors.clone();
    slot_colors.sort_unstable();
    let mut state = Search {
        graph,
        n,
        colors,
        slot_colors,
        placed: vec![0; n],
        used: vec![false; n],
        cur: vec![0; n * (n + 1) / 2],
        best: None,
        best_order: (0..n).collect(),
        automorphisms: 0,
    };
    state.descend(0, 1);
    let mut labeling = vec![0; n];
    for (pos, &v) in state.best_order.iter().enumerate() {
        labeling[v] = pos;
    }
    CanonicalLabeling {
        form: CanonicalForm {
            n,
            cells: state.best.unwrap_or_default(),
        },
        labeling,
        automorphisms: state.automorphisms.max(1),
    }
}

impl Search<'_> {
    fn code(&self, a: usize, b: usize) -> u8 {
        self.graph.units(a, b).code()
    }

    /// Swapping `a` and `b` is an automorphism of the whole graph.
    fn interchangeable(&self, a: usize, b: usize) -> bool {
        self.code(a, a) == self.code(b, b)
            && (0..self.n)
                .filter(|&x| x != a && x != b)
                .all(|x| self.code(a, x) == self.code(b, x))
    }

    fn descend(&mut self, pos: usize, weight: u64) {
        if pos == self.n {
            return;
        }
        let target = self.slot_colors[pos];
        let candidates: Vec<usize> = (0..self.n)
            .filter(|&v| !self.used[v] && self.colors[v] == target)
            .collect();
        let mut covered = vec![false; candidates.len()];
        let offset = pos * (pos + 1) / 2;
        let end = offset + pos + 1;

        for (idx, &v) in candidates.iter().enumerate() {
            if covered[idx] {
                continue;
            }
            let mut twins = 1u64;
            for later in (idx + 1)..candidates.len() {
                if !covered[later] && self.interchangeable(v, candidates[later]) {
                    covered[later] = true;
                    twins += 1;
                }
            }

            self.placed[pos] = v;
            for q in 0..=pos {
                self.cur[offset + q] = self.code(v, self.placed[q]);
            }
            let ordering = match &self.best {
                Some(best) => self.cur[..end].cmp(&best[..end]),
                None => Ordering::Less,
            };
            if ordering == Ordering::Greater {
                continue;
            }

            let branch_weight = weight.saturating_mul(twins);
            if pos + 1 == self.n {
                if ordering == Ordering::Less {
                    self.best = Some(self.cur.clone());
                    self.best_order = self.placed.clone();
                    self.automorphisms = branch_weight;
                } else {
                    self.automorphisms = self.automorphisms.saturating_add(branch_weight);
                }
                continue;
            }
            self.used[v] = true;
            self.descend(pos + 1, branch_weight);
            self.used[v] = false;
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::{Sign, VtxId, MAX_VTX, VTX_CAPACITY};

/// Positive and negative connection units held by one matrix cell.
///
/// A diagonal cell counts a vertex's loops; an off-diagonal cell counts the
/// parallel edge units joining two vertices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Units {
    /// Positive units.
    pub pos: u8,
    /// Negative units.
    pub neg: u8,
}

impl Units {
    /// Creates a unit count.
    pub const fn new(pos: u8, neg: u8) -> Self {
        Self { pos, neg }
    }

    /// Total number of units regardless of sign; saturates instead of wrapping.
    pub fn total(&self) -> u8 {
        self.pos.saturating_add(self.neg)
    }

    /// Signed weight contributed to the adjacency matrix.
    pub fn net(&self) -> i64 {
        i64::from(self.pos) - i64::from(self.neg)
    }

    /// Returns `true` when the cell carries no units.
    pub fn is_empty(&self) -> bool {
        self.pos == 0 && self.neg == 0
    }

    /// Packs the cell into a nibble: positive units in the low bits, negative above.
    pub fn code(&self) -> u8 {
        self.pos | (self.neg << 2)
    }

    /// Inverse of [`Units::code`].
    pub fn from_code(code: u8) -> Self {
        Self {
            pos: code & 0b11,
            neg: (code >> 2) & 0b11,
        }
    }
}

/// Parallel edge units between two distinct vertices (`a < b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    /// Lower endpoint.
    pub a: VtxId,
    /// Higher endpoint.
    pub b: VtxId,
    /// Unit counts on the bond.
    pub units: Units,
}

/// A single construction primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    /// `mult` loop units of one sign on a vertex.
    Loop {
        /// Vertex carrying the loops.
        vtx: VtxId,
        /// Loop multiplicity in `0..=3`.
        mult: u8,
        /// Sign shared by the loops.
        sign: Sign,
    },
    /// `mult` parallel edge units of one sign between two vertices.
    Edge {
        /// First endpoint.
        a: VtxId,
        /// Second endpoint.
        b: VtxId,
        /// Edge multiplicity in `1..=3`.
        mult: u8,
        /// Sign shared by the parallel units.
        sign: Sign,
    },
}

impl Primitive {
    /// Convenience constructor for a loop primitive with one-based vertex id.
    pub fn loops(vtx: u8, mult: u8, sign: Sign) -> Self {
        Primitive::Loop {
            vtx: VtxId::from_raw(vtx),
            mult,
            sign,
        }
    }

    /// Convenience constructor for an edge primitive with one-based vertex ids.
    pub fn edge(a: u8, b: u8, mult: u8, sign: Sign) -> Self {
        Primitive::Edge {
            a: VtxId::from_raw(a),
            b: VtxId::from_raw(b),
            mult,
            sign,
        }
    }
}

/// Size and sign census of a graph, used by selectors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphInfo {
    /// Connected components.
    pub parts: usize,
    /// Vertex count.
    pub verts: usize,
    /// Positive edge units.
    pub pos_edges: usize,
    /// Negative edge units.
    pub neg_edges: usize,
    /// Positive loop units.
    pub pos_loops: usize,
    /// Negative loop units.
    pub neg_loops: usize,
}

/// Per-vertex connection breakdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VertexBreakdown {
    /// Loop units on the vertex.
    pub loops: Units,
    /// Edge units leaving the vertex, summed over all neighbours.
    pub edges: Units,
    /// Number of distinct neighbours.
    pub neighbours: usize,
}

/// A validated trivalent signed multigraph.
///
/// Every vertex carries exactly three units split between loops and edges.
/// The unit matrix is stored densely and kept symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Graph {
    n: usize,
    cells: Vec<Units>,
}

impl Graph {
    /// Builds a graph from primitives over vertices `1..=num_verts`.
    pub fn from_primitives<I>(num_verts: usize, primitives: I) -> Result<Self, TriError>
    where
        I: IntoIterator<Item = Primitive>,
    {
        let mut builder = GraphBuilder::new(num_verts)?;
        for primitive in primitives {
            builder.add(primitive)?;
        }
        builder.build()
    }

    /// A single vertex closed by three positive loops.
    pub fn single_vertex() -> Self {
        Self {
            n: 1,
            cells: vec![Units::new(VTX_CAPACITY, 0)],
        }
    }

    /// Trusted constructor for generators that build valid unit matrices.
    pub(crate) fn from_cells(n: usize, cells: Vec<Units>) -> Self {
        debug_assert_eq!(cells.len(), n * n);
        Self { n, cells }
    }

    /// Rebuilds a graph from a full unit matrix, validating every invariant.
    pub fn from_unit_matrix(n: usize, cells: Vec<Units>) -> Result<Self, TriError> {
        if n == 0 {
            return Err(empty_graph());
        }
        if n > MAX_VTX {
            return Err(TriError::too_many_vertices(n, MAX_VTX));
        }
        if cells.len() != n * n {
            return Err(TriError::Structural(
                ErrorInfo::new("graph.matrix", "unit matrix has the wrong size")
                    .with_context("verts", n.to_string())
                    .with_context("cells", cells.len().to_string()),
            ));
        }
        for (idx, cell) in cells.iter().enumerate() {
            if cell.pos > VTX_CAPACITY || cell.neg > VTX_CAPACITY || cell.total() > VTX_CAPACITY {
                return Err(TriError::Structural(
                    ErrorInfo::new("graph.multiplicity", "cell units exceed the vertex capacity")
                        .with_context("a", (idx / n + 1).to_string())
                        .with_context("b", (idx % n + 1).to_string())
                        .with_context("pos", cell.pos.to_string())
                        .with_context("neg", cell.neg.to_string()),
                ));
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if cells[i * n + j] != cells[j * n + i] {
                    return Err(TriError::Structural(
                        ErrorInfo::new("graph.asymmetric", "unit matrix is not symmetric")
                            .with_context("a", (i + 1).to_string())
                            .with_context("b", (j + 1).to_string()),
                    ));
                }
            }
        }
        let graph = Self { n, cells };
        graph.check_degrees()?;
        Ok(graph)
    }

    /// Number of vertices.
    pub fn num_verts(&self) -> usize {
        self.n
    }

    /// Unit counts of the cell `(i, j)` using zero-based indices.
    pub fn units(&self, i: usize, j: usize) -> Units {
        self.cells[i * self.n + j]
    }

    pub(crate) fn set_units(&mut self, i: usize, j: usize, units: Units) {
        self.cells[i * self.n + j] = units;
        self.cells[j * self.n + i] = units;
    }

    /// Loop units on a vertex.
    pub fn loops(&self, vtx: VtxId) -> Units {
        let idx = vtx.index();
        self.units(idx, idx)
    }

    /// Edge units between two vertices, if any.
    pub fn bond(&self, a: VtxId, b: VtxId) -> Option<Units> {
        if a == b {
            return None;
        }
        let units = self.units(a.index(), b.index());
        (!units.is_empty()).then_some(units)
    }

    /// All bonds ordered by `(a, b)` with `a < b`.
    pub fn bonds(&self) -> impl Iterator<Item = Bond> + '_ {
        (0..self.n).flat_map(move |i| {
            ((i + 1)..self.n).filter_map(move |j| {
                let units = self.units(i, j);
                (!units.is_empty()).then(|| Bond {
                    a: VtxId::from_index(i),
                    b: VtxId::from_index(j),
                    units,
                })
            })
        })
    }

    /// Loop and edge breakdown of a vertex.
    pub fn vertex(&self, vtx: VtxId) -> VertexBreakdown {
        let i = vtx.index();
        let mut breakdown = VertexBreakdown {
            loops: self.units(i, i),
            ..VertexBreakdown::default()
        };
        for j in (0..self.n).filter(|&j| j != i) {
            let units = self.units(i, j);
            if !units.is_empty() {
                breakdown.edges.pos += units.pos;
                breakdown.edges.neg += units.neg;
                breakdown.neighbours += 1;
            }
        }
        breakdown
    }

    /// Signed weighted adjacency matrix, loops on the diagonal.
    pub fn adjacency(&self) -> Vec<Vec<i64>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.units(i, j).net()).collect())
            .collect()
    }

    /// Returns `true` when no unit carries a negative sign.
    pub fn is_pure(&self) -> bool {
        self.cells.iter().all(|cell| cell.neg == 0)
    }

    /// Number of connected components.
    pub fn num_parts(&self) -> usize {
        let mut parent: Vec<usize> = (0..self.n).collect();
        for bond in self.bonds() {
            union(&mut parent, bond.a.index(), bond.b.index());
        }
        (0..self.n).filter(|&v| find(&mut parent, v) == v).count()
    }

    /// Vertex sets of each connected component, ordered by smallest member.
    pub fn components(&self) -> Vec<Vec<VtxId>> {
        let mut parent: Vec<usize> = (0..self.n).collect();
        for bond in self.bonds() {
            union(&mut parent, bond.a.index(), bond.b.index());
        }
        let mut groups: BTreeMap<usize, Vec<VtxId>> = BTreeMap::new();
        for v in 0..self.n {
            let root = find(&mut parent, v);
            groups.entry(root).or_default().push(VtxId::from_index(v));
        }
        groups.into_values().collect()
    }

    /// Size and sign census.
    pub fn info(&self) -> GraphInfo {
        let mut info = GraphInfo {
            parts: self.num_parts(),
            verts: self.n,
            ..GraphInfo::default()
        };
        for i in 0..self.n {
            let loops = self.units(i, i);
            info.pos_loops += usize::from(loops.pos);
            info.neg_loops += usize::from(loops.neg);
        }
        for bond in self.bonds() {
            info.pos_edges += usize::from(bond.units.pos);
            info.neg_edges += usize::from(bond.units.neg);
        }
        info
    }

    /// Disjoint union; `other`'s vertices are renumbered after this graph's.
    pub fn concat(&self, other: &Graph) -> Result<Graph, TriError> {
        let n = self.n + other.n;
        if n > MAX_VTX {
            return Err(TriError::too_many_vertices(n, MAX_VTX));
        }
        let mut cells = vec![Units::default(); n * n];
        for i in 0..self.n {
            for j in 0..self.n {
                cells[i * n + j] = self.units(i, j);
            }
        }
        let offset = self.n;
        for i in 0..other.n {
            for j in 0..other.n {
                cells[(i + offset) * n + (j + offset)] = other.units(i, j);
            }
        }
        Ok(Graph { n, cells })
    }

    /// Concatenates a non-empty sequence of graphs in order.
    pub fn concat_all<'a, I>(graphs: I) -> Result<Graph, TriError>
    where
        I: IntoIterator<Item = &'a Graph>,
    {
        let mut iter = graphs.into_iter();
        let mut acc = iter.next().cloned().ok_or_else(empty_graph)?;
        for next in iter {
            acc = acc.concat(next)?;
        }
        Ok(acc)
    }

    /// Relabels vertices: old zero-based index `i` becomes `perm[i]`.
    pub fn permuted(&self, perm: &[usize]) -> Result<Graph, TriError> {
        let mut seen = vec![false; self.n];
        if perm.len() != self.n {
            return Err(bad_permutation(self.n, perm.len()));
        }
        for &target in perm {
            if target >= self.n || seen[target] {
                return Err(bad_permutation(self.n, perm.len()));
            }
            seen[target] = true;
        }
        let n = self.n;
        let mut cells = vec![Units::default(); n * n];
        for i in 0..n {
            for j in 0..n {
                cells[perm[i] * n + perm[j]] = self.units(i, j);
            }
        }
        Ok(Graph { n, cells })
    }

    /// The same structure with every unit made positive.
    pub fn to_pure(&self) -> Graph {
        let cells = self
            .cells
            .iter()
            .map(|cell| Units::new(cell.total(), 0))
            .collect();
        Graph { n: self.n, cells }
    }

    fn check_degrees(&self) -> Result<(), TriError> {
        for i in 0..self.n {
            let total: usize = (0..self.n)
                .map(|j| usize::from(self.units(i, j).total()))
                .sum();
            if total != usize::from(VTX_CAPACITY) {
                return Err(TriError::Structural(
                    ErrorInfo::new(
                        "graph.degree",
                        format!("vertex {} carries {total} connection units, expected 3", i + 1),
                    )
                    .with_context("vtx", (i + 1).to_string())
                    .with_context("units", total.to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// Incremental graph construction from [`Primitive`]s.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    n: usize,
    cells: Vec<Units>,
}

impl GraphBuilder {
    /// Starts a graph with vertices `1..=num_verts`.
    pub fn new(num_verts: usize) -> Result<Self, TriError> {
        if num_verts == 0 {
            return Err(empty_graph());
        }
        if num_verts > MAX_VTX {
            return Err(TriError::too_many_vertices(num_verts, MAX_VTX));
        }
        Ok(Self {
            n: num_verts,
            cells: vec![Units::default(); num_verts * num_verts],
        })
    }

    /// Adds a primitive after checking its vertex ids and multiplicity.
    pub fn add(&mut self, primitive: Primitive) -> Result<&mut Self, TriError> {
        match primitive {
            Primitive::Loop { vtx, mult, sign } => {
                let i = self.checked_index(vtx)?;
                if mult > VTX_CAPACITY {
                    return Err(bad_multiplicity("loop", mult, vtx));
                }
                self.bump(i, i, mult, sign);
            }
            Primitive::Edge { a, b, mult, sign } => {
                let i = self.checked_index(a)?;
                let j = self.checked_index(b)?;
                if i == j {
                    return Err(TriError::Structural(
                        ErrorInfo::new("graph.self_edge", "edge endpoints must differ")
                            .with_context("vtx", a.as_raw().to_string())
                            .with_hint("use a loop primitive for self connections"),
                    ));
                }
                if mult == 0 || mult > VTX_CAPACITY {
                    return Err(bad_multiplicity("edge", mult, a));
                }
                self.bump(i, j, mult, sign);
                self.bump(j, i, mult, sign);
            }
        }
        Ok(self)
    }

    /// Finishes construction, enforcing the degree invariant on every vertex.
    pub fn build(self) -> Result<Graph, TriError> {
        let graph = Graph {
            n: self.n,
            cells: self.cells,
        };
        graph.check_degrees()?;
        Ok(graph)
    }

    fn checked_index(&self, vtx: VtxId) -> Result<usize, TriError> {
        let raw = usize::from(vtx.as_raw());
        if raw == 0 || raw > self.n {
            return Err(TriError::Structural(
                ErrorInfo::new("graph.vertex", format!("vertex {raw} is outside 1..={}", self.n))
                    .with_context("vtx", raw.to_string())
                    .with_context("verts", self.n.to_string()),
            ));
        }
        Ok(raw - 1)
    }

    fn bump(&mut self, i: usize, j: usize, mult: u8, sign: Sign) {
        let cell = &mut self.cells[i * self.n + j];
        match sign {
            Sign::Pos => cell.pos = cell.pos.saturating_add(mult).min(15),
            Sign::Neg => cell.neg = cell.neg.saturating_add(mult).min(15),
        }
    }
}

fn empty_graph() -> TriError {
    TriError::structural("graph.empty", "a graph needs at least one vertex")
}

fn bad_multiplicity(kind: &str, mult: u8, vtx: VtxId) -> TriError {
    TriError::Structural(
        ErrorInfo::new(
            "graph.multiplicity",
            format!("{kind} multiplicity {mult} is outside the allowed domain"),
        )
        .with_context("kind", kind)
        .with_context("mult", mult.to_string())
        .with_context("vtx", vtx.as_raw().to_string()),
    )
}

fn bad_permutation(n: usize, len: usize) -> TriError {
    TriError::Structural(
        ErrorInfo::new("graph.permutation", "relabeling is not a permutation of the vertices")
            .with_context("verts", n.to_string())
            .with_context("len", len.to_string()),
    )
}

fn find(parent: &mut [usize], mut v: usize) -> usize {
    while parent[v] != v {
        parent[v] = parent[parent[v]];
        v = parent[v];
    }
    v
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

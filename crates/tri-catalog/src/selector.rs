use serde::{Deserialize, Serialize};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::MAX_VTX;
use tri_graph::{GraphInfo, Traces};

/// Inclusive bound on each census field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Connected components.
    pub parts: usize,
    /// Vertices.
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

impl Bounds {
    /// Default lower bounds: one part and one vertex, everything else zero.
    pub fn floor() -> Self {
        Self {
            parts: 1,
            verts: 1,
            pos_edges: 0,
            neg_edges: 0,
            pos_loops: 0,
            neg_loops: 0,
        }
    }

    /// Default upper bounds derived from `MAX_VTX`.
    pub fn ceiling() -> Self {
        Self {
            parts: MAX_VTX,
            verts: MAX_VTX,
            pos_edges: 3 * MAX_VTX / 2,
            neg_edges: 3 * MAX_VTX / 2,
            pos_loops: 3 * MAX_VTX,
            neg_loops: 3 * MAX_VTX,
        }
    }
}

/// Immutable catalog query.
///
/// Bounds and flags are ANDed. A lower bound above its upper bound selects
/// nothing. `factor` switches to combination search and needs `traces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Lower bounds.
    pub min: Bounds,
    /// Upper bounds.
    pub max: Bounds,
    /// Exact trace vector to match.
    #[serde(default)]
    pub traces: Option<Traces>,
    /// Search prime combinations reproducing `traces`.
    #[serde(default)]
    pub factor: bool,
    /// Vertex budget for `factor`; defaults to the length of `traces`.
    #[serde(default)]
    pub factor_budget: Option<usize>,
    /// Keep only prime trace entries.
    #[serde(default)]
    pub primes: bool,
    /// Keep only the representative graph of each trace entry.
    #[serde(default)]
    pub unique_traces: bool,
    /// Keep only graphs without positive loops.
    #[serde(default)]
    pub bosons: bool,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            min: Bounds::floor(),
            max: Bounds::ceiling(),
            traces: None,
            factor: false,
            factor_budget: None,
            primes: false,
            unique_traces: false,
            bosons: false,
        }
    }
}

impl Selector {
    /// Starts a builder from the defaults.
    pub fn builder() -> SelectorBuilder {
        SelectorBuilder {
            selector: Selector::default(),
        }
    }

    /// Returns `true` when the census lies within bounds and satisfies `bosons`.
    pub fn selects(&self, info: &GraphInfo) -> bool {
        let within = |value: usize, lo: usize, hi: usize| lo <= value && value <= hi;
        within(info.parts, self.min.parts, self.max.parts)
            && within(info.verts, self.min.verts, self.max.verts)
            && within(info.pos_edges, self.min.pos_edges, self.max.pos_edges)
            && within(info.neg_edges, self.min.neg_edges, self.max.neg_edges)
            && within(info.pos_loops, self.min.pos_loops, self.max.pos_loops)
            && within(info.neg_loops, self.min.neg_loops, self.max.neg_loops)
            && (!self.bosons || info.pos_loops == 0)
    }

    /// Returns `true` when some lower bound exceeds its upper bound.
    pub fn is_contradictory(&self) -> bool {
        let (lo, hi) = (&self.min, &self.max);
        lo.parts > hi.parts
            || lo.verts > hi.verts
            || lo.pos_edges > hi.pos_edges
            || lo.neg_edges > hi.neg_edges
            || lo.pos_loops > hi.pos_loops
            || lo.neg_loops > hi.neg_loops
    }

    /// Rejects flag combinations without a defined meaning.
    pub fn validate(&self) -> Result<(), TriError> {
        if !self.factor {
            return Ok(());
        }
        if self.traces.is_none() {
            return Err(TriError::Structural(
                ErrorInfo::new("selector.factor", "factor mode needs a target trace vector")
                    .with_hint("set traces to the target graph's traces"),
            ));
        }
        if self.primes || self.unique_traces {
            return Err(TriError::Structural(
                ErrorInfo::new(
                    "selector.factor",
                    "factor mode cannot be combined with primes or unique_traces",
                )
                .with_context("primes", self.primes.to_string())
                .with_context("unique_traces", self.unique_traces.to_string()),
            ));
        }
        Ok(())
    }
}

/// Fluent construction of a [`Selector`].
#[derive(Debug, Clone)]
pub struct SelectorBuilder {
    selector: Selector,
}

impl SelectorBuilder {
    /// Inclusive vertex count range.
    pub fn verts(mut self, lo: usize, hi: usize) -> Self {
        self.selector.min.verts = lo;
        self.selector.max.verts = hi;
        self
    }

    /// Inclusive part count range.
    pub fn parts(mut self, lo: usize, hi: usize) -> Self {
        self.selector.min.parts = lo;
        self.selector.max.parts = hi;
        self
    }

    /// Inclusive positive edge unit range.
    pub fn pos_edges(mut self, lo: usize, hi: usize) -> Self {
        self.selector.min.pos_edges = lo;
        self.selector.max.pos_edges = hi;
        self
    }

    /// Inclusive negative edge unit range.
    pub fn neg_edges(mut self, lo: usize, hi: usize) -> Self {
        self.selector.min.neg_edges = lo;
        self.selector.max.neg_edges = hi;
        self
    }

    /// Inclusive positive loop unit range.
    pub fn pos_loops(mut self, lo: usize, hi: usize) -> Self {
        self.selector.min.pos_loops = lo;
        self.selector.max.pos_loops = hi;
        self
    }

    /// Inclusive negative loop unit range.
    pub fn neg_loops(mut self, lo: usize, hi: usize) -> Self {
        self.selector.min.neg_loops = lo;
        self.selector.max.neg_loops = hi;
        self
    }

    /// Exact trace vector to match.
    pub fn traces(mut self, traces: Traces) -> Self {
        self.selector.traces = Some(traces);
        self
    }

    /// Combination search mode.
    pub fn factor(mut self, on: bool) -> Self {
        self.selector.factor = on;
        self
    }

    /// Vertex budget for combination search.
    pub fn factor_budget(mut self, budget: usize) -> Self {
        self.selector.factor_budget = Some(budget);
        self
    }

    /// Prime entries only.
    pub fn primes(mut self, on: bool) -> Self {
        self.selector.primes = on;
        self
    }

    /// Trace representatives only.
    pub fn unique_traces(mut self, on: bool) -> Self {
        self.selector.unique_traces = on;
        self
    }

    /// Graphs without positive loops only.
    pub fn bosons(mut self, on: bool) -> Self {
        self.selector.bosons = on;
        self
    }

    /// Finishes the selector.
    pub fn build(self) -> Selector {
        self.selector
    }
}

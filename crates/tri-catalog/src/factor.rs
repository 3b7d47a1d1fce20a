//! Multiset search for trace decompositions over prime entries.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tri_core::errors::{ErrorInfo, TriError};
use tri_graph::Traces;

/// Identifier of a distinct trace vector within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TracesId(i64);

impl TracesId {
    /// Creates an identifier from its raw row id.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw row id.
    pub fn as_raw(&self) -> i64 {
        self.0
    }
}

/// A prime trace vector available as a factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeFactor {
    /// Trace entry id.
    pub id: TracesId,
    /// Vertex count of the prime.
    pub verts: usize,
    /// Its traces; at least as long as any target searched.
    pub traces: Traces,
}

/// `count` copies of one prime within a factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactorRun {
    /// Trace entry id of the prime.
    pub traces_id: TracesId,
    /// Vertex count of one copy.
    pub verts: usize,
    /// Number of copies.
    pub count: usize,
}

/// One multiset of primes whose traces sum to the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Factorization {
    /// Runs ordered by `(verts, id)`.
    pub runs: Vec<FactorRun>,
}

impl Factorization {
    /// Total vertex count of the combination.
    pub fn verts(&self) -> usize {
        self.runs.iter().map(|run| run.verts * run.count).sum()
    }

    /// Number of prime factors counted with multiplicity.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.count).sum()
    }

    /// Returns `true` for the empty combination.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Bounded multiset-partition search over a fixed set of primes.
///
/// Candidates are tried in non-decreasing `(verts, id)` order so every
/// multiset is reached once. Two prunes apply: even-power traces of a graph
/// are sums of squares and so never negative, and every vertex contributes at
/// least one to `T[2]`, so the remaining `T[2]` must cover the remaining budget.
#[derive(Debug, Clone, Default)]
pub struct Factorizer {
    primes: Vec<PrimeFactor>,
}

impl Factorizer {
    /// Builds a factorizer; primes are sorted by `(verts, id)`.
    pub fn new(mut primes: Vec<PrimeFactor>) -> Self {
        primes.sort_by_key(|prime| (prime.verts, prime.id));
        Self { primes }
    }

    /// Primes in search order.
    pub fn primes(&self) -> &[PrimeFactor] {
        &self.primes
    }

    /// Every combination of primes with vertex counts summing to `budget`
    /// whose traces sum to `target`.
    pub fn factorize(&self, target: &Traces, budget: usize) -> Result<Vec<Factorization>, TriError> {
        self.check_lengths(target)?;
        let mut found = Vec::new();
        self.run(target, budget, &mut |stack| {
            found.push(self.runs_of(stack));
            ControlFlow::Continue(())
        });
        Ok(found)
    }

    /// Returns `true` as soon as one combination is found.
    pub fn has_factorization(&self, target: &Traces, budget: usize) -> Result<bool, TriError> {
        self.check_lengths(target)?;
        let mut hit = false;
        self.run(target, budget, &mut |_| {
            hit = true;
            ControlFlow::Break(())
        });
        Ok(hit)
    }

    fn check_lengths(&self, target: &Traces) -> Result<(), TriError> {
        if let Some(short) = self.primes.iter().find(|p| p.traces.len() < target.len()) {
            return Err(TriError::Capacity(
                ErrorInfo::new("factor.trace_len", "prime traces are shorter than the target")
                    .with_context("prime", short.id.as_raw().to_string())
                    .with_context("prime_len", short.traces.len().to_string())
                    .with_context("target_len", target.len().to_string()),
            ));
        }
        Ok(())
    }

    fn run(
        &self,
        target: &Traces,
        budget: usize,
        visit: &mut dyn FnMut(&[usize]) -> ControlFlow<()>,
    ) {
        if budget == 0 {
            return;
        }
        let mut remaining = target.as_slice().to_vec();
        let mut stack = Vec::new();
        let _ = self.search(0, &mut remaining, budget, &mut stack, visit);
    }

    fn search(
        &self,
        start: usize,
        remaining: &mut [i64],
        budget: usize,
        stack: &mut Vec<usize>,
        visit: &mut dyn FnMut(&[usize]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if budget == 0 {
            if remaining.iter().all(|&value| value == 0) {
                return visit(stack);
            }
            return ControlFlow::Continue(());
        }
        if remaining.len() > 1 && remaining[1] < budget as i64 {
            return ControlFlow::Continue(());
        }
        for idx in start..self.primes.len() {
            let prime = &self.primes[idx];
            if prime.verts > budget {
                break;
            }
            let values = &prime.traces.as_slice()[..remaining.len()];
            for (slot, value) in remaining.iter_mut().zip(values) {
                *slot -= value;
            }
            let feasible = remaining.iter().skip(1).step_by(2).all(|&value| value >= 0);
            let flow = if feasible {
                stack.push(idx);
                let flow = self.search(idx, remaining, budget - prime.verts, stack, visit);
                stack.pop();
                flow
            } else {
                ControlFlow::Continue(())
            };
            for (slot, value) in remaining.iter_mut().zip(values) {
                *slot += value;
            }
            flow?;
        }
        ControlFlow::Continue(())
    }

    fn runs_of(&self, stack: &[usize]) -> Factorization {
        let mut runs: Vec<FactorRun> = Vec::new();
        for &idx in stack {
            let prime = &self.primes[idx];
            match runs.last_mut() {
                Some(run) if run.traces_id == prime.id => run.count += 1,
                _ => runs.push(FactorRun {
                    traces_id: prime.id,
                    verts: prime.verts,
                    count: 1,
                }),
            }
        }
        Factorization { runs }
    }
}

use std::collections::HashSet;

use tri_graph::Graph;

use crate::canonical::canonical_form;
use crate::uid::GraphUid;

/// Drops graphs isomorphic to one already yielded.
#[derive(Debug, Clone)]
pub struct CanonicalDedup<I> {
    inner: I,
    seen: HashSet<GraphUid>,
}

impl<I> CanonicalDedup<I> {
    /// Number of distinct classes yielded so far.
    pub fn distinct(&self) -> usize {
        self.seen.len()
    }
}

impl<I: Iterator<Item = Graph>> Iterator for CanonicalDedup<I> {
    type Item = Graph;

    fn next(&mut self) -> Option<Graph> {
        for graph in self.inner.by_ref() {
            if self.seen.insert(canonical_form(&graph).uid()) {
                return Some(graph);
            }
        }
        None
    }
}

/// Graphs paired with their canonical identity.
#[derive(Debug, Clone)]
pub struct WithUid<I> {
    inner: I,
}

impl<I: Iterator<Item = Graph>> Iterator for WithUid<I> {
    type Item = (GraphUid, Graph);

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.inner.next()?;
        Some((canonical_form(&graph).uid(), graph))
    }
}

/// Canonical adapters for any stream of graphs.
pub trait CanonicalStreamExt: Iterator<Item = Graph> + Sized {
    /// Keeps the first graph of every isomorphism class.
    fn dedup_canonical(self) -> CanonicalDedup<Self> {
        CanonicalDedup {
            inner: self,
            seen: HashSet::new(),
        }
    }

    /// Pairs each graph with its canonical identity.
    fn with_uid(self) -> WithUid<Self> {
        WithUid { inner: self }
    }
}

impl<I: Iterator<Item = Graph>> CanonicalStreamExt for I {}

//! Sign fan-out over a graph's structure.

use crate::graph::{Graph, Units};

/// Which units receive new signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignMode {
    /// Loops and edges; every edge sign is shared by both endpoints.
    Vertex,
    /// Edges only; loop signs are kept as given.
    Edge,
}

/// How parallel units are varied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignFanout {
    /// Every unit gets an independent sign (`2^m` choices for `m` units).
    #[default]
    PerUnit,
    /// Each bundle varies by its number of negative units (`m + 1` choices).
    ByCount,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    i: usize,
    j: usize,
    radix: u8,
}

/// Lazy, restartable Cartesian product of sign assignments.
///
/// Digits advance odometer style with the first slot turning fastest; the
/// first output is the all-positive assignment.
#[derive(Debug, Clone)]
pub struct SignPermuter {
    base: Graph,
    slots: Vec<Slot>,
    digits: Vec<u8>,
    done: bool,
}

impl SignPermuter {
    /// Builds a permuter over `graph` using per-unit fan-out.
    pub fn new(graph: &Graph, mode: SignMode) -> Self {
        Self::with_fanout(graph, mode, SignFanout::PerUnit)
    }

    /// Builds a permuter with an explicit fan-out policy.
    pub fn with_fanout(graph: &Graph, mode: SignMode, fanout: SignFanout) -> Self {
        let n = graph.num_verts();
        let mut slots = Vec::new();
        let mut push = |i: usize, j: usize, units: u8| match fanout {
            SignFanout::PerUnit => {
                slots.extend((0..units).map(|_| Slot { i, j, radix: 2 }));
            }
            SignFanout::ByCount => {
                if units > 0 {
                    slots.push(Slot {
                        i,
                        j,
                        radix: units + 1,
                    });
                }
            }
        };
        for i in 0..n {
            if mode == SignMode::Vertex {
                push(i, i, graph.units(i, i).total());
            }
            for j in (i + 1)..n {
                push(i, j, graph.units(i, j).total());
            }
        }
        let digits = vec![0; slots.len()];
        Self {
            base: graph.clone(),
            slots,
            digits,
            done: false,
        }
    }

    /// Total number of outputs the permuter produces.
    pub fn fanout_count(&self) -> u128 {
        self.slots
            .iter()
            .map(|slot| u128::from(slot.radix))
            .product()
    }

    /// Rewinds to the first assignment.
    pub fn restart(&mut self) {
        self.digits.iter_mut().for_each(|digit| *digit = 0);
        self.done = false;
    }

    fn current(&self) -> Graph {
        let mut graph = self.base.clone();
        let mut negs: Vec<((usize, usize), u8)> = Vec::new();
        for (slot, &digit) in self.slots.iter().zip(&self.digits) {
            match negs.last_mut() {
                Some((cell, count)) if *cell == (slot.i, slot.j) => *count += digit,
                _ => negs.push(((slot.i, slot.j), digit)),
            }
        }
        for ((i, j), neg) in negs {
            let total = self.base.units(i, j).total();
            graph.set_units(i, j, Units::new(total - neg, neg));
        }
        graph
    }

    fn advance(&mut self) {
        for (digit, slot) in self.digits.iter_mut().zip(&self.slots) {
            *digit += 1;
            if *digit < slot.radix {
                return;
            }
            *digit = 0;
        }
        self.done = true;
    }
}

impl Iterator for SignPermuter {
    type Item = Graph;

    fn next(&mut self) -> Option<Graph> {
        if self.done {
            return None;
        }
        let graph = self.current();
        self.advance();
        Some(graph)
    }
}

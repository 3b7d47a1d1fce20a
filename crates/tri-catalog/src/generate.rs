//! Level-by-level generation of prime catalogs.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tri_aut::{canonical_form, GraphUid};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::MAX_VTX;
use tri_graph::{Graph, PureEnumerator, SignFanout, SignMode, SignPermuter};

use crate::catalog::Catalog;

/// What happened at one vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReport {
    /// Vertex count.
    pub verts: usize,
    /// Distinct pure graphs.
    pub pure: usize,
    /// Distinct signed graphs.
    pub signed: usize,
    /// Graphs newly stored.
    pub inserted: usize,
    /// Trace entries at this level afterwards.
    pub traces: usize,
    /// Prime trace entries at this level afterwards.
    pub primes: usize,
    /// Whether the level was already present and left untouched.
    pub skipped: bool,
}

/// Fills every missing level `1..=to_vtx` of a prime catalog.
///
/// A level counts as present once it has any trace entry. Each missing level
/// runs pure enumeration, canonical dedup, vertex-sign fan-out by count and a
/// second canonical dedup before serial insertion. Canonicalisation runs on
/// the current rayon pool.
pub fn calc_primes(catalog: &mut Catalog, to_vtx: usize) -> Result<Vec<LevelReport>, TriError> {
    if to_vtx > MAX_VTX {
        return Err(TriError::too_many_vertices(to_vtx, MAX_VTX));
    }
    if !catalog.meta().is_prime {
        return Err(TriError::Storage(
            ErrorInfo::new("catalog.not_prime", "prime generation needs a prime catalog")
                .with_hint("open with CatalogOpts::primes(true)"),
        ));
    }

    let mut reports = Vec::with_capacity(to_vtx);
    for verts in 1..=to_vtx {
        let traces = catalog.count_traces(verts)?;
        if traces > 0 {
            debug!(verts, traces, "catalog level already present");
            reports.push(LevelReport {
                verts,
                pure: 0,
                signed: 0,
                inserted: 0,
                traces,
                primes: catalog.count_primes(verts)?,
                skipped: true,
            });
            continue;
        }
        reports.push(generate_level(catalog, verts)?);
    }
    Ok(reports)
}

fn generate_level(catalog: &mut Catalog, verts: usize) -> Result<LevelReport, TriError> {
    let raw: Vec<Graph> = PureEnumerator::new(verts, verts)?.collect();
    let pure = distinct(with_uids(raw, |graph| vec![graph]));
    let pure_count = pure.len();

    let signed = distinct(with_uids(
        pure.into_iter().map(|(_, graph)| graph).collect(),
        |graph| SignPermuter::with_fanout(&graph, SignMode::Vertex, SignFanout::ByCount).collect(),
    ));
    let signed_count = signed.len();

    let stats = catalog.insert_canonical(signed)?;
    let report = LevelReport {
        verts,
        pure: pure_count,
        signed: signed_count,
        inserted: stats.inserted,
        traces: catalog.count_traces(verts)?,
        primes: catalog.count_primes(verts)?,
        skipped: false,
    };
    info!(
        verts,
        pure = report.pure,
        signed = report.signed,
        inserted = report.inserted,
        traces = report.traces,
        primes = report.primes,
        "catalog level generated"
    );
    Ok(report)
}

fn with_uids<F>(graphs: Vec<Graph>, expand: F) -> Vec<(GraphUid, Graph)>
where
    F: Fn(Graph) -> Vec<Graph> + Sync + Send,
{
    graphs
        .into_par_iter()
        .flat_map_iter(|graph| {
            expand(graph)
                .into_iter()
                .map(|graph| (canonical_form(&graph).uid(), graph))
        })
        .collect()
}

fn distinct(items: Vec<(GraphUid, Graph)>) -> Vec<(GraphUid, Graph)> {
    let mut seen = HashSet::with_capacity(items.len());
    items.into_iter().filter(|(uid, _)| seen.insert(*uid)).collect()
}

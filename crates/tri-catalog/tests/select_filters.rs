use std::collections::HashSet;

use tri_aut::canonical_form;
use tri_catalog::{calc_primes, Catalog, CatalogOpts, Selector};
use tri_core::TriError;
use tri_graph::{parse_graph, Graph};

fn catalog_to(level: usize) -> Catalog {
    let mut catalog = CatalogOpts::in_memory()
        .primes(true)
        .open()
        .expect("open prime catalog");
    calc_primes(&mut catalog, level).expect("generate");
    catalog
}

fn graph(text: &str) -> Graph {
    parse_graph(text).expect("graph parses")
}

#[test]
fn contradictory_bounds_select_nothing() {
    let catalog = catalog_to(3);
    let selector = Selector::builder().verts(5, 3).build();
    assert!(selector.is_contradictory());
    assert!(catalog.select(&selector).expect("select").is_empty());

    let selector = Selector::builder().pos_loops(4, 2).build();
    assert!(catalog.select_entries(&selector).expect("select").is_empty());
}

#[test]
fn default_selector_returns_everything_in_level_order() {
    let catalog = catalog_to(3);
    let entries = catalog.select_entries(&Selector::default()).expect("select");
    assert_eq!(entries.len(), 145);
    assert!(entries.windows(2).all(|w| w[0].verts() <= w[1].verts()));
    let uids: HashSet<_> = entries.iter().map(|e| e.uid).collect();
    assert_eq!(uids.len(), 145);
}

#[test]
fn vertex_bounds_pick_one_level() {
    let catalog = catalog_to(3);
    let selector = Selector::builder().verts(2, 2).build();
    let graphs = catalog.select(&selector).expect("select");
    assert_eq!(graphs.len(), 25);
    assert!(graphs.iter().all(|g| g.num_verts() == 2));
}

#[test]
fn unique_traces_keeps_one_graph_per_entry() {
    let catalog = catalog_to(3);
    let unique = Selector::builder().verts(2, 2).unique_traces(true).build();
    let entries = catalog.select_entries(&unique).expect("select");
    assert_eq!(entries.len(), 11);
    assert!(entries.iter().all(|e| e.is_representative));

    let primes = Selector::builder()
        .verts(3, 3)
        .primes(true)
        .unique_traces(true)
        .build();
    assert_eq!(catalog.select(&primes).expect("select").len(), 30);
}

#[test]
fn flags_are_anded() {
    let catalog = catalog_to(3);
    let primes = catalog
        .select_entries(&Selector::builder().primes(true).build())
        .expect("primes");
    let bosons = catalog
        .select_entries(&Selector::builder().bosons(true).build())
        .expect("bosons");
    let both = catalog
        .select_entries(&Selector::builder().primes(true).bosons(true).build())
        .expect("both");

    assert!(primes.iter().all(|e| e.is_prime));
    assert!(bosons.iter().all(|e| e.info.pos_loops == 0));
    assert!(!both.is_empty());
    let prime_uids: HashSet<_> = primes.iter().map(|e| e.uid).collect();
    let boson_uids: HashSet<_> = bosons.iter().map(|e| e.uid).collect();
    let expected: HashSet<_> = prime_uids.intersection(&boson_uids).copied().collect();
    let got: HashSet<_> = both.iter().map(|e| e.uid).collect();
    assert_eq!(got, expected);
}

#[test]
fn census_bounds_filter_edges_and_loops() {
    let catalog = catalog_to(2);
    let selector = Selector::builder().neg_edges(1, 3).neg_loops(0, 0).build();
    let entries = catalog.select_entries(&selector).expect("select");
    assert!(!entries.is_empty());
    for entry in &entries {
        assert!(entry.info.neg_edges >= 1);
        assert_eq!(entry.info.neg_loops, 0);
    }
}

#[test]
fn phase_modes_share_the_target_traces() {
    let catalog = catalog_to(3);
    let target = graph("1-2-3-1");
    let traces = target.traces(None).expect("traces");
    let phases = catalog.phase_modes(&target).expect("phases");

    assert!(!phases.is_empty());
    assert!(phases
        .iter()
        .any(|g| canonical_form(g) == canonical_form(&target)));
    for phase in &phases {
        assert_eq!(phase.num_verts(), 3);
        assert_eq!(phase.traces(None).expect("traces"), traces);
    }

    let selector = Selector::builder().traces(traces).bosons(true).build();
    assert!(catalog.select(&selector).expect("select").is_empty());
}

#[test]
fn factor_mode_needs_traces_and_no_entry_flags() {
    let catalog = catalog_to(1);
    let err = catalog
        .select(&Selector::builder().factor(true).build())
        .expect_err("no traces");
    assert!(matches!(err, TriError::Structural(ref info) if info.code == "selector.factor"));

    let traces = graph("1; 1").traces(None).expect("traces");
    let err = catalog
        .select(&Selector::builder().traces(traces).factor(true).primes(true).build())
        .expect_err("factor with primes");
    assert!(matches!(err, TriError::Structural(ref info) if info.code == "selector.factor"));
}

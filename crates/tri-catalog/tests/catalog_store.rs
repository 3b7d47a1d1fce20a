use proptest::prelude::*;
use tempfile::tempdir;
use tri_catalog::{Catalog, CatalogOpts, Selector};
use tri_core::TriError;
use tri_graph::{parse_graph, Graph};

fn graph(text: &str) -> Graph {
    parse_graph(text).expect("graph parses")
}

fn memory() -> Catalog {
    CatalogOpts::in_memory().open().expect("open in memory")
}

#[test]
fn insert_is_idempotent_under_relabeling() {
    let mut catalog = memory();
    assert!(catalog.insert(&graph("1=2-3-1")).expect("insert"));
    assert!(!catalog.insert(&graph("2=3-1-2")).expect("insert"));
    assert!(!catalog.insert(&graph("1-3=2-1")).expect("insert"));
    assert_eq!(catalog.count_entries().expect("count"), 1);
    assert_eq!(catalog.count_graphs(3).expect("count"), 1);
    assert_eq!(catalog.count_traces(3).expect("count"), 1);

    assert!(catalog.insert(&graph("1-2-3-1")).expect("insert"));
    assert_eq!(catalog.count_entries().expect("count"), 2);
}

#[test]
fn insert_all_reports_new_and_existing() {
    let mut catalog = memory();
    let graphs = vec![graph("1"), graph("1^"), graph("1"), graph("1---2"), graph("1^^")];
    let stats = catalog.insert_all(graphs).expect("bulk insert");
    assert_eq!(stats.inserted, 4);
    assert_eq!(stats.existing, 1);
    assert_eq!(catalog.count_traces(1).expect("count"), 3);
    assert_eq!(catalog.count_traces(2).expect("count"), 1);
}

#[test]
fn stored_traces_cover_the_trace_count() {
    let mut catalog = CatalogOpts::in_memory().trace_count(5).open().expect("open");
    catalog.insert(&graph("1-2")).expect("insert");
    let entries = catalog.select_entries(&Selector::default()).expect("select");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.traces.len(), 5);
    assert_eq!(entry.traces, graph("1-2").traces(Some(5)).expect("traces"));
    assert!(entry.is_representative);
    assert!(!entry.is_prime);

    let longer = entry.traces_to(8).expect("recompute");
    assert_eq!(longer, graph("1-2").traces(Some(8)).expect("traces"));
}

#[test]
fn closed_catalog_rejects_every_operation() {
    let mut catalog = memory();
    catalog.insert(&graph("1")).expect("insert");
    catalog.close().expect("close");
    assert!(catalog.is_closed());

    let err = catalog.insert(&graph("1^")).expect_err("closed");
    assert!(matches!(err, TriError::ClosedCatalog(ref info) if info.code == "catalog.closed"));
    assert!(matches!(
        catalog.count_traces(1),
        Err(TriError::ClosedCatalog(_))
    ));
    assert!(matches!(
        catalog.select(&Selector::default()),
        Err(TriError::ClosedCatalog(_))
    ));
    assert!(matches!(catalog.digest(), Err(TriError::ClosedCatalog(_))));
    catalog.close().expect("closing twice is harmless");
}

#[test]
fn read_only_open_of_an_empty_file_is_uninitialized() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.db");
    std::fs::write(&path, b"").expect("touch");
    let err = CatalogOpts::at(&path)
        .read_only(true)
        .open()
        .expect_err("no schema");
    assert!(matches!(err, TriError::Storage(ref info) if info.code == "catalog.uninitialized"));
}

#[test]
fn read_only_needs_an_existing_file() {
    let err = CatalogOpts::in_memory()
        .read_only(true)
        .open()
        .expect_err("memory cannot be read-only");
    assert!(matches!(err, TriError::Storage(ref info) if info.code == "catalog.read_only"));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("missing.db");
    let err = CatalogOpts::at(&path)
        .read_only(true)
        .open()
        .expect_err("missing file");
    match err {
        TriError::Storage(info) => {
            assert_eq!(info.code, "catalog.missing");
            assert_eq!(info.context.get("path"), Some(&path.display().to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn durable_catalog_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("catalog.db");

    let mut writer = CatalogOpts::at(&path).trace_count(6).open().expect("create");
    writer
        .insert_all(vec![graph("1"), graph("1-2"), graph("1-2-3-1"), graph("1~2")])
        .expect("insert");
    let digest = writer.digest().expect("digest");
    writer.close().expect("close");

    let mut reader = CatalogOpts::at(&path).read_only(true).open().expect("reopen");
    assert!(reader.is_read_only());
    assert_eq!(reader.meta().trace_count, 6);
    assert_eq!(reader.count_entries().expect("count"), 4);
    assert_eq!(reader.digest().expect("digest"), digest);

    let err = reader.insert(&graph("1^")).expect_err("read-only");
    assert!(matches!(err, TriError::Storage(ref info) if info.code == "catalog.read_only"));
    reader.close().expect("close");

    let err = CatalogOpts::at(&path)
        .trace_count(7)
        .open()
        .expect_err("stored traces are shorter");
    assert!(matches!(err, TriError::Storage(ref info) if info.code == "catalog.trace_count"));

    let err = CatalogOpts::at(&path)
        .primes(true)
        .open()
        .expect_err("not a prime catalog");
    assert!(matches!(err, TriError::Storage(ref info) if info.code == "catalog.not_prime"));
}

#[test]
fn oversized_trace_count_is_a_capacity_error() {
    let err = CatalogOpts::in_memory()
        .trace_count(37)
        .open()
        .expect_err("too many traces");
    assert!(matches!(err, TriError::Capacity(ref info) if info.code == "catalog.trace_count"));
}

#[test]
fn disconnected_graphs_are_stored_with_their_parts() {
    let mut catalog = memory();
    catalog.insert(&graph("1; 1-2")).expect("insert");
    let entries = catalog.select_entries(&Selector::default()).expect("select");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].info.parts, 2);
    assert_eq!(entries[0].verts(), 3);
    let stored = entries[0].graph().expect("graph");
    assert!(tri_aut::isomorphic(&stored, &graph("1-2; 1")));
}

fn k4_and_perm() -> impl Strategy<Value = Vec<usize>> {
    Just((0..4).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    #[test]
    fn relabeled_inserts_never_grow_the_catalog(perm in k4_and_perm()) {
        let mut catalog = memory();
        let k4 = graph("1-2-3-4-1, 1-3, 2~4");
        prop_assert!(catalog.insert(&k4).expect("insert"));
        let relabeled = k4.permuted(&perm).expect("permutation");
        prop_assert!(!catalog.insert(&relabeled).expect("insert"));
        prop_assert_eq!(catalog.count_entries().expect("count"), 1);
    }
}

use tempfile::tempdir;
use tri_catalog::Workspace;
use tri_core::{EngineConfig, TriError};
use tri_graph::parse_graph;

fn config(max_vertices: usize) -> EngineConfig {
    EngineConfig {
        max_vertices,
        default_prime_level: 2,
        threads: Some(2),
        ..EngineConfig::default()
    }
}

#[test]
fn in_memory_levels_are_cached_and_extended() {
    let mut ws = Workspace::open(config(4)).expect("workspace");
    assert_eq!(ws.level(), 0);

    let catalog = ws.default_prime_catalog().expect("level 2");
    assert_eq!(catalog.count_traces(2).expect("count"), 11);
    assert_eq!(catalog.count_traces(3).expect("count"), 0);
    assert_eq!(ws.level(), 2);

    let catalog = ws.prime_catalog(3).expect("level 3");
    assert_eq!(catalog.count_traces(2).expect("count"), 11);
    assert_eq!(catalog.count_traces(3).expect("count"), 36);
    assert_eq!(catalog.count_primes(3).expect("count"), 30);

    let entries = ws.prime_catalog(1).expect("cached").count_entries().expect("count");
    assert_eq!(entries, 145);
    assert_eq!(ws.level(), 3);
}

#[test]
fn requests_beyond_the_configured_maximum_fail() {
    let mut ws = Workspace::open(config(3)).expect("workspace");
    let err = ws.prime_catalog(4).expect_err("over max");
    match err {
        TriError::Capacity(info) => {
            assert_eq!(info.code, "graph.capacity");
            assert_eq!(info.context.get("limit").map(String::as_str), Some("3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_configuration_is_rejected() {
    let err = Workspace::open(EngineConfig {
        max_vertices: 2,
        default_prime_level: 3,
        ..EngineConfig::default()
    })
    .expect_err("prime level above max");
    assert!(matches!(err, TriError::Capacity(ref info) if info.code == "config.prime_level"));
}

#[test]
fn closed_workspace_rejects_requests() {
    let mut ws = Workspace::open(config(2)).expect("workspace");
    ws.prime_catalog(1).expect("level 1");
    ws.close().expect("close");
    let err = ws.prime_catalog(1).expect_err("closed");
    assert!(matches!(err, TriError::ClosedCatalog(ref info) if info.code == "workspace.closed"));
}

#[test]
fn modes_resolve_through_the_workspace() {
    let mut ws = Workspace::open(config(3)).expect("workspace");
    let pair = parse_graph("1; 1").expect("graph");
    let modes = ws.prime_modes(&pair).expect("prime modes");
    assert_eq!(modes.len(), 1);
    assert_eq!(modes[0].len(), 2);

    let triangle = parse_graph("1-2-3-1").expect("graph");
    let phases = ws.phase_modes(&triangle).expect("phase modes");
    assert!(!phases.is_empty());
    assert_eq!(ws.level(), 3);
}

#[test]
fn durable_catalog_is_reused_across_workspaces() {
    let dir = tempdir().expect("tempdir");
    let cfg = EngineConfig {
        catalog_dir: Some(dir.path().join("catalogs")),
        ..config(3)
    };

    let mut first = Workspace::open(cfg.clone()).expect("workspace");
    let catalog = first.prime_catalog(2).expect("generate");
    assert!(catalog.is_read_only());
    let digest = catalog.digest().expect("digest");
    first.close().expect("close");

    let path = cfg.default_catalog_path().expect("durable path");
    assert!(path.exists());

    let mut second = Workspace::open(cfg).expect("workspace");
    let catalog = second.prime_catalog(2).expect("reuse");
    assert_eq!(catalog.digest().expect("digest"), digest);
    assert_eq!(second.level(), 2);

    let catalog = second.prime_catalog(3).expect("extend");
    assert!(catalog.is_read_only());
    assert_eq!(catalog.count_traces(3).expect("count"), 36);
    assert_eq!(catalog.count_traces(2).expect("count"), 11);
    assert_eq!(second.level(), 3);
    second.close().expect("close");
}

use tri_core::{TriError, VtxId};
use tri_graph::{parse_graph, Graph, GraphInput};

#[test]
fn parses_chain_and_fills_loops() {
    let graph = parse_graph("1-2-3").expect("chain");
    assert_eq!(graph.num_verts(), 3);
    assert_eq!(graph.loops(VtxId::from_raw(1)).pos, 2);
    assert_eq!(graph.loops(VtxId::from_raw(2)).pos, 1);
    assert_eq!(graph.info().pos_edges, 2);
}

#[test]
fn carets_mark_negative_loops() {
    let graph = parse_graph("1^^-2").expect("signed");
    let loops = graph.loops(VtxId::from_raw(1));
    assert_eq!((loops.pos, loops.neg), (0, 2));
    assert_eq!(graph.loops(VtxId::from_raw(2)).pos, 2);
}

#[test]
fn glyphs_combine_into_multiplicities() {
    let graph = parse_graph("1=~2").expect("mixed");
    let bond = graph
        .bond(VtxId::from_raw(1), VtxId::from_raw(2))
        .expect("bond");
    assert_eq!((bond.pos, bond.neg), (2, 1));
    let same = parse_graph("1≅2").expect("unicode glyph");
    assert_eq!(graph, same);
}

#[test]
fn parts_are_renumbered() {
    let graph = parse_graph("1---2; 1---2").expect("two parts");
    assert_eq!(graph.num_verts(), 4);
    assert_eq!(graph.num_parts(), 2);
    assert!(graph
        .bond(VtxId::from_raw(3), VtxId::from_raw(4))
        .is_some());
}

#[test]
fn display_parses_back_to_the_same_graph() {
    for text in [
        "1---2",
        "1=2-3=4-1",
        "1-2-3-4-1-5-6-7-8-5, 2-6, 3-7, 4-8",
        "1^-2~3, 3-1",
        "1^^^",
        "1≃2",
    ] {
        let graph = parse_graph(text).expect("parse");
        let printed = graph.to_string();
        let reparsed: Graph = printed.parse().expect("reparse");
        assert_eq!(graph, reparsed, "{text} printed as {printed}");
    }
}

#[test]
fn rejects_overfull_edges_and_vertices() {
    let err = parse_graph("1--=2").expect_err("four units");
    assert!(matches!(err, TriError::Notation(ref info) if info.code == "notation.edge"));
    let err = parse_graph("1=2, 1-3, 3=2").expect_err("vertex 2 overfull");
    assert!(matches!(err, TriError::Structural(ref info) if info.code == "graph.degree"));
}

#[test]
fn rejects_sparse_ids_and_garbage() {
    let err = parse_graph("1-3").expect_err("missing vertex 2");
    assert_eq!(err.info().code, "notation.sparse_ids");
    let err = parse_graph("1*2").expect_err("bad glyph");
    assert_eq!(err.info().code, "notation.token");
    let err = parse_graph("").expect_err("empty");
    assert_eq!(err.info().code, "notation.empty_run");
}

#[test]
fn graph_input_concatenates_mixed_sources() {
    let gamma = parse_graph("1---2").expect("gamma");
    let input = GraphInput::ListOf(vec![
        GraphInput::from("1"),
        GraphInput::from(gamma.clone()),
        GraphInput::from(vec!["1---2", "1"]),
    ]);
    let graph = input.resolve().expect("resolve");
    assert_eq!(graph.num_verts(), 6);
    assert_eq!(graph.num_parts(), 4);
    let err = GraphInput::ListOf(Vec::new()).resolve().expect_err("empty");
    assert_eq!(err.info().code, "graph.empty");
}

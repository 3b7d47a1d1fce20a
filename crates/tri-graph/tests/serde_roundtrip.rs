use tri_core::TriError;
use tri_graph::{
    graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json, parse_graph, Graph, Units,
};

#[test]
fn bytes_and_json_restore_the_graph() {
    let graph = parse_graph("1^-2~3, 3-1").expect("graph");
    let bytes = graph_to_bytes(&graph).expect("bytes");
    assert_eq!(graph_from_bytes(&bytes).expect("from bytes"), graph);
    let json = graph_to_json(&graph).expect("json");
    assert_eq!(graph_from_json(&json).expect("from json"), graph);
}

#[test]
fn invalid_json_graph_is_rejected_by_validation() {
    let json = r#"{"verts":2,"loops":[{"pos":1,"neg":0},{"pos":1,"neg":0}],"bonds":[{"a":1,"b":2,"units":{"pos":1,"neg":0}}]}"#;
    let err = graph_from_json(json).expect_err("degree 2");
    assert!(matches!(err, TriError::Structural(ref info) if info.code == "graph.degree"));
}

#[test]
fn out_of_range_units_are_rejected_not_wrapped() {
    for json in [
        r#"{"verts":1,"loops":[{"pos":200,"neg":100}],"bonds":[]}"#,
        r#"{"verts":1,"loops":[{"pos":130,"neg":129}],"bonds":[]}"#,
        r#"{"verts":1,"loops":[{"pos":4,"neg":0}],"bonds":[]}"#,
    ] {
        let err = graph_from_json(json).expect_err("units outside 0..=3");
        assert!(
            matches!(err, TriError::Structural(ref info) if info.code == "graph.multiplicity"),
            "{json}: {err}"
        );
    }
}

#[test]
fn out_of_range_units_are_rejected_from_a_raw_matrix() {
    let cells = vec![
        Units::new(0, 0),
        Units::new(130, 129),
        Units::new(130, 129),
        Units::new(0, 0),
    ];
    let err = Graph::from_unit_matrix(2, cells).expect_err("wrapping total");
    assert!(matches!(err, TriError::Structural(ref info) if info.code == "graph.multiplicity"));
    assert_eq!(Units::new(200, 100).total(), u8::MAX);
}

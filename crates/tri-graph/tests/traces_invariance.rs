use proptest::prelude::*;
use tri_core::{TriError, MAX_TRACES};
use tri_graph::{compute_traces, parse_graph, Graph, Traces};

const SAMPLES: &[&str] = &[
    "1",
    "1---2",
    "1=2-3",
    "1-2-3-1",
    "1^-2~3, 3-1",
    "1-2-3-4-1, 1-3, 2~4",
    "1=2-3=4-1",
    "1-2-3-4-1-5-6-7-8-5, 2-6, 3-7, 4-8",
];

fn graph(text: &str) -> Graph {
    parse_graph(text).expect("sample parses")
}

#[test]
fn single_vertex_traces_are_powers_of_three() {
    let traces = compute_traces(&graph("1"), Some(4)).expect("traces");
    assert_eq!(traces.as_slice(), &[3, 9, 27, 81]);
    let negative = compute_traces(&graph("1^^^"), Some(3)).expect("traces");
    assert_eq!(negative.as_slice(), &[-3, 9, -27]);
}

#[test]
fn default_length_is_vertex_count() {
    let gamma = graph("1---2");
    let traces = gamma.traces(None).expect("traces");
    assert_eq!(traces.as_slice(), &[0, 18]);
    let chain = graph("1=2-3");
    assert_eq!(chain.traces(None).expect("traces").as_slice(), &[3, 15, 27]);
}

#[test]
fn signed_edges_enter_the_matrix_with_their_sign() {
    let traces = graph("1~2").traces(Some(2)).expect("traces");
    assert_eq!(traces.as_slice(), &[4, 10]);
}

#[test]
fn triangle_matches_all_ones_matrix() {
    let traces = graph("1-2-3-1").traces(Some(4)).expect("traces");
    assert_eq!(traces.as_slice(), &[3, 9, 27, 81]);
}

#[test]
fn longer_requests_recompute_and_extend() {
    let g = graph("1=2-3=4-1");
    let short = g.traces(Some(4)).expect("short");
    let long = g.traces(Some(10)).expect("long");
    assert_eq!(long.len(), 10);
    assert_eq!(long.truncated(4), short);
}

#[test]
fn envelope_is_exact_at_the_limit() {
    let many: Vec<Graph> = (0..12).map(|_| graph("1")).collect();
    let g = Graph::concat_all(&many).expect("twelve vertices");
    let traces = g.traces(Some(MAX_TRACES)).expect("within envelope");
    assert_eq!(traces[MAX_TRACES - 1], 12 * 3i64.pow(MAX_TRACES as u32));
    let err = g.traces(Some(MAX_TRACES + 1)).expect_err("beyond envelope");
    assert!(matches!(err, TriError::Capacity(ref info) if info.code == "traces.length"));
}

#[test]
fn zero_vector_is_detected() {
    assert!(Traces::from_vec(vec![0, 0]).is_zero());
    assert!(!Traces::from_vec(vec![0, 1]).is_zero());
}

fn graph_and_perm() -> impl Strategy<Value = (Graph, Vec<usize>)> {
    (0..SAMPLES.len()).prop_flat_map(|idx| {
        let g = graph(SAMPLES[idx]);
        let n = g.num_verts();
        (Just(g), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn traces_survive_relabeling((g, perm) in graph_and_perm(), len in 1usize..12) {
        let relabeled = g.permuted(&perm).expect("permutation");
        prop_assert_eq!(g.traces(Some(len)).expect("traces"), relabeled.traces(Some(len)).expect("traces"));
        prop_assert_eq!(g.info(), relabeled.info());
    }
}

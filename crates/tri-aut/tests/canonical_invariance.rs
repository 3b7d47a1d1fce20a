use itertools::Itertools;
use proptest::prelude::*;
use tri_aut::{
    canonical_form, canonical_graph, canonicalize, exhaustive_canonical_form, isomorphic,
    CanonOpts,
};
use tri_core::TriError;
use tri_graph::{parse_graph, Graph};

const SAMPLES: &[&str] = &[
    "1",
    "1^",
    "1---2",
    "1-~2",
    "1=2-3",
    "1-2-3-1",
    "1^-2~3, 3-1",
    "1-2-3-4-1, 1-3, 2~4",
    "1=2-3=4-1",
    "1-2=3-4, 4-1",
    "1-2-3-4-1-5-6-7-8-5, 2-6, 3-7, 4-8",
    "1-2-3-4-5-6-1, 1-4, 2-5, 3-6",
    "1---2; 1-2-3-1; 1^^",
];

fn graph(text: &str) -> Graph {
    parse_graph(text).expect("sample parses")
}

#[test]
fn every_relabeling_of_small_graphs_shares_one_form() {
    for text in SAMPLES {
        let g = graph(text);
        let n = g.num_verts();
        if n > 5 {
            continue;
        }
        let expected = canonical_form(&g);
        for perm in (0..n).permutations(n) {
            let relabeled = g.permuted(&perm).expect("permutation");
            assert_eq!(canonical_form(&relabeled), expected, "{text} under {perm:?}");
        }
    }
}

#[test]
fn pruned_search_agrees_with_exhaustive_search_on_isomorphism() {
    let graphs: Vec<Graph> = SAMPLES
        .iter()
        .map(|text| graph(text))
        .filter(|g| g.num_verts() <= 6)
        .collect();
    for (a, b) in graphs.iter().tuple_combinations() {
        let exhaustive = exhaustive_canonical_form(a, 6).expect("small")
            == exhaustive_canonical_form(b, 6).expect("small");
        assert_eq!(isomorphic(a, b), exhaustive, "{a} vs {b}");
    }
}

#[test]
fn sign_changes_break_isomorphism() {
    assert!(!isomorphic(&graph("1---2"), &graph("1--~2")));
    assert!(isomorphic(&graph("1^-2"), &graph("1-2^")));
    assert!(!isomorphic(&graph("1^-2"), &graph("1-2")));
}

#[test]
fn canonical_graph_is_a_fixed_point() {
    for text in SAMPLES {
        let g = graph(text);
        let canon = canonical_graph(&g).expect("relabel");
        assert!(isomorphic(&g, &canon));
        assert_eq!(canonical_graph(&canon).expect("relabel"), canon, "{text}");
        assert_eq!(canonical_form(&g).to_graph().expect("rebuild"), canon, "{text}");
    }
}

#[test]
fn automorphism_counts_match_known_groups() {
    let cases = [
        ("1", 1),
        ("1---2", 2),
        ("1^-2", 1),
        ("1-2-3-1", 6),
        ("1-2-3-4-1, 1-3, 2-4", 24),
        ("1-2-3-4-1-5-6-7-8-5, 2-6, 3-7, 4-8", 48),
        ("1---2; 1---2", 8),
    ];
    for (text, order) in cases {
        let report = canonicalize(&graph(text), &CanonOpts::default()).expect("canonicalize");
        assert_eq!(report.automorphisms, order, "{text}");
    }
}

#[test]
fn identical_isolated_vertices_do_not_explode_the_search() {
    let many: Vec<Graph> = (0..12).map(|_| Graph::single_vertex()).collect();
    let g = Graph::concat_all(&many).expect("twelve");
    let report = canonicalize(&g, &CanonOpts::default()).expect("canonicalize");
    assert_eq!(report.automorphisms, 479_001_600);
}

#[test]
fn configured_vertex_cap_is_enforced() {
    let opts = CanonOpts { max_vertices: 3 };
    let err = canonicalize(&graph("1=2-3=4-1"), &opts).expect_err("four vertices");
    assert!(matches!(err, TriError::Capacity(_)));
    let err = exhaustive_canonical_form(&graph("1=2-3=4-1"), 3).expect_err("too big");
    assert_eq!(err.info().code, "canonical.exhaustive");
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
    fn canonical_identity_survives_relabeling((g, perm) in graph_and_perm()) {
        let relabeled = g.permuted(&perm).expect("permutation");
        prop_assert_eq!(canonical_form(&g).uid(), canonical_form(&relabeled).uid());
        let lhs = canonicalize(&g, &CanonOpts::default()).expect("canon");
        let rhs = canonicalize(&relabeled, &CanonOpts::default()).expect("canon");
        prop_assert_eq!(lhs.automorphisms, rhs.automorphisms);
    }
}

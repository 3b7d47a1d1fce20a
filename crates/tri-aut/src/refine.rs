use std::collections::BTreeMap;

use tri_graph::Graph;

/// Label-independent vertex colouring by iterated neighbourhood refinement.
///
/// Colours are ranks of sorted signatures, so two isomorphic graphs receive
/// matching colour classes under any isomorphism.
pub fn refine_colors(graph: &Graph) -> Vec<u32> {
    let n = graph.num_verts();
    let initial: Vec<(u8, Vec<u8>)> = (0..n)
        .map(|v| {
            let mut edges: Vec<u8> = (0..n)
                .filter(|&u| u != v)
                .map(|u| graph.units(v, u))
                .filter(|units| !units.is_empty())
                .map(|units| units.code())
                .collect();
            edges.sort_unstable();
            (graph.units(v, v).code(), edges)
        })
        .collect();
    let mut colors = rank(&initial);
    let mut classes = count_classes(&colors);

    while classes < n {
        let signatures: Vec<(u32, Vec<(u8, u32)>)> = (0..n)
            .map(|v| {
                let mut around: Vec<(u8, u32)> = (0..n)
                    .filter(|&u| u != v)
                    .filter_map(|u| {
                        let units = graph.units(v, u);
                        (!units.is_empty()).then(|| (units.code(), colors[u]))
                    })
                    .collect();
                around.sort_unstable();
                (colors[v], around)
            })
            .collect();
        let next = rank(&signatures);
        let next_classes = count_classes(&next);
        if next_classes == classes {
            break;
        }
        colors = next;
        classes = next_classes;
    }
    colors
}

fn rank<T: Ord + Clone>(signatures: &[T]) -> Vec<u32> {
    let mut distinct: BTreeMap<T, u32> = signatures.iter().map(|sig| (sig.clone(), 0)).collect();
    for (idx, value) in distinct.values_mut().enumerate() {
        *value = idx as u32;
    }
    signatures.iter().map(|sig| distinct[sig]).collect()
}

fn count_classes(colors: &[u32]) -> usize {
    let mut sorted = colors.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

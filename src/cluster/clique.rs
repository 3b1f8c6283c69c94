use std::collections::BTreeSet;

use tracing::debug;

use super::{ClusterAssignment, ClusterStrategy, adjacency};
use crate::network::Graph;

/// Group of nodes that belong to no clique.
pub const NO_CLIQUE: usize = 0;

/// Colours nodes by maximal clique. Cliques are numbered from 1 in
/// enumeration order and a node in several cliques takes the last one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CliqueClustering;

impl ClusterStrategy for CliqueClustering {
    fn name(&self) -> &'static str {
        "clique"
    }

    fn classify(&self, graph: &Graph) -> ClusterAssignment {
        let cliques = maximal_cliques(graph.node_count(), &graph.edge_indices());
        let mut groups = vec![NO_CLIQUE; graph.node_count()];
        for (index, clique) in cliques.iter().enumerate() {
            for &member in clique {
                groups[member] = index + 1;
            }
        }

        debug!(cliques = cliques.len(), "clique clustering");
        ClusterAssignment::from_indices(graph, &groups)
    }
}

/// Every maximal clique among nodes touched by at least one non-loop edge,
/// found by Bron–Kerbosch with pivoting. Members are sorted and the order of
/// cliques is fixed by node order.
pub fn maximal_cliques(node_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let neighbours = adjacency(node_count, edges);
    let candidates = (0..node_count)
        .filter(|&node| !neighbours[node].is_empty())
        .collect::<BTreeSet<_>>();

    let mut cliques = Vec::new();
    let mut clique = Vec::new();
    expand(
        &neighbours,
        &mut clique,
        candidates,
        BTreeSet::new(),
        &mut cliques,
    );
    cliques
}

fn expand(
    neighbours: &[BTreeSet<usize>],
    clique: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    cliques: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() && !clique.is_empty() {
            let mut members = clique.clone();
            members.sort_unstable();
            cliques.push(members);
        }
        return;
    }

    let mut pivot = None;
    let mut pivot_cover = 0;
    for &node in candidates.union(&excluded) {
        let cover = candidates.intersection(&neighbours[node]).count();
        if pivot.is_none() || cover > pivot_cover {
            pivot = Some(node);
            pivot_cover = cover;
        }
    }
    let branches = match pivot {
        Some(pivot) => candidates
            .difference(&neighbours[pivot])
            .copied()
            .collect::<Vec<_>>(),
        None => candidates.iter().copied().collect(),
    };

    for node in branches {
        clique.push(node);
        expand(
            neighbours,
            clique,
            candidates.intersection(&neighbours[node]).copied().collect(),
            excluded.intersection(&neighbours[node]).copied().collect(),
            cliques,
        );
        clique.pop();

        candidates.remove(&node);
        excluded.insert(node);
    }
}

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{ClusterAssignment, ClusterStrategy};
use crate::network::Graph;

const MIN_GAIN: f64 = 1e-12;

/// Partitions nodes into communities by greedy modularity agglomeration over
/// the link structure; node attributes are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommunityClustering;

impl ClusterStrategy for CommunityClustering {
    fn name(&self) -> &'static str {
        "community"
    }

    fn classify(&self, graph: &Graph) -> ClusterAssignment {
        let labels = communities(graph.node_count(), &graph.edge_indices());
        debug!(
            communities = labels.iter().max().map_or(0, |max| max + 1),
            "community clustering"
        );
        ClusterAssignment::from_indices(graph, &labels)
    }
}

/// Community index per node. Starting from singletons, the connected pair of
/// communities with the largest modularity gain is merged until no merge
/// improves modularity. Ties go to the lowest pair. Communities are numbered
/// from 0 in order of their first node.
pub fn communities(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut labels = (0..node_count).collect::<Vec<_>>();
    let edge_count = edges.iter().filter(|(source, target)| source != target).count();
    if edge_count == 0 {
        return labels;
    }

    let share = 1.0 / (2.0 * edge_count as f64);
    let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut degree_share = vec![0.0; node_count];
    for &(source, target) in edges {
        if source == target {
            continue;
        }
        *between
            .entry((source.min(target), source.max(target)))
            .or_default() += share;
        degree_share[source] += share;
        degree_share[target] += share;
    }

    loop {
        let mut best: Option<((usize, usize), f64)> = None;
        for (&(first, second), &fraction) in &between {
            let gain = 2.0 * (fraction - degree_share[first] * degree_share[second]);
            if gain > MIN_GAIN && best.is_none_or(|(_, best_gain)| gain > best_gain) {
                best = Some(((first, second), gain));
            }
        }

        let Some(((keep, absorb), _)) = best else {
            break;
        };

        let absorbed = between
            .keys()
            .filter(|(first, second)| *first == absorb || *second == absorb)
            .copied()
            .collect::<Vec<_>>();
        for key in absorbed {
            let Some(fraction) = between.remove(&key) else {
                continue;
            };
            let other = if key.0 == absorb { key.1 } else { key.0 };
            if other == keep {
                continue;
            }
            *between
                .entry((keep.min(other), keep.max(other)))
                .or_default() += fraction;
        }

        degree_share[keep] += degree_share[absorb];
        degree_share[absorb] = 0.0;
        for label in &mut labels {
            if *label == absorb {
                *label = keep;
            }
        }
    }

    let mut renumbered = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            let next = renumbered.len();
            *renumbered.entry(label).or_insert(next)
        })
        .collect()
}

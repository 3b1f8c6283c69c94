mod categorical;
mod clique;
mod community;

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::network::{Attribute, Graph};
pub use categorical::{CategoricalGrouping, UNATTACHED_LABEL};
pub use clique::{CliqueClustering, NO_CLIQUE, maximal_cliques};
pub use community::{CommunityClustering, communities};

/// d3 `schemeCategory10`.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn palette_colour(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupToken {
    Label(String),
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupAssignment {
    pub node_id: String,
    pub group: GroupToken,
    pub palette_index: usize,
}

impl GroupAssignment {
    pub fn colour(&self) -> &'static str {
        palette_colour(self.palette_index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub colour: &'static str,
}

/// One group per node, in node order, plus the legend when the groups have
/// meaningful names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterAssignment {
    pub groups: Vec<GroupAssignment>,
    pub legend: Option<Vec<LegendEntry>>,
}

impl ClusterAssignment {
    pub fn get(&self, node_id: &str) -> Option<&GroupAssignment> {
        self.groups.iter().find(|group| group.node_id == node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn distinct_colours(&self) -> BTreeSet<&'static str> {
        self.groups.iter().map(GroupAssignment::colour).collect()
    }

    fn from_indices(graph: &Graph, indices: &[usize]) -> Self {
        let groups = graph
            .nodes
            .iter()
            .zip(indices)
            .map(|(node, &index)| GroupAssignment {
                node_id: node.id.clone(),
                group: GroupToken::Index(index),
                palette_index: index,
            })
            .collect();

        Self {
            groups,
            legend: None,
        }
    }
}

pub trait ClusterStrategy {
    fn name(&self) -> &'static str;
    fn classify(&self, graph: &Graph) -> ClusterAssignment;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterMode {
    #[default]
    Company,
    Location,
    Occupation,
    Nationality,
    /// Communities found from the link structure alone.
    Network,
    /// Maximal cliques of the link structure.
    Cliques,
}

impl ClusterMode {
    pub fn strategy(self) -> Box<dyn ClusterStrategy> {
        match self {
            Self::Company => Box::new(CategoricalGrouping::new(Attribute::Company)),
            Self::Location => Box::new(CategoricalGrouping::new(Attribute::Location)),
            Self::Occupation => Box::new(CategoricalGrouping::new(Attribute::Occupation)),
            Self::Nationality => Box::new(CategoricalGrouping::new(Attribute::Nationality)),
            Self::Network => Box::new(CommunityClustering),
            Self::Cliques => Box::new(CliqueClustering),
        }
    }
}

/// Undirected adjacency over node indices, without self-loops or repeats.
fn adjacency(node_count: usize, edges: &[(usize, usize)]) -> Vec<BTreeSet<usize>> {
    let mut neighbours = vec![BTreeSet::new(); node_count];
    for &(source, target) in edges {
        if source != target {
            neighbours[source].insert(target);
            neighbours[target].insert(source);
        }
    }
    neighbours
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(palette_colour(0), "#1f77b4");
        assert_eq!(palette_colour(9), "#17becf");
        assert_eq!(palette_colour(10), palette_colour(0));
        assert_eq!(palette_colour(23), palette_colour(3));
    }

    #[test]
    fn modes_pick_matching_strategies() {
        assert_eq!(ClusterMode::Company.strategy().name(), "categorical");
        assert_eq!(ClusterMode::Network.strategy().name(), "community");
        assert_eq!(ClusterMode::Cliques.strategy().name(), "clique");
    }

    #[test]
    fn every_strategy_handles_the_empty_graph() {
        for mode in ClusterMode::value_variants() {
            let assignment = mode.strategy().classify(&Graph::default());
            assert!(assignment.is_empty());
            assert!(assignment.legend.as_ref().is_none_or(|legend| legend.is_empty()));
        }
    }

    #[test]
    fn adjacency_drops_loops_and_duplicates() {
        let neighbours = adjacency(3, &[(0, 1), (1, 0), (2, 2)]);
        assert_eq!(neighbours[0], BTreeSet::from([1]));
        assert_eq!(neighbours[1], BTreeSet::from([0]));
        assert!(neighbours[2].is_empty());
    }
}

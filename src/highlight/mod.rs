mod collect;

use std::collections::BTreeSet;

use tracing::debug;

use self::collect::collect_neighbourhood;
use crate::network::Graph;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighbourhood {
    pub node_id: String,
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<usize>,
}

/// Which node is selected in the rendered view. Edge ids are link indices in
/// the rendered graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(Neighbourhood),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
    Neutral,
    Emphasized,
    Dimmed,
}

impl VisualState {
    /// The `neighbour` feature flag of the map layers; neutral leaves it unset.
    pub fn neighbour_flag(self) -> Option<bool> {
        match self {
            Self::Neutral => None,
            Self::Emphasized => Some(true),
            Self::Dimmed => Some(false),
        }
    }
}

impl Selection {
    /// A click on `node_id` in `graph`. Ids that are not rendered behave like
    /// a background click.
    pub fn click_node(&mut self, graph: &Graph, node_id: &str) {
        if !graph.nodes.iter().any(|node| node.id == node_id) {
            debug!(node_id, "clicked node is not rendered; clearing selection");
            *self = Self::Idle;
            return;
        }

        let (nodes, edges) = collect_neighbourhood(&graph.links, node_id);
        debug!(
            node_id,
            neighbours = nodes.len(),
            edges = edges.len(),
            "node selected"
        );
        *self = Self::Selected(Neighbourhood {
            node_id: node_id.to_owned(),
            nodes,
            edges,
        });
    }

    pub fn click_background(&mut self) {
        *self = Self::Idle;
    }

    /// Drops the selection because the rendered node and edge sets changed.
    pub fn invalidate(&mut self) {
        *self = Self::Idle;
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Selected(neighbourhood) => Some(neighbourhood.node_id.as_str()),
        }
    }

    pub fn neighbourhood(&self) -> Option<&Neighbourhood> {
        match self {
            Self::Idle => None,
            Self::Selected(neighbourhood) => Some(neighbourhood),
        }
    }

    pub fn node_state(&self, node_id: &str) -> VisualState {
        match self {
            Self::Idle => VisualState::Neutral,
            Self::Selected(neighbourhood)
                if neighbourhood.node_id == node_id || neighbourhood.nodes.contains(node_id) =>
            {
                VisualState::Emphasized
            }
            Self::Selected(_) => VisualState::Dimmed,
        }
    }

    pub fn edge_state(&self, edge_index: usize) -> VisualState {
        match self {
            Self::Idle => VisualState::Neutral,
            Self::Selected(neighbourhood) if neighbourhood.edges.contains(&edge_index) => {
                VisualState::Emphasized
            }
            Self::Selected(_) => VisualState::Dimmed,
        }
    }
}

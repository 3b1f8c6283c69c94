use std::collections::HashSet;

use tracing::{debug, trace};

use super::graph::{Attribute, Graph, Link, NO_CONSTRAINT, Node};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Criterion {
    pub attribute: Attribute,
    pub value: String,
}

impl Criterion {
    pub fn is_constraint(&self) -> bool {
        self.value != NO_CONSTRAINT
    }

    fn matches(&self, node: &Node) -> bool {
        self.attribute.value(&node.details) == Some(self.value.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    criteria: Vec<Criterion>,
}

impl FilterCriteria {
    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.push(attribute, value);
        self
    }

    pub fn push(&mut self, attribute: Attribute, value: impl Into<String>) {
        self.criteria.push(Criterion {
            attribute,
            value: value.into(),
        });
    }

    /// Builds criteria from attribute-name/value pairs. Names that are not a
    /// known attribute are passed through without filtering anything.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut criteria = Self::default();
        for (name, value) in pairs {
            match name.parse::<Attribute>() {
                Ok(attribute) => criteria.push(attribute, value),
                Err(error) => debug!("ignoring filter criterion: {error}"),
            }
        }
        criteria
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|criterion| criterion.is_constraint())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active().next().is_none()
    }
}

fn filter_links(nodes: &[Node], links: &[Link]) -> Vec<Link> {
    let ids = nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();

    links
        .iter()
        .filter(|link| ids.contains(link.source.as_str()) && ids.contains(link.target.as_str()))
        .cloned()
        .collect()
}

/// Returns the subgraph whose nodes satisfy every active criterion, keeping
/// only links with both endpoints retained. The source graph is not touched.
pub fn filter(graph: &Graph, criteria: &FilterCriteria) -> Graph {
    if criteria.is_unconstrained() {
        debug!(nodes = graph.node_count(), "no active filter criteria");
        return graph.clone();
    }

    let nodes = graph
        .nodes
        .iter()
        .filter(|node| criteria.active().all(|criterion| criterion.matches(node)))
        .cloned()
        .collect::<Vec<_>>();

    for criterion in criteria.active() {
        trace!(attribute = %criterion.attribute, value = %criterion.value, "filter criterion");
    }

    let links = filter_links(&nodes, &graph.links);
    debug!(
        nodes = nodes.len(),
        links = links.len(),
        source_nodes = graph.node_count(),
        source_links = graph.link_count(),
        "filtered graph"
    );

    Graph { nodes, links }
}

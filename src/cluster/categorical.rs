use std::collections::BTreeSet;

use tracing::debug;

use super::{
    ClusterAssignment, ClusterStrategy, GroupAssignment, GroupToken, LegendEntry, palette_colour,
};
use crate::network::{Attribute, Details, Graph};

pub const UNATTACHED_LABEL: &str = "Unattached";

/// Groups nodes by the value of one attribute. Groups are ranked by sorted
/// value and the rank is the palette index; nodes without a value share the
/// empty group, which sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoricalGrouping {
    attribute: Attribute,
}

impl CategoricalGrouping {
    pub fn new(attribute: Attribute) -> Self {
        Self { attribute }
    }

    fn key<'a>(&self, details: &'a Details) -> &'a str {
        self.attribute.value(details).unwrap_or_default()
    }
}

impl ClusterStrategy for CategoricalGrouping {
    fn name(&self) -> &'static str {
        "categorical"
    }

    fn classify(&self, graph: &Graph) -> ClusterAssignment {
        let keys = graph
            .nodes
            .iter()
            .map(|node| self.key(&node.details))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let groups = graph
            .nodes
            .iter()
            .map(|node| {
                let key = self.key(&node.details);
                let rank = keys.binary_search(&key).unwrap_or_default();
                GroupAssignment {
                    node_id: node.id.clone(),
                    group: GroupToken::Label(key.to_owned()),
                    palette_index: rank,
                }
            })
            .collect();

        let legend = keys
            .iter()
            .enumerate()
            .map(|(rank, key)| LegendEntry {
                label: if key.is_empty() {
                    UNATTACHED_LABEL.to_owned()
                } else {
                    (*key).to_owned()
                },
                colour: palette_colour(rank),
            })
            .collect::<Vec<_>>();

        debug!(attribute = %self.attribute, groups = keys.len(), "categorical grouping");
        ClusterAssignment {
            groups,
            legend: Some(legend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Node;

    fn node(id: &str, company: Option<&str>) -> Node {
        let details = Details::at("Canton");
        Node {
            id: id.to_owned(),
            details: match company {
                Some(company) => details.with(Attribute::Company, company),
                None => details,
            },
        }
    }

    fn graph() -> Graph {
        Graph {
            nodes: vec![
                node("a", Some("Russell")),
                node("b", Some("Dent")),
                node("c", None),
                node("d", Some("Russell")),
                node("e", Some("")),
            ],
            links: Vec::new(),
        }
    }

    #[test]
    fn ranks_groups_lexicographically_with_unattached_first() {
        let assignment = CategoricalGrouping::new(Attribute::Company).classify(&graph());
        let legend = assignment.legend.expect("categorical legend");

        let labels = legend.iter().map(|entry| entry.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, [UNATTACHED_LABEL, "Dent", "Russell"]);
        assert_eq!(legend[1].colour, palette_colour(1));

        let ranks = assignment
            .groups
            .iter()
            .map(|group| group.palette_index)
            .collect::<Vec<_>>();
        assert_eq!(ranks, [2, 1, 0, 2, 0]);
    }

    #[test]
    fn equal_values_share_a_colour_and_colours_match_value_count() {
        let assignment = CategoricalGrouping::new(Attribute::Company).classify(&graph());
        assert_eq!(
            assignment.get("a").map(GroupAssignment::colour),
            assignment.get("d").map(GroupAssignment::colour)
        );
        assert_eq!(assignment.distinct_colours().len(), 3);
        assert_eq!(
            assignment.get("b").map(|group| &group.group),
            Some(&GroupToken::Label("Dent".to_owned()))
        );
    }

    #[test]
    fn location_grouping_uses_required_location() {
        let assignment = CategoricalGrouping::new(Attribute::Location).classify(&graph());
        assert_eq!(assignment.distinct_colours().len(), 1);
        assert_eq!(assignment.legend.map(|legend| legend.len()), Some(1));
    }

    #[test]
    fn empty_graph_has_empty_legend() {
        let assignment =
            CategoricalGrouping::new(Attribute::Nationality).classify(&Graph::default());
        assert!(assignment.groups.is_empty());
        assert_eq!(assignment.legend, Some(Vec::new()));
    }
}

use std::collections::BTreeSet;

use crate::network::Link;

/// Nodes joined to `selected_id` by any link, in either direction, and the
/// indices of those links. The selected node itself is not its own neighbour.
pub(super) fn collect_neighbourhood(
    links: &[Link],
    selected_id: &str,
) -> (BTreeSet<String>, BTreeSet<usize>) {
    let mut related_nodes = BTreeSet::new();
    let mut related_edges = BTreeSet::new();

    for (index, link) in links.iter().enumerate() {
        let Some(other) = link.other_end(selected_id) else {
            continue;
        };

        related_edges.insert(index);
        if other != selected_id {
            related_nodes.insert(other.to_owned());
        }
    }

    (related_nodes, related_edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_both_directions() {
        let links = vec![
            Link::new("a", "b"),
            Link::new("c", "a"),
            Link::new("b", "c"),
            Link::new("a", "b"),
        ];
        let (nodes, edges) = collect_neighbourhood(&links, "a");
        assert_eq!(nodes, BTreeSet::from(["b".to_owned(), "c".to_owned()]));
        assert_eq!(edges, BTreeSet::from([0, 1, 3]));
    }

    #[test]
    fn self_loop_is_an_edge_but_not_a_neighbour() {
        let links = vec![Link::new("a", "a")];
        let (nodes, edges) = collect_neighbourhood(&links, "a");
        assert!(nodes.is_empty());
        assert_eq!(edges, BTreeSet::from([0]));
    }
}

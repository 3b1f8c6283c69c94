use serde::Serialize;
use serde_json::Value;

use super::RenderedView;
use crate::cluster::{GroupToken, LegendEntry};
use crate::highlight::Selection;
use crate::network::{Details, GeoPoint};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature<P> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Geometry,
    pub properties: P,
}

impl<P> Feature<P> {
    fn new(id: Option<Value>, geometry: Geometry, properties: P) -> Self {
        Self {
            kind: "Feature",
            id,
            geometry,
            properties,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeProperties {
    pub id: String,
    pub details: Details,
    pub colour: &'static str,
    pub group: GroupToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbour: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeProperties {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbour: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationProperties {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPayload {
    pub selected: Option<String>,
    pub neighbour_nodes: Vec<String>,
    pub neighbour_edges: Vec<usize>,
}

/// What the map widget receives for one published view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Handoff {
    pub year: u32,
    pub nodes: FeatureCollection<NodeProperties>,
    pub edges: FeatureCollection<EdgeProperties>,
    pub locations: FeatureCollection<LocationProperties>,
    /// `None` when the grouping has no meaningful names.
    pub legend: Option<Vec<LegendEntry>>,
    pub centre: Option<[f64; 2]>,
    pub selection: SelectionPayload,
}

fn point(geo: GeoPoint) -> Geometry {
    Geometry::Point {
        coordinates: geo.coordinates(),
    }
}

pub fn handoff(view: &RenderedView, selection: &Selection) -> Handoff {
    let nodes = view
        .graph
        .nodes
        .iter()
        .zip(&view.coordinates)
        .zip(&view.clusters.groups)
        .map(|((node, coordinate), group)| {
            Feature::new(
                Some(Value::from(node.id.clone())),
                point(*coordinate),
                NodeProperties {
                    id: node.id.clone(),
                    details: node.details.clone(),
                    colour: group.colour(),
                    group: group.group.clone(),
                    neighbour: selection.node_state(&node.id).neighbour_flag(),
                },
            )
        })
        .collect();

    let edges = view
        .graph
        .links
        .iter()
        .zip(&view.paths)
        .enumerate()
        .map(|(index, (link, path))| {
            Feature::new(
                Some(Value::from(index)),
                Geometry::LineString {
                    coordinates: path.iter().map(|geo| geo.coordinates()).collect(),
                },
                EdgeProperties {
                    source: link.source.clone(),
                    target: link.target.clone(),
                    details: link.details.clone(),
                    neighbour: selection.edge_state(index).neighbour_flag(),
                },
            )
        })
        .collect();

    let locations = view
        .locations
        .iter()
        .map(|(name, geo)| {
            Feature::new(
                None,
                point(geo),
                LocationProperties {
                    name: name.to_owned(),
                },
            )
        })
        .collect();

    let selection = match selection.neighbourhood() {
        Some(neighbourhood) => SelectionPayload {
            selected: Some(neighbourhood.node_id.clone()),
            neighbour_nodes: neighbourhood.nodes.iter().cloned().collect(),
            neighbour_edges: neighbourhood.edges.iter().copied().collect(),
        },
        None => SelectionPayload::default(),
    };

    Handoff {
        year: view.year,
        nodes: FeatureCollection::new(nodes),
        edges: FeatureCollection::new(edges),
        locations: FeatureCollection::new(locations),
        legend: view.clusters.legend.clone(),
        centre: view.centre().map(GeoPoint::coordinates),
        selection,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::render;
    use super::super::tests::{request, scenario_source};
    use super::*;
    use crate::cluster::ClusterMode;
    use crate::network::FilterCriteria;

    fn scenario_view() -> RenderedView {
        render(&scenario_source(), &request(FilterCriteria::default())).expect("view")
    }

    #[test]
    fn idle_handoff_has_no_neighbour_flags() {
        let document = serde_json::to_value(handoff(&scenario_view(), &Selection::Idle))
            .expect("serialises");

        assert_eq!(document["nodes"]["type"], json!("FeatureCollection"));
        assert_eq!(document["nodes"]["features"].as_array().map(Vec::len), Some(3));
        let first = &document["nodes"]["features"][0];
        assert_eq!(first["id"], json!("A"));
        assert_eq!(first["geometry"]["type"], json!("Point"));
        assert_eq!(first["properties"]["colour"], json!("#1f77b4"));
        assert_eq!(first["properties"]["details"]["Company"], json!("Dent"));
        assert!(first["properties"].get("neighbour").is_none());

        let edge = &document["edges"]["features"][1];
        assert_eq!(edge["id"], json!(1));
        assert_eq!(edge["geometry"]["type"], json!("LineString"));
        assert_eq!(edge["properties"]["source"], json!("B"));
        assert_eq!(edge["geometry"]["coordinates"].as_array().map(Vec::len), Some(2));

        assert_eq!(document["locations"]["features"][0]["properties"]["name"], json!("X"));
        assert_eq!(document["legend"][0]["label"], json!("Dent"));
        assert_eq!(document["selection"]["selected"], json!(null));
    }

    #[test]
    fn selection_marks_neighbours_and_dims_the_rest() {
        let view = scenario_view();
        let mut selection = Selection::default();
        selection.click_node(&view.graph, "A");
        let document = handoff(&view, &selection);

        let flags = document
            .nodes
            .features
            .iter()
            .map(|feature| feature.properties.neighbour)
            .collect::<Vec<_>>();
        assert_eq!(flags, vec![Some(true), Some(true), Some(false)]);

        let edge_flags = document
            .edges
            .features
            .iter()
            .map(|feature| feature.properties.neighbour)
            .collect::<Vec<_>>();
        assert_eq!(edge_flags, vec![Some(true), Some(false)]);

        assert_eq!(document.selection.selected.as_deref(), Some("A"));
        assert_eq!(document.selection.neighbour_nodes, vec!["B".to_owned()]);
        assert_eq!(document.selection.neighbour_edges, vec![0]);
    }

    #[test]
    fn legendless_modes_send_null_legend() {
        let mut request = request(FilterCriteria::default());
        request.mode = ClusterMode::Cliques;
        let view = render(&scenario_source(), &request).expect("view");
        let document = serde_json::to_value(handoff(&view, &Selection::Idle)).expect("json");

        assert_eq!(document["legend"], json!(null));
        let groups = document["nodes"]["features"]
            .as_array()
            .map(|features| {
                features
                    .iter()
                    .map(|feature| feature["properties"]["group"].clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|group| group != &json!(0)));
    }
}

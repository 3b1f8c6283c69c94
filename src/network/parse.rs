use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use super::graph::{Details, GeoPoint, Graph, Link, LocationDirectory, Node};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Signed(number) => number.to_string(),
            Self::Unsigned(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: RawId,
    details: Details,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    source: RawId,
    target: RawId,
    #[serde(default)]
    details: Option<Value>,
}

fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedSnapshot(message.into())
}

fn array_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a Vec<Value>> {
    object
        .get(key)
        .ok_or_else(|| malformed(format!("missing `{key}` array")))?
        .as_array()
        .ok_or_else(|| malformed(format!("`{key}` is not an array")))
}

pub(super) fn parse_snapshot(raw: &str) -> Result<Graph> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|error| malformed(format!("invalid JSON: {error}")))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| malformed("snapshot is not a JSON object"))?;

    let raw_nodes = array_field(object, "nodes")?;
    let raw_links = array_field(object, "links")?;

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut known_ids = HashSet::with_capacity(raw_nodes.len());
    for (index, value) in raw_nodes.iter().enumerate() {
        let raw = RawNode::deserialize(value)
            .map_err(|error| malformed(format!("node #{index}: {error}")))?;
        let id = raw.id.into_string();
        if !known_ids.insert(id.clone()) {
            return Err(malformed(format!("duplicate node id {id:?}")));
        }
        nodes.push(Node {
            id,
            details: raw.details,
        });
    }

    let mut links = Vec::with_capacity(raw_links.len());
    for (index, value) in raw_links.iter().enumerate() {
        let raw = RawLink::deserialize(value)
            .map_err(|error| malformed(format!("link #{index}: {error}")))?;
        let source = raw.source.into_string();
        let target = raw.target.into_string();
        for endpoint in [&source, &target] {
            if !known_ids.contains(endpoint) {
                return Err(malformed(format!(
                    "link #{index} references unknown node {endpoint:?}"
                )));
            }
        }
        links.push(Link {
            source,
            target,
            details: raw.details,
        });
    }

    Ok(Graph { nodes, links })
}

pub(super) fn parse_locations(raw: &str) -> Result<LocationDirectory> {
    let entries: BTreeMap<String, GeoPoint> = serde_json::from_str(raw)
        .map_err(|error| malformed(format!("invalid location directory: {error}")))?;

    for (name, point) in &entries {
        if !point.lng.is_finite() || !point.lat.is_finite() {
            return Err(malformed(format!(
                "location {name:?} has a non-finite coordinate"
            )));
        }
    }

    Ok(LocationDirectory::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nodes_links_and_extra_details() {
        let raw = r#"{
            "nodes": [
                {"id": "Matheson", "details": {
                    "Company": "Jardine", "Location": "Canton", "Occupation": null, "Age": 41
                }},
                {"id": 7, "details": {"Location": "Macao"}}
            ],
            "links": [{"source": "Matheson", "target": 7, "details": {"kind": "partner"}}]
        }"#;

        let graph = parse_snapshot(raw).expect("snapshot parses");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.nodes[1].id, "7");
        assert_eq!(graph.nodes[0].details.company.as_deref(), Some("Jardine"));
        assert_eq!(graph.nodes[0].details.occupation, None);
        assert_eq!(graph.nodes[0].details.extra.get("Age"), Some(&Value::from(41)));
        assert_eq!(graph.links[0].target, "7");
        assert!(graph.links[0].details.is_some());
    }

    #[test]
    fn rejects_missing_location() {
        let raw = r#"{"nodes": [{"id": "a", "details": {"Company": "Dent"}}], "links": []}"#;
        let error = parse_snapshot(raw).expect_err("location is required");
        assert!(matches!(error, Error::MalformedSnapshot(message) if message.contains("node #0")));
    }

    #[test]
    fn rejects_missing_links_array() {
        let raw = r#"{"nodes": []}"#;
        assert!(matches!(parse_snapshot(raw), Err(Error::MalformedSnapshot(_))));
    }

    #[test]
    fn rejects_duplicate_ids_and_dangling_links() {
        let duplicate = r#"{"nodes": [
            {"id": "a", "details": {"Location": "X"}},
            {"id": "a", "details": {"Location": "X"}}
        ], "links": []}"#;
        assert!(matches!(parse_snapshot(duplicate), Err(Error::MalformedSnapshot(_))));

        let dangling = r#"{"nodes": [{"id": "a", "details": {"Location": "X"}}],
            "links": [{"source": "a", "target": "b"}]}"#;
        let error = parse_snapshot(dangling).expect_err("dangling link");
        assert!(error.to_string().contains("\"b\""));
    }

    #[test]
    fn parses_location_directory() {
        let raw = r#"{
            "Canton": {"Lng": 113.26, "Lat": 23.13},
            "Macao": {"Lng": 113.54, "Lat": 22.19}
        }"#;
        let locations = parse_locations(raw).expect("locations parse");
        assert_eq!(locations.len(), 2);
        assert_eq!(locations.get("Macao"), Some(GeoPoint::new(113.54, 22.19)));
        assert_eq!(locations.get("Bombay"), None);
    }

    #[test]
    fn rejects_location_without_latitude() {
        let raw = r#"{"Canton": {"Lng": 113.26}}"#;
        assert!(matches!(parse_locations(raw), Err(Error::MalformedSnapshot(_))));
    }
}

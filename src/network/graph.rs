use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Filter value meaning "no constraint on this attribute".
pub const NO_CONSTRAINT: &str = "na";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Company,
    Location,
    Occupation,
    Nationality,
}

impl Attribute {
    pub const ALL: [Self; 4] = [
        Self::Company,
        Self::Location,
        Self::Occupation,
        Self::Nationality,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Location => "Location",
            Self::Occupation => "Occupation",
            Self::Nationality => "Nationality",
        }
    }

    pub fn value(self, details: &Details) -> Option<&str> {
        match self {
            Self::Company => details.company.as_deref(),
            Self::Location => Some(details.location.as_str()),
            Self::Occupation => details.occupation.as_deref(),
            Self::Nationality => details.nationality.as_deref(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::UnknownAttribute(value.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Details {
    #[serde(rename = "Company")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Occupation")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(rename = "Nationality")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Details {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            company: None,
            location: location.into(),
            occupation: None,
            nationality: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        let value = value.into();
        match attribute {
            Attribute::Company => self.company = Some(value),
            Attribute::Location => self.location = value,
            Attribute::Occupation => self.occupation = Some(value),
            Attribute::Nationality => self.nationality = Some(value),
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub details: Details,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub details: Option<Value>,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            details: None,
        }
    }

    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(self.target.as_str())
        } else if self.target == node_id {
            Some(self.source.as_str())
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    pub fn index_by_id(&self) -> HashMap<&str, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect()
    }

    /// Link endpoints as node indices, in link order. Links naming an unknown
    /// node are skipped.
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        let index_by_id = self.index_by_id();
        self.links
            .iter()
            .filter_map(|link| {
                let source = index_by_id.get(link.source.as_str())?;
                let target = index_by_id.get(link.target.as_str())?;
                Some((*source, *target))
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "Lng")]
    pub lng: f64,
    #[serde(rename = "Lat")]
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn coordinates(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationDirectory {
    entries: BTreeMap<String, GeoPoint>,
}

impl LocationDirectory {
    pub fn new(entries: BTreeMap<String, GeoPoint>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, name: impl Into<String>, point: GeoPoint) {
        self.entries.insert(name.into(), point);
    }

    pub fn get(&self, name: &str) -> Option<GeoPoint> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GeoPoint)> {
        self.entries
            .iter()
            .map(|(name, point)| (name.as_str(), *point))
    }
}

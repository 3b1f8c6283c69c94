use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::graph::{Graph, LocationDirectory};
use super::parse::{parse_locations, parse_snapshot};
use super::reference::ReferenceValues;
use crate::error::{Error, Result};

/// Where snapshots and reference datasets come from.
pub trait DataSource {
    fn snapshot(&self, year: u32) -> Result<Graph>;
    fn locations(&self) -> Result<LocationDirectory>;
    fn reference_values(&self) -> Result<ReferenceValues>;
}

/// A directory laid out as `<year>.json`, `locations.json` and
/// `selections.json`.
#[derive(Clone, Debug)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, file_name: &str) -> Result<String> {
        let path = self.root.join(file_name);
        debug!(path = %path.display(), "reading data file");
        fs::read_to_string(&path).map_err(|source| Error::FetchFailure {
            what: path.display().to_string(),
            source,
        })
    }
}

impl DataSource for DataDir {
    fn snapshot(&self, year: u32) -> Result<Graph> {
        let graph = parse_snapshot(&self.read(&format!("{year}.json"))?)?;
        info!(
            year,
            nodes = graph.node_count(),
            links = graph.link_count(),
            "loaded snapshot"
        );
        Ok(graph)
    }

    fn locations(&self) -> Result<LocationDirectory> {
        let locations = parse_locations(&self.read("locations.json")?)?;
        info!(locations = locations.len(), "loaded location directory");
        Ok(locations)
    }

    fn reference_values(&self) -> Result<ReferenceValues> {
        ReferenceValues::parse(&self.read("selections.json")?)
    }
}

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    pub snapshots: std::collections::BTreeMap<u32, Graph>,
    pub locations: LocationDirectory,
}

#[cfg(test)]
impl DataSource for MemorySource {
    fn snapshot(&self, year: u32) -> Result<Graph> {
        self.snapshots
            .get(&year)
            .cloned()
            .ok_or_else(|| Error::FetchFailure {
                what: format!("snapshot {year}"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn locations(&self) -> Result<LocationDirectory> {
        Ok(self.locations.clone())
    }

    fn reference_values(&self) -> Result<ReferenceValues> {
        Ok(ReferenceValues::default())
    }
}

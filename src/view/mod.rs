mod geojson;
mod session;

use tracing::{info, warn};

use crate::cluster::{ClusterAssignment, ClusterMode};
use crate::error::Result;
use crate::layout::{Projector, SimulationParams, Viewport, layout};
use crate::network::{DataSource, FilterCriteria, GeoPoint, Graph, LocationDirectory, filter};
pub use geojson::{
    EdgeProperties, Feature, FeatureCollection, Geometry, Handoff, LocationProperties,
    NodeProperties, SelectionPayload, handoff,
};
pub use session::{Outcome, RunTicket, ViewSession};

/// Everything one filter/layout/classify run depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewRequest {
    pub year: u32,
    pub criteria: FilterCriteria,
    pub mode: ClusterMode,
    pub params: SimulationParams,
    pub viewport: Viewport,
}

/// A filtered, laid-out and classified copy of a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedView {
    pub year: u32,
    pub graph: Graph,
    pub coordinates: Vec<GeoPoint>,
    pub paths: Vec<[GeoPoint; 2]>,
    pub clusters: ClusterAssignment,
    pub locations: LocationDirectory,
}

impl RenderedView {
    /// Centre of the bounding box of all node coordinates.
    pub fn centre(&self) -> Option<GeoPoint> {
        let first = self.coordinates.first()?;
        let (mut min, mut max) = (*first, *first);
        for coordinate in &self.coordinates {
            min.lng = min.lng.min(coordinate.lng);
            min.lat = min.lat.min(coordinate.lat);
            max.lng = max.lng.max(coordinate.lng);
            max.lat = max.lat.max(coordinate.lat);
        }
        Some(GeoPoint::new(
            (min.lng + max.lng) / 2.0,
            (min.lat + max.lat) / 2.0,
        ))
    }
}

pub fn build_view(
    snapshot: &Graph,
    locations: &LocationDirectory,
    request: &ViewRequest,
) -> Result<RenderedView> {
    let graph = filter(snapshot, &request.criteria);
    let projector = Projector::new(request.viewport);
    let placed = layout(&graph, locations, &projector, request.params)?;
    let strategy = request.mode.strategy();
    let clusters = strategy.classify(&graph);

    info!(
        year = request.year,
        nodes = graph.node_count(),
        links = graph.link_count(),
        strategy = strategy.name(),
        "view ready"
    );

    Ok(RenderedView {
        year: request.year,
        graph,
        coordinates: placed.coordinates,
        paths: placed.paths,
        clusters,
        locations: locations.clone(),
    })
}

pub fn render(source: &impl DataSource, request: &ViewRequest) -> Result<RenderedView> {
    let snapshot = source.snapshot(request.year)?;
    let locations = source.locations()?;

    let reference = source.reference_values()?;
    for unknown in reference.unknown_values(&request.criteria) {
        match unknown.suggestion {
            Some(suggestion) => warn!(
                attribute = %unknown.attribute,
                value = unknown.value,
                "filter value is not a known value; did you mean {suggestion:?}?"
            ),
            None => warn!(
                attribute = %unknown.attribute,
                value = unknown.value,
                "filter value is not a known value"
            ),
        }
    }

    build_view(&snapshot, &locations, request)
}

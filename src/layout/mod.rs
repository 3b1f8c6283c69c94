mod physics;
mod projection;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::network::{GeoPoint, Graph, LocationDirectory};
use physics::Simulation;
pub use projection::{LONGITUDE_CORRECTION, PROJECTION_ZOOM, Projector, TILE_SIZE, Viewport};

pub type Point = euclid::default::Point2D<f64>;
pub type Vector = euclid::default::Vector2D<f64>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Number of simulation steps per layout run. There is no convergence check.
pub const SIMULATION_STEPS: usize = 300;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SimulationParams {
    pub cluster_strength: f64,
    pub cluster_centre_inertia: f64,
    pub link_distance: f64,
    pub link_strength: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            cluster_strength: 0.5,
            cluster_centre_inertia: 0.0,
            link_distance: 0.0,
            link_strength: 0.0,
        }
    }
}

impl SimulationParams {
    pub fn validate(self) -> Result<Self> {
        for (name, value) in [
            ("clusterStrength", self.cluster_strength),
            ("clusterCentreInertia", self.cluster_centre_inertia),
            ("linkDistance", self.link_distance),
            ("linkStrength", self.link_strength),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(self)
    }
}

/// Starting state of a run: one planar position and anchor per node, and one
/// cluster centre per distinct location.
#[derive(Clone, Debug, PartialEq)]
pub struct Seeding {
    pub positions: Vec<Point>,
    pub anchors: Vec<usize>,
    pub centres: Vec<Point>,
}

pub fn seed(
    graph: &Graph,
    locations: &LocationDirectory,
    projector: &Projector,
) -> Result<Seeding> {
    let mut anchor_by_name: HashMap<&str, usize> = HashMap::new();
    let mut positions = Vec::with_capacity(graph.node_count());
    let mut anchors = Vec::with_capacity(graph.node_count());
    let mut centres = Vec::new();

    for node in &graph.nodes {
        let name = node.details.location.as_str();
        let geo = locations.get(name).ok_or_else(|| Error::MissingLocation {
            node_id: node.id.clone(),
            location: name.to_owned(),
        })?;

        let planar = projector.project(geo);
        let anchor = *anchor_by_name.entry(name).or_insert_with(|| {
            centres.push(planar);
            centres.len() - 1
        });

        positions.push(planar);
        anchors.push(anchor);
    }

    Ok(Seeding {
        positions,
        anchors,
        centres,
    })
}

/// Runs the fixed-step simulation from `seeding`. Pure: the same inputs always
/// give the same positions.
pub fn simulate(
    seeding: Seeding,
    edges: &[(usize, usize)],
    params: SimulationParams,
) -> Vec<Point> {
    if seeding.positions.is_empty() {
        return Vec::new();
    }
    Simulation::new(seeding, edges, params, SIMULATION_STEPS).run(SIMULATION_STEPS)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// Final coordinate of each node, in node order.
    pub coordinates: Vec<GeoPoint>,
    /// Two-point path of each link, in link order.
    pub paths: Vec<[GeoPoint; 2]>,
}

pub fn layout(
    graph: &Graph,
    locations: &LocationDirectory,
    projector: &Projector,
    params: SimulationParams,
) -> Result<Layout> {
    let params = params.validate()?;
    let seeding = seed(graph, locations, projector)?;
    let edges = graph.edge_indices();
    debug!(
        nodes = graph.node_count(),
        links = edges.len(),
        clusters = seeding.centres.len(),
        steps = SIMULATION_STEPS,
        "running layout simulation"
    );

    let coordinates = simulate(seeding, &edges, params)
        .into_iter()
        .map(|planar| projector.unproject(planar))
        .collect::<Vec<_>>();

    let index_by_id = graph.index_by_id();
    let paths = graph
        .links
        .iter()
        .map(|link| {
            let endpoint = |id: &str| {
                index_by_id
                    .get(id)
                    .map(|&index| coordinates[index])
                    .ok_or_else(|| {
                        Error::MalformedSnapshot(format!("link endpoint {id:?} is not a node"))
                    })
            };
            Ok([endpoint(&link.source)?, endpoint(&link.target)?])
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Layout { coordinates, paths })
}

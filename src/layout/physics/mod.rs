mod forces;
mod quadtree;

use super::{Point, Seeding, SimulationParams, Vector};
use forces::{
    Spring, accumulate_charge_for_node, accumulate_springs, apply_cluster_attraction, springs,
};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f64 = 0.9;
const CHARGE_STRENGTH: f64 = -2.0;
const ALPHA_START: f64 = 1.0;
const ALPHA_MIN: f64 = 0.001;
const ALPHA_TARGET: f64 = 0.0;
const VELOCITY_DECAY: f64 = 0.4;

pub(super) struct Simulation {
    positions: Vec<Point>,
    velocities: Vec<Vector>,
    anchors: Vec<usize>,
    centres: Vec<Point>,
    springs: Vec<Spring>,
    params: SimulationParams,
    alpha: f64,
    alpha_decay: f64,
}

impl Simulation {
    /// `cooling_steps` sets the decay rate so alpha reaches its minimum after
    /// that many steps.
    pub(super) fn new(
        seeding: Seeding,
        edges: &[(usize, usize)],
        params: SimulationParams,
        cooling_steps: usize,
    ) -> Self {
        let node_count = seeding.positions.len();
        Self {
            velocities: vec![Vector::zero(); node_count],
            springs: springs(node_count, edges),
            positions: seeding.positions,
            anchors: seeding.anchors,
            centres: seeding.centres,
            params,
            alpha: ALPHA_START,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / cooling_steps.max(1) as f64),
        }
    }

    #[cfg(test)]
    fn alpha(&self) -> f64 {
        self.alpha
    }

    #[cfg(test)]
    fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub(super) fn step(&mut self) {
        self.alpha += (ALPHA_TARGET - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;

        apply_cluster_attraction(
            &mut self.positions,
            &self.anchors,
            &mut self.centres,
            self.params.cluster_strength * alpha * alpha,
            self.params.cluster_centre_inertia,
        );

        accumulate_springs(
            &self.springs,
            &self.positions,
            &mut self.velocities,
            self.params.link_distance,
            self.params.link_strength * alpha,
        );

        if let Some(quadtree) = QuadNode::build(&self.positions) {
            for (index, velocity) in self.velocities.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &quadtree,
                    index,
                    &self.positions,
                    CHARGE_STRENGTH * alpha,
                    BARNES_HUT_THETA,
                    velocity,
                );
            }
        }

        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *velocity *= 1.0 - VELOCITY_DECAY;
            *position += *velocity;
        }
    }

    pub(super) fn run(mut self, steps: usize) -> Vec<Point> {
        for _ in 0..steps {
            self.step();
        }
        self.positions
    }
}

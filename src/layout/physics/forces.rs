use super::super::{Point, Vector};
use super::quadtree::QuadNode;

const JIGGLE_SCALE: f64 = 1e-6;
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Tiny non-zero offset used when two bodies coincide on an axis. Antisymmetric
/// in its arguments so a coincident pair is pushed in opposite directions.
pub(super) fn jiggle(from: usize, to: usize, axis: usize) -> f64 {
    let (low, high) = if from <= to { (from, to) } else { (to, from) };
    let phase = ((low as f64) * 0.618_034 + (high as f64) * 0.414_214 + (axis as f64) * 0.271_828)
        .fract();
    let magnitude = (0.25 + phase * 0.5) * JIGGLE_SCALE;
    if from <= to { magnitude } else { -magnitude }
}

fn separated(mut delta: Vector, from: usize, to: usize) -> Vector {
    if delta.x == 0.0 {
        delta.x = jiggle(from, to, 0);
    }
    if delta.y == 0.0 {
        delta.y = jiggle(from, to, 1);
    }
    delta
}

/// Velocity change from a charge of `weight` sitting `delta` away. Negative
/// weights repel.
fn charge_between(delta: Vector, weight: f64) -> Vector {
    let mut distance_sq = delta.square_length();
    if distance_sq < MIN_DISTANCE_SQ {
        distance_sq = (MIN_DISTANCE_SQ * distance_sq).sqrt();
    }
    delta * (weight / distance_sq)
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Point],
    weight: f64,
    theta: f64,
    velocity: &mut Vector,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            let delta = separated(positions[other_index] - point, index, other_index);
            *velocity += charge_between(delta, weight);
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance = delta.length().max(1e-4);
    let can_approximate = !node.bounds.contains(point)
        && ((node.bounds.side_length() / distance) < theta)
        && node.mass > 1.0;

    if can_approximate {
        *velocity += charge_between(delta, weight * node.mass);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, weight, theta, velocity);
    }
}

/// Moves each body towards the centre of its anchor, and the centre towards the
/// body by `1 - inertia` of that step.
pub(super) fn apply_cluster_attraction(
    positions: &mut [Point],
    anchors: &[usize],
    centres: &mut [Point],
    weight: f64,
    inertia: f64,
) {
    if weight == 0.0 {
        return;
    }

    for (position, &anchor) in positions.iter_mut().zip(anchors) {
        let centre = &mut centres[anchor];
        let offset = *position - *centre;
        if offset.square_length() == 0.0 {
            continue;
        }

        let step = offset * weight;
        *position -= step;
        *centre += step * (1.0 - inertia);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) bias: f64,
}

/// Builds one spring per non-loop link. `bias` is the share of the correction
/// taken by the target, from the endpoint degrees.
pub(super) fn springs(node_count: usize, edges: &[(usize, usize)]) -> Vec<Spring> {
    let mut degree = vec![0usize; node_count];
    for &(source, target) in edges {
        if source != target {
            degree[source] += 1;
            degree[target] += 1;
        }
    }

    edges
        .iter()
        .filter(|(source, target)| source != target)
        .map(|&(source, target)| Spring {
            source,
            target,
            bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
        })
        .collect()
}

pub(super) fn accumulate_springs(
    springs: &[Spring],
    positions: &[Point],
    velocities: &mut [Vector],
    distance: f64,
    weight: f64,
) {
    if weight == 0.0 {
        return;
    }

    for spring in springs {
        let source = positions[spring.source] + velocities[spring.source];
        let target = positions[spring.target] + velocities[spring.target];
        let delta = separated(target - source, spring.source, spring.target);
        let length = delta.length();
        let correction = delta * ((length - distance) / length * weight);

        velocities[spring.target] -= correction * spring.bias;
        velocities[spring.source] += correction * (1.0 - spring.bias);
    }
}

use super::super::{Point, Vector, point, vector};

const QUADTREE_LEAF_CAPACITY: usize = 12;
const QUADTREE_MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    pub(super) center: Point,
    pub(super) half_extent: f64,
}

impl QuadBounds {
    fn from_points(points: &[Point]) -> Option<Self> {
        let mut min = point(f64::INFINITY, f64::INFINITY);
        let mut max = point(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let center = min.lerp(max, 0.5);
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        let half_extent = (span_x.max(span_y) * 0.5) + 1.0;

        Some(Self {
            center,
            half_extent,
        })
    }

    pub(super) fn contains(self, point: Point) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vector(-quarter, -quarter),
            1 => vector(quarter, -quarter),
            2 => vector(-quarter, quarter),
            _ => vector(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Point) -> usize {
        let right = point.x >= self.center.x;
        let lower = point.y >= self.center.y;
        match (right, lower) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    pub(super) fn side_length(self) -> f64 {
        self.half_extent * 2.0
    }
}

/// Barnes-Hut cell. Every body carries the same charge, so `mass` is a body
/// count and `center_of_mass` the plain centroid.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center_of_mass: Point,
    pub(super) mass: f64,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Point]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Point],
        depth: usize,
    ) -> Self {
        let mut sum = Vector::zero();
        for &index in &indices {
            sum += positions[index].to_vector();
        }

        let mass = indices.len() as f64;
        let center_of_mass = if mass > 0.0 {
            (sum / mass).to_point()
        } else {
            bounds.center
        };

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_for(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let child_bounds = bounds.child(quadrant);
            node.children[quadrant] = Some(Box::new(Self::build_node(
                child_bounds,
                bucket,
                positions,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_bodies(node: &QuadNode) -> usize {
        if node.is_leaf() {
            return node.indices.len();
        }
        node.children
            .iter()
            .flatten()
            .map(|child| count_bodies(child))
            .sum()
    }

    #[test]
    fn empty_positions_build_nothing() {
        assert!(QuadNode::build(&[]).is_none());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![point(4.0, 4.0); 40];
        let tree = QuadNode::build(&positions).expect("tree");
        assert!(tree.is_leaf());
        assert_eq!(tree.indices.len(), 40);
        assert_eq!(tree.center_of_mass, point(4.0, 4.0));
    }

    #[test]
    fn spread_points_split_and_keep_every_body() {
        let positions = (0..100)
            .map(|index| point((index % 10) as f64 * 30.0, (index / 10) as f64 * 30.0))
            .collect::<Vec<_>>();
        let tree = QuadNode::build(&positions).expect("tree");

        assert!(!tree.is_leaf());
        assert_eq!(tree.mass, 100.0);
        assert_eq!(count_bodies(&tree), 100);
        assert!((tree.center_of_mass.x - 135.0).abs() < 1e-9);
        assert!((tree.center_of_mass.y - 135.0).abs() < 1e-9);
        for position in &positions {
            assert!(tree.bounds.contains(*position));
        }
    }
}

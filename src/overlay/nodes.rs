use std::collections::HashMap;

use crate::geometry::point::distance_xy;
use crate::geometry::Envelope;
use crate::index::{IndexKind, SpatialIndex};
use crate::math::epsilon::significance_epsilon;
use crate::math::Point3;

/// Node identifier, an index into [`NodeSet::points`].
pub type NodeId = usize;

/// Points clustered within tolerance in XY.
///
/// The first point registered at a location becomes the node; later points
/// within tolerance snap to it. Lookups go through a hash grid whose cells
/// are at least twice the snapping distance, so a 3x3 cell neighbourhood
/// always covers every candidate.
#[derive(Debug, Clone)]
pub struct NodeSet {
    points: Vec<Point3>,
    cells: HashMap<(i64, i64), Vec<NodeId>>,
    cell_size: f64,
    tolerance: f64,
}

impl NodeSet {
    /// Creates an empty set for coordinates of magnitude up to `extent`.
    #[must_use]
    pub fn new(tolerance: f64, extent: f64) -> Self {
        let tolerance = tolerance.max(0.0);
        let snap = tolerance + significance_epsilon(&[extent]);
        Self {
            points: Vec::new(),
            cells: HashMap::new(),
            cell_size: (2.0 * snap).max(1e-9),
            tolerance,
        }
    }

    /// Returns the node at `point`, creating it if no node lies within tolerance.
    pub fn insert(&mut self, point: Point3) -> NodeId {
        if let Some(id) = self.find(&point) {
            return id;
        }
        let id = self.points.len();
        self.points.push(point);
        self.cells.entry(self.cell_of(&point)).or_default().push(id);
        id
    }

    /// The nearest node within tolerance of `point`.
    #[must_use]
    pub fn find(&self, point: &Point3) -> Option<NodeId> {
        let snap = self.tolerance + significance_epsilon(&[point.x, point.y]);
        let (cx, cy) = self.cell_of(point);
        let mut best: Option<(NodeId, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.cells.get(&(cx.saturating_add(dx), cy.saturating_add(dy)))
                else {
                    continue;
                };
                for &id in ids {
                    let d = distance_xy(&self.points[id], point);
                    if d <= snap && best.map_or(true, |(_, bd)| d < bd) {
                        best = Some((id, d));
                    }
                }
            }
        }
        best.map(|(id, _)| id)
    }

    #[must_use]
    pub fn point(&self, id: NodeId) -> &Point3 {
        &self.points[id]
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Spatial index over the node locations, for range queries along segments.
    #[must_use]
    pub fn build_index(&self) -> SpatialIndex {
        let envelopes = self.points.iter().map(|p| Envelope::new(*p, *p)).collect();
        SpatialIndex::build(IndexKind::default(), envelopes)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, point: &Point3) -> (i64, i64) {
        (
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::index::SegmentIndex;

    #[test]
    fn points_within_tolerance_share_a_node() {
        let mut nodes = NodeSet::new(0.1, 100.0);
        let a = nodes.insert(Point3::new(10.0, 10.0, 1.0));
        let b = nodes.insert(Point3::new(10.05, 9.97, 2.0));
        let c = nodes.insert(Point3::new(10.2, 10.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(nodes.len(), 2);
        // the first registered point wins, including its Z
        assert!((nodes.point(a).z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn snapping_works_across_cell_borders() {
        let mut nodes = NodeSet::new(0.5, 100.0);
        // cell size is 1.0, the points straddle the border at x = 3
        let a = nodes.insert(Point3::new(2.99, 0.0, 0.0));
        let b = nodes.insert(Point3::new(3.01, 0.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(nodes.find(&Point3::new(-3.0, 0.0, 0.0)), None);
    }

    #[test]
    fn nearest_node_is_returned() {
        let mut nodes = NodeSet::new(1.0, 100.0);
        let a = nodes.insert(Point3::new(0.0, 0.0, 0.0));
        let b = nodes.insert(Point3::new(1.5, 0.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(nodes.find(&Point3::new(0.9, 0.0, 0.0)), Some(b));
        assert_eq!(nodes.find(&Point3::new(0.6, 0.0, 0.0)), Some(a));
    }

    #[test]
    fn index_finds_nodes_near_a_segment() {
        let mut nodes = NodeSet::new(0.01, 100.0);
        for i in 0..10 {
            nodes.insert(Point3::new(f64::from(i) * 10.0, 0.0, 0.0));
        }
        let index = nodes.build_index();
        let query = Envelope::new(Point3::new(15.0, -1.0, 0.0), Point3::new(35.0, 1.0, 0.0));
        let mut found: Vec<NodeId> = index.search(&query, 0.01).collect();
        found.sort_unstable();
        assert_eq!(found, vec![2, 3]);
    }
}

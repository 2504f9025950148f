//! Intersection of two planar 3D rings.
//!
//! Each ring is cut by the other ring's supporting plane. The stretches of
//! the planes' intersection line covered by both rings form the result
//! paths; every path records on which side of the second ring's plane the
//! first ring's interior continues.

use tracing::{debug, instrument, trace};

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::point::equals_3d;
use crate::geometry::{Envelope, Linestring, MultiLinestring, Plane3D, Projection, Segment};
use crate::math::{Point3, Vector3};
use crate::relation::containment::{ring_contains_point_xy, Containment};

use super::boolean::Intersection;

/// Where `ring1`'s interior lies relative to `ring2`'s plane along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPlaneTopology {
    /// Ring1 continues on the side the plane normal points to.
    LeftPositive,
    /// Ring1 continues on the side opposite to the plane normal.
    LeftNegative,
    /// The path follows ring1 edges lying in the plane.
    InPlane,
}

/// One continuous piece of the ring-ring intersection.
#[derive(Debug, Clone)]
pub struct IntersectionPath3D {
    pub path: Linestring,
    pub ring_plane_topology: RingPlaneTopology,
}

#[derive(Debug, Clone)]
pub enum RingPlaneIntersection {
    /// The planes are parallel and apart, or the rings are coplanar with
    /// disjoint footprints.
    NotApplicable,
    /// Paths ordered along the intersection line; empty if the rings do not
    /// meet.
    Paths(Vec<IntersectionPath3D>),
}

impl RingPlaneIntersection {
    #[must_use]
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }

    /// The paths, empty for [`RingPlaneIntersection::NotApplicable`].
    #[must_use]
    pub fn paths(&self) -> &[IntersectionPath3D] {
        match self {
            Self::NotApplicable => &[],
            Self::Paths(paths) => paths,
        }
    }
}

/// Intersects two closed planar rings in 3D.
///
/// Paths are oriented so that ring1's intersection points come in ring order
/// and take their coordinates from ring1. Coplanar rings yield the outlines
/// of their common area as [`RingPlaneTopology::InPlane`] paths.
pub struct IntersectRings3D<'a> {
    ring1: &'a Linestring,
    ring2: &'a Linestring,
    tolerance: f64,
}

impl<'a> IntersectRings3D<'a> {
    #[must_use]
    pub fn new(ring1: &'a Linestring, ring2: &'a Linestring, tolerance: f64) -> Self {
        Self {
            ring1,
            ring2,
            tolerance,
        }
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for open rings, a plane fitting
    /// error for degenerate rings and `GeometryError::NotPlanar` if a ring
    /// deviates from its plane by more than the tolerance.
    #[instrument(skip_all, fields(tolerance = self.tolerance))]
    pub fn execute(&self) -> Result<RingPlaneIntersection> {
        let tolerance = self.tolerance;
        let plane1 = fit_ring(self.ring1, tolerance)?;
        let plane2 = fit_ring(self.ring2, tolerance)?;

        // Step 1: parallel planes
        if plane1.is_parallel(&plane2) {
            if plane1.is_coincident(&plane2, tolerance) {
                return self.intersect_coplanar(plane1);
            }
            debug!("ring planes are parallel");
            return Ok(RingPlaneIntersection::NotApplicable);
        }

        // Step 2: bounding boxes
        let env1 = self.ring1.envelope();
        if env1.is_disjoint_3d(self.ring2.envelope(), tolerance) {
            return Ok(RingPlaneIntersection::Paths(Vec::new()));
        }

        // Step 3: the planes' intersection line within ring1's box
        let Some(line) = plane1.intersect_plane(&plane2) else {
            return Ok(RingPlaneIntersection::NotApplicable);
        };
        let slack = Vector3::repeat(tolerance);
        let bounds = Envelope::new(env1.min - slack, env1.max + slack);
        let Some(line) = Segment::construct_in_box(&line.start, &line.delta(), &bounds) else {
            trace!("intersection line misses the first ring");
            return Ok(RingPlaneIntersection::Paths(Vec::new()));
        };
        let origin = line.start;
        let mut direction = line.delta();
        let length = direction.norm();
        if length < tolerance {
            // the line only touches a corner of the box
            direction = plane1.normal().cross(plane2.normal()).normalize();
        } else {
            direction /= length;
        }

        // Step 4: cut each ring with the other plane
        let cut1 = RingCut::new(self.ring1, &plane2, tolerance);
        let cut2 = RingCut::new(self.ring2, &plane1, tolerance);
        if cut1.runs_against(&origin, &direction, tolerance) {
            direction = -direction;
        }
        let intervals1 = cut1.intervals(&plane1, &origin, &direction, tolerance);
        let intervals2 = cut2.intervals(&plane2, &origin, &direction, tolerance);
        debug!(
            first = intervals1.len(),
            second = intervals2.len(),
            "ring intervals on the intersection line"
        );

        // Step 5: common stretches, merged where neither ring changes its topology
        let mut pieces = Vec::new();
        for a in &intervals1 {
            for b in &intervals2 {
                let start = a.start.max(b.start);
                let end = a.end.min(b.end);
                if end - start > tolerance {
                    pieces.push(Piece {
                        start,
                        from: a.point_at(start),
                        to: a.point_at(end),
                        topology: a.topology,
                        other: b.topology,
                    });
                }
            }
        }
        pieces.sort_by(|x, y| x.start.total_cmp(&y.start));

        let mut paths: Vec<(Vec<Point3>, Piece)> = Vec::new();
        for piece in pieces {
            match paths.last_mut() {
                Some((points, last))
                    if last.topology == piece.topology
                        && last.other == piece.other
                        && points
                            .last()
                            .is_some_and(|end| equals_3d(end, &piece.from, tolerance)) =>
                {
                    points.push(piece.to);
                }
                _ => paths.push((vec![piece.from, piece.to], piece)),
            }
        }

        Ok(RingPlaneIntersection::Paths(
            paths
                .into_iter()
                .map(|(points, piece)| IntersectionPath3D {
                    path: Linestring::new(points),
                    ring_plane_topology: piece.topology,
                })
                .collect(),
        ))
    }

    fn intersect_coplanar(&self, plane: Plane3D) -> Result<RingPlaneIntersection> {
        let projection = Projection::new(plane);
        let flat1: MultiLinestring = flat_clockwise(&projection, self.ring1).into();
        let flat2: MultiLinestring = flat_clockwise(&projection, self.ring2).into();

        let common = Intersection::new(&flat1, &flat2, self.tolerance).execute()?;
        if common.is_empty() {
            debug!("coplanar rings have disjoint footprints");
            return Ok(RingPlaneIntersection::NotApplicable);
        }
        Ok(RingPlaneIntersection::Paths(
            common
                .iter()
                .flat_map(|group| group.rings().parts())
                .map(|ring| IntersectionPath3D {
                    path: projection.linestring_from_xy(ring),
                    ring_plane_topology: RingPlaneTopology::InPlane,
                })
                .collect(),
        ))
    }
}

fn fit_ring(ring: &Linestring, tolerance: f64) -> Result<Plane3D> {
    if !ring.is_closed() || ring.point_count() < 4 {
        return Err(OperationError::InvalidInput(
            "ring intersection needs closed rings with at least three vertices".into(),
        )
        .into());
    }
    let plane = Plane3D::fit(ring.points())?;
    let deviation = plane.max_deviation(ring.points());
    if deviation > tolerance {
        return Err(GeometryError::NotPlanar {
            distance: deviation,
        }
        .into());
    }
    Ok(plane)
}

fn flat_clockwise(projection: &Projection, ring: &Linestring) -> Linestring {
    let mut flat = projection.linestring_to_xy(ring);
    if flat.area_xy() < 0.0 {
        flat.reverse_orientation();
    }
    flat
}

/// A point where a ring meets the cutting plane.
#[derive(Debug, Clone, Copy)]
struct Hit {
    point: Point3,
    /// Segment index plus factor along the segment.
    position: f64,
    vertex: Option<usize>,
}

/// A stretch of the intersection line, `start < end`.
#[derive(Debug, Clone, Copy)]
struct Interval {
    start: f64,
    end: f64,
    from: Point3,
    to: Point3,
    topology: RingPlaneTopology,
}

/// The overlap of one interval of each ring.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: f64,
    from: Point3,
    to: Point3,
    topology: RingPlaneTopology,
    /// Topology of the second ring's interval.
    other: RingPlaneTopology,
}

impl Interval {
    fn point_at(&self, t: f64) -> Point3 {
        let span = self.end - self.start;
        if span <= f64::EPSILON {
            return self.from;
        }
        self.from + (self.to - self.from) * ((t - self.start) / span)
    }
}

/// A ring cut by a plane.
struct RingCut<'r> {
    ring: &'r Linestring,
    /// Signed vertex distances, snapped to zero within tolerance.
    distances: Vec<f64>,
    /// Hits in ring order.
    hits: Vec<Hit>,
}

impl<'r> RingCut<'r> {
    fn new(ring: &'r Linestring, plane: &Plane3D, tolerance: f64) -> Self {
        let n = ring.segment_count();
        let points = ring.points();
        let distances: Vec<f64> = points[..n]
            .iter()
            .map(|p| {
                let d = plane.signed_distance(p);
                if d.abs() <= tolerance {
                    0.0
                } else {
                    d
                }
            })
            .collect();

        let mut hits = Vec::new();
        for i in 0..n {
            let j = (i + 1) % n;
            #[allow(clippy::cast_precision_loss)]
            let position = i as f64;
            if distances[i] == 0.0 {
                let prev = distances[(i + n - 1) % n];
                if prev * distances[j] > 0.0 {
                    trace!(vertex = i, "ring touches the plane");
                } else {
                    hits.push(Hit {
                        point: points[i],
                        position,
                        vertex: Some(i),
                    });
                }
            }
            if distances[i] * distances[j] < 0.0 {
                let factor = distances[i] / (distances[i] - distances[j]);
                hits.push(Hit {
                    point: points[i] + (points[j] - points[i]) * factor,
                    position: position + factor,
                    vertex: None,
                });
            }
        }

        Self {
            ring,
            distances,
            hits,
        }
    }

    /// Returns `true` if the first two separate hits in ring order descend
    /// along `direction`.
    fn runs_against(&self, origin: &Point3, direction: &Vector3, tolerance: f64) -> bool {
        let mut along = self.hits.iter().map(|h| (h.point - origin).dot(direction));
        let Some(first) = along.next() else {
            return false;
        };
        along
            .find(|t| (t - first).abs() > tolerance)
            .is_some_and(|t| t < first)
    }

    /// Stretches of the line between consecutive hits that lie inside the
    /// ring or along one of its edges.
    fn intervals(
        &self,
        plane: &Plane3D,
        origin: &Point3,
        direction: &Vector3,
        tolerance: f64,
    ) -> Vec<Interval> {
        let flat = Projection::new(*plane);
        let flat_ring = flat_clockwise(&flat, self.ring);
        let mut hits: Vec<(f64, &Hit)> = self
            .hits
            .iter()
            .map(|h| ((h.point - origin).dot(direction), h))
            .collect();
        hits.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.position.total_cmp(&y.1.position)));

        // Entering the first hit along an edge in the plane walks the ring backwards.
        let backward = hits
            .first()
            .is_some_and(|(_, first)| self.distances[self.vertex_before(first)] == 0.0);

        let mut intervals = Vec::new();
        for pair in hits.windows(2) {
            let ((start, a), (end, b)) = (pair[0], pair[1]);
            if end - start <= tolerance {
                continue;
            }
            let topology = if self.is_edge(a, b) {
                RingPlaneTopology::InPlane
            } else {
                let midpoint = a.point + (b.point - a.point) * 0.5;
                match ring_contains_point_xy(&flat_ring, &flat.to_xy(&midpoint), tolerance) {
                    Containment::Inside => self.topology_between(a, b, backward),
                    Containment::Outside | Containment::OnBoundary => continue,
                }
            };
            intervals.push(Interval {
                start,
                end,
                from: a.point,
                to: b.point,
                topology,
            });
        }
        intervals
    }

    /// Both hits are ring vertices joined by an edge.
    fn is_edge(&self, a: &Hit, b: &Hit) -> bool {
        let n = self.distances.len();
        match (a.vertex, b.vertex) {
            (Some(i), Some(j)) => (i + 1) % n == j || (j + 1) % n == i,
            _ => false,
        }
    }

    fn vertex_before(&self, hit: &Hit) -> usize {
        let n = self.distances.len();
        match hit.vertex {
            Some(i) => (i + n - 1) % n,
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            None => hit.position.floor() as usize,
        }
    }

    fn vertex_after(&self, hit: &Hit) -> usize {
        let n = self.distances.len();
        match hit.vertex {
            Some(i) => (i + 1) % n,
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            None => (hit.position.floor() as usize + 1) % n,
        }
    }

    /// Side of the ring between two hits: forward, the first vertex off the
    /// plane after the earlier hit; backward, the negated side of the first
    /// vertex off the plane before the later hit.
    fn topology_between(&self, a: &Hit, b: &Hit, backward: bool) -> RingPlaneTopology {
        let n = self.distances.len();
        let side = if backward {
            let later = if a.position >= b.position { a } else { b };
            let last = self.vertex_before(later);
            (0..n)
                .map(|k| self.distances[(last + n - k) % n])
                .find(|d| *d != 0.0)
                .map(|d| -d)
        } else {
            let earlier = if a.position <= b.position { a } else { b };
            let next = self.vertex_after(earlier);
            (0..n)
                .map(|k| self.distances[(next + k) % n])
                .find(|d| *d != 0.0)
        };
        side.map_or(RingPlaneTopology::InPlane, |d| {
            if d > 0.0 {
                RingPlaneTopology::LeftPositive
            } else {
                RingPlaneTopology::LeftNegative
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::GeotopoError;
    use crate::test_support::init_tracing;

    const TOL: f64 = 0.001;

    fn square() -> Linestring {
        Linestring::from_coords(&[
            [0.0, 0.0, 0.0],
            [0.0, 100.0, 0.0],
            [100.0, 100.0, 0.0],
            [100.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ])
    }

    fn triangle() -> Linestring {
        Linestring::from_coords(&[
            [10.0, 10.0, -10.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, -10.0],
            [10.0, 10.0, -10.0],
        ])
    }

    fn assert_path(path: &IntersectionPath3D, expected: &[[f64; 3]]) {
        let points = path.path.points();
        assert_eq!(points.len(), expected.len(), "{:?}", points);
        for (p, e) in points.iter().zip(expected) {
            assert_relative_eq!(p.x, e[0], epsilon = 1e-9);
            assert_relative_eq!(p.y, e[1], epsilon = 1e-9);
            assert_relative_eq!(p.z, e[2], epsilon = 1e-9);
        }
    }

    #[test]
    fn square_crossed_by_vertical_triangle() {
        init_tracing();
        let result = IntersectRings3D::new(&square(), &triangle(), TOL)
            .execute()
            .unwrap();
        let paths = result.paths();
        assert_eq!(paths.len(), 1);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftPositive);
    }

    #[test]
    fn reversing_the_plane_ring_flips_the_side() {
        let forward = IntersectRings3D::new(&triangle(), &square(), TOL)
            .execute()
            .unwrap();
        assert_eq!(forward.paths().len(), 1);
        assert_path(&forward.paths()[0], &[[15.0, 15.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_eq!(
            forward.paths()[0].ring_plane_topology,
            RingPlaneTopology::LeftNegative
        );

        let mut reversed_square = square();
        reversed_square.reverse_orientation();
        let reversed = IntersectRings3D::new(&triangle(), &reversed_square, TOL)
            .execute()
            .unwrap();
        assert_eq!(reversed.paths().len(), 1);
        assert_eq!(
            reversed.paths()[0].ring_plane_topology,
            RingPlaneTopology::LeftPositive
        );
    }

    #[test]
    fn edges_in_plane_become_in_plane_paths() {
        init_tracing();
        let ring = complex_ring();
        let result = IntersectRings3D::new(&ring, &square(), TOL)
            .execute()
            .unwrap();
        let paths = result.paths();
        assert_eq!(paths.len(), 3);

        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::InPlane);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::LeftNegative);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_eq!(paths[2].ring_plane_topology, RingPlaneTopology::InPlane);
        assert_path(
            &paths[2],
            &[[25.0, 25.0, 0.0], [30.0, 30.0, 0.0], [35.0, 35.0, 0.0]],
        );
    }

    fn complex_ring() -> Linestring {
        Linestring::from_coords(&[
            [10.0, 10.0, -10.0],
            [15.0, 15.0, 0.0],
            [20.0, 20.0, 0.0],
            [20.0, 20.0, 10.0],
            [25.0, 25.0, 0.0],
            [30.0, 30.0, 0.0],
            [35.0, 35.0, 0.0],
            [30.0, 30.0, -10.0],
            [10.0, 10.0, -10.0],
        ])
    }

    fn cut_through_ring() -> Linestring {
        Linestring::from_coords(&[
            [10.0, 10.0, -10.0],
            [15.0, 15.0, 0.0],
            [20.0, 20.0, 0.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, -10.0],
            [10.0, 10.0, -10.0],
        ])
    }

    fn intersect(ring1: &Linestring, ring2: &Linestring) -> Vec<IntersectionPath3D> {
        IntersectRings3D::new(ring1, ring2, TOL)
            .execute()
            .unwrap()
            .paths()
            .to_vec()
    }

    fn reversed(ring: &Linestring) -> Linestring {
        let mut ring = ring.clone();
        ring.reverse_orientation();
        ring
    }

    #[test]
    fn two_triangles_give_two_paths() {
        let zigzag = Linestring::from_coords(&[
            [10.0, 10.0, -10.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, -10.0],
            [40.0, 40.0, 10.0],
            [50.0, 50.0, -10.0],
            [30.0, 30.0, -15.0],
            [10.0, 10.0, -10.0],
        ]);
        let paths = intersect(&square(), &zigzag);
        assert_eq!(paths.len(), 2);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_path(&paths[1], &[[35.0, 35.0, 0.0], [45.0, 45.0, 0.0]]);

        let paths = intersect(&zigzag, &square());
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftNegative);
        let paths = intersect(&zigzag, &reversed(&square()));
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftPositive);
    }

    #[test]
    fn other_ring_breaks_split_the_paths() {
        init_tracing();
        let paths = intersect(&square(), &complex_ring());
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftPositive);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_path(
            &paths[2],
            &[[25.0, 25.0, 0.0], [30.0, 30.0, 0.0], [35.0, 35.0, 0.0]],
        );

        let paths = intersect(&square(), &cut_through_ring());
        assert_eq!(paths.len(), 2);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [25.0, 25.0, 0.0]]);
    }

    #[test]
    fn in_plane_edge_followed_by_cut_through() {
        let paths = intersect(&cut_through_ring(), &square());
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::InPlane);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::LeftNegative);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [25.0, 25.0, 0.0]]);
    }

    #[test]
    fn in_plane_edge_against_the_hit_order() {
        init_tracing();
        let ring = Linestring::from_coords(&[
            [10.0, 10.0, -10.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, 0.0],
            [20.0, 20.0, 0.0],
            [10.0, 10.0, -10.0],
        ]);
        let paths = intersect(&ring, &square());
        assert_eq!(paths.len(), 2);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftNegative);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [30.0, 30.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::InPlane);

        let paths = intersect(&reversed(&ring), &reversed(&square()));
        assert_eq!(paths.len(), 2);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftPositive);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [30.0, 30.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::InPlane);
    }

    #[test]
    fn in_plane_edge_at_the_ring_start() {
        let ring = Linestring::from_coords(&[
            [10.0, 10.0, 0.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, -10.0],
            [10.0, 10.0, -10.0],
            [20.0, 20.0, 0.0],
            [10.0, 10.0, 0.0],
        ]);
        let paths = intersect(&ring, &square());
        assert_eq!(paths.len(), 2);
        assert_path(&paths[0], &[[10.0, 10.0, 0.0], [20.0, 20.0, 0.0]]);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::InPlane);
        assert_path(&paths[1], &[[20.0, 20.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::LeftNegative);
    }

    #[test]
    fn in_plane_edges_at_the_ring_start_and_end() {
        init_tracing();
        let ring = Linestring::from_coords(&[
            [10.0, 10.0, 0.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, 0.0],
            [25.0, 25.0, 0.0],
            [30.0, 30.0, -10.0],
            [10.0, 10.0, -10.0],
            [15.0, 15.0, 0.0],
            [10.0, 10.0, 0.0],
        ]);
        let paths = intersect(&ring, &square());
        assert_eq!(paths.len(), 3);
        assert_path(&paths[0], &[[10.0, 10.0, 0.0], [15.0, 15.0, 0.0]]);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::InPlane);
        assert_path(&paths[1], &[[15.0, 15.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::LeftNegative);
        assert_path(&paths[2], &[[25.0, 25.0, 0.0], [30.0, 30.0, 0.0]]);
        assert_eq!(paths[2].ring_plane_topology, RingPlaneTopology::InPlane);

        assert_eq!(intersect(&reversed(&ring), &square()).len(), 3);
    }

    #[test]
    fn two_adjacent_cut_throughs() {
        let ring = Linestring::from_coords(&[
            [10.0, 10.0, -10.0],
            [20.0, 20.0, 10.0],
            [25.0, 25.0, 0.0],
            [30.0, 30.0, 0.0],
            [35.0, 35.0, 10.0],
            [45.0, 45.0, -10.0],
            [10.0, 10.0, -10.0],
        ]);
        let paths = intersect(&ring, &square());
        assert_eq!(paths.len(), 3);
        assert_path(&paths[0], &[[15.0, 15.0, 0.0], [25.0, 25.0, 0.0]]);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::LeftNegative);
        assert_path(&paths[1], &[[25.0, 25.0, 0.0], [30.0, 30.0, 0.0]]);
        assert_eq!(paths[1].ring_plane_topology, RingPlaneTopology::InPlane);
        assert_path(&paths[2], &[[30.0, 30.0, 0.0], [40.0, 40.0, 0.0]]);
        assert_eq!(paths[2].ring_plane_topology, RingPlaneTopology::LeftNegative);

        assert_eq!(intersect(&reversed(&ring), &square()).len(), 3);
    }

    #[test]
    fn vertex_touching_the_plane_gives_no_path() {
        let touching = Linestring::from_coords(&[
            [10.0, 10.0, 0.0],
            [20.0, 20.0, 10.0],
            [30.0, 30.0, 10.0],
            [10.0, 10.0, 0.0],
        ]);
        let result = IntersectRings3D::new(&square(), &touching, TOL)
            .execute()
            .unwrap();
        assert!(!result.is_not_applicable());
        assert!(result.paths().is_empty());
    }

    #[test]
    fn parallel_planes_are_not_applicable() {
        init_tracing();
        let lifted = Linestring::from_coords(&[
            [0.0, 0.0, 10.0],
            [0.0, 100.0, 10.0],
            [100.0, 100.0, 10.0],
            [100.0, 0.0, 10.0],
            [0.0, 0.0, 10.0],
        ]);
        let result = IntersectRings3D::new(&square(), &lifted, TOL)
            .execute()
            .unwrap();
        assert!(result.is_not_applicable());
    }

    #[test]
    fn coplanar_disjoint_rings_are_not_applicable() {
        let apart = Linestring::from_coords(&[
            [200.0, 0.0, 0.0],
            [200.0, 100.0, 0.0],
            [300.0, 100.0, 0.0],
            [300.0, 0.0, 0.0],
            [200.0, 0.0, 0.0],
        ]);
        let result = IntersectRings3D::new(&square(), &apart, TOL)
            .execute()
            .unwrap();
        assert!(result.is_not_applicable());
    }

    #[test]
    fn coplanar_overlap_gives_common_outline() {
        let shifted = Linestring::from_coords(&[
            [50.0, 50.0, 0.0],
            [50.0, 150.0, 0.0],
            [150.0, 150.0, 0.0],
            [150.0, 50.0, 0.0],
            [50.0, 50.0, 0.0],
        ]);
        let result = IntersectRings3D::new(&square(), &shifted, TOL)
            .execute()
            .unwrap();
        let paths = result.paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ring_plane_topology, RingPlaneTopology::InPlane);
        assert!(paths[0].path.is_closed());
        assert_relative_eq!(paths[0].path.area_xy(), 2500.0, epsilon = 1e-6);
        assert!(paths[0].path.points().iter().all(|p| p.z.abs() < 1e-9));
    }

    #[test]
    fn far_apart_rings_give_empty_paths() {
        let far = Linestring::from_coords(&[
            [210.0, 210.0, -10.0],
            [220.0, 220.0, 10.0],
            [230.0, 230.0, -10.0],
            [210.0, 210.0, -10.0],
        ]);
        let result = IntersectRings3D::new(&square(), &far, TOL)
            .execute()
            .unwrap();
        assert!(!result.is_not_applicable());
        assert!(result.paths().is_empty());
    }

    #[test]
    fn non_planar_ring_is_rejected() {
        let warped = Linestring::from_coords(&[
            [0.0, 0.0, 0.0],
            [0.0, 100.0, 0.0],
            [100.0, 100.0, 20.0],
            [100.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ]);
        let err = IntersectRings3D::new(&warped, &triangle(), TOL)
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            GeotopoError::Geometry(GeometryError::NotPlanar { .. })
        ));
    }
}

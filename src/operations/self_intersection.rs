use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::error::{OperationError, Result};
use crate::geometry::point::equals_xy;
use crate::geometry::{Linestring, MultiLinestring, Segment};
use crate::math::epsilon::significance_epsilon;
use crate::math::Point3;
use crate::overlay::{trace_rings, DirectedEdge, NodeId, Overlay};

/// Splits a ring that runs back along itself into simple rings.
///
/// Stretches the ring traverses in both directions (a strait narrower than
/// the tolerance, a spike, a zig-zag along one line) cancel out pairwise;
/// the remaining boundary is re-traced into rings, exteriors clockwise and
/// holes counter-clockwise.
pub struct RemoveLinearSelfIntersections<'a> {
    ring: &'a Linestring,
    tolerance: f64,
    minimum_segment_length: Option<f64>,
}

impl<'a> RemoveLinearSelfIntersections<'a> {
    #[must_use]
    pub fn new(ring: &'a Linestring, tolerance: f64) -> Self {
        Self {
            ring,
            tolerance,
            minimum_segment_length: None,
        }
    }

    /// Keeps a vertex that is moved onto the stretch it runs along in place as
    /// well if it moves farther than `length`, joined to its new position by
    /// a connecting segment. Result rings with less than `length²` of area
    /// are dropped.
    #[must_use]
    pub fn with_minimum_segment_length(mut self, length: Option<f64>) -> Self {
        self.minimum_segment_length = length;
        self
    }

    /// Returns the repaired rings, or `None` if the ring has no stretch
    /// running back along itself.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the ring is not closed, or an
    /// error if the remaining boundary cannot be traced into rings.
    #[instrument(skip_all, fields(points = self.ring.point_count(), tolerance = self.tolerance))]
    pub fn execute(&self) -> Result<Option<Vec<Linestring>>> {
        if !self.ring.is_closed() || self.ring.point_count() < 4 {
            return Err(OperationError::InvalidInput(
                "self-intersection repair needs a closed ring".into(),
            )
            .into());
        }

        // Step 1: move stretches onto the lines they run along
        let lines: MultiLinestring =
            crack(self.ring, self.tolerance, self.minimum_segment_length).into();
        let overlay = Overlay::single(&lines, 0.0);

        // Step 2: cancel stretches traversed both ways
        let mut by_pair: HashMap<(NodeId, NodeId), (Vec<usize>, Vec<usize>)> = HashMap::new();
        for (i, fragment) in overlay.fragments().iter().enumerate() {
            let (forward, backward) = by_pair.entry(fragment.key()).or_default();
            if fragment.from < fragment.to {
                forward.push(i);
            } else {
                backward.push(i);
            }
        }
        let mut cancelled = vec![false; overlay.fragments().len()];
        let mut cancelled_pairs = 0;
        for (forward, backward) in by_pair.values() {
            for (&f, &b) in forward.iter().zip(backward) {
                cancelled[f] = true;
                cancelled[b] = true;
                cancelled_pairs += 1;
            }
        }
        if cancelled_pairs == 0 {
            trace!("no linear self-intersection");
            return Ok(None);
        }

        // Step 3: trace what is left
        let edges: Vec<DirectedEdge> = overlay
            .fragments()
            .iter()
            .enumerate()
            .filter(|(i, f)| !cancelled[*i] && f.from != f.to)
            .map(|(i, f)| DirectedEdge {
                from: f.from,
                to: f.to,
                tag: i,
            })
            .collect();
        let min_area = self
            .minimum_segment_length
            .map_or(0.0, |length| length * length)
            .max(self.tolerance * self.tolerance);
        let rings: Vec<Linestring> = trace_rings(overlay.nodes(), &edges)?
            .iter()
            .map(|ring| ring.to_linestring(overlay.nodes(), &edges))
            .filter(|ring| {
                let keep = ring.point_count() >= 4 && ring.area_xy().abs() > min_area;
                if !keep {
                    trace!(area = ring.area_xy(), "dropped degenerate ring");
                }
                keep
            })
            .collect();

        debug!(
            cancelled = cancelled_pairs,
            rings = rings.len(),
            "removed linear self-intersections"
        );
        Ok(Some(rings))
    }
}

/// A vertex moved onto a segment it runs along.
#[derive(Debug, Clone, Copy)]
struct Snap {
    vertex: usize,
    to: Point3,
    distance: f64,
    target: usize,
    along: f64,
    /// The stretch along the target leaves the vertex.
    leaves: bool,
}

/// Moves every segment lying within `tolerance` of another segment onto it
/// and splits the other segment at the moved vertices.
///
/// Of two segments within tolerance of each other, the shorter one moves.
/// Segments no longer than the tolerance never move by themselves.
fn crack(ring: &Linestring, tolerance: f64, minimum_segment_length: Option<f64>) -> Linestring {
    let n = ring.segment_count();
    let points = ring.points();
    let epsilon = significance_epsilon(&[ring.envelope().max_abs_xy()]);

    let mut snaps = Vec::new();
    for j in 0..n {
        let source = ring.segment(j);
        if source.length_xy() <= tolerance {
            continue;
        }
        for k in ring.find_segments(&source.envelope(), tolerance) {
            if k == j {
                continue;
            }
            let target = ring.segment(k);
            if !runs_along(&source, &target, tolerance) {
                continue;
            }
            if runs_along(&target, &source, tolerance) && !moves_first(&source, &target) {
                continue;
            }
            for (vertex, point, leaves) in [(j, source.start, true), ((j + 1) % n, source.end, false)]
            {
                let along = target.along_ratio(&point, false).clamp(0.0, 1.0);
                let distance = target.distance_xy_to_point(&point);
                let to = if distance <= epsilon {
                    point
                } else if along <= 0.0 {
                    target.start
                } else if along >= 1.0 {
                    target.end
                } else {
                    target.point_along(along)
                };
                snaps.push(Snap {
                    vertex,
                    to,
                    distance,
                    target: k,
                    along,
                    leaves,
                });
            }
        }
    }

    // the nearest snap of every vertex wins
    let mut moved: Vec<Option<Snap>> = vec![None; n];
    for snap in &snaps {
        let slot = &mut moved[snap.vertex];
        if slot.map_or(true, |current| snap.distance < current.distance) {
            *slot = Some(*snap);
        }
    }

    let mut splits: Vec<Vec<(f64, Point3)>> = vec![Vec::new(); n];
    let mut leaves = vec![false; n];
    let mut arrives = vec![false; n];
    for snap in &snaps {
        let Some(chosen) = moved[snap.vertex] else {
            continue;
        };
        if !equals_xy(&snap.to, &chosen.to, epsilon) {
            continue;
        }
        if snap.leaves {
            leaves[snap.vertex] = true;
        } else {
            arrives[snap.vertex] = true;
        }
        if snap.along > 0.0 && snap.along < 1.0 {
            splits[snap.target].push((snap.along, chosen.to));
        }
    }

    let mut cracked: Vec<Point3> = Vec::with_capacity(points.len() + snaps.len());
    for i in 0..n {
        let original = points[i];
        match moved[i] {
            Some(snap) => {
                trace!(vertex = i, distance = snap.distance, "vertex moved onto stretch");
                let keep_original = minimum_segment_length
                    .is_some_and(|length| snap.distance > length)
                    && leaves[i] != arrives[i]
                    && !equals_xy(&snap.to, &points[(i + n - 1) % n], epsilon)
                    && !equals_xy(&snap.to, &points[(i + 1) % n], epsilon);
                if keep_original && leaves[i] {
                    cracked.extend([original, snap.to]);
                } else if keep_original {
                    cracked.extend([snap.to, original]);
                } else {
                    cracked.push(snap.to);
                }
            }
            None => cracked.push(original),
        }
        splits[i].sort_by(|a, b| a.0.total_cmp(&b.0));
        cracked.extend(splits[i].iter().map(|(_, p)| *p));
    }

    cracked.dedup_by(|b, a| equals_xy(a, b, epsilon));
    while cracked.len() > 1
        && cracked
            .last()
            .is_some_and(|last| equals_xy(last, &cracked[0], epsilon))
    {
        cracked.pop();
    }
    if let Some(first) = cracked.first().copied() {
        cracked.push(first);
    }
    Linestring::new(cracked)
}

/// Both ends of `source` lie within `tolerance` of `target`.
fn runs_along(source: &Segment, target: &Segment, tolerance: f64) -> bool {
    target.distance_xy_to_point(&source.start) <= tolerance
        && target.distance_xy_to_point(&source.end) <= tolerance
}

/// Which of two mutually close segments is moved onto the other.
fn moves_first(source: &Segment, target: &Segment) -> bool {
    let key = |s: &Segment| {
        let (a, b) = if (s.start.x, s.start.y) <= (s.end.x, s.end.y) {
            (s.start, s.end)
        } else {
            (s.end, s.start)
        };
        (s.length_xy(), a.x, a.y, b.x, b.y)
    };
    key(source).partial_cmp(&key(target)) == Some(std::cmp::Ordering::Less)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::test_support::init_tracing;

    fn ring(coords: &[[f64; 2]]) -> Linestring {
        let mut ring = Linestring::from_xy(coords);
        ring.close();
        ring
    }

    /// Repairs the ring starting at every vertex and checks the totals.
    fn assert_repaired(
        coords: &[[f64; 2]],
        tolerance: f64,
        minimum_segment_length: Option<f64>,
        parts: usize,
        points: usize,
        area: f64,
    ) {
        for start in 0..coords.len() {
            let mut rotated = coords.to_vec();
            rotated.rotate_left(start);
            let repaired = RemoveLinearSelfIntersections::new(&ring(&rotated), tolerance)
                .with_minimum_segment_length(minimum_segment_length)
                .execute()
                .unwrap()
                .unwrap();

            assert!(repaired.iter().all(Linestring::is_closed));
            assert_eq!(repaired.len(), parts, "start vertex {start}");
            let point_count: usize = repaired.iter().map(Linestring::point_count).sum();
            assert_eq!(point_count, points, "start vertex {start}");
            let total: f64 = repaired.iter().map(Linestring::area_xy).sum();
            assert_abs_diff_eq!(total, area, epsilon = 1e-9);
        }
    }

    const STRAIT: [[f64; 2]; 8] = [
        [0.0, 0.0],
        [0.0, 100.0],
        [100.0, 100.0],
        [100.0, 0.0],
        [80.0, 0.0],
        [80.0, 98.0],
        [20.0, 98.0],
        [20.0, 0.0],
    ];

    #[test]
    fn strait_splits_ring_in_two() {
        init_tracing();
        assert_repaired(&STRAIT, 2.1, None, 2, 10, 4000.0);

        let parts = RemoveLinearSelfIntersections::new(&ring(&STRAIT), 2.1)
            .execute()
            .unwrap()
            .unwrap();
        assert!(parts.iter().all(|p| p.is_clockwise() == Some(true)));
    }

    #[test]
    fn strait_keeps_vertices_beyond_minimum_length() {
        assert_repaired(&STRAIT, 2.1, Some(1.0), 2, 12, 4000.0);
    }

    #[test]
    fn spike_is_removed() {
        let spike = [
            [0.0, 0.0],
            [0.0, 100.0],
            [100.0, 100.0],
            [100.0, 98.0],
            [20.0, 98.0],
            [20.0, 0.0],
        ];
        assert_repaired(&spike, 2.1, None, 1, 5, 2000.0);
        assert_repaired(&spike, 2.1, Some(1.0), 1, 6, 2000.0);
    }

    #[test]
    fn single_point_spike_is_removed() {
        let spike = [
            [0.0, 0.0],
            [0.0, 100.0],
            [100.0, 100.0],
            [20.0, 98.0],
            [20.0, 0.0],
        ];
        assert_repaired(&spike, 2.1, None, 1, 5, 2000.0);
        assert_repaired(&spike, 2.1, Some(1.0), 1, 6, 2000.0);
    }

    #[test]
    fn zero_width_spike_is_removed() {
        let spike = ring(&[
            [0.0, 0.0],
            [0.0, 10.0],
            [5.0, 10.0],
            [5.0, 20.0],
            [5.0, 10.0],
            [10.0, 10.0],
            [10.0, 0.0],
        ]);
        let parts = RemoveLinearSelfIntersections::new(&spike, 0.001)
            .execute()
            .unwrap()
            .unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].point_count(), 6);
        assert_abs_diff_eq!(parts[0].area_xy(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn zig_zag_is_straightened() {
        init_tracing();
        let zig_zag = [
            [0.0, 0.0],
            [0.0, 100.0],
            [60.0, 100.0],
            [20.0, 100.0],
            [100.0, 100.0],
            [100.0, 0.0],
        ];
        assert_repaired(&zig_zag, 2.1, None, 1, 7, 10000.0);
        assert_repaired(&zig_zag, 2.1, Some(1.0), 1, 7, 10000.0);
    }

    #[test]
    fn keyhole_keeps_its_hole() {
        let keyhole = [
            [0.0, 0.0],
            [0.0, 100.0],
            [100.0, 100.0],
            [100.0, 0.0],
            [50.0, 0.0],
            [50.0, 40.0],
            [60.0, 40.0],
            [60.0, 60.0],
            [40.0, 60.0],
            [40.0, 40.0],
            [50.0, 40.0],
            [50.0, 0.0],
        ];
        for start in 0..keyhole.len() {
            let mut rotated = keyhole.to_vec();
            rotated.rotate_left(start);
            let parts = RemoveLinearSelfIntersections::new(&ring(&rotated), 0.001)
                .execute()
                .unwrap()
                .unwrap();
            assert_eq!(parts.len(), 2, "start vertex {start}");
            let total: f64 = parts.iter().map(Linestring::area_xy).sum();
            assert_abs_diff_eq!(total, 9600.0, epsilon = 1e-9);
            assert!(parts.iter().any(|p| p.is_clockwise() == Some(false)));
        }
    }

    #[test]
    fn simple_ring_is_left_alone() {
        let square = ring(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        assert!(RemoveLinearSelfIntersections::new(&square, 0.001)
            .execute()
            .unwrap()
            .is_none());
    }

    #[test]
    fn open_ring_is_rejected() {
        let line = Linestring::from_xy(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        assert!(RemoveLinearSelfIntersections::new(&line, 0.001)
            .execute()
            .is_err());
    }
}

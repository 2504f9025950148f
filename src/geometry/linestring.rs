use std::sync::OnceLock;

use crate::error::{GeometryError, Result, TopologyError};
use crate::index::{IndexOptions, SegmentIndex, SpatialIndex};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point3;

use super::envelope::Envelope;
use super::point::{equals_xy, snap_point};
use super::segment::Segment;

/// An ordered sequence of points forming `point_count - 1` segments.
///
/// A linestring is closed (a ring) if it has at least three points and its
/// first and last point coincide in XY. Clockwise rings have a positive
/// [`area_xy`](Linestring::area_xy).
///
/// The envelope is kept up to date by every mutation; the spatial index is
/// built lazily on the first segment query above the index threshold and
/// dropped by every mutation.
#[derive(Debug, Clone)]
pub struct Linestring {
    points: Vec<Point3>,
    envelope: Envelope,
    index_options: IndexOptions,
    index: OnceLock<SpatialIndex>,
}

impl Linestring {
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        let envelope = Envelope::from_points(&points);
        Self {
            points,
            envelope,
            index_options: IndexOptions::default(),
            index: OnceLock::new(),
        }
    }

    /// Creates a linestring from `[x, y, z]` triples.
    #[must_use]
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self::new(coords.iter().map(|c| Point3::new(c[0], c[1], c[2])).collect())
    }

    /// Creates a linestring from `[x, y]` pairs with `z = 0`.
    #[must_use]
    pub fn from_xy(coords: &[[f64; 2]]) -> Self {
        Self::new(coords.iter().map(|c| Point3::new(c[0], c[1], 0.0)).collect())
    }

    /// Creates a ring, appending the start point if the sequence is open.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if fewer than three distinct
    /// vertices are given.
    pub fn closed_ring(points: Vec<Point3>) -> Result<Self> {
        let mut ring = Self::new(points);
        ring.close();
        if ring.point_count() < 4 {
            return Err(GeometryError::TooFewPoints {
                expected: 4,
                actual: ring.point_count(),
            }
            .into());
        }
        Ok(ring)
    }

    /// Sets the index configuration used by [`find_segments`](Self::find_segments).
    #[must_use]
    pub fn with_index_options(mut self, options: IndexOptions) -> Self {
        self.index_options = options;
        self.index = OnceLock::new();
        self
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<&Point3> {
        self.points.get(index)
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the segment at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= segment_count()`, like slice indexing.
    #[must_use]
    pub fn segment(&self, index: usize) -> Segment {
        Segment::new(self.points[index], self.points[index + 1])
    }

    #[must_use]
    pub fn get_segment(&self, index: usize) -> Option<Segment> {
        (index < self.segment_count()).then(|| self.segment(index))
    }

    /// Iterates over all segments in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    #[must_use]
    pub fn start_point(&self) -> Option<&Point3> {
        self.points.first()
    }

    #[must_use]
    pub fn end_point(&self) -> Option<&Point3> {
        self.points.last()
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.is_closed_within(0.0)
    }

    /// Returns `true` if the first and last point coincide in XY within `tolerance`.
    #[must_use]
    pub fn is_closed_within(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 3 => {
                equals_xy(first, last, tolerance)
            }
            _ => false,
        }
    }

    /// XY area of a closed ring: positive if clockwise, negative if
    /// counter-clockwise. Open linestrings have no area.
    #[must_use]
    pub fn area_xy(&self) -> f64 {
        if !self.is_closed() {
            return 0.0;
        }
        -signed_area_2d(&self.points)
    }

    /// Orientation of a closed ring, `None` for open or zero-area linestrings.
    #[must_use]
    pub fn is_clockwise(&self) -> Option<bool> {
        let area = self.area_xy();
        if area > 0.0 {
            Some(true)
        } else if area < 0.0 {
            Some(false)
        } else {
            None
        }
    }

    /// Returns `true` for a closed ring whose XY footprint has no area while it
    /// extends in Z, e.g. a wall face.
    #[must_use]
    pub fn is_vertical_ring(&self, tolerance: f64) -> bool {
        if !self.is_closed() {
            return false;
        }
        let z_extent = self.envelope.max.z - self.envelope.min.z;
        self.area_xy().abs() <= tolerance * self.length_xy() && z_extent > tolerance
    }

    #[must_use]
    pub fn length_xy(&self) -> f64 {
        self.segments().map(|s| s.length_xy()).sum()
    }

    #[must_use]
    pub fn length_3d(&self) -> f64 {
        self.segments().map(|s| s.length_3d()).sum()
    }

    // ── navigation ──

    /// Index of the segment following `index`. Wraps around for rings;
    /// `None` after the last segment of an open linestring.
    #[must_use]
    pub fn next_segment_index(&self, index: usize) -> Option<usize> {
        let count = self.segment_count();
        if index + 1 < count {
            Some(index + 1)
        } else if index + 1 == count && self.is_closed() {
            Some(0)
        } else {
            None
        }
    }

    /// Index of the segment preceding `index`. Wraps around for rings;
    /// `None` before the first segment of an open linestring.
    #[must_use]
    pub fn previous_segment_index(&self, index: usize) -> Option<usize> {
        let count = self.segment_count();
        if index >= count {
            None
        } else if index > 0 {
            Some(index - 1)
        } else if self.is_closed() {
            Some(count - 1)
        } else {
            None
        }
    }

    // ── spatial queries ──

    /// Candidate segments whose envelope intersects `query` grown by `tolerance`.
    ///
    /// Scans linearly below the index threshold, otherwise uses the cached index.
    pub fn find_segments<'a>(
        &'a self,
        query: &Envelope,
        tolerance: f64,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        if self.segment_count() < self.index_options.threshold {
            let query = *query;
            return Box::new(
                (0..self.segment_count())
                    .filter(move |&i| self.segment(i).envelope().intersects_xy(&query, tolerance)),
            );
        }
        self.spatial_index().search(query, tolerance)
    }

    /// The cached spatial index, built on first use.
    pub fn spatial_index(&self) -> &SpatialIndex {
        self.index.get_or_init(|| {
            let envelopes = self.segments().map(|s| s.envelope()).collect();
            SpatialIndex::build(self.index_options.kind, envelopes)
        })
    }

    /// Returns `true` if the spatial index has been built and not invalidated since.
    #[must_use]
    pub fn has_cached_index(&self) -> bool {
        self.index.get().is_some()
    }

    /// XY distance from `point` to the closest segment, `None` if there is no segment.
    #[must_use]
    pub fn distance_xy_to_point(&self, point: &Point3) -> Option<f64> {
        self.segments()
            .map(|s| s.distance_xy_to_point(point))
            .min_by(f64::total_cmp)
    }

    /// Returns `true` if `point` lies within `tolerance` of any segment.
    #[must_use]
    pub fn intersects_point_xy(&self, point: &Point3, tolerance: f64) -> bool {
        let query = Envelope::new(*point, *point);
        self.find_segments(&query, tolerance)
            .any(|i| self.segment(i).intersects_point_xy(point, tolerance))
    }

    // ── mutations ──

    /// Reverses the point order (and with it the ring orientation).
    pub fn reverse_orientation(&mut self) {
        self.points.reverse();
        self.invalidate();
    }

    /// Appends the start point if the linestring is not closed yet.
    pub fn close(&mut self) {
        if let Some(first) = self.points.first().copied() {
            if self.points.len() > 1 && !self.is_closed() {
                self.points.push(first);
                self.invalidate();
            }
        }
    }

    /// Snaps every ordinate to a multiple of `resolution`.
    pub fn snap_to_resolution(&mut self, resolution: f64) {
        for p in &mut self.points {
            *p = snap_point(p, resolution);
        }
        self.invalidate();
    }

    /// Replaces the vertex at `index`. Replacing the start or end vertex of a
    /// ring moves both, so the ring stays closed.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::VertexIndexOutOfRange` if `index` is not a vertex index.
    pub fn replace_point(&mut self, index: usize, point: Point3) -> Result<()> {
        let count = self.points.len();
        if index >= count {
            return Err(TopologyError::VertexIndexOutOfRange { index, count }.into());
        }
        let was_closed = self.is_closed();
        self.points[index] = point;
        if was_closed && (index == 0 || index == count - 1) {
            self.points[0] = point;
            self.points[count - 1] = point;
        }
        self.invalidate();
        Ok(())
    }

    /// Consumes the linestring and returns its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    fn invalidate(&mut self) {
        self.envelope = Envelope::from_points(&self.points);
        self.index = OnceLock::new();
    }
}

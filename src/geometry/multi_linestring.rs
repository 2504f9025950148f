use std::ops::Range;
use std::sync::OnceLock;

use crate::error::{Result, TopologyError};
use crate::index::{IndexOptions, SegmentIndex, SpatialIndex};
use crate::math::Point3;

use super::envelope::Envelope;
use super::linestring::Linestring;
use super::segment::Segment;

/// An ordered collection of linestring parts with one global segment index
/// spanning all parts.
///
/// Parts are addressed by position; global segment `g` is local segment
/// `g - offset(part)` of the part that contains it. Used for multi-path
/// lines as well as for the rings of polygons.
#[derive(Debug, Clone, Default)]
pub struct MultiLinestring {
    parts: Vec<Linestring>,
    /// Global index of the first segment of each part.
    offsets: Vec<usize>,
    segment_count: usize,
    envelope: Envelope,
    index_options: IndexOptions,
    index: OnceLock<SpatialIndex>,
}

impl MultiLinestring {
    #[must_use]
    pub fn new(parts: Vec<Linestring>) -> Self {
        let mut result = Self {
            parts,
            ..Self::default()
        };
        result.invalidate();
        result
    }

    /// Sets the index configuration used by [`find_segments`](Self::find_segments).
    #[must_use]
    pub fn with_index_options(mut self, options: IndexOptions) -> Self {
        self.index_options = options;
        self.index = OnceLock::new();
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[Linestring] {
        &self.parts
    }

    #[must_use]
    pub fn part(&self, index: usize) -> Option<&Linestring> {
        self.parts.get(index)
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_count == 0
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.parts.iter().map(Linestring::point_count).sum()
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Returns `true` if there is at least one part and all parts are rings.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(Linestring::is_closed)
    }

    /// Sum of the ring areas (clockwise positive).
    #[must_use]
    pub fn area_xy(&self) -> f64 {
        self.parts.iter().map(Linestring::area_xy).sum()
    }

    #[must_use]
    pub fn length_xy(&self) -> f64 {
        self.parts.iter().map(Linestring::length_xy).sum()
    }

    /// All vertices of all parts, in order.
    pub fn points(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.parts.iter().flat_map(|p| p.points().iter())
    }

    // ── global / local segment addressing ──

    /// Resolves a global segment index into `(part index, local segment index)`.
    #[must_use]
    pub fn local_segment_index(&self, global: usize) -> Option<(usize, usize)> {
        if global >= self.segment_count {
            return None;
        }
        let part = self.offsets.partition_point(|&o| o <= global) - 1;
        Some((part, global - self.offsets[part]))
    }

    /// Resolves a part-local segment index into the global index.
    #[must_use]
    pub fn global_segment_index(&self, part: usize, local: usize) -> Option<usize> {
        let linestring = self.parts.get(part)?;
        (local < linestring.segment_count()).then(|| self.offsets[part] + local)
    }

    /// Global segment range of a part.
    #[must_use]
    pub fn part_segment_range(&self, part: usize) -> Option<Range<usize>> {
        let linestring = self.parts.get(part)?;
        let start = self.offsets[part];
        Some(start..start + linestring.segment_count())
    }

    /// Returns the segment at a global index.
    ///
    /// # Panics
    ///
    /// Panics if `global >= segment_count()`, like slice indexing.
    #[must_use]
    pub fn segment(&self, global: usize) -> Segment {
        let part = self.offsets.partition_point(|&o| o <= global) - 1;
        self.parts[part].segment(global - self.offsets[part])
    }

    #[must_use]
    pub fn get_segment(&self, global: usize) -> Option<Segment> {
        let (part, local) = self.local_segment_index(global)?;
        self.parts[part].get_segment(local)
    }

    /// Iterates over all segments in global order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.parts.iter().flat_map(Linestring::segments)
    }

    /// Global index of the segment following `global` within its part.
    /// Wraps around in rings, `None` at the end of an open part.
    #[must_use]
    pub fn next_segment_index(&self, global: usize) -> Option<usize> {
        let (part, local) = self.local_segment_index(global)?;
        let next = self.parts[part].next_segment_index(local)?;
        Some(self.offsets[part] + next)
    }

    /// Global index of the segment preceding `global` within its part.
    /// Wraps around in rings, `None` at the start of an open part.
    #[must_use]
    pub fn previous_segment_index(&self, global: usize) -> Option<usize> {
        let (part, local) = self.local_segment_index(global)?;
        let previous = self.parts[part].previous_segment_index(local)?;
        Some(self.offsets[part] + previous)
    }

    #[must_use]
    pub fn is_first_segment_in_part(&self, global: usize) -> bool {
        matches!(self.local_segment_index(global), Some((_, 0)))
    }

    #[must_use]
    pub fn is_last_segment_in_part(&self, global: usize) -> bool {
        self.local_segment_index(global)
            .is_some_and(|(part, local)| local + 1 == self.parts[part].segment_count())
    }

    // ── spatial queries ──

    /// Candidate global segment indices whose envelope intersects `query`
    /// grown by `tolerance`.
    pub fn find_segments<'a>(
        &'a self,
        query: &Envelope,
        tolerance: f64,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        if self.segment_count < self.index_options.threshold {
            let query = *query;
            return Box::new(
                (0..self.segment_count)
                    .filter(move |&i| self.segment(i).envelope().intersects_xy(&query, tolerance)),
            );
        }
        self.spatial_index().search(query, tolerance)
    }

    /// The cached spatial index over all segments, built on first use.
    pub fn spatial_index(&self) -> &SpatialIndex {
        self.index.get_or_init(|| {
            let envelopes = self.segments().map(|s| s.envelope()).collect();
            SpatialIndex::build(self.index_options.kind, envelopes)
        })
    }

    #[must_use]
    pub fn has_cached_index(&self) -> bool {
        self.index.get().is_some()
    }

    /// Returns `true` if `point` lies within `tolerance` of any segment.
    #[must_use]
    pub fn intersects_point_xy(&self, point: &Point3, tolerance: f64) -> bool {
        let query = Envelope::new(*point, *point);
        self.find_segments(&query, tolerance)
            .any(|i| self.segment(i).intersects_point_xy(point, tolerance))
    }

    // ── arena mutations ──

    pub fn add_linestring(&mut self, linestring: Linestring) {
        self.parts.push(linestring);
        self.invalidate();
    }

    /// Inserts a part at `index`, shifting later parts.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::PartIndexOutOfRange` if `index > part_count()`.
    pub fn insert_linestring(&mut self, index: usize, linestring: Linestring) -> Result<()> {
        if index > self.parts.len() {
            return Err(self.part_out_of_range(index));
        }
        self.parts.insert(index, linestring);
        self.invalidate();
        Ok(())
    }

    /// Removes and returns the part at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::PartIndexOutOfRange` for an invalid index.
    pub fn remove_linestring(&mut self, index: usize) -> Result<Linestring> {
        if index >= self.parts.len() {
            return Err(self.part_out_of_range(index));
        }
        let removed = self.parts.remove(index);
        self.invalidate();
        Ok(removed)
    }

    /// Replaces the part at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::PartIndexOutOfRange` for an invalid index.
    pub fn replace_linestring(&mut self, index: usize, linestring: Linestring) -> Result<Linestring> {
        if index >= self.parts.len() {
            return Err(self.part_out_of_range(index));
        }
        let previous = std::mem::replace(&mut self.parts[index], linestring);
        self.invalidate();
        Ok(previous)
    }

    /// Reverses every part.
    pub fn reverse_orientation(&mut self) {
        for part in &mut self.parts {
            part.reverse_orientation();
        }
        self.invalidate();
    }

    /// Snaps every ordinate of every part to a multiple of `resolution`.
    pub fn snap_to_resolution(&mut self, resolution: f64) {
        for part in &mut self.parts {
            part.snap_to_resolution(resolution);
        }
        self.invalidate();
    }

    #[must_use]
    pub fn into_parts(self) -> Vec<Linestring> {
        self.parts
    }

    fn part_out_of_range(&self, index: usize) -> crate::error::GeotopoError {
        TopologyError::PartIndexOutOfRange {
            index,
            count: self.parts.len(),
        }
        .into()
    }

    fn invalidate(&mut self) {
        self.offsets.clear();
        let mut offset = 0;
        let mut envelope = Envelope::empty();
        for part in &self.parts {
            self.offsets.push(offset);
            offset += part.segment_count();
            envelope.expand_to_include(part.envelope());
        }
        self.segment_count = offset;
        self.envelope = envelope;
        self.index = OnceLock::new();
    }
}

impl From<Linestring> for MultiLinestring {
    fn from(linestring: Linestring) -> Self {
        MultiLinestring::new(vec![linestring])
    }
}

impl AsRef<MultiLinestring> for MultiLinestring {
    fn as_ref(&self) -> &MultiLinestring {
        self
    }
}

impl FromIterator<Linestring> for MultiLinestring {
    fn from_iter<T: IntoIterator<Item = Linestring>>(iter: T) -> Self {
        MultiLinestring::new(iter.into_iter().collect())
    }
}

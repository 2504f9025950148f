use std::collections::HashMap;

use crate::geometry::{Linestring, MultiLinestring};
use crate::math::Point3;

use super::classify::{find_segment_intersections, SegmentRelation};

/// How an intersection point came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    Crossing,
    Touch,
    LinearStart,
    LinearEnd,
    /// A vertex inside a linear overlap that continues on both sides.
    LinearIntermediate,
}

impl IntersectionKind {
    fn rank(self) -> u8 {
        match self {
            Self::Crossing => 0,
            Self::Touch => 1,
            Self::LinearStart | Self::LinearEnd => 2,
            Self::LinearIntermediate => 3,
        }
    }

    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::LinearStart, Self::LinearEnd) | (Self::LinearEnd, Self::LinearStart) => {
                Self::LinearIntermediate
            }
            _ if other.rank() > self.rank() => other,
            _ => self,
        }
    }

    #[must_use]
    pub fn is_linear(self) -> bool {
        matches!(
            self,
            Self::LinearStart | Self::LinearEnd | Self::LinearIntermediate
        )
    }
}

/// A position along a linestring: segment index plus factor.
///
/// Positions are normalized so that the end of a segment is stored as the
/// start of the next one, and the closing vertex of a ring as its first
/// vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualVertex {
    pub segment: usize,
    pub factor: f64,
}

impl VirtualVertex {
    const FACTOR_EPSILON: f64 = 1e-9;

    #[must_use]
    pub fn on(line: &Linestring, segment: usize, factor: f64) -> Self {
        if factor < 1.0 {
            return Self {
                segment,
                factor: factor.max(0.0),
            };
        }
        let next = segment + 1;
        let wrapped = if next >= line.segment_count() && line.is_closed() {
            0
        } else {
            next
        };
        Self {
            segment: wrapped,
            factor: 0.0,
        }
    }

    /// Continuous position along the linestring (`segment + factor`).
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.segment as f64 + self.factor
    }

    #[must_use]
    pub fn is_vertex(&self) -> bool {
        self.factor <= 0.0
    }

    fn coincides(&self, other: &Self) -> bool {
        self.segment == other.segment && (self.factor - other.factor).abs() <= Self::FACTOR_EPSILON
    }
}

/// A deduplicated intersection point between two multi-linestrings.
///
/// The point (and its Z) is taken from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint {
    pub point: Point3,
    pub kind: IntersectionKind,
    pub source_part: usize,
    pub target_part: usize,
    pub source_vertex: VirtualVertex,
    pub target_vertex: VirtualVertex,
}

/// Options for [`intersection_points_xy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntersectionPointOptions {
    /// Also report the vertices inside linear overlaps.
    pub include_linear_intermediate: bool,
}

/// Computes the intersection points between `source` and `target`, ordered
/// along the source.
///
/// A contact at a vertex shared by two consecutive segments (or at the
/// closing vertex of a ring) is reported once.
#[must_use]
pub fn intersection_points_xy(
    source: &MultiLinestring,
    target: &MultiLinestring,
    tolerance: f64,
    options: IntersectionPointOptions,
) -> Vec<IntersectionPoint> {
    let mut points: Vec<IntersectionPoint> = Vec::new();
    let mut slots: HashMap<(usize, usize, usize, usize), Vec<usize>> = HashMap::new();

    for hit in find_segment_intersections(source, target, tolerance) {
        let (Some((source_part, source_local)), Some((target_part, target_local))) = (
            source.local_segment_index(hit.source_index),
            target.local_segment_index(hit.target_index),
        ) else {
            continue;
        };
        let (Some(source_line), Some(target_line)) =
            (source.part(source_part), target.part(target_part))
        else {
            continue;
        };
        let segment = source.segment(hit.source_index);

        let contacts = match hit.relation {
            SegmentRelation::Disjoint => continue,
            SegmentRelation::Crossing {
                source_factor,
                target_factor,
            } => vec![(IntersectionKind::Crossing, source_factor, target_factor)],
            SegmentRelation::Touch {
                source_factor,
                target_factor,
            } => vec![(IntersectionKind::Touch, source_factor, target_factor)],
            SegmentRelation::Linear(overlap) => vec![
                (
                    IntersectionKind::LinearStart,
                    overlap.source_start,
                    overlap.target_start,
                ),
                (
                    IntersectionKind::LinearEnd,
                    overlap.source_end,
                    overlap.target_end,
                ),
            ],
        };

        for (kind, source_factor, target_factor) in contacts {
            let candidate = IntersectionPoint {
                point: segment.point_along(source_factor),
                kind,
                source_part,
                target_part,
                source_vertex: VirtualVertex::on(source_line, source_local, source_factor),
                target_vertex: VirtualVertex::on(target_line, target_local, target_factor),
            };
            let key = (
                source_part,
                target_part,
                candidate.source_vertex.segment,
                candidate.target_vertex.segment,
            );
            let slot = slots.entry(key).or_default();
            let existing = slot.iter().copied().find(|&i| {
                points[i].source_vertex.coincides(&candidate.source_vertex)
                    && points[i].target_vertex.coincides(&candidate.target_vertex)
            });
            match existing {
                Some(i) => points[i].kind = points[i].kind.combine(kind),
                None => {
                    slot.push(points.len());
                    points.push(candidate);
                }
            }
        }
    }

    if !options.include_linear_intermediate {
        points.retain(|p| p.kind != IntersectionKind::LinearIntermediate);
    }
    points.sort_by(|a, b| {
        a.source_part
            .cmp(&b.source_part)
            .then_with(|| a.source_vertex.position().total_cmp(&b.source_vertex.position()))
            .then_with(|| a.target_part.cmp(&b.target_part))
            .then_with(|| a.target_vertex.position().total_cmp(&b.target_vertex.position()))
    });
    points
}

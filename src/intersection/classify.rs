use tracing::trace;

use crate::geometry::point::distance_xy;
use crate::geometry::{MultiLinestring, Segment};
use crate::math::epsilon::significance_epsilon;

/// Collinear overlap of two segments.
///
/// Source factors are ordered (`source_start <= source_end`); the target
/// factors are those of the same two points along the target, so they run
/// backwards when the segments point in opposite directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearOverlap {
    pub source_start: f64,
    pub source_end: f64,
    pub target_start: f64,
    pub target_end: f64,
}

impl LinearOverlap {
    #[must_use]
    pub fn is_opposite_direction(&self) -> bool {
        self.target_start > self.target_end
    }
}

/// XY relation between a source and a target segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentRelation {
    Disjoint,
    /// Both segments cross in their open interiors.
    Crossing { source_factor: f64, target_factor: f64 },
    /// A single contact point involving an endpoint of either segment.
    Touch { source_factor: f64, target_factor: f64 },
    Linear(LinearOverlap),
}

impl SegmentRelation {
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        matches!(self, Self::Disjoint)
    }

    /// Factor along the source of the first contact point.
    #[must_use]
    pub fn source_factor(&self) -> Option<f64> {
        match self {
            Self::Disjoint => None,
            Self::Crossing { source_factor, .. } | Self::Touch { source_factor, .. } => {
                Some(*source_factor)
            }
            Self::Linear(overlap) => Some(overlap.source_start),
        }
    }
}

/// A non-disjoint relation between two segments of two multi-linestrings,
/// addressed by global segment index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    pub source_index: usize,
    pub target_index: usize,
    pub relation: SegmentRelation,
}

/// Classifies the XY relation of two segments within `tolerance`.
///
/// Contact points within tolerance of an endpoint snap to that endpoint, and
/// contact points closer than the tolerance to each other are merged, so an
/// overlap shorter than the tolerance is reported as a touch.
#[must_use]
pub fn classify_segments(source: &Segment, target: &Segment, tolerance: f64) -> SegmentRelation {
    let slack = tolerance
        + significance_epsilon(&[
            source.start.x,
            source.start.y,
            source.end.x,
            source.end.y,
            target.start.x,
            target.start.y,
            target.end.x,
            target.end.y,
        ]);
    if source.envelope().is_disjoint_xy(&target.envelope(), slack) {
        return SegmentRelation::Disjoint;
    }

    let mut contacts: Vec<(f64, f64)> = Vec::with_capacity(4);
    for (target_factor, point) in [(0.0, &target.start), (1.0, &target.end)] {
        if let Some(source_factor) = source.point_factor_within_xy(point, tolerance) {
            add_contact(&mut contacts, source, source_factor, target_factor, slack);
        }
    }
    for (source_factor, point) in [(0.0, &source.start), (1.0, &source.end)] {
        if let Some(target_factor) = target.point_factor_within_xy(point, tolerance) {
            add_contact(&mut contacts, source, source_factor, target_factor, slack);
        }
    }

    match contacts.len() {
        0 => match source.intersection_factors_xy(target) {
            Some((t, u)) if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 => SegmentRelation::Crossing {
                source_factor: t,
                target_factor: u,
            },
            _ => SegmentRelation::Disjoint,
        },
        1 => SegmentRelation::Touch {
            source_factor: contacts[0].0,
            target_factor: contacts[0].1,
        },
        _ => {
            let first = contacts
                .iter()
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .copied()
                .unwrap_or_default();
            let last = contacts
                .iter()
                .max_by(|a, b| a.0.total_cmp(&b.0))
                .copied()
                .unwrap_or_default();
            trace!(?first, ?last, "collinear overlap");
            SegmentRelation::Linear(LinearOverlap {
                source_start: first.0,
                source_end: last.0,
                target_start: first.1,
                target_end: last.1,
            })
        }
    }
}

/// Adds a contact, merging it with an existing one at the same location.
/// Exact endpoint factors win over interior ones.
fn add_contact(
    contacts: &mut Vec<(f64, f64)>,
    source: &Segment,
    source_factor: f64,
    target_factor: f64,
    slack: f64,
) {
    let point = source.point_along(source_factor);
    let existing = contacts
        .iter_mut()
        .find(|(s, _)| distance_xy(&source.point_along(*s), &point) <= slack);
    match existing {
        Some(contact) => {
            if is_endpoint_factor(source_factor) {
                contact.0 = source_factor;
            }
            if is_endpoint_factor(target_factor) {
                contact.1 = target_factor;
            }
        }
        None => contacts.push((source_factor, target_factor)),
    }
}

fn is_endpoint_factor(factor: f64) -> bool {
    factor <= 0.0 || factor >= 1.0
}

/// Finds every non-disjoint segment pair between `source` and `target`,
/// ordered along the source by segment index and factor.
#[must_use]
pub fn find_segment_intersections(
    source: &MultiLinestring,
    target: &MultiLinestring,
    tolerance: f64,
) -> Vec<SegmentIntersection> {
    let mut found = Vec::new();
    let search_tolerance = tolerance
        + significance_epsilon(&[
            source.envelope().max_abs_xy(),
            target.envelope().max_abs_xy(),
        ]);
    if source
        .envelope()
        .is_disjoint_xy(target.envelope(), search_tolerance)
    {
        return found;
    }

    for (source_index, segment) in source.segments().enumerate() {
        for target_index in target.find_segments(&segment.envelope(), search_tolerance) {
            let relation = classify_segments(&segment, &target.segment(target_index), tolerance);
            if !relation.is_disjoint() {
                found.push(SegmentIntersection {
                    source_index,
                    target_index,
                    relation,
                });
            }
        }
    }

    found.sort_by(|a, b| {
        a.source_index
            .cmp(&b.source_index)
            .then_with(|| {
                let fa = a.relation.source_factor().unwrap_or_default();
                let fb = b.relation.source_factor().unwrap_or_default();
                fa.total_cmp(&fb)
            })
            .then_with(|| a.target_index.cmp(&b.target_index))
    });
    found
}

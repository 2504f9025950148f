//! Relation predicates between segments, linestrings and areas.
//!
//! Bounds predicates are cheap pre-filters; the finer predicates walk the
//! intersection classifications and the overlay fragments of both inputs.

pub mod containment;
pub mod equality;
pub mod touches;

pub use containment::{
    area_contains_point_xy, area_contains_xy, lines_contain_point_xy, lines_contain_xy,
    ring_contains_point_xy, Containment,
};
pub use equality::{are_equal_xy, EqualsXy};
pub use touches::{touches_xy, TouchOptions, TouchRelation};

use crate::geometry::{Envelope, MultiLinestring, Segment};
use crate::intersection::{
    classify_segments, intersection_points_xy, IntersectionKind, IntersectionPointOptions,
    SegmentRelation,
};
use crate::overlay::{FragmentClass, Overlay};

/// Returns `true` if the envelopes are separated by more than `tolerance`.
#[must_use]
pub fn are_bounds_disjoint(a: &Envelope, b: &Envelope, tolerance: f64) -> bool {
    a.is_disjoint_xy(b, tolerance)
}

/// Returns `true` if the envelopes agree within `tolerance`.
#[must_use]
pub fn are_bounds_equal(a: &Envelope, b: &Envelope, tolerance: f64) -> bool {
    a.equals_xy(b, tolerance)
}

/// Returns `true` if the segments cross in their open interiors. Shared
/// endpoints, touches and collinear overlaps do not count.
#[must_use]
pub fn segments_cross_xy(a: &Segment, b: &Segment, tolerance: f64) -> bool {
    matches!(
        classify_segments(a, b, tolerance),
        SegmentRelation::Crossing { .. }
    )
}

/// Returns `true` if the interiors of `a` and `b` intersect.
///
/// For two areas this means some boundary fragment of one lies inside the
/// other, or both share a boundary stretch with the same orientation. For
/// linework only interior crossings count.
#[must_use]
pub fn interior_intersects_xy(a: &MultiLinestring, b: &MultiLinestring, tolerance: f64) -> bool {
    if are_bounds_disjoint(a.envelope(), b.envelope(), tolerance) {
        return false;
    }
    let areas = a.is_closed() && b.is_closed();
    if !areas {
        return intersection_points_xy(a, b, tolerance, IntersectionPointOptions::default())
            .iter()
            .any(|p| p.kind == IntersectionKind::Crossing);
    }
    let overlay = Overlay::new(a, b, tolerance);
    (0..overlay.fragments().len()).any(|i| {
        matches!(
            overlay.classify(i),
            FragmentClass::Inside | FragmentClass::CoincidentSame
        )
    })
}

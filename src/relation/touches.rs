use std::borrow::Cow;

use tracing::trace;

use crate::geometry::{Linestring, MultiLinestring};
use crate::intersection::{intersection_points_xy, IntersectionKind, IntersectionPointOptions};
use crate::overlay::{FragmentClass, Operand, Overlay};

use super::are_bounds_disjoint;
use super::containment::area_contains_point_xy;

/// Options for [`touches_xy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchOptions {
    /// Treat every ring as clockwise, i.e. as enclosing its area.
    pub ignore_orientation: bool,
    /// Accept contact with rings that are vertical in XY (no footprint). Such
    /// rings are handled like linework.
    pub allow_vertical: bool,
}

/// Result of [`touches_xy`]; both facts come from the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchRelation {
    pub touches: bool,
    pub disjoint: bool,
}

impl TouchRelation {
    const DISJOINT: Self = Self {
        touches: false,
        disjoint: true,
    };
    const OVERLAPPING: Self = Self {
        touches: false,
        disjoint: false,
    };
    const TOUCHING: Self = Self {
        touches: true,
        disjoint: false,
    };
}

/// Tests whether `a` and `b` share boundary without their interiors
/// overlapping.
///
/// Ring orientation decides which side is the interior: a clockwise ring
/// encloses its area and a counter-clockwise ring describes the outside, so
/// by default two rings touch only if each lies outside the other.
#[must_use]
pub fn touches_xy(
    a: &MultiLinestring,
    b: &MultiLinestring,
    tolerance: f64,
    options: TouchOptions,
) -> TouchRelation {
    if are_bounds_disjoint(a.envelope(), b.envelope(), tolerance) {
        return TouchRelation::DISJOINT;
    }

    let a_vertical = has_vertical_ring(a, tolerance);
    let b_vertical = has_vertical_ring(b, tolerance);
    if (a_vertical || b_vertical) && !options.allow_vertical {
        let disjoint = intersection_points_xy(a, b, tolerance, IntersectionPointOptions::default())
            .is_empty();
        trace!(disjoint, "vertical ring contact not accepted");
        return TouchRelation {
            touches: false,
            disjoint,
        };
    }

    let (a, b) = if options.ignore_orientation {
        (clockwise(a), clockwise(b))
    } else {
        (Cow::Borrowed(a), Cow::Borrowed(b))
    };
    let a_area = is_area(&a, tolerance);
    let b_area = is_area(&b, tolerance);

    let points = intersection_points_xy(&a, &b, tolerance, IntersectionPointOptions::default());
    if points.is_empty() {
        let nested = (b_area && first_vertex_inside(&a, &b, tolerance))
            || (a_area && first_vertex_inside(&b, &a, tolerance));
        return if nested {
            TouchRelation::OVERLAPPING
        } else {
            TouchRelation::DISJOINT
        };
    }
    if points.iter().any(|p| p.kind == IntersectionKind::Crossing) {
        return TouchRelation::OVERLAPPING;
    }

    let overlay = Overlay::new(&a, &b, tolerance);
    for (i, fragment) in overlay.fragments().iter().enumerate() {
        let other_is_area = match fragment.operand {
            Operand::A => b_area,
            Operand::B => a_area,
        };
        let own_is_area = match fragment.operand {
            Operand::A => a_area,
            Operand::B => b_area,
        };
        let overlapping = match overlay.classify(i) {
            FragmentClass::Inside => other_is_area,
            FragmentClass::Outside => false,
            FragmentClass::CoincidentSame => own_is_area == other_is_area,
            FragmentClass::CoincidentOpposite => !own_is_area && !other_is_area,
        };
        if overlapping {
            return TouchRelation::OVERLAPPING;
        }
    }
    TouchRelation::TOUCHING
}

fn is_area(lines: &MultiLinestring, tolerance: f64) -> bool {
    lines.is_closed() && lines.area_xy().abs() > tolerance * tolerance
}

fn has_vertical_ring(lines: &MultiLinestring, tolerance: f64) -> bool {
    lines.parts().iter().any(|p| p.is_vertical_ring(tolerance))
}

fn clockwise(lines: &MultiLinestring) -> Cow<'_, MultiLinestring> {
    if lines.parts().iter().all(|p| p.area_xy() >= 0.0) {
        return Cow::Borrowed(lines);
    }
    let parts: Vec<Linestring> = lines
        .parts()
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if p.area_xy() < 0.0 {
                p.reverse_orientation();
            }
            p
        })
        .collect();
    Cow::Owned(MultiLinestring::new(parts))
}

fn first_vertex_inside(lines: &MultiLinestring, area: &MultiLinestring, tolerance: f64) -> bool {
    lines
        .points()
        .next()
        .is_some_and(|p| area_contains_point_xy(area, p, tolerance).is_inside())
}

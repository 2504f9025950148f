use crate::geometry::{Linestring, MultiLinestring};
use crate::math::polygon_2d::winding_number_xy;
use crate::math::Point3;
use crate::overlay::{FragmentClass, Operand, Overlay};

/// Three-valued result of a point-in-area test.
///
/// `OnBoundary` means the point is within tolerance of the boundary, where
/// inside and outside cannot be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    OnBoundary,
}

impl Containment {
    #[must_use]
    pub fn is_inside(self) -> bool {
        self == Self::Inside
    }

    #[must_use]
    pub fn is_outside(self) -> bool {
        self == Self::Outside
    }

    #[must_use]
    pub fn is_on_boundary(self) -> bool {
        self == Self::OnBoundary
    }
}

/// Point-in-area test against a set of oriented rings.
///
/// The interior is on the right of every ring: clockwise rings enclose area,
/// counter-clockwise rings cut it out. If the rings' total area is negative
/// the interior is unbounded (e.g. a lone counter-clockwise ring describes
/// everything outside it).
#[must_use]
pub fn area_contains_point_xy(area: &MultiLinestring, point: &Point3, tolerance: f64) -> Containment {
    if area.intersects_point_xy(point, tolerance) {
        return Containment::OnBoundary;
    }
    let winding: i32 = area
        .parts()
        .iter()
        .filter(|part| part.is_closed())
        .map(|part| winding_number_xy(point, part.points()))
        .sum();
    resolve(winding, area.area_xy())
}

/// Point-in-area test against a single oriented ring.
#[must_use]
pub fn ring_contains_point_xy(ring: &Linestring, point: &Point3, tolerance: f64) -> Containment {
    if ring.intersects_point_xy(point, tolerance) {
        return Containment::OnBoundary;
    }
    if !ring.is_closed() {
        return Containment::Outside;
    }
    resolve(winding_number_xy(point, ring.points()), ring.area_xy())
}

fn resolve(winding: i32, area: f64) -> Containment {
    let unbounded = i32::from(area < 0.0);
    if unbounded - winding > 0 {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// Returns `true` if `point` lies within `tolerance` of any segment of `lines`.
#[must_use]
pub fn lines_contain_point_xy(lines: &MultiLinestring, point: &Point3, tolerance: f64) -> bool {
    lines.intersects_point_xy(point, tolerance)
}

/// Returns `true` if every stretch of `lines` runs along `container`.
#[must_use]
pub fn lines_contain_xy(container: &MultiLinestring, lines: &MultiLinestring, tolerance: f64) -> bool {
    if lines.is_empty() || !container.envelope().contains_xy(lines.envelope(), tolerance) {
        return false;
    }
    let overlay = Overlay::new(container, lines, tolerance);
    let mut fragments = overlay.fragments_of(Operand::B).peekable();
    fragments.peek().is_some()
        && fragments.all(|i| {
            overlay
                .coincident(i)
                .any(|j| overlay.fragments()[j].operand == Operand::A)
        })
}

/// Returns `true` if `other` (lines or an area) lies inside `area`.
///
/// Linework entirely on the boundary is not contained. An area is contained
/// if none of its boundary lies outside `area` and no boundary of `area`
/// runs through its interior.
#[must_use]
pub fn area_contains_xy(area: &MultiLinestring, other: &MultiLinestring, tolerance: f64) -> bool {
    if other.is_empty() || !area.envelope().contains_xy(other.envelope(), tolerance) {
        return false;
    }
    let other_is_area = other.is_closed() && other.area_xy().abs() > 0.0;
    let overlay = Overlay::new(area, other, tolerance);

    let mut interior_hit = false;
    for i in overlay.fragments_of(Operand::B) {
        match overlay.classify(i) {
            FragmentClass::Inside => interior_hit = true,
            FragmentClass::Outside => return false,
            FragmentClass::CoincidentSame => interior_hit |= other_is_area,
            FragmentClass::CoincidentOpposite => {
                if other_is_area {
                    return false;
                }
            }
        }
    }
    if other_is_area
        && overlay
            .fragments_of(Operand::A)
            .any(|i| overlay.classify(i) == FragmentClass::Inside)
    {
        return false;
    }
    interior_hit
}

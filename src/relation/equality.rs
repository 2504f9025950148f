use crate::geometry::point::equals_xy;
use crate::geometry::{Linestring, MultiLinestring};
use crate::math::Point3;

use super::are_bounds_equal;

/// Vertex-wise equality in XY within a tolerance.
pub trait EqualsXy {
    fn equals_xy(&self, other: &Self, tolerance: f64) -> bool;
}

/// Returns `true` if `a` and `b` have the same vertices within `tolerance`.
///
/// Rings compare independently of their start vertex and direction; open
/// linestrings compare forwards or reversed. Consecutive vertices closer than
/// the tolerance count once.
#[must_use]
pub fn are_equal_xy<T: EqualsXy>(a: &T, b: &T, tolerance: f64) -> bool {
    a.equals_xy(b, tolerance)
}

impl EqualsXy for Linestring {
    fn equals_xy(&self, other: &Self, tolerance: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        if !are_bounds_equal(self.envelope(), other.envelope(), tolerance) {
            return false;
        }
        let a = distinct_vertices(self.points(), tolerance);
        let b = distinct_vertices(other.points(), tolerance);

        match (self.is_closed(), other.is_closed()) {
            (true, true) => rings_match(&a[..a.len() - 1], &b[..b.len() - 1], tolerance),
            (false, false) => {
                a.len() == b.len()
                    && (sequence_match(a.iter(), b.iter(), tolerance)
                        || sequence_match(a.iter(), b.iter().rev(), tolerance))
            }
            _ => false,
        }
    }
}

impl EqualsXy for MultiLinestring {
    /// Every part must equal a distinct part of the other collection.
    fn equals_xy(&self, other: &Self, tolerance: f64) -> bool {
        if self.part_count() != other.part_count() {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        if !are_bounds_equal(self.envelope(), other.envelope(), tolerance) {
            return false;
        }
        let mut used = vec![false; other.part_count()];
        self.parts().iter().all(|part| {
            let found = other
                .parts()
                .iter()
                .enumerate()
                .position(|(i, candidate)| !used[i] && part.equals_xy(candidate, tolerance));
            match found {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

fn distinct_vertices(points: &[Point3], tolerance: f64) -> Vec<Point3> {
    let mut out: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |last| !equals_xy(last, p, tolerance)) {
            out.push(*p);
        }
    }
    // a ring's closing vertex may have been merged into its predecessor
    if points.len() > 1 && out.len() > 1 {
        if let (Some(first), Some(last)) = (points.first(), out.last_mut()) {
            if equals_xy(first, last, tolerance) {
                *last = *first;
            }
        }
    }
    out
}

fn sequence_match<'a>(
    a: impl Iterator<Item = &'a Point3>,
    b: impl Iterator<Item = &'a Point3>,
    tolerance: f64,
) -> bool {
    a.zip(b).all(|(p, q)| equals_xy(p, q, tolerance))
}

/// Matches two open vertex cycles (closing vertex removed).
fn rings_match(a: &[Point3], b: &[Point3], tolerance: f64) -> bool {
    let n = a.len();
    if n != b.len() || n == 0 {
        return false;
    }
    (0..n)
        .filter(|&offset| equals_xy(&a[0], &b[offset], tolerance))
        .any(|offset| {
            let forward = (0..n).all(|i| equals_xy(&a[i], &b[(offset + i) % n], tolerance));
            let backward = (0..n).all(|i| equals_xy(&a[i], &b[(offset + n - i) % n], tolerance));
            forward || backward
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 0.01;

    fn square() -> Linestring {
        Linestring::from_xy(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]])
    }

    #[test]
    fn rotated_and_reversed_rings_are_equal() {
        let rotated =
            Linestring::from_xy(&[[10.0, 10.0], [10.0, 0.0], [0.0, 0.0], [0.0, 10.0], [10.0, 10.0]]);
        let mut reversed = rotated.clone();
        reversed.reverse_orientation();
        assert!(are_equal_xy(&square(), &rotated, TOL));
        assert!(are_equal_xy(&square(), &reversed, TOL));
    }

    #[test]
    fn tolerance_boundary() {
        let near = Linestring::from_xy(&[
            [0.005, 0.0],
            [0.0, 10.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.005, 0.0],
        ]);
        let far = Linestring::from_xy(&[
            [0.5, 0.0],
            [0.0, 10.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.5, 0.0],
        ]);
        assert!(are_equal_xy(&square(), &near, TOL));
        assert!(!are_equal_xy(&square(), &far, TOL));
    }

    #[test]
    fn extra_vertex_is_not_equal() {
        let extra = Linestring::from_xy(&[
            [0.0, 0.0],
            [0.0, 5.0],
            [0.0, 10.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.0, 0.0],
        ]);
        assert!(!are_equal_xy(&square(), &extra, TOL));
        // a duplicate vertex within tolerance is ignored
        let duplicate = Linestring::from_xy(&[
            [0.0, 0.0],
            [0.0, 10.0],
            [0.001, 10.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.0, 0.0],
        ]);
        assert!(are_equal_xy(&square(), &duplicate, TOL));
    }

    #[test]
    fn open_lines_compare_in_both_directions() {
        let a = Linestring::from_xy(&[[0.0, 0.0], [5.0, 5.0], [10.0, 0.0]]);
        let b = Linestring::from_xy(&[[10.0, 0.0], [5.0, 5.0], [0.0, 0.0]]);
        let c = Linestring::from_xy(&[[0.0, 0.0], [5.0, -5.0], [10.0, 0.0]]);
        assert!(are_equal_xy(&a, &b, TOL));
        assert!(!are_equal_xy(&a, &c, TOL));
        assert!(!are_equal_xy(&a, &square(), TOL));
    }

    #[test]
    fn multi_linestrings_match_parts_in_any_order() {
        let line = Linestring::from_xy(&[[20.0, 0.0], [30.0, 0.0]]);
        let a = MultiLinestring::new(vec![square(), line.clone()]);
        let b = MultiLinestring::new(vec![line.clone(), square()]);
        let c = MultiLinestring::new(vec![line.clone(), line]);
        assert!(are_equal_xy(&a, &b, TOL));
        assert!(!are_equal_xy(&a, &c, TOL));
    }
}

use crate::error::Result;
use crate::geometry::{MultiLinestring, RingGroup};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the part of one area not covered by another.
pub struct Difference<'a> {
    a: &'a MultiLinestring,
    b: &'a MultiLinestring,
    tolerance: f64,
}

impl<'a> Difference<'a> {
    /// Creates a new `Difference` operation (A - B).
    #[must_use]
    pub fn new(
        a: &'a impl AsRef<MultiLinestring>,
        b: &'a impl AsRef<MultiLinestring>,
        tolerance: f64,
    ) -> Self {
        Self {
            a: a.as_ref(),
            b: b.as_ref(),
            tolerance,
        }
    }

    /// Executes the difference, returning the resulting polygons.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if an operand contains an open
    /// linestring or has no positive area (e.g. counter-clockwise rings), or
    /// an error if the result rings cannot be traced.
    pub fn execute(&self) -> Result<Vec<RingGroup>> {
        boolean_execute(self.a, self.b, self.tolerance, BooleanOp::Difference)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Linestring;

    const TOL: f64 = 0.001;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Linestring {
        Linestring::from_xy(&[[x0, y0], [x0, y1], [x1, y1], [x1, y0], [x0, y0]])
    }

    fn hole(x0: f64, y0: f64, x1: f64, y1: f64) -> Linestring {
        Linestring::from_xy(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]])
    }

    #[test]
    fn difference_with_itself_is_empty() {
        let a = RingGroup::new(rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(Difference::new(&a, &a, TOL).execute().unwrap().is_empty());
    }

    #[test]
    fn target_equal_to_a_hole_changes_nothing() {
        let a = RingGroup::with_interior_rings(
            rect(0.0, 0.0, 10.0, 10.0),
            vec![hole(4.0, 4.0, 6.0, 6.0)],
        )
        .unwrap();
        let target = RingGroup::new(rect(4.0, 4.0, 6.0, 6.0)).unwrap();
        let result = Difference::new(&a, &target, TOL).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].interior_ring_count(), 1);
        assert!((result[0].area_xy() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn cutting_a_corner() {
        let a = RingGroup::new(rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        let b = RingGroup::new(rect(5.0, 5.0, 15.0, 15.0)).unwrap();
        let result = Difference::new(&a, &b, TOL).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area_xy() - 75.0).abs() < 1e-9);
        assert_eq!(result[0].exterior_ring().is_clockwise(), Some(true));
    }

    #[test]
    fn splitting_into_two_parts() {
        let a = RingGroup::new(rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        let bar = RingGroup::new(rect(4.0, -1.0, 6.0, 11.0)).unwrap();
        let mut result = Difference::new(&a, &bar, TOL).execute().unwrap();
        assert_eq!(result.len(), 2);
        result.sort_by(|x, y| x.envelope().min.x.total_cmp(&y.envelope().min.x));
        assert!((result[0].area_xy() - 40.0).abs() < 1e-9);
        assert!((result[1].envelope().min.x - 6.0).abs() < 1e-9);
    }

    #[test]
    fn source_inside_target_hole_is_preserved() {
        let a = RingGroup::new(rect(3.0, 3.0, 7.0, 7.0)).unwrap();
        let frame = RingGroup::with_interior_rings(
            rect(0.0, 0.0, 10.0, 10.0),
            vec![hole(2.0, 2.0, 8.0, 8.0)],
        )
        .unwrap();
        let result = Difference::new(&a, &frame, TOL).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area_xy() - 16.0).abs() < 1e-9);

        // the square sits in the hole, so the frame is unchanged
        let result = Difference::new(&frame, &a, TOL).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].interior_ring_count(), 1);
        assert!((result[0].area_xy() - 64.0).abs() < 1e-9);
    }
}

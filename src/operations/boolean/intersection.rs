use crate::error::Result;
use crate::geometry::{MultiLinestring, RingGroup};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the area covered by both operands.
pub struct Intersection<'a> {
    a: &'a MultiLinestring,
    b: &'a MultiLinestring,
    tolerance: f64,
}

impl<'a> Intersection<'a> {
    /// Creates a new `Intersection` operation.
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

    /// Executes the intersection, returning the resulting polygons.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if an operand contains an open
    /// linestring or has no positive area (e.g. counter-clockwise rings), or
    /// an error if the result rings cannot be traced.
    pub fn execute(&self) -> Result<Vec<RingGroup>> {
        boolean_execute(self.a, self.b, self.tolerance, BooleanOp::Intersection)
    }
}

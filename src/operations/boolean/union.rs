use crate::error::Result;
use crate::geometry::{MultiLinestring, RingGroup};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean union of two areas.
pub struct Union<'a> {
    a: &'a MultiLinestring,
    b: &'a MultiLinestring,
    tolerance: f64,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation.
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

    /// Executes the union, returning the resulting polygons.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if an operand contains an open
    /// linestring or has no positive area (e.g. counter-clockwise rings), or
    /// an error if the result rings cannot be traced.
    pub fn execute(&self) -> Result<Vec<RingGroup>> {
        boolean_execute(self.a, self.b, self.tolerance, BooleanOp::Union)
    }
}

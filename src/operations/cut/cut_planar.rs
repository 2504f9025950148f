use tracing::{debug, instrument};

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{MultiLinestring, Projection};

use super::{CutResult, CutXY};

/// Cuts a planar 3D polygon with lines, in the polygon's own plane.
///
/// Polygon and cut lines are projected onto the coordinate plane orthogonal
/// to the dominant axis of the polygon normal, cut there, and the pieces are
/// mapped back with every vertex placed on the polygon's plane. Left and
/// right are as seen from the side the polygon's exterior appears clockwise
/// from.
pub struct CutPlanar<'a> {
    polygon: &'a MultiLinestring,
    cut_lines: &'a MultiLinestring,
    tolerance: f64,
}

impl<'a> CutPlanar<'a> {
    /// Creates a new `CutPlanar` operation. The first ring of `polygon` is
    /// its exterior.
    #[must_use]
    pub fn new(
        polygon: &'a impl AsRef<MultiLinestring>,
        cut_lines: &'a impl AsRef<MultiLinestring>,
        tolerance: f64,
    ) -> Self {
        Self {
            polygon: polygon.as_ref(),
            cut_lines: cut_lines.as_ref(),
            tolerance,
        }
    }

    /// Executes the cut, returning the pieces as ring sets (exterior first)
    /// in the input's orientation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotPlanar` if a polygon vertex is farther than
    /// the tolerance from the exterior ring's plane, a plane fitting error
    /// for a degenerate exterior, or any error of [`CutXY::execute`].
    #[instrument(skip_all, fields(tolerance = self.tolerance))]
    pub fn execute(&self) -> Result<CutResult<MultiLinestring>> {
        let exterior = self.polygon.part(0).ok_or_else(|| {
            OperationError::InvalidInput("polygon to cut has no rings".into())
        })?;
        let projection = Projection::for_ring(exterior)?;

        let deviation = self
            .polygon
            .parts()
            .iter()
            .map(|ring| projection.plane().max_deviation(ring.points()))
            .fold(0.0, f64::max);
        if deviation > self.tolerance {
            return Err(GeometryError::NotPlanar {
                distance: deviation,
            }
            .into());
        }

        let mut flat = projection.multi_to_xy(self.polygon);
        let mirrored = flat.area_xy() < 0.0;
        if mirrored {
            flat.reverse_orientation();
        }
        let flat_cut = projection.multi_to_xy(self.cut_lines);
        debug!(axis = projection.axis(), mirrored, "projected polygon");

        let result = CutXY::new(&flat, &flat_cut, self.tolerance)
            .execute()?
            .map(|piece| {
                let mut rings = projection.multi_from_xy(piece.rings());
                if mirrored {
                    rings.reverse_orientation();
                }
                rings
            });
        Ok(if mirrored { result.swapped() } else { result })
    }
}

use crate::error::Result;
use crate::math::Point3;

use super::linestring::Linestring;
use super::multi_linestring::MultiLinestring;
use super::plane::Plane3D;

/// Maps geometry lying in a plane onto the XY plane and back.
///
/// The dominant axis of the plane normal becomes the projected Z axis; the
/// remaining axes follow by cyclic permutation so handedness is preserved:
/// `z -> (x, y, z)`, `x -> (y, z, x)`, `y -> (z, x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    plane: Plane3D,
    axis: usize,
}

impl Projection {
    #[must_use]
    pub fn new(plane: Plane3D) -> Self {
        Self {
            axis: plane.dominant_axis(),
            plane,
        }
    }

    /// Fits a plane through `ring` and builds the projection for it.
    ///
    /// # Errors
    ///
    /// Propagates the plane fitting error for degenerate rings.
    pub fn for_ring(ring: &Linestring) -> Result<Self> {
        Ok(Self::new(Plane3D::fit(ring.points())?))
    }

    #[must_use]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    #[must_use]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Returns `true` if a ring that follows the plane normal (counter-clockwise
    /// around it) comes out counter-clockwise after projection.
    #[must_use]
    pub fn preserves_orientation(&self) -> bool {
        self.plane.normal()[self.axis] > 0.0
    }

    #[must_use]
    pub fn to_xy(&self, p: &Point3) -> Point3 {
        match self.axis {
            0 => Point3::new(p.y, p.z, p.x),
            1 => Point3::new(p.z, p.x, p.y),
            _ => *p,
        }
    }

    /// Inverse of [`Projection::to_xy`].
    #[must_use]
    pub fn from_xy(&self, p: &Point3) -> Point3 {
        match self.axis {
            0 => Point3::new(p.z, p.x, p.y),
            1 => Point3::new(p.y, p.z, p.x),
            _ => *p,
        }
    }

    /// Like [`Projection::from_xy`] but recomputes the dominant coordinate
    /// from the plane equation, so new vertices land exactly on the plane.
    #[must_use]
    pub fn from_xy_on_plane(&self, p: &Point3) -> Point3 {
        let mut q = self.from_xy(p);
        if let Some(value) = self.plane.coordinate_for(self.axis, &q) {
            q[self.axis] = value;
        }
        q
    }

    #[must_use]
    pub fn linestring_to_xy(&self, line: &Linestring) -> Linestring {
        Linestring::new(line.points().iter().map(|p| self.to_xy(p)).collect())
    }

    #[must_use]
    pub fn linestring_from_xy(&self, line: &Linestring) -> Linestring {
        Linestring::new(
            line.points()
                .iter()
                .map(|p| self.from_xy_on_plane(p))
                .collect(),
        )
    }

    #[must_use]
    pub fn multi_to_xy(&self, lines: &MultiLinestring) -> MultiLinestring {
        lines.parts().iter().map(|l| self.linestring_to_xy(l)).collect()
    }

    #[must_use]
    pub fn multi_from_xy(&self, lines: &MultiLinestring) -> MultiLinestring {
        lines
            .parts()
            .iter()
            .map(|l| self.linestring_from_xy(l))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    // ring in the plane x = 5, counter-clockwise seen from +x
    fn wall() -> Linestring {
        Linestring::from_coords(&[
            [5.0, 0.0, 0.0],
            [5.0, 10.0, 0.0],
            [5.0, 10.0, 10.0],
            [5.0, 0.0, 10.0],
            [5.0, 0.0, 0.0],
        ])
    }

    #[test]
    fn vertical_ring_projects_onto_its_dominant_axis() {
        let projection = Projection::for_ring(&wall()).unwrap();
        assert_eq!(projection.axis(), 0);
        assert!(projection.preserves_orientation());

        let flat = projection.linestring_to_xy(&wall());
        assert!(flat.area_xy() < 0.0, "projected ring should stay counter-clockwise");
        assert!((flat.area_xy() + 100.0).abs() < TOL);
    }

    #[test]
    fn round_trip_lands_on_plane() {
        let tilted = Linestring::from_coords(&[
            [0.0, 0.0, 0.0],
            [0.0, 10.0, 1.0],
            [10.0, 10.0, 2.0],
            [10.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ]);
        let projection = Projection::for_ring(&tilted).unwrap();
        assert_eq!(projection.axis(), 2);
        assert!(!projection.preserves_orientation());

        let flat = projection.linestring_to_xy(&tilted);
        let back = projection.linestring_from_xy(&flat);
        for (a, b) in tilted.points().iter().zip(back.points()) {
            assert!((a - b).norm() < TOL);
        }

        // an arbitrary XY point is lifted onto the plane
        let lifted = projection.from_xy_on_plane(&Point3::new(5.0, 5.0, 99.0));
        assert!(projection.plane().distance(&lifted) < TOL);
    }
}

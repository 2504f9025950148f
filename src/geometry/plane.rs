use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::segment::Segment;

/// An infinite plane `a*x + b*y + c*z + d = 0` with a unit normal `(a, b, c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3,
    d: f64,
}

impl Plane3D {
    /// Creates a plane from its coefficients, normalizing them.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if `(a, b, c)` is zero.
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let normal = Vector3::new(a, b, c);
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            normal: normal / len,
            d: d / len,
        })
    }

    /// Creates the plane through `point` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if the normal is zero.
    pub fn from_point_normal(point: &Point3, normal: &Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;
        Ok(Self {
            normal,
            d: -normal.dot(&point.coords),
        })
    }

    /// Fits a plane through the vertices of a ring using Newell's method.
    ///
    /// The normal follows the right-hand rule: a ring that is clockwise seen
    /// from above gets a downward normal. A closing vertex equal to the first
    /// one is ignored.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the points are collinear or too few.
    pub fn fit(points: &[Point3]) -> Result<Self> {
        let points = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 && first == last => {
                &points[..points.len() - 1]
            }
            _ => points,
        };
        if points.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "cannot fit a plane through {} points",
                points.len()
            ))
            .into());
        }

        // offset to the first vertex to keep precision for large coordinates
        let origin = points[0];
        let n = points.len();
        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for i in 0..n {
            let pi = points[i] - origin;
            let pj = points[(i + 1) % n] - origin;
            normal.x += (pi.y - pj.y) * (pi.z + pj.z);
            normal.y += (pi.z - pj.z) * (pi.x + pj.x);
            normal.z += (pi.x - pj.x) * (pi.y + pj.y);
            centroid += pi;
        }

        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate("points are collinear".into()).into());
        }
        #[allow(clippy::cast_precision_loss)]
        let centroid = origin + centroid / n as f64;
        Self::from_point_normal(&centroid, &(normal / len))
    }

    /// Unit normal `(a, b, c)`.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Constant term `d`.
    #[must_use]
    pub fn d(&self) -> f64 {
        self.d
    }

    /// The point of the plane closest to the origin.
    #[must_use]
    pub fn point_on_plane(&self) -> Point3 {
        Point3::from(-self.d * self.normal)
    }

    /// Signed distance, positive on the side the normal points to.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) + self.d
    }

    /// Absolute distance between `point` and the plane.
    #[must_use]
    pub fn distance(&self, point: &Point3) -> f64 {
        self.signed_distance(point).abs()
    }

    /// Largest absolute distance of any of `points` from the plane.
    #[must_use]
    pub fn max_deviation(&self, points: &[Point3]) -> f64 {
        points.iter().map(|p| self.distance(p)).fold(0.0, f64::max)
    }

    /// Returns `true` if the normals are parallel (in either direction).
    #[must_use]
    pub fn is_parallel(&self, other: &Plane3D) -> bool {
        self.normal.cross(&other.normal).norm() < TOLERANCE
    }

    /// Returns `true` if both planes are parallel and `other` lies within
    /// `tolerance` of this plane.
    #[must_use]
    pub fn is_coincident(&self, other: &Plane3D, tolerance: f64) -> bool {
        self.is_parallel(other) && self.distance(&other.point_on_plane()) <= tolerance
    }

    /// Intersection line with another plane, as a segment from a point on the
    /// line to that point plus the unit direction `n1 x n2`. `None` if the
    /// planes are parallel.
    #[must_use]
    pub fn intersect_plane(&self, other: &Plane3D) -> Option<Segment> {
        let direction = self.normal.cross(&other.normal);
        let len2 = direction.norm_squared();
        if len2.sqrt() < TOLERANCE {
            return None;
        }
        // n1.x = h1, n2.x = h2
        let h1 = -self.d;
        let h2 = -other.d;
        let point = (other.normal.cross(&direction) * h1 + direction.cross(&self.normal) * h2)
            / len2;
        let point = Point3::from(point);
        Some(Segment::new(point, point + direction / len2.sqrt()))
    }

    /// Intersection of the segment `a`-`b` with the plane, `None` if both ends
    /// lie strictly on the same side or the segment lies in the plane.
    #[must_use]
    pub fn intersect_segment(&self, a: &Point3, b: &Point3) -> Option<Point3> {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        if da * db > 0.0 || (da - db).abs() < f64::MIN_POSITIVE {
            return None;
        }
        let t = da / (da - db);
        Some(a + (b - a) * t)
    }

    /// Index (0, 1, 2) of the normal component with the largest magnitude.
    #[must_use]
    pub fn dominant_axis(&self) -> usize {
        self.normal.iamax()
    }

    /// The value of coordinate `axis` that puts `point` on the plane, keeping
    /// its other two coordinates. `None` if the plane is parallel to that axis.
    #[must_use]
    pub fn coordinate_for(&self, axis: usize, point: &Point3) -> Option<f64> {
        let n_axis = self.normal[axis];
        if n_axis.abs() < TOLERANCE {
            return None;
        }
        let rest: f64 = (0..3)
            .filter(|&k| k != axis)
            .map(|k| self.normal[k] * point[k])
            .sum();
        Some(-(self.d + rest) / n_axis)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn cw_square_at(z: f64) -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(0.0, 100.0, z),
            Point3::new(100.0, 100.0, z),
            Point3::new(100.0, 0.0, z),
            Point3::new(0.0, 0.0, z),
        ]
    }

    #[test]
    fn fitted_normal_follows_right_hand_rule() {
        let plane = Plane3D::fit(&cw_square_at(5.0)).unwrap();
        assert!((plane.normal().z + 1.0).abs() < TOL);
        assert!((plane.signed_distance(&Point3::new(3.0, 3.0, 7.0)) + 2.0).abs() < TOL);

        let mut ccw = cw_square_at(5.0);
        ccw.reverse();
        let plane = Plane3D::fit(&ccw).unwrap();
        assert!((plane.normal().z - 1.0).abs() < TOL);
        assert!((plane.distance(&Point3::new(3.0, 3.0, 7.0)) - 2.0).abs() < TOL);
    }

    #[test]
    fn collinear_points_have_no_plane() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert!(Plane3D::fit(&pts).is_err());
        assert!(Plane3D::from_coefficients(0.0, 0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn coefficients_are_normalized() {
        let plane = Plane3D::from_coefficients(0.0, 0.0, 2.0, -10.0).unwrap();
        assert!((plane.d() + 5.0).abs() < TOL);
        assert!((plane.point_on_plane().z - 5.0).abs() < TOL);
    }

    #[test]
    fn plane_plane_intersection() {
        let horizontal = Plane3D::from_coefficients(0.0, 0.0, 1.0, 0.0).unwrap();
        let diagonal = Plane3D::from_coefficients(1.0, -1.0, 0.0, 0.0).unwrap();
        let line = horizontal.intersect_plane(&diagonal).unwrap();
        assert!(horizontal.distance(&line.start) < TOL);
        assert!(diagonal.distance(&line.start) < TOL);
        assert!(horizontal.distance(&line.end) < TOL);
        assert!(diagonal.distance(&line.end) < TOL);
        assert!((line.length_3d() - 1.0).abs() < TOL);

        let parallel = Plane3D::from_coefficients(0.0, 0.0, -1.0, 3.0).unwrap();
        assert!(horizontal.intersect_plane(&parallel).is_none());
        assert!(horizontal.is_parallel(&parallel));
        assert!(!horizontal.is_coincident(&parallel, 0.1));
        let same = Plane3D::from_coefficients(0.0, 0.0, -2.0, 0.0).unwrap();
        assert!(horizontal.is_coincident(&same, 0.0));
    }

    #[test]
    fn offset_plane_intersection_point_lies_on_both() {
        let a = Plane3D::from_point_normal(&Point3::new(10.0, 0.0, 3.0), &Vector3::new(0.0, 0.3, 1.0))
            .unwrap();
        let b = Plane3D::from_point_normal(&Point3::new(-4.0, 7.0, 0.0), &Vector3::new(1.0, 0.2, 0.0))
            .unwrap();
        let line = a.intersect_plane(&b).unwrap();
        assert!(a.distance(&line.start) < TOL && b.distance(&line.start) < TOL);
        assert!(a.distance(&line.end) < TOL && b.distance(&line.end) < TOL);
    }

    #[test]
    fn segment_plane_intersection() {
        let plane = Plane3D::from_coefficients(0.0, 0.0, 1.0, 0.0).unwrap();
        let p = plane
            .intersect_segment(&Point3::new(10.0, 10.0, -10.0), &Point3::new(20.0, 20.0, 10.0))
            .unwrap();
        assert!((p.x - 15.0).abs() < TOL && p.z.abs() < TOL);
        assert!(plane
            .intersect_segment(&Point3::new(0.0, 0.0, 1.0), &Point3::new(1.0, 0.0, 2.0))
            .is_none());
    }

    #[test]
    fn solve_coordinate_on_plane() {
        let plane = Plane3D::from_point_normal(&Point3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(plane.dominant_axis(), 0);
        let z = plane.coordinate_for(2, &Point3::new(3.0, 8.0, 0.0)).unwrap();
        assert!((z + 3.0).abs() < TOL);
        assert!(plane.coordinate_for(1, &Point3::origin()).is_none());
    }
}

use crate::error::{GeometryError, Result};
use crate::math::epsilon::significance_epsilon;
use crate::math::polygon_2d::cross_2d;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::envelope::Envelope;
use super::point::{distance_xy, equals_xy};

/// A straight segment between two 3D points.
///
/// All `*_xy` queries work on the XY projection; Z is carried along and
/// interpolated linearly by [`Segment::point_along`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Vector from start to end.
    #[must_use]
    pub fn delta(&self) -> Vector3 {
        self.end - self.start
    }

    #[must_use]
    pub fn length_3d(&self) -> f64 {
        self.delta().norm()
    }

    #[must_use]
    pub fn length_xy(&self) -> f64 {
        distance_xy(&self.start, &self.end)
    }

    #[must_use]
    pub fn length_squared_xy(&self) -> f64 {
        let d = self.delta();
        d.x * d.x + d.y * d.y
    }

    /// Normalized 3D direction from start to end.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if the segment has zero length.
    pub fn direction(&self) -> Result<Vector3> {
        let d = self.delta();
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    /// Interpolates the point at `factor` along the segment.
    ///
    /// Factors outside `[0, 1]` extrapolate along the infinite line.
    #[must_use]
    pub fn point_along(&self, factor: f64) -> Point3 {
        self.start + self.delta() * factor
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::new(self.start, self.end)
    }

    #[must_use]
    pub fn reversed(&self) -> Segment {
        Segment::new(self.end, self.start)
    }

    /// Returns `true` if the XY length does not exceed `tolerance`.
    #[must_use]
    pub fn is_zero_length_xy(&self, tolerance: f64) -> bool {
        self.length_xy() <= tolerance
    }

    /// Ratio of the projection of `point` onto the infinite line, 0 at start
    /// and 1 at end. Returns `0.0` for a zero-length segment.
    #[must_use]
    pub fn along_ratio(&self, point: &Point3, in_3d: bool) -> f64 {
        let d = self.delta();
        let w = point - self.start;
        let (dot, len2) = if in_3d {
            (w.dot(&d), d.norm_squared())
        } else {
            (w.x * d.x + w.y * d.y, d.x * d.x + d.y * d.y)
        };
        if len2 < TOLERANCE * TOLERANCE {
            0.0
        } else {
            dot / len2
        }
    }

    /// Signed distance from the start point to the projection of `point`
    /// onto the infinite line.
    #[must_use]
    pub fn distance_along(&self, point: &Point3, in_3d: bool) -> f64 {
        let length = if in_3d {
            self.length_3d()
        } else {
            self.length_xy()
        };
        self.along_ratio(point, in_3d) * length
    }

    /// Distance between `point` and the infinite line through the segment.
    #[must_use]
    pub fn distance_perpendicular(&self, point: &Point3, in_3d: bool) -> f64 {
        if in_3d {
            let d = self.delta();
            let len = d.norm();
            if len < TOLERANCE {
                return (point - self.start).norm();
            }
            (point - self.start).cross(&d).norm() / len
        } else {
            self.signed_distance_xy_perpendicular(point).0.abs()
        }
    }

    /// Signed XY distance of `point` from the infinite line, positive on the
    /// left, together with the along ratio of its projection.
    #[must_use]
    pub fn signed_distance_xy_perpendicular(&self, point: &Point3) -> (f64, f64) {
        let len = self.length_xy();
        let along = self.along_ratio(point, false);
        if len < TOLERANCE {
            return (distance_xy(&self.start, point), along);
        }
        let d = self.delta();
        let cross = cross_2d(d.x, d.y, point.x - self.start.x, point.y - self.start.y);
        (cross / len, along)
    }

    /// Returns `true` if `point` lies strictly left of the directed line.
    #[must_use]
    pub fn is_left_xy(&self, point: &Point3) -> bool {
        let d = self.delta();
        cross_2d(d.x, d.y, point.x - self.start.x, point.y - self.start.y) > 0.0
    }

    /// XY distance between `point` and the closest point of the segment.
    #[must_use]
    pub fn distance_xy_to_point(&self, point: &Point3) -> f64 {
        let along = self.along_ratio(point, false);
        if along <= 0.0 {
            distance_xy(&self.start, point)
        } else if along >= 1.0 {
            distance_xy(&self.end, point)
        } else {
            self.signed_distance_xy_perpendicular(point).0.abs()
        }
    }

    /// Returns `true` if `point` is within `tolerance` of the segment in XY.
    #[must_use]
    pub fn intersects_point_xy(&self, point: &Point3, tolerance: f64) -> bool {
        self.distance_xy_to_point(point) <= tolerance + self.epsilon_for(point)
    }

    /// Position of `point` on the segment in XY, if it is within `tolerance`.
    ///
    /// Points within tolerance of an endpoint snap to exactly `0.0` or `1.0`
    /// (the nearer one if both qualify). The significance epsilon of the
    /// operand coordinates is added to the tolerance. Returns `None` for
    /// points farther away.
    #[must_use]
    pub fn point_factor_within_xy(&self, point: &Point3, tolerance: f64) -> Option<f64> {
        let tolerance = tolerance + self.epsilon_for(point);

        let to_start = distance_xy(&self.start, point);
        let to_end = distance_xy(&self.end, point);
        if to_start <= tolerance || to_end <= tolerance {
            return Some(if to_start <= to_end { 0.0 } else { 1.0 });
        }

        if self.length_xy() < TOLERANCE {
            return None;
        }

        let (distance, along) = self.signed_distance_xy_perpendicular(point);
        if distance.abs() <= tolerance && along > 0.0 && along < 1.0 {
            Some(along)
        } else {
            None
        }
    }

    /// Factors along both infinite lines at their XY intersection, or `None`
    /// if the lines are parallel.
    #[must_use]
    pub fn intersection_factors_xy(&self, other: &Segment) -> Option<(f64, f64)> {
        let d1 = self.delta();
        let d2 = other.delta();
        let denom = cross_2d(d1.x, d1.y, d2.x, d2.y);
        let scale = self.length_xy() * other.length_xy();
        if denom.abs() <= TOLERANCE * scale.max(TOLERANCE) {
            return None;
        }
        let wx = other.start.x - self.start.x;
        let wy = other.start.y - self.start.y;
        let t = cross_2d(wx, wy, d2.x, d2.y) / denom;
        let u = cross_2d(wx, wy, d1.x, d1.y) / denom;
        Some((t, u))
    }

    /// Returns `true` if both segments connect the same XY locations, in
    /// either direction.
    #[must_use]
    pub fn equals_xy(&self, other: &Segment, tolerance: f64) -> bool {
        (equals_xy(&self.start, &other.start, tolerance)
            && equals_xy(&self.end, &other.end, tolerance))
            || (equals_xy(&self.start, &other.end, tolerance)
                && equals_xy(&self.end, &other.start, tolerance))
    }

    /// Clips the infinite line through `point` with `direction` to `envelope`.
    ///
    /// Returns `None` if the line misses the envelope or the direction is zero.
    /// The Z axis is only used for clipping if the envelope has a Z range.
    #[must_use]
    pub fn construct_in_box(
        point: &Point3,
        direction: &Vector3,
        envelope: &Envelope,
    ) -> Option<Segment> {
        if envelope.is_empty() || direction.norm() < TOLERANCE {
            return None;
        }
        let has_z = envelope.min.z <= envelope.max.z;
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            if axis == 2 && !has_z {
                continue;
            }
            let (p, d) = (point[axis], direction[axis]);
            let (lo, hi) = (envelope.min[axis], envelope.max[axis]);
            if d.abs() < TOLERANCE {
                if p < lo || p > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - p) / d;
            let t2 = (hi - p) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_min > t_max || !t_min.is_finite() || !t_max.is_finite() {
            return None;
        }
        Some(Segment::new(
            point + direction * t_min,
            point + direction * t_max,
        ))
    }

    fn epsilon_for(&self, point: &Point3) -> f64 {
        significance_epsilon(&[
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y,
            point.x,
            point.y,
        ])
    }
}

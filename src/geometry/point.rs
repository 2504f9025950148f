use crate::math::Point3;

/// Returns the XY distance between two points.
#[must_use]
pub fn distance_xy(a: &Point3, b: &Point3) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Returns `true` if the points coincide in XY within `tolerance`.
#[must_use]
pub fn equals_xy(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    distance_xy(a, b) <= tolerance
}

/// Returns `true` if the points coincide in 3D within `tolerance`.
///
/// Z values are compared only if both are finite.
#[must_use]
pub fn equals_3d(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    if !equals_xy(a, b, tolerance) {
        return false;
    }
    if a.z.is_finite() && b.z.is_finite() {
        return (a - b).norm() <= tolerance;
    }
    a.z.is_nan() == b.z.is_nan()
}

/// Snaps a single ordinate to a multiple of `resolution`.
#[must_use]
pub fn snap_ordinate(value: f64, resolution: f64) -> f64 {
    if resolution <= 0.0 || !value.is_finite() {
        return value;
    }
    (value / resolution).round() * resolution
}

/// Snaps all ordinates of a point to multiples of `resolution`.
#[must_use]
pub fn snap_point(point: &Point3, resolution: f64) -> Point3 {
    Point3::new(
        snap_ordinate(point.x, resolution),
        snap_ordinate(point.y, resolution),
        snap_ordinate(point.z, resolution),
    )
}

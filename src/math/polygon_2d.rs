use super::Point3;

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A closing vertex
/// equal to the first one is allowed and contributes nothing.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    // offset to keep precision for large coordinates
    let x0 = points[0].x;
    let y0 = points[0].y;
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (points[i].x - x0, points[i].y - y0);
        let (xj, yj) = (points[j].x - x0, points[j].y - y0);
        sum += xi * yj - xj * yi;
    }
    sum * 0.5
}

/// Computes the winding number of `point` with respect to the closed polygon
/// `ring` in the XY plane.
///
/// Counter-clockwise rings wind `+1` around interior points, clockwise rings
/// `-1`. Points on the boundary give an unspecified result; callers test
/// the boundary distance first.
#[must_use]
pub fn winding_number_xy(point: &Point3, ring: &[Point3]) -> i32 {
    let n = ring.len();
    let mut winding = 0i32;
    for i in 0..n {
        let p0 = &ring[i];
        let p1 = &ring[(i + 1) % n];

        if p0.y <= point.y {
            if p1.y > point.y
                && cross_2d(p1.x - p0.x, p1.y - p0.y, point.x - p0.x, point.y - p0.y) > 0.0
            {
                winding += 1;
            }
        } else if p1.y <= point.y
            && cross_2d(p1.x - p0.x, p1.y - p0.y, point.x - p0.x, point.y - p0.y) < 0.0
        {
            winding -= 1;
        }
    }
    winding
}

/// 2D cross product: `(ax * by - ay * bx)`.
#[inline]
#[must_use]
pub fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

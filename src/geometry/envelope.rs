use crate::math::Point3;

/// Axis-aligned bounding box in 3D.
///
/// An empty envelope has inverted bounds (`min > max`) and intersects
/// nothing. Z bounds are tracked but all `*_xy` tests ignore them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min: Point3,
    pub max: Point3,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

impl Envelope {
    /// Creates an envelope from two corner points (in any order).
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        let mut env = Self::empty();
        env.expand_to_include_point(&a);
        env.expand_to_include_point(&b);
        env
    }

    /// Creates an empty envelope.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Creates the envelope of a point sequence.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut env = Self::empty();
        for p in points {
            env.expand_to_include_point(p);
        }
        env
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Enlarges the envelope to include `point`. NaN Z values are skipped.
    pub fn expand_to_include_point(&mut self, point: &Point3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        if !point.z.is_nan() {
            self.min.z = self.min.z.min(point.z);
            self.max.z = self.max.z.max(point.z);
        }
    }

    /// Enlarges the envelope to include `other`.
    pub fn expand_to_include(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        self.expand_to_include_point(&other.min);
        self.expand_to_include_point(&other.max);
    }

    /// Returns the union of both envelopes.
    #[must_use]
    pub fn union(&self, other: &Envelope) -> Envelope {
        let mut result = *self;
        result.expand_to_include(other);
        result
    }

    /// Returns a copy grown by `distance` in every XY direction.
    #[must_use]
    pub fn expanded_by(&self, distance: f64) -> Envelope {
        if self.is_empty() {
            return *self;
        }
        Envelope {
            min: Point3::new(self.min.x - distance, self.min.y - distance, self.min.z),
            max: Point3::new(self.max.x + distance, self.max.y + distance, self.max.z),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    /// Largest absolute X or Y ordinate, the magnitude used for significance
    /// epsilons.
    #[must_use]
    pub fn max_abs_xy(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.min
            .x
            .abs()
            .max(self.max.x.abs())
            .max(self.min.y.abs())
            .max(self.max.y.abs())
    }

    /// Returns `true` if `point` lies inside the envelope grown by `tolerance`.
    #[must_use]
    pub fn contains_point_xy(&self, point: &Point3, tolerance: f64) -> bool {
        !self.is_empty()
            && point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }

    /// Returns `true` if `other` lies completely inside the envelope grown by `tolerance`.
    #[must_use]
    pub fn contains_xy(&self, other: &Envelope, tolerance: f64) -> bool {
        !other.is_empty()
            && self.contains_point_xy(&other.min, tolerance)
            && self.contains_point_xy(&other.max, tolerance)
    }

    /// Returns `true` if the envelopes overlap or are closer than `tolerance` in XY.
    #[must_use]
    pub fn intersects_xy(&self, other: &Envelope, tolerance: f64) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
    }

    /// Returns `true` if the envelopes are separated by more than `tolerance` in XY.
    #[must_use]
    pub fn is_disjoint_xy(&self, other: &Envelope, tolerance: f64) -> bool {
        !self.intersects_xy(other, tolerance)
    }

    /// Returns `true` if the envelopes are separated by more than `tolerance`
    /// in X, Y or Z.
    #[must_use]
    pub fn is_disjoint_3d(&self, other: &Envelope, tolerance: f64) -> bool {
        if self.is_disjoint_xy(other, tolerance) {
            return true;
        }
        let has_z = self.min.z <= self.max.z && other.min.z <= other.max.z;
        has_z && (self.min.z > other.max.z + tolerance || other.min.z > self.max.z + tolerance)
    }

    /// Returns `true` if all XY bounds agree within `tolerance`.
    #[must_use]
    pub fn equals_xy(&self, other: &Envelope, tolerance: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        (self.min.x - other.min.x).abs() <= tolerance
            && (self.min.y - other.min.y).abs() <= tolerance
            && (self.max.x - other.max.x).abs() <= tolerance
            && (self.max.y - other.max.y).abs() <= tolerance
    }

    /// Returns the XY center of the envelope (Z is the center of the Z range).
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn env(x0: f64, y0: f64, x1: f64, y1: f64) -> Envelope {
        Envelope::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0))
    }

    #[test]
    fn empty_envelope_intersects_nothing() {
        let empty = Envelope::empty();
        assert!(empty.is_empty());
        assert!(!empty.intersects_xy(&env(0.0, 0.0, 1.0, 1.0), 10.0));
        assert!(!empty.contains_point_xy(&Point3::origin(), 1.0));
    }

    #[test]
    fn expand_and_union() {
        let mut e = env(0.0, 0.0, 1.0, 1.0);
        e.expand_to_include_point(&Point3::new(3.0, -1.0, 5.0));
        assert!((e.width() - 3.0).abs() < 1e-12);
        assert!((e.height() - 2.0).abs() < 1e-12);
        assert!((e.max.z - 5.0).abs() < 1e-12);

        let u = env(0.0, 0.0, 1.0, 1.0).union(&env(4.0, 4.0, 5.0, 5.0));
        assert!(u.equals_xy(&env(0.0, 0.0, 5.0, 5.0), 0.0));
    }

    #[test]
    fn disjointness_respects_tolerance() {
        let a = env(0.0, 0.0, 1.0, 1.0);
        let b = env(1.05, 0.0, 2.0, 1.0);
        assert!(a.is_disjoint_xy(&b, 0.01));
        assert!(a.intersects_xy(&b, 0.1));
    }

    #[test]
    fn containment_and_expansion() {
        let a = env(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_xy(&env(1.0, 1.0, 2.0, 2.0), 0.0));
        assert!(!a.contains_xy(&env(9.0, 9.0, 10.5, 10.0), 0.0));
        assert!(a.expanded_by(1.0).contains_xy(&env(9.0, 9.0, 10.5, 10.0), 0.0));
        assert!((a.max_abs_xy() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_in_z() {
        let a = Envelope::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Envelope::new(Point3::new(0.0, 0.0, 5.0), Point3::new(1.0, 1.0, 6.0));
        assert!(!a.is_disjoint_xy(&b, 0.0));
        assert!(a.is_disjoint_3d(&b, 0.1));
    }
}

pub mod epsilon;
pub mod polygon_2d;

/// 3D point type. 2D input carries `z = 0`.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Numerical zero used for degeneracy checks (zero-length vectors, parallel
/// directions). Never a substitute for the caller's tolerance.
pub const TOLERANCE: f64 = 1e-10;

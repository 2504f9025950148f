pub mod error;
pub mod geometry;
pub mod index;
pub mod intersection;
pub mod math;
pub mod operations;
pub mod overlay;
pub mod relation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{GeotopoError, Result};
pub use geometry::{Envelope, Linestring, MultiLinestring, Plane3D, RingGroup, Segment};
pub use operations::{
    CutPlanar, CutResult, CutXY, Difference, IntersectRings3D, Intersection,
    RemoveLinearSelfIntersections, RingPlaneIntersection, RingPlaneTopology, Union,
};
pub use relation::{Containment, TouchOptions, TouchRelation};

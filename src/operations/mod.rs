//! Topological operators on rings and polygons.

pub mod boolean;
pub mod cut;
pub mod ring_plane;
pub mod self_intersection;

pub use boolean::{Difference, Intersection, Union};
pub use cut::{CutPlanar, CutResult, CutXY};
pub use ring_plane::{
    IntersectRings3D, IntersectionPath3D, RingPlaneIntersection, RingPlaneTopology,
};
pub use self_intersection::RemoveLinearSelfIntersections;

//! Segment intersection classification and intersection points between
//! boundaries.

pub mod classify;
pub mod points;

pub use classify::{
    classify_segments, find_segment_intersections, LinearOverlap, SegmentIntersection,
    SegmentRelation,
};
pub use points::{
    intersection_points_xy, IntersectionKind, IntersectionPoint, IntersectionPointOptions,
    VirtualVertex,
};

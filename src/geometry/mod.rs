pub mod envelope;
pub mod format;
pub mod linestring;
pub mod multi_linestring;
pub mod plane;
pub mod point;
pub mod projection;
pub mod ring_group;
pub mod segment;

pub use envelope::Envelope;
pub use format::FormatRounded;
pub use linestring::Linestring;
pub use multi_linestring::MultiLinestring;
pub use plane::Plane3D;
pub use projection::Projection;
pub use ring_group::RingGroup;
pub use segment::Segment;

use thiserror::Error;

/// Top-level error type for the geotopo engine.
#[derive(Debug, Error)]
pub enum GeotopoError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to the shape of the input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("linestring is not closed")]
    NotClosed,

    #[error("expected at least {expected} points, got {actual}")]
    TooFewPoints { expected: usize, actual: usize },

    #[error("ring is not planar: vertex deviates {distance} from its plane")]
    NotPlanar { distance: f64 },
}

/// Errors related to part and segment addressing inside containers.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("part index {index} is out of range (part count {count})")]
    PartIndexOutOfRange { index: usize, count: usize },

    #[error("vertex index {index} is out of range (point count {count})")]
    VertexIndexOutOfRange { index: usize, count: usize },

    #[error("segment index {index} is out of range (segment count {count})")]
    SegmentIndexOutOfRange { index: usize, count: usize },

    #[error("invalid ring group: {0}")]
    InvalidRingGroup(String),
}

/// Errors raised by topological operators.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`GeotopoError`].
pub type Result<T> = std::result::Result<T, GeotopoError>;

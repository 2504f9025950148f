//! Spatial indexes over segment envelopes.
//!
//! An index only ever narrows the set of segments that have to be examined
//! by exact segment math. It never drops a segment whose tolerance-expanded
//! envelope intersects the query box.

mod box_tree;
mod grid;

pub use box_tree::{BoxTree, NodeId};
pub use grid::SegmentGrid;

use crate::geometry::Envelope;

/// Default number of segments below which containers scan linearly.
pub const DEFAULT_INDEX_THRESHOLD: usize = 200;

/// Query capability shared by the index backends.
pub trait SegmentIndex {
    /// Returns the indices of all segments whose envelope, grown by
    /// `tolerance`, intersects `query`. The sequence is lazy and finite and
    /// may contain false positives but never misses a match.
    fn search<'a>(
        &'a self,
        query: &Envelope,
        tolerance: f64,
    ) -> Box<dyn Iterator<Item = usize> + 'a>;

    /// Number of indexed segments.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backend selection for the cached container index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Hierarchical bounding-box tree with at most `max_entries` segments per leaf.
    BoxTree { max_entries: usize },
    /// Uniform grid with `cells_per_axis` cells along X and along Y.
    Grid { cells_per_axis: usize },
}

impl Default for IndexKind {
    fn default() -> Self {
        IndexKind::BoxTree { max_entries: 8 }
    }
}

/// Index configuration carried by a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    pub kind: IndexKind,
    /// Containers with fewer segments scan linearly and never build an index.
    pub threshold: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            kind: IndexKind::default(),
            threshold: DEFAULT_INDEX_THRESHOLD,
        }
    }
}

/// A built index of either backend.
#[derive(Debug, Clone)]
pub enum SpatialIndex {
    BoxTree(BoxTree),
    Grid(SegmentGrid),
}

impl SpatialIndex {
    /// Builds an index of the requested kind over the given segment envelopes.
    #[must_use]
    pub fn build(kind: IndexKind, envelopes: Vec<Envelope>) -> Self {
        match kind {
            IndexKind::BoxTree { max_entries } => {
                SpatialIndex::BoxTree(BoxTree::build(envelopes, max_entries))
            }
            IndexKind::Grid { cells_per_axis } => {
                SpatialIndex::Grid(SegmentGrid::build(envelopes, cells_per_axis))
            }
        }
    }
}

impl SegmentIndex for SpatialIndex {
    fn search<'a>(
        &'a self,
        query: &Envelope,
        tolerance: f64,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        match self {
            SpatialIndex::BoxTree(tree) => tree.search(query, tolerance),
            SpatialIndex::Grid(grid) => grid.search(query, tolerance),
        }
    }

    fn len(&self) -> usize {
        match self {
            SpatialIndex::BoxTree(tree) => tree.len(),
            SpatialIndex::Grid(grid) => grid.len(),
        }
    }
}

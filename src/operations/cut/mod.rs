//! Cutting polygons with lines.

mod cut_planar;
mod cut_xy;

pub use cut_planar::CutPlanar;
pub use cut_xy::CutXY;

use crate::geometry::{MultiLinestring, RingGroup};

/// Pieces of a cut polygon, split by the side of the cut line they lie on.
///
/// A piece is on the right if the first cut edge on its boundary runs in the
/// direction of the cut line, and on the left if it runs against it.
#[derive(Debug, Clone)]
pub struct CutResult<T = RingGroup> {
    pub left: Vec<T>,
    pub right: Vec<T>,
    /// Pieces no cut line runs along, holding a closed cut ring as a hole.
    pub undefined: Vec<T>,
    /// Parts of the polygon the cut lines do not touch.
    pub uncut: Vec<T>,
    /// Areas enclosed by closed cut rings lying inside the polygon without
    /// touching its boundary.
    pub clip: Vec<T>,
}

impl<T> CutResult<T> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            undefined: Vec::new(),
            uncut: Vec::new(),
            clip: Vec::new(),
        }
    }

    /// Returns `true` if the polygon was not split.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
            && self.right.is_empty()
            && self.undefined.is_empty()
            && self.uncut.is_empty()
            && self.clip.is_empty()
    }

    /// Total number of pieces, uncut parts included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len() + self.undefined.len() + self.uncut.len() + self.clip.len()
    }

    /// All pieces: left, right, undefined, uncut and then clipped ones.
    pub fn pieces(&self) -> impl Iterator<Item = &T> + '_ {
        self.left
            .iter()
            .chain(&self.right)
            .chain(&self.undefined)
            .chain(&self.uncut)
            .chain(&self.clip)
    }

    pub(crate) fn map<U>(self, mut f: impl FnMut(T) -> U) -> CutResult<U> {
        CutResult {
            left: self.left.into_iter().map(&mut f).collect(),
            right: self.right.into_iter().map(&mut f).collect(),
            undefined: self.undefined.into_iter().map(&mut f).collect(),
            uncut: self.uncut.into_iter().map(&mut f).collect(),
            clip: self.clip.into_iter().map(&mut f).collect(),
        }
    }

    /// Exchanges the two sides.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
            ..self
        }
    }
}

impl CutResult<RingGroup> {
    /// Flattens the pieces into polygons.
    ///
    /// Left, right and undefined pieces come first, largest area first. With
    /// `multipart`, all pieces of one kind form a single polygon. The uncut
    /// parts are added to the largest polygon and the clipped areas follow
    /// at the end.
    #[must_use]
    pub fn into_polygons(self, multipart: bool) -> Vec<MultiLinestring> {
        let mut result = Vec::new();
        for pieces in [self.left, self.right, self.undefined] {
            push_pieces(&mut result, pieces, multipart);
        }
        result.sort_by(|a, b| b.area_xy().total_cmp(&a.area_xy()));

        if let Some(largest) = result.first_mut() {
            for ring in self.uncut.into_iter().flat_map(|group| group.into_rings().into_parts()) {
                largest.add_linestring(ring);
            }
        }
        push_pieces(&mut result, self.clip, multipart);
        result
    }
}

fn push_pieces(result: &mut Vec<MultiLinestring>, pieces: Vec<RingGroup>, multipart: bool) {
    if pieces.is_empty() {
        return;
    }
    if multipart {
        let rings = pieces
            .into_iter()
            .flat_map(|group| group.into_rings().into_parts())
            .collect();
        result.push(MultiLinestring::new(rings));
    } else {
        result.extend(pieces.into_iter().map(RingGroup::into_rings));
    }
}

impl<T> Default for CutResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

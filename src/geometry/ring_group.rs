use crate::error::{GeometryError, Result, TopologyError};

use super::envelope::Envelope;
use super::linestring::Linestring;
use super::multi_linestring::MultiLinestring;

/// One polygon: a clockwise exterior ring and any number of
/// counter-clockwise interior rings (holes).
///
/// The rings are stored as a [`MultiLinestring`] with the exterior ring as
/// part 0, so ring-level operators and the spatial index see one container.
/// Orientation is validated on construction and on every appended hole.
#[derive(Debug, Clone)]
pub struct RingGroup {
    rings: MultiLinestring,
}

impl RingGroup {
    /// Creates a ring group without holes.
    ///
    /// # Errors
    ///
    /// Fails if the exterior ring is not closed, has fewer than four points
    /// or is not clockwise.
    pub fn new(exterior: Linestring) -> Result<Self> {
        validate_ring(&exterior, true)?;
        Ok(Self {
            rings: MultiLinestring::new(vec![exterior]),
        })
    }

    /// Creates a ring group with holes.
    ///
    /// # Errors
    ///
    /// Fails if any ring is invalid or wrongly oriented.
    pub fn with_interior_rings(exterior: Linestring, interiors: Vec<Linestring>) -> Result<Self> {
        validate_ring(&exterior, true)?;
        for ring in &interiors {
            validate_ring(ring, false)?;
        }
        let mut rings = Vec::with_capacity(interiors.len() + 1);
        rings.push(exterior);
        rings.extend(interiors);
        Ok(Self {
            rings: MultiLinestring::new(rings),
        })
    }

    /// Appends a hole.
    ///
    /// # Errors
    ///
    /// Fails if the ring is not closed or not counter-clockwise.
    pub fn add_interior_ring(&mut self, ring: Linestring) -> Result<()> {
        validate_ring(&ring, false)?;
        self.rings.add_linestring(ring);
        Ok(())
    }

    /// Removes and returns the hole at `index` (0-based among the holes).
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::PartIndexOutOfRange` for an invalid index.
    pub fn remove_interior_ring(&mut self, index: usize) -> Result<Linestring> {
        if index >= self.interior_ring_count() {
            return Err(TopologyError::PartIndexOutOfRange {
                index,
                count: self.interior_ring_count(),
            }
            .into());
        }
        self.rings.remove_linestring(index + 1)
    }

    #[must_use]
    pub fn exterior_ring(&self) -> &Linestring {
        &self.rings.parts()[0]
    }

    #[must_use]
    pub fn interior_rings(&self) -> &[Linestring] {
        &self.rings.parts()[1..]
    }

    #[must_use]
    pub fn interior_ring_count(&self) -> usize {
        self.rings.part_count() - 1
    }

    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.rings.part_count()
    }

    /// All rings, exterior first.
    #[must_use]
    pub fn rings(&self) -> &MultiLinestring {
        &self.rings
    }

    #[must_use]
    pub fn into_rings(self) -> MultiLinestring {
        self.rings
    }

    /// Exterior area minus hole areas.
    #[must_use]
    pub fn area_xy(&self) -> f64 {
        self.rings.area_xy()
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        self.rings.envelope()
    }

    /// Snaps all rings to a multiple of `resolution`.
    pub fn snap_to_resolution(&mut self, resolution: f64) {
        self.rings.snap_to_resolution(resolution);
    }
}

impl AsRef<MultiLinestring> for RingGroup {
    fn as_ref(&self) -> &MultiLinestring {
        &self.rings
    }
}

impl From<RingGroup> for MultiLinestring {
    fn from(group: RingGroup) -> Self {
        group.rings
    }
}

fn validate_ring(ring: &Linestring, exterior: bool) -> Result<()> {
    if ring.point_count() < 4 {
        return Err(GeometryError::TooFewPoints {
            expected: 4,
            actual: ring.point_count(),
        }
        .into());
    }
    if !ring.is_closed() {
        return Err(GeometryError::NotClosed.into());
    }
    match (ring.is_clockwise(), exterior) {
        (Some(true), true) | (Some(false), false) => Ok(()),
        (None, _) => Err(GeometryError::Degenerate("ring has no area".into()).into()),
        (Some(_), true) => Err(TopologyError::InvalidRingGroup(
            "exterior ring must be clockwise".into(),
        )
        .into()),
        (Some(_), false) => Err(TopologyError::InvalidRingGroup(
            "interior ring must be counter-clockwise".into(),
        )
        .into()),
    }
}

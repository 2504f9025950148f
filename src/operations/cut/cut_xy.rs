use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{Linestring, MultiLinestring, RingGroup};
use crate::overlay::{
    assemble_tagged_ring_groups, trace_rings, DirectedEdge, FragmentClass, NodeId, Operand,
    Overlay, TaggedRingGroup,
};
use crate::relation::are_bounds_disjoint;

use super::CutResult;

/// Cuts a polygon with lines in the XY plane.
///
/// The polygon's rings must be closed with the interior on their right
/// (clockwise exteriors, counter-clockwise holes). Cut line stretches
/// outside the polygon, along its boundary or ending inside it without
/// reaching another cut or boundary edge do not take part in the cut.
///
/// Cut lines forming closed rings inside the polygon without touching its
/// boundary clip the enclosed area out. The enclosed areas are returned as
/// [`CutResult::clip`] and the polygon part holding them as a hole is
/// [`CutResult::undefined`] unless another cut line gives it a side. Polygon
/// parts no cut line reaches are returned as [`CutResult::uncut`].
pub struct CutXY<'a> {
    polygon: &'a MultiLinestring,
    cut_lines: &'a MultiLinestring,
    tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeRole {
    Boundary,
    CutForward,
    CutReversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaceKind {
    Side(Side),
    /// Bounded by polygon rings only.
    Uncut,
    /// Enclosed by cut lines not connected to the polygon boundary.
    Clip,
}

impl<'a> CutXY<'a> {
    /// Creates a new `CutXY` operation.
    #[must_use]
    pub fn new(
        polygon: &'a impl AsRef<MultiLinestring>,
        cut_lines: &'a impl AsRef<MultiLinestring>,
        tolerance: f64,
    ) -> Self {
        Self {
            polygon: polygon.as_ref(),
            cut_lines: cut_lines.as_ref(),
            tolerance,
        }
    }

    /// Executes the cut.
    ///
    /// Returns an empty [`CutResult`] unless the cut lines give pieces on
    /// both sides, clip an area out of the polygon, or leave several pieces
    /// of undefined side.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the polygon has open or
    /// counter-clockwise rings, or an error if the pieces cannot be traced.
    #[instrument(skip_all, fields(cut_parts = self.cut_lines.part_count(), tolerance = self.tolerance))]
    pub fn execute(&self) -> Result<CutResult> {
        self.validate()?;
        let tolerance = self.tolerance;

        // Step 1: early-outs
        if self.cut_lines.is_empty()
            || are_bounds_disjoint(self.polygon.envelope(), self.cut_lines.envelope(), tolerance)
        {
            return Ok(CutResult::empty());
        }

        // Step 2: split polygon and cut lines at their common nodes
        let overlay = Overlay::with_self_noded_b(self.polygon, self.cut_lines, tolerance);

        // Step 3: keep the cut fragments running through the interior
        let mut seen = HashSet::new();
        let mut cuts: Vec<(usize, NodeId, NodeId)> = Vec::new();
        for i in overlay.fragments_of(Operand::B) {
            let fragment = &overlay.fragments()[i];
            if overlay.classify(i) == FragmentClass::Inside && seen.insert(fragment.key()) {
                cuts.push((i, fragment.from, fragment.to));
            }
        }
        let boundary: Vec<usize> = overlay.fragments_of(Operand::A).collect();

        // Step 4: drop dangling cut edges
        let cuts = prune_dangling(&overlay, &boundary, cuts);
        debug!(
            boundary = boundary.len(),
            cuts = cuts.len(),
            "selected cut fragments"
        );
        if cuts.is_empty() {
            return Ok(CutResult::empty());
        }
        let boundary_nodes: HashSet<NodeId> = boundary
            .iter()
            .flat_map(|&i| {
                let fragment = &overlay.fragments()[i];
                [fragment.from, fragment.to]
            })
            .collect();
        let free = free_cuts(&boundary_nodes, &cuts);

        let mut edges = Vec::with_capacity(boundary.len() + 2 * cuts.len());
        let mut roles = Vec::with_capacity(edges.capacity());
        for &i in &boundary {
            let fragment = &overlay.fragments()[i];
            edges.push(DirectedEdge {
                from: fragment.from,
                to: fragment.to,
                tag: i,
            });
            roles.push((EdgeRole::Boundary, false));
        }
        for (&(i, from, to), &is_free) in cuts.iter().zip(&free) {
            edges.push(DirectedEdge { from, to, tag: i });
            roles.push((EdgeRole::CutForward, is_free));
            edges.push(DirectedEdge {
                from: to,
                to: from,
                tag: i,
            });
            roles.push((EdgeRole::CutReversed, is_free));
        }

        // Step 5: trace faces, keeping each one's kind with its ring
        let mut faces = Vec::new();
        for traced in trace_rings(overlay.nodes(), &edges)? {
            let kind = face_kind(traced.edges.iter().map(|&e| roles[e]));
            faces.push((traced.to_linestring(overlay.nodes(), &edges), kind));
        }

        let mut result = CutResult::empty();
        for TaggedRingGroup {
            group,
            tag,
            hole_tags,
        } in assemble_tagged_ring_groups(faces, tolerance)?
        {
            match tag {
                FaceKind::Side(Side::Left) => result.left.push(group),
                FaceKind::Side(Side::Right) => result.right.push(group),
                FaceKind::Clip => result.clip.push(group),
                FaceKind::Uncut if hole_tags.contains(&FaceKind::Clip) => {
                    result.undefined.push(group);
                }
                FaceKind::Uncut => result.uncut.push(group),
            }
        }
        debug!(
            left = result.left.len(),
            right = result.right.len(),
            undefined = result.undefined.len(),
            uncut = result.uncut.len(),
            clip = result.clip.len(),
            "traced pieces"
        );

        let split = (!result.left.is_empty() && !result.right.is_empty())
            || result.undefined.len() > 1
            || !result.clip.is_empty();
        if !split {
            debug!("cut lines do not split the polygon");
            return Ok(CutResult::empty());
        }
        Ok(result)
    }

    fn validate(&self) -> Result<()> {
        if !self.polygon.parts().iter().all(Linestring::is_closed) {
            return Err(OperationError::InvalidInput(
                "polygon to cut must consist of closed rings".into(),
            )
            .into());
        }
        if self.polygon.area_xy() <= 0.0 {
            return Err(OperationError::InvalidInput(
                "polygon to cut must have a clockwise exterior ring".into(),
            )
            .into());
        }
        Ok(())
    }
}

/// Removes cut edges ending at a node no other edge reaches, until none is
/// left. Boundary fragments form closed rings and are never dangling.
fn prune_dangling(
    overlay: &Overlay<'_>,
    boundary: &[usize],
    mut cuts: Vec<(usize, NodeId, NodeId)>,
) -> Vec<(usize, NodeId, NodeId)> {
    let mut degree = vec![0_usize; overlay.nodes().len()];
    for &i in boundary {
        let fragment = &overlay.fragments()[i];
        degree[fragment.from] += 1;
        degree[fragment.to] += 1;
    }
    for &(_, from, to) in &cuts {
        degree[from] += 1;
        degree[to] += 1;
    }

    loop {
        let before = cuts.len();
        cuts.retain(|&(i, from, to)| {
            if degree[from] > 1 && degree[to] > 1 {
                return true;
            }
            trace!(fragment = i, "dropped dangling cut edge");
            degree[from] -= 1;
            degree[to] -= 1;
            false
        });
        if cuts.len() == before {
            return cuts;
        }
    }
}

/// Marks the cut edges whose connected component shares no node with the
/// polygon boundary.
fn free_cuts(boundary_nodes: &HashSet<NodeId>, cuts: &[(usize, NodeId, NodeId)]) -> Vec<bool> {
    let mut incident: HashMap<NodeId, Vec<usize>> = HashMap::new();
    for (c, &(_, from, to)) in cuts.iter().enumerate() {
        incident.entry(from).or_default().push(c);
        incident.entry(to).or_default().push(c);
    }

    let mut free: Vec<Option<bool>> = vec![None; cuts.len()];
    for start in 0..cuts.len() {
        if free[start].is_some() {
            continue;
        }
        let mut component = vec![start];
        let mut stack = vec![start];
        let mut touches = false;
        free[start] = Some(false);
        while let Some(c) = stack.pop() {
            let (_, from, to) = cuts[c];
            for node in [from, to] {
                touches |= boundary_nodes.contains(&node);
                for &next in incident.get(&node).into_iter().flatten() {
                    if free[next].is_none() {
                        free[next] = Some(false);
                        component.push(next);
                        stack.push(next);
                    }
                }
            }
        }
        for c in component {
            free[c] = Some(!touches);
        }
    }
    free.into_iter().map(|f| f.unwrap_or(false)).collect()
}

/// Kind of a traced face, from the first cut edge on its boundary. Faces
/// are on the right of their edges.
fn face_kind(edges: impl Iterator<Item = (EdgeRole, bool)>) -> FaceKind {
    for (role, free) in edges {
        match role {
            EdgeRole::Boundary => {}
            _ if free => return FaceKind::Clip,
            EdgeRole::CutForward => return FaceKind::Side(Side::Right),
            EdgeRole::CutReversed => return FaceKind::Side(Side::Left),
        }
    }
    FaceKind::Uncut
}

/// Convenience for callers holding a single ring group.
impl RingGroup {
    /// Cuts this polygon with `cut_lines` in the XY plane.
    ///
    /// # Errors
    ///
    /// See [`CutXY::execute`].
    pub fn cut_xy(&self, cut_lines: &MultiLinestring, tolerance: f64) -> Result<CutResult> {
        CutXY::new(self, cut_lines, tolerance).execute()
    }
}

//! Planar overlay of two boundaries.
//!
//! Both inputs are split at every vertex and intersection point into
//! fragments between shared nodes. Each fragment is then classified against
//! the other input, and operators select and re-trace the fragments they
//! need.

mod fragments;
mod nodes;
mod trace;

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::geometry::{MultiLinestring, Segment};
use crate::intersection::{intersection_points_xy, IntersectionPointOptions};
use crate::relation::containment::{area_contains_point_xy, Containment};

pub use fragments::{Fragment, Operand};
pub use nodes::{NodeId, NodeSet};
pub use trace::{
    assemble_ring_groups, assemble_tagged_ring_groups, trace_rings, DirectedEdge, TaggedRingGroup,
    TracedRing,
};

/// Position of a fragment relative to the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentClass {
    Inside,
    Outside,
    /// Shares its node pair with a fragment of the other operand running
    /// the same way.
    CoincidentSame,
    /// Shares its node pair with a fragment of the other operand running
    /// the opposite way.
    CoincidentOpposite,
}

/// Two boundaries split into fragments at their common nodes.
#[derive(Debug)]
pub struct Overlay<'a> {
    a: &'a MultiLinestring,
    b: &'a MultiLinestring,
    tolerance: f64,
    nodes: NodeSet,
    fragments: Vec<Fragment>,
    by_key: HashMap<(NodeId, NodeId), Vec<usize>>,
}

impl<'a> Overlay<'a> {
    /// Planarizes `a` against `b`.
    #[instrument(skip_all, fields(a_parts = a.part_count(), b_parts = b.part_count()))]
    #[must_use]
    pub fn new(a: &'a MultiLinestring, b: &'a MultiLinestring, tolerance: f64) -> Self {
        Self::build(a, Some(b), tolerance, false)
    }

    /// Like [`Overlay::new`], but also splits `b` where it crosses itself.
    #[instrument(skip_all, fields(a_parts = a.part_count(), b_parts = b.part_count()))]
    #[must_use]
    pub fn with_self_noded_b(a: &'a MultiLinestring, b: &'a MultiLinestring, tolerance: f64) -> Self {
        Self::build(a, Some(b), tolerance, true)
    }

    /// Planarizes `lines` against itself. All fragments belong to
    /// [`Operand::A`].
    #[instrument(skip_all, fields(parts = lines.part_count()))]
    #[must_use]
    pub fn single(lines: &'a MultiLinestring, tolerance: f64) -> Self {
        Self::build(lines, None, tolerance, false)
    }

    fn build(
        a: &'a MultiLinestring,
        b: Option<&'a MultiLinestring>,
        tolerance: f64,
        node_b: bool,
    ) -> Self {
        let other = b.unwrap_or(a);
        let extent = a.envelope().max_abs_xy().max(other.envelope().max_abs_xy());
        let mut nodes = NodeSet::new(tolerance, extent);

        for p in a.points() {
            nodes.insert(*p);
        }
        let options = IntersectionPointOptions {
            include_linear_intermediate: true,
        };
        for hit in intersection_points_xy(a, other, tolerance, options) {
            nodes.insert(hit.point);
        }
        if let Some(b) = b {
            if node_b {
                for hit in intersection_points_xy(b, b, tolerance, options) {
                    nodes.insert(hit.point);
                }
            }
            for p in b.points() {
                nodes.insert(*p);
            }
        }

        let index = nodes.build_index();
        let mut fragments = fragments::split_at_nodes(a, Operand::A, &nodes, &index, tolerance);
        if let Some(b) = b {
            fragments.extend(fragments::split_at_nodes(
                b,
                Operand::B,
                &nodes,
                &index,
                tolerance,
            ));
        }

        let mut by_key: HashMap<(NodeId, NodeId), Vec<usize>> = HashMap::new();
        for (i, fragment) in fragments.iter().enumerate() {
            by_key.entry(fragment.key()).or_default().push(i);
        }
        debug!(
            nodes = nodes.len(),
            fragments = fragments.len(),
            "planarized"
        );

        Self {
            a,
            b: other,
            tolerance,
            nodes,
            fragments,
            by_key,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Indices of the fragments of one operand.
    pub fn fragments_of(&self, operand: Operand) -> impl Iterator<Item = usize> + '_ {
        self.fragments
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.operand == operand)
            .map(|(i, _)| i)
    }

    /// Straight segment between the two nodes of a fragment.
    #[must_use]
    pub fn fragment_segment(&self, index: usize) -> Segment {
        let f = &self.fragments[index];
        Segment::new(*self.nodes.point(f.from), *self.nodes.point(f.to))
    }

    /// Other fragments connecting the same two nodes, in either direction.
    pub fn coincident(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.by_key
            .get(&self.fragments[index].key())
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&j| j != index)
    }

    /// Classifies a fragment against the area bounded by the other operand.
    ///
    /// Coincidence with a fragment of the other operand takes precedence.
    /// Otherwise the fragment midpoint is tested; a midpoint within tolerance
    /// of the other boundary is retested without tolerance and counted as
    /// outside if it is still on the boundary.
    #[must_use]
    pub fn classify(&self, index: usize) -> FragmentClass {
        let fragment = &self.fragments[index];
        for j in self.coincident(index) {
            let other = &self.fragments[j];
            if other.operand != fragment.operand {
                return if other.from == fragment.from {
                    FragmentClass::CoincidentSame
                } else {
                    FragmentClass::CoincidentOpposite
                };
            }
        }

        let area = match fragment.operand {
            Operand::A => self.b,
            Operand::B => self.a,
        };
        let midpoint = self.fragment_segment(index).point_along(0.5);
        match area_contains_point_xy(area, &midpoint, self.tolerance) {
            Containment::Inside => FragmentClass::Inside,
            Containment::Outside => FragmentClass::Outside,
            Containment::OnBoundary => match area_contains_point_xy(area, &midpoint, 0.0) {
                Containment::Inside => FragmentClass::Inside,
                Containment::Outside => FragmentClass::Outside,
                Containment::OnBoundary => {
                    debug!(index, ?midpoint, "fragment midpoint on boundary, counted outside");
                    FragmentClass::Outside
                }
            },
        }
    }
}

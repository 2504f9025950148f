use std::f64::consts::TAU;

use tracing::{trace, warn};

use crate::error::{OperationError, Result};
use crate::geometry::{Linestring, RingGroup};
use crate::math::Point3;
use crate::relation::containment::{ring_contains_point_xy, Containment};

use super::nodes::{NodeId, NodeSet};

/// A directed edge between two nodes, with a caller-defined tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectedEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub tag: usize,
}

/// A closed walk over directed edges, as indices into the traced edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedRing {
    pub edges: Vec<usize>,
}

impl TracedRing {
    /// The ring's node locations, closed by repeating the first one.
    #[must_use]
    pub fn to_linestring(&self, nodes: &NodeSet, edges: &[DirectedEdge]) -> Linestring {
        let mut points: Vec<Point3> = self
            .edges
            .iter()
            .map(|&e| *nodes.point(edges[e].from))
            .collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        Linestring::new(points)
    }
}

/// Walks `edges` into closed rings.
///
/// At every node the walk takes the first unused outgoing edge counter-clockwise
/// from the reversed incoming edge, i.e. the sharpest right turn, so every
/// ring keeps the region on its right: bounded faces come out clockwise.
/// Reversing along the incoming edge is the last choice.
///
/// # Errors
///
/// Returns `OperationError::Failed` if a walk reaches a node without an
/// unused outgoing edge.
pub fn trace_rings(nodes: &NodeSet, edges: &[DirectedEdge]) -> Result<Vec<TracedRing>> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let angles: Vec<f64> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            outgoing[e.from].push(i);
            direction_angle(nodes.point(e.from), nodes.point(e.to))
        })
        .collect();

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut ring = vec![start];
        let mut current = start;

        while edges[current].to != edges[start].from {
            let node = edges[current].to;
            let back = angles[current] + std::f64::consts::PI;
            let next = outgoing[node]
                .iter()
                .copied()
                .filter(|&e| !used[e])
                .min_by(|&x, &y| turn(back, angles[x]).total_cmp(&turn(back, angles[y])));
            let Some(next) = next else {
                return Err(OperationError::Failed(format!(
                    "ring tracing stopped at node {node} without an outgoing edge"
                ))
                .into());
            };
            used[next] = true;
            ring.push(next);
            current = next;
        }

        trace!(edges = ring.len(), "traced ring");
        rings.push(TracedRing { edges: ring });
    }

    Ok(rings)
}

fn direction_angle(from: &Point3, to: &Point3) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Counter-clockwise angle from `back` to `angle` in `(0, TAU]`.
fn turn(back: f64, angle: f64) -> f64 {
    let delta = (angle - back).rem_euclid(TAU);
    if delta <= 1e-12 {
        TAU
    } else {
        delta
    }
}

/// Groups traced rings into ring groups.
///
/// Rings with positive area (clockwise) are exteriors and rings with negative
/// area are holes; rings with no area are dropped. Each hole goes to the
/// smallest exterior containing it. Holes without a containing exterior are
/// dropped with a warning. Groups come out in the order of their exterior
/// rings in `rings`.
///
/// # Errors
///
/// Propagates ring group validation errors.
pub fn assemble_ring_groups(rings: Vec<Linestring>, tolerance: f64) -> Result<Vec<RingGroup>> {
    let tagged = rings.into_iter().map(|ring| (ring, ())).collect();
    Ok(assemble_tagged_ring_groups(tagged, tolerance)?
        .into_iter()
        .map(|tagged| tagged.group)
        .collect())
}

/// A ring group with the tags its rings were traced with.
#[derive(Debug, Clone)]
pub struct TaggedRingGroup<T> {
    pub group: RingGroup,
    /// Tag of the exterior ring.
    pub tag: T,
    /// Tags of the interior rings, in the group's ring order.
    pub hole_tags: Vec<T>,
}

/// Like [`assemble_ring_groups`], but every ring travels with a tag that
/// ends up next to the ring in its group.
///
/// # Errors
///
/// Propagates ring group validation errors.
pub fn assemble_tagged_ring_groups<T>(
    rings: Vec<(Linestring, T)>,
    tolerance: f64,
) -> Result<Vec<TaggedRingGroup<T>>> {
    let min_area = tolerance * tolerance;
    let mut exteriors = Vec::new();
    let mut holes = Vec::new();
    for (ring, tag) in rings {
        let area = ring.area_xy();
        if area > min_area {
            exteriors.push((ring, tag));
        } else if area < -min_area {
            holes.push((ring, tag));
        } else {
            trace!(area, points = ring.point_count(), "dropped ring without area");
        }
    }

    let mut interiors: Vec<Vec<(Linestring, T)>> = exteriors.iter().map(|_| Vec::new()).collect();
    for (hole, tag) in holes {
        let owner = exteriors
            .iter()
            .enumerate()
            .filter(|(_, (ext, _))| {
                ext.envelope().contains_xy(hole.envelope(), tolerance)
                    && ring_inside_ring(ext, &hole, tolerance)
            })
            .min_by(|(_, (x, _)), (_, (y, _))| x.area_xy().total_cmp(&y.area_xy()))
            .map(|(i, _)| i);
        match owner {
            Some(i) => interiors[i].push((hole, tag)),
            None => warn!(
                area = hole.area_xy(),
                "hole without containing exterior ring dropped"
            ),
        }
    }

    exteriors
        .into_iter()
        .zip(interiors)
        .map(|((exterior, tag), holes)| -> Result<TaggedRingGroup<T>> {
            let (holes, hole_tags): (Vec<Linestring>, Vec<T>) = holes.into_iter().unzip();
            Ok(TaggedRingGroup {
                group: RingGroup::with_interior_rings(exterior, holes)?,
                tag,
                hole_tags,
            })
        })
        .collect()
}

/// Tests a vertex (or segment midpoint) of `inner` that is not on the
/// boundary of `outer`.
fn ring_inside_ring(outer: &Linestring, inner: &Linestring, tolerance: f64) -> bool {
    let candidates = inner
        .points()
        .iter()
        .copied()
        .chain(inner.segments().map(|s| s.point_along(0.5)));
    for point in candidates {
        match ring_contains_point_xy(outer, &point, tolerance) {
            Containment::Inside => return true,
            Containment::Outside => return false,
            Containment::OnBoundary => {}
        }
    }
    false
}

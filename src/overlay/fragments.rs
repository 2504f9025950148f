use crate::geometry::MultiLinestring;
use crate::index::{SegmentIndex, SpatialIndex};

use super::nodes::{NodeId, NodeSet};

/// Which input of an overlay a fragment comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    A,
    B,
}

/// A piece of an input segment between two consecutive nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub operand: Operand,
    pub part: usize,
    /// Global segment index in the operand.
    pub segment: usize,
    pub from: NodeId,
    pub to: NodeId,
}

impl Fragment {
    /// Direction-independent key of the node pair.
    #[must_use]
    pub fn key(&self) -> (NodeId, NodeId) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

/// Splits every segment of `lines` at the nodes lying on it, in order along
/// the segment. Pieces that collapse onto a single node are dropped.
pub(crate) fn split_at_nodes(
    lines: &MultiLinestring,
    operand: Operand,
    nodes: &NodeSet,
    index: &SpatialIndex,
    tolerance: f64,
) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(lines.segment_count());

    for (global, segment) in lines.segments().enumerate() {
        let part = lines.local_segment_index(global).map_or(0, |(part, _)| part);
        let (Some(start), Some(end)) = (nodes.find(&segment.start), nodes.find(&segment.end))
        else {
            continue;
        };

        let mut stops: Vec<(f64, NodeId)> = index
            .search(&segment.envelope(), tolerance)
            .filter(|&id| id != start && id != end)
            .filter_map(|id| {
                segment
                    .point_factor_within_xy(nodes.point(id), tolerance)
                    .filter(|f| *f > 0.0 && *f < 1.0)
                    .map(|f| (f, id))
            })
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let chain = std::iter::once(start)
            .chain(stops.into_iter().map(|(_, id)| id))
            .chain(std::iter::once(end));
        let mut previous: Option<NodeId> = None;
        for node in chain {
            if let Some(from) = previous {
                if from != node {
                    fragments.push(Fragment {
                        operand,
                        part,
                        segment: global,
                        from,
                        to: node,
                    });
                }
            }
            previous = Some(node);
        }
    }

    fragments
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Linestring;
    use crate::math::Point3;

    #[test]
    fn segments_split_in_order() {
        let line: MultiLinestring = Linestring::from_xy(&[[0.0, 0.0], [10.0, 0.0]]).into();
        let mut nodes = NodeSet::new(0.01, 10.0);
        let start = nodes.insert(Point3::new(0.0, 0.0, 0.0));
        let end = nodes.insert(Point3::new(10.0, 0.0, 0.0));
        let late = nodes.insert(Point3::new(7.0, 0.005, 0.0));
        let early = nodes.insert(Point3::new(3.0, 0.0, 0.0));
        nodes.insert(Point3::new(5.0, 2.0, 0.0));
        let index = nodes.build_index();

        let fragments = split_at_nodes(&line, Operand::A, &nodes, &index, 0.01);
        let pairs: Vec<(NodeId, NodeId)> = fragments.iter().map(|f| (f.from, f.to)).collect();
        assert_eq!(pairs, vec![(start, early), (early, late), (late, end)]);
        assert!(fragments.iter().all(|f| f.operand == Operand::A && f.part == 0));
    }

    #[test]
    fn collapsed_segments_are_dropped() {
        let line: MultiLinestring =
            Linestring::from_xy(&[[0.0, 0.0], [0.001, 0.0], [5.0, 0.0]]).into();
        let mut nodes = NodeSet::new(0.01, 10.0);
        for p in line.points() {
            nodes.insert(*p);
        }
        let index = nodes.build_index();
        let fragments = split_at_nodes(&line, Operand::B, &nodes, &index, 0.01);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].segment, 1);
        assert_eq!(fragments[0].key(), (0, 1));
    }
}

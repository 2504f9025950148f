use std::cmp::Ordering;

use slotmap::SlotMap;

use crate::geometry::Envelope;

use super::SegmentIndex;

slotmap::new_key_type! {
    /// Key of a node in a [`BoxTree`].
    pub struct NodeId;
}

#[derive(Debug, Clone)]
enum NodeContent {
    Leaf(Vec<usize>),
    Branch([NodeId; 2]),
}

#[derive(Debug, Clone)]
struct Node {
    envelope: Envelope,
    content: NodeContent,
}

/// Hierarchical bounding-box tree over segment envelopes.
///
/// Built top-down by splitting the entries at the median of their centers
/// along the longer axis of the node envelope, until a node holds at most
/// `max_entries` segments.
#[derive(Debug, Clone)]
pub struct BoxTree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
    envelopes: Vec<Envelope>,
}

impl BoxTree {
    /// Builds the tree. `max_entries` below 1 is treated as 1.
    #[must_use]
    pub fn build(envelopes: Vec<Envelope>, max_entries: usize) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = if envelopes.is_empty() {
            None
        } else {
            let entries: Vec<usize> = (0..envelopes.len()).collect();
            Some(build_node(&mut nodes, &envelopes, entries, max_entries.max(1)))
        };
        Self {
            nodes,
            root,
            envelopes,
        }
    }

    /// Depth of the tree (0 for an empty tree, 1 for a single leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of(tree: &BoxTree, id: NodeId) -> usize {
            match tree.nodes.get(id).map(|n| &n.content) {
                Some(NodeContent::Branch([a, b])) => 1 + depth_of(tree, *a).max(depth_of(tree, *b)),
                Some(NodeContent::Leaf(_)) => 1,
                None => 0,
            }
        }
        self.root.map_or(0, |root| depth_of(self, root))
    }

    /// Envelope of all indexed segments.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.root
            .and_then(|id| self.nodes.get(id))
            .map_or_else(Envelope::empty, |n| n.envelope)
    }
}

fn build_node(
    nodes: &mut SlotMap<NodeId, Node>,
    envelopes: &[Envelope],
    mut entries: Vec<usize>,
    max_entries: usize,
) -> NodeId {
    let mut envelope = Envelope::empty();
    for &i in &entries {
        envelope.expand_to_include(&envelopes[i]);
    }

    if entries.len() <= max_entries {
        return nodes.insert(Node {
            envelope,
            content: NodeContent::Leaf(entries),
        });
    }

    let axis = usize::from(envelope.height() > envelope.width());
    entries.sort_by(|&a, &b| {
        let ca = envelopes[a].center()[axis];
        let cb = envelopes[b].center()[axis];
        ca.partial_cmp(&cb).unwrap_or(Ordering::Equal)
    });
    let upper = entries.split_off(entries.len() / 2);

    let left = build_node(nodes, envelopes, entries, max_entries);
    let right = build_node(nodes, envelopes, upper, max_entries);
    nodes.insert(Node {
        envelope,
        content: NodeContent::Branch([left, right]),
    })
}

impl SegmentIndex for BoxTree {
    fn search<'a>(
        &'a self,
        query: &Envelope,
        tolerance: f64,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(BoxTreeSearch {
            tree: self,
            query: query.expanded_by(tolerance),
            stack: self.root.into_iter().collect(),
            pending: Vec::new(),
        })
    }

    fn len(&self) -> usize {
        self.envelopes.len()
    }
}

/// Lazy depth-first traversal of the nodes intersecting a query box.
struct BoxTreeSearch<'a> {
    tree: &'a BoxTree,
    query: Envelope,
    stack: Vec<NodeId>,
    pending: Vec<usize>,
}

impl Iterator for BoxTreeSearch<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some(entry) = self.pending.pop() {
                if self.tree.envelopes[entry].intersects_xy(&self.query, 0.0) {
                    return Some(entry);
                }
                continue;
            }

            let id = self.stack.pop()?;
            let Some(node) = self.tree.nodes.get(id) else {
                continue;
            };
            if !node.envelope.intersects_xy(&self.query, 0.0) {
                continue;
            }
            match &node.content {
                NodeContent::Leaf(entries) => self.pending.extend(entries.iter().rev()),
                NodeContent::Branch([left, right]) => {
                    self.stack.push(*right);
                    self.stack.push(*left);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn row(count: usize) -> Vec<Envelope> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64;
                Envelope::new(Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 0.0))
            })
            .collect()
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = BoxTree::build(Vec::new(), 4);
        assert_eq!(tree.depth(), 0);
        assert!(tree.is_empty());
        let query = Envelope::new(Point3::origin(), Point3::new(1.0, 1.0, 0.0));
        assert_eq!(tree.search(&query, 1.0).count(), 0);
    }

    #[test]
    fn tree_is_balanced() {
        let tree = BoxTree::build(row(64), 4);
        // 64 entries, 4 per leaf: 16 leaves, 4 branch levels
        assert_eq!(tree.depth(), 5);
        assert!((tree.envelope().width() - 64.0).abs() < 1e-12);
    }

    #[test]
    fn search_finds_neighbours_within_tolerance() {
        let tree = BoxTree::build(row(100), 3);
        let query = Envelope::new(Point3::new(10.2, 0.5, 0.0), Point3::new(10.4, 0.5, 0.0));
        let mut hits: Vec<usize> = tree.search(&query, 0.0).collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![10]);

        let mut hits: Vec<usize> = tree.search(&query, 1.0).collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![9, 10, 11]);
    }

    #[test]
    fn search_is_lazy() {
        let tree = BoxTree::build(row(1000), 8);
        let query = Envelope::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1000.0, 1.0, 0.0));
        let first_three: Vec<usize> = tree.search(&query, 0.0).take(3).collect();
        assert_eq!(first_three.len(), 3);
    }
}

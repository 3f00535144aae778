use super::node::{Entry, Node};
use super::rectangle::Rectangle;

/// Balanced R-tree over 2-D points with incremental insertion and
/// branch-and-bound nearest-neighbor search.
///
/// Points are inserted one at a time; a node that grows past `max_children`
/// entries is split and the split propagates toward the root, so the tree
/// stays balanced without a bulk-load pass. Search is exact by default; an
/// optional node-visit budget trades exactness for bounded latency.
#[derive(Debug, Clone)]
pub struct RTree {
    root: Option<Box<Node>>,
    max_children: usize,
    node_budget: Option<usize>,
}

impl RTree {
    /// Create an empty tree. `max_children` is the fan-out bound that
    /// triggers splits; smaller values split earlier and cost accuracy when a
    /// search budget is applied, larger values approach a flat scan.
    pub fn new(max_children: usize) -> Self {
        assert!(max_children >= 2, "max_children must be at least 2");
        RTree {
            root: None,
            max_children,
            node_budget: None,
        }
    }

    /// Cap the number of nodes a single search may examine. Without a budget
    /// the search is exact.
    pub fn with_node_budget(mut self, budget: usize) -> Self {
        self.node_budget = Some(budget);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn max_children(&self) -> usize {
        self.max_children
    }

    pub fn node_budget(&self) -> Option<usize> {
        self.node_budget
    }

    pub fn root_mbr(&self) -> Option<&Rectangle> {
        self.root.as_ref().map(|node| &node.mbr)
    }

    /// Number of levels in the tree (leaves sit one level above nothing, so
    /// a lone root leaf has height 1).
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |node| node.level + 1)
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |node| Self::count_points(node))
    }

    fn count_points(node: &Node) -> usize {
        node.entries
            .iter()
            .map(|entry| match entry {
                Entry::Node { node, .. } => Self::count_points(node),
                Entry::Data { .. } => 1,
            })
            .sum()
    }

    pub(crate) fn root_ref(&self) -> &Option<Box<Node>> {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Option<Box<Node>> {
        &mut self.root
    }
}

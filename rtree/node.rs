use super::rectangle::Rectangle;
use crate::points::GeoPoint;

/// R-tree node entry.
#[derive(Debug, Clone)]
pub enum Entry {
    /// Leaf entry: a stored point and its degenerate bounding rectangle
    Data { mbr: Rectangle, point: GeoPoint },
    /// Internal entry: an owned child node and its bounding rectangle
    Node { mbr: Rectangle, node: Box<Node> },
}

impl Entry {
    pub fn mbr(&self) -> &Rectangle {
        match self {
            Entry::Data { mbr, .. } => mbr,
            Entry::Node { mbr, .. } => mbr,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Entry::Data { .. })
    }

    pub fn point(&self) -> Option<&GeoPoint> {
        match self {
            Entry::Data { point, .. } => Some(point),
            Entry::Node { .. } => None,
        }
    }

    pub fn child(&self) -> Option<&Node> {
        match self {
            Entry::Data { .. } => None,
            Entry::Node { node, .. } => Some(node),
        }
    }
}

/// R-tree node. Leaves hold data entries at level 0; internal nodes hold
/// child entries one level above their children. Ownership flows strictly
/// root -> children; ancestors are reached by child-index paths, never
/// back-pointers.
#[derive(Debug, Clone)]
pub struct Node {
    /// Tight union of all entry rectangles
    pub mbr: Rectangle,
    pub entries: Vec<Entry>,
    pub is_leaf: bool,
    /// Level in the tree (leaves are level 0)
    pub level: usize,
}

impl Node {
    pub fn new_leaf() -> Self {
        Node::new(true, 0)
    }

    pub fn new(is_leaf: bool, level: usize) -> Self {
        Node {
            mbr: Rectangle::new(0.0, 0.0, 0.0, 0.0),
            entries: Vec::new(),
            is_leaf,
            level,
        }
    }

    /// Recompute the MBR as the tight union of the entry rectangles.
    pub fn update_mbr(&mut self) {
        let mut entries = self.entries.iter();
        let Some(first) = entries.next() else {
            self.mbr = Rectangle::new(0.0, 0.0, 0.0, 0.0);
            return;
        };

        let mut mbr = *first.mbr();
        for entry in entries {
            mbr = mbr.union(entry.mbr());
        }
        self.mbr = mbr;
    }

    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.update_mbr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let leaf = Node::new_leaf();
        assert!(leaf.is_leaf);
        assert_eq!(leaf.level, 0);

        let internal = Node::new(false, 1);
        assert!(!internal.is_leaf);
        assert_eq!(internal.level, 1);
    }

    #[test]
    fn test_update_mbr_is_tight_union() {
        let mut node = Node::new_leaf();
        node.add_entry(Entry::Data {
            mbr: Rectangle::from_point(1.0, 2.0),
            point: GeoPoint::new(1.0, 2.0, None),
        });
        node.add_entry(Entry::Data {
            mbr: Rectangle::from_point(5.0, -1.0),
            point: GeoPoint::new(5.0, -1.0, None),
        });

        assert_eq!(node.mbr, Rectangle::new(1.0, -1.0, 5.0, 2.0));
    }

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::Data {
            mbr: Rectangle::from_point(0.0, 0.0),
            point: GeoPoint::new(0.0, 0.0, Some("00000".to_string())),
        };
        assert!(entry.is_data());
        assert!(entry.child().is_none());
        assert_eq!(entry.point().and_then(|p| p.id.as_deref()), Some("00000"));
    }
}

use super::super::node::{Entry, Node};
use super::super::rectangle::Rectangle;
use super::super::rtree::RTree;
use crate::points::GeoPoint;

/// Insertion path: choose a leaf by least enlargement, append, and either
/// refresh MBRs up the path or hand an overflowing node to the split logic.
impl RTree {
    /// Insert one point. The point's bounding rectangle is degenerate, so
    /// leaf choice degrades gracefully to "closest box".
    pub fn insert(&mut self, point: GeoPoint) {
        let rect = Rectangle::from_point(point.x, point.y);

        // First insert creates the root leaf
        if self.root_ref().is_none() {
            let mut root = Node::new_leaf();
            root.add_entry(Entry::Data { mbr: rect, point });
            *self.root_mut() = Some(Box::new(root));
            return;
        }

        let leaf_path = self.choose_leaf_path(&rect);

        let max_children = self.max_children();
        let leaf = match self.get_last_node_mut(&leaf_path) {
            Some(node) => node,
            None => panic!("leaf path points past the tree"),
        };
        leaf.add_entry(Entry::Data { mbr: rect, point });

        if leaf.entries.len() > max_children {
            self.handle_overflow(leaf_path);
        } else {
            self.adjust_tree_upward(leaf_path);
        }
    }

    /// Descend from the root to a leaf, at each internal node taking the
    /// child entry whose box needs the least area enlargement. Returns the
    /// path of child indexes; an empty path means the root is the leaf.
    fn choose_leaf_path(&self, rect: &Rectangle) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = match self.root_ref() {
            Some(root) => root.as_ref(),
            None => return path,
        };

        while !current.is_leaf {
            let best_index = self.choose_subtree(&current.entries, rect);
            path.push(best_index);

            current = match current.entries.get(best_index) {
                Some(Entry::Node { node, .. }) => node,
                _ => panic!("internal node holds a non-child entry"),
            };
        }

        path
    }

    /// Least-enlargement child choice; ties fall to the smaller box.
    fn choose_subtree(&self, entries: &[Entry], rect: &Rectangle) -> usize {
        let mut best_index = 0;
        let mut min_enlargement = f64::INFINITY;
        let mut min_area = f64::INFINITY;

        for (i, entry) in entries.iter().enumerate() {
            let mbr = entry.mbr();
            let enlargement = mbr.enlargement(rect);
            let area = mbr.area();

            if enlargement < min_enlargement
                || (enlargement == min_enlargement && area < min_area)
            {
                min_enlargement = enlargement;
                min_area = area;
                best_index = i;
            }
        }

        best_index
    }

    /// Refresh MBRs from the node at `path` up to and including the root,
    /// keeping each parent's entry rectangle in sync with its child.
    pub(crate) fn adjust_tree_upward(&mut self, mut path: Vec<usize>) {
        loop {
            let node = match self.get_last_node_mut(&path) {
                Some(node) => node,
                None => return,
            };
            node.update_mbr();
            let updated = node.mbr;

            match path.pop() {
                Some(child_index) => {
                    let parent = match self.get_last_node_mut(&path) {
                        Some(parent) => parent,
                        None => return,
                    };
                    if let Some(Entry::Node { mbr, .. }) = parent.entries.get_mut(child_index) {
                        *mbr = updated;
                    }
                }
                // The node just refreshed was the root
                None => return,
            }
        }
    }

    /// Walk a child-index path from the root; an empty path yields the root.
    pub(crate) fn get_last_node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current = self.root_mut().as_mut()?;

        for &index in path {
            if let Some(Entry::Node { node, .. }) = current.entries.get_mut(index) {
                current = node;
            } else {
                return None;
            }
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_into_empty_creates_root_leaf() {
        let mut tree = RTree::new(4);
        tree.insert(GeoPoint::new(1.0, 1.0, Some("00001".to_string())));

        let root = tree.root_ref().as_ref().unwrap();
        assert!(root.is_leaf);
        assert_eq!(root.entries.len(), 1);
    }

    #[test]
    fn test_choose_subtree_prefers_covering_box() {
        let tree = RTree::new(4);
        let entries = vec![
            Entry::Data {
                mbr: Rectangle::new(0.0, 0.0, 5.0, 5.0),
                point: GeoPoint::new(0.0, 0.0, None),
            },
            Entry::Data {
                mbr: Rectangle::new(10.0, 10.0, 15.0, 15.0),
                point: GeoPoint::new(10.0, 10.0, None),
            },
        ];

        // Inside the first box: zero enlargement there
        let rect = Rectangle::from_point(2.0, 2.0);
        assert_eq!(tree.choose_subtree(&entries, &rect), 0);

        // Inside the second box
        let rect = Rectangle::from_point(12.0, 14.0);
        assert_eq!(tree.choose_subtree(&entries, &rect), 1);
    }

    #[test]
    fn test_leaf_path_reaches_a_leaf() {
        let mut tree = RTree::new(2);
        for i in 0..7 {
            tree.insert(GeoPoint::new(i as f64, i as f64, Some(format!("{:05}", i))));
        }

        let path = tree.choose_leaf_path(&Rectangle::from_point(3.0, 3.0));
        let node = tree.get_last_node_mut(&path).unwrap();
        assert!(node.is_leaf);
    }

    #[test]
    fn test_get_last_node_mut_empty_path_is_root() {
        let mut tree = RTree::new(4);
        tree.insert(GeoPoint::new(0.0, 0.0, None));
        assert!(tree.get_last_node_mut(&[]).is_some());
        assert!(tree.get_last_node_mut(&[7]).is_none());
    }

    #[test]
    fn test_adjust_tree_upward_tightens_ancestors() {
        let mut tree = RTree::new(2);
        for i in 0..9 {
            tree.insert(GeoPoint::new(i as f64 * 2.0, 1.0, Some(format!("{:05}", i))));
        }

        // Every ancestor box must cover the extreme points after the cascade
        let root_mbr = *tree.root_mbr().unwrap();
        assert!(root_mbr.contains_point(0.0, 1.0));
        assert!(root_mbr.contains_point(16.0, 1.0));
    }
}

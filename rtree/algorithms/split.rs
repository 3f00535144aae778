use super::super::node::{Entry, Node};
use super::super::rtree::RTree;

/// Overflow handling. A node that exceeds `max_children` is split into two
/// and the new sibling is attached to the parent, which may overflow in turn;
/// a root split grows a fresh two-entry root, raising the tree by one level.
///
/// The split itself is quadratic-cost: the two entries whose box centers are
/// farthest apart seed the two groups, and every remaining entry joins the
/// group whose box needs the smaller area enlargement to absorb it. Entries
/// are detached, partitioned, and reattached with no fallible step in
/// between, so a failed insertion can never leave a half-split node visible.
impl RTree {
    pub(crate) fn handle_overflow(&mut self, path: Vec<usize>) {
        if path.is_empty() {
            self.grow_root();
        } else {
            self.split_and_propagate(path);
        }
    }

    /// Root overflow: split the root's entries and put both halves under a
    /// new root with exactly two entries.
    fn grow_root(&mut self) {
        let old_root = match self.root_mut().take() {
            Some(root) => root,
            None => return,
        };
        let is_leaf = old_root.is_leaf;
        let level = old_root.level;

        let (group1, group2) = split_entries(old_root.entries);

        let mut first = Node::new(is_leaf, level);
        first.entries = group1;
        first.update_mbr();

        let mut second = Node::new(is_leaf, level);
        second.entries = group2;
        second.update_mbr();

        let mut new_root = Node::new(false, level + 1);
        new_root.add_entry(Entry::Node {
            mbr: first.mbr,
            node: Box::new(first),
        });
        new_root.add_entry(Entry::Node {
            mbr: second.mbr,
            node: Box::new(second),
        });

        *self.root_mut() = Some(Box::new(new_root));
    }

    /// Split a non-root node: keep one half in place, hand the other half to
    /// the parent as a new entry, then recurse if the parent overflows.
    fn split_and_propagate(&mut self, mut path: Vec<usize>) {
        let max_children = self.max_children();

        let (entries, is_leaf, level) = {
            let node = match self.get_last_node_mut(&path) {
                Some(node) => node,
                None => return,
            };
            if node.entries.len() <= max_children {
                self.adjust_tree_upward(path);
                return;
            }
            let entries = std::mem::take(&mut node.entries);
            (entries, node.is_leaf, node.level)
        };

        let (group1, group2) = split_entries(entries);

        // First half stays in the split node's slot
        let kept_mbr = {
            let node = match self.get_last_node_mut(&path) {
                Some(node) => node,
                None => return,
            };
            node.entries = group1;
            node.update_mbr();
            node.mbr
        };

        let mut sibling = Node::new(is_leaf, level);
        sibling.entries = group2;
        sibling.update_mbr();
        let sibling_mbr = sibling.mbr;

        let child_index = match path.pop() {
            Some(index) => index,
            None => return, // root splits are routed to grow_root
        };

        let parent_overflows = {
            let parent = match self.get_last_node_mut(&path) {
                Some(parent) => parent,
                None => return,
            };
            // The kept half shrank, so its entry rectangle must be re-tightened
            if let Some(Entry::Node { mbr, .. }) = parent.entries.get_mut(child_index) {
                *mbr = kept_mbr;
            }
            parent.add_entry(Entry::Node {
                mbr: sibling_mbr,
                node: Box::new(sibling),
            });
            parent.entries.len() > max_children
        };

        if parent_overflows {
            self.handle_overflow(path);
        } else {
            self.adjust_tree_upward(path);
        }
    }
}

/// Partition an overflowing entry list into two groups.
///
/// Seeds are the pair of entries with the largest squared center-to-center
/// distance; every other entry goes to the group needing the smaller area
/// enlargement (ties: smaller resulting area, then the first group). Both
/// groups are non-empty because the seeds are distinct.
fn split_entries(mut entries: Vec<Entry>) -> (Vec<Entry>, Vec<Entry>) {
    debug_assert!(entries.len() >= 2);

    let (seed1, seed2) = pick_seeds(&entries);
    // Remove the higher index first so the lower one stays valid
    let second_seed = entries.swap_remove(seed1.max(seed2));
    let first_seed = entries.swap_remove(seed1.min(seed2));

    let mut mbr1 = *first_seed.mbr();
    let mut mbr2 = *second_seed.mbr();
    let mut group1 = vec![first_seed];
    let mut group2 = vec![second_seed];

    for entry in entries {
        let enlargement1 = mbr1.enlargement(entry.mbr());
        let enlargement2 = mbr2.enlargement(entry.mbr());

        let to_first = if enlargement1 != enlargement2 {
            enlargement1 < enlargement2
        } else {
            mbr1.union(entry.mbr()).area() <= mbr2.union(entry.mbr()).area()
        };

        if to_first {
            mbr1 = mbr1.union(entry.mbr());
            group1.push(entry);
        } else {
            mbr2 = mbr2.union(entry.mbr());
            group2.push(entry);
        }
    }

    (group1, group2)
}

/// Seed selection: the two entries whose box centers are farthest apart
/// (squared distance; only the ordering matters).
fn pick_seeds(entries: &[Entry]) -> (usize, usize) {
    let mut best_pair = (0, 1);
    let mut max_distance = f64::NEG_INFINITY;

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let ci = entries[i].mbr().center();
            let cj = entries[j].mbr().center();
            let dx = ci[0] - cj[0];
            let dy = ci[1] - cj[1];
            let distance = dx * dx + dy * dy;

            if distance > max_distance {
                max_distance = distance;
                best_pair = (i, j);
            }
        }
    }

    best_pair
}

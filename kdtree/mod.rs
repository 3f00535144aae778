//! Depth-bounded k-d tree with best-first nearest-neighbor search.
//!
//! The tree is a static binary space partition over the two coordinate axes:
//! construction recursively sorts by the depth-cycled axis and promotes the
//! median, so the tree is balanced and the splitting axis is always derivable
//! from the depth. Queries run a best-first traversal ordered by split-plane
//! distance and refuse to descend past `max_depth`, which is the source of the
//! approximation: points stored deeper than the bound are not all reachable.
//!
//! ## Pruning bound
//!
//! When the candidate selector is full, the farther child of a node is only
//! enqueued if the absolute coordinate difference on the splitting axis beats
//! the worst retained distance. Everything in that subtree is at least that
//! far from the query, so a skipped branch provably cannot improve the result.

use crate::points::{GeoPoint, KNearest, KnnIndex, Neighbor};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct KdNode {
    point: GeoPoint,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
}

/// Entry in the best-first traversal queue, ordered by ascending split-plane
/// distance. The sequence number breaks ties so traversal order is
/// deterministic for identical inputs.
#[derive(Debug)]
struct Traversal<'a> {
    priority: f64,
    seq: u64,
    node: &'a KdNode,
    depth: usize,
}

impl PartialEq for Traversal<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Traversal<'_> {}

impl PartialOrd for Traversal<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Traversal<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Static k-d tree over a point collection, queried with a bounded descent
/// depth.
#[derive(Debug)]
pub struct ApproxKdTree {
    root: Option<Box<KdNode>>,
    max_depth: usize,
}

impl ApproxKdTree {
    /// Build a balanced tree from the full collection. Construction depth is
    /// unbounded; `max_depth` only limits how deep queries will descend.
    pub fn new(points: Vec<GeoPoint>, max_depth: usize) -> Self {
        ApproxKdTree {
            root: build_tree(points, 0),
            max_depth,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        count(&self.root)
    }

    /// Number of levels in the tree (0 for an empty tree). A query with
    /// `max_depth >= height() - 1` can reach every stored point.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

fn build_tree(mut points: Vec<GeoPoint>, depth: usize) -> Option<Box<KdNode>> {
    if points.is_empty() {
        return None;
    }

    let axis = depth % 2;
    points.sort_by(|a, b| {
        a.coord(axis)
            .partial_cmp(&b.coord(axis))
            .unwrap_or(Ordering::Equal)
    });

    let median = points.len() / 2;
    let mut upper = points.split_off(median);
    let point = upper.remove(0);

    Some(Box::new(KdNode {
        point,
        left: build_tree(points, depth + 1),
        right: build_tree(upper, depth + 1),
    }))
}

fn count(node: &Option<Box<KdNode>>) -> usize {
    node.as_ref()
        .map_or(0, |n| 1 + count(&n.left) + count(&n.right))
}

fn height(node: &Option<Box<KdNode>>) -> usize {
    node.as_ref()
        .map_or(0, |n| 1 + height(&n.left).max(height(&n.right)))
}

impl KnnIndex for ApproxKdTree {
    fn knn(&self, query: &GeoPoint, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }
        let root = match &self.root {
            Some(root) => root.as_ref(),
            None => return Vec::new(),
        };
        let mut best = KNearest::new(k);

        let mut seq: u64 = 0;
        let mut queue: BinaryHeap<Traversal<'_>> = BinaryHeap::new();
        queue.push(Traversal {
            priority: 0.0,
            seq,
            node: root,
            depth: 0,
        });

        while let Some(Traversal { node, depth, .. }) = queue.pop() {
            if depth > self.max_depth {
                continue;
            }

            best.push(Neighbor {
                point: node.point.clone(),
                distance: query.distance(&node.point),
            });

            let axis = depth % 2;
            let diff = query.coord(axis) - node.point.coord(axis);
            let (nearer, farther) = if diff < 0.0 {
                (&node.left, &node.right)
            } else {
                (&node.right, &node.left)
            };

            // The nearer child is always worth visiting
            if let Some(child) = nearer.as_deref() {
                seq += 1;
                queue.push(Traversal {
                    priority: 0.0,
                    seq,
                    node: child,
                    depth: depth + 1,
                });
            }

            // The farther child only if it can still beat the worst retained
            // distance
            if let Some(child) = farther.as_deref() {
                if best.admits(diff.abs()) {
                    seq += 1;
                    queue.push(Traversal {
                        priority: diff.abs(),
                        seq,
                        node: child,
                        depth: depth + 1,
                    });
                }
            }
        }

        best.into_sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BruteForce;

    fn sample_points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(-64.92, 18.34, Some("00802".to_string())),
            GeoPoint::new(-64.93, 18.35, Some("00803".to_string())),
            GeoPoint::new(-64.90, 18.30, Some("00804".to_string())),
            GeoPoint::new(-64.89, 18.29, Some("00805".to_string())),
        ]
    }

    fn ids(neighbors: &[Neighbor]) -> Vec<String> {
        neighbors
            .iter()
            .filter_map(|n| n.point.id.clone())
            .collect()
    }

    #[test]
    fn test_build_counts() {
        let tree = ApproxKdTree::new(sample_points(), 10);
        assert_eq!(tree.len(), 4);
        assert!(!tree.is_empty());
        assert!(tree.height() >= 2);
    }

    #[test]
    fn test_exact_match_is_first() {
        let tree = ApproxKdTree::new(sample_points(), 10);
        let query = GeoPoint::new(-64.92, 18.34, None);

        let results = tree.knn(&query, 1);
        assert_eq!(ids(&results), vec!["00802"]);
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_empty_tree_returns_empty() {
        let tree = ApproxKdTree::new(Vec::new(), 10);
        assert!(tree.is_empty());
        assert!(tree.knn(&GeoPoint::new(0.0, 0.0, None), 5).is_empty());
    }

    #[test]
    fn test_k_larger_than_collection() {
        let tree = ApproxKdTree::new(sample_points(), 10);
        let results = tree.knn(&GeoPoint::new(-64.92, 18.34, None), 10);
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_results_sorted_ascending() {
        let points: Vec<GeoPoint> = (0..50)
            .map(|i| {
                GeoPoint::new(
                    (i % 10) as f64 * 0.7,
                    (i / 10) as f64 * 1.3,
                    Some(format!("{:05}", i)),
                )
            })
            .collect();
        let tree = ApproxKdTree::new(points, 16);

        let results = tree.knn(&GeoPoint::new(3.1, 2.4, None), 8);
        assert_eq!(results.len(), 8);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_complete_at_unbounded_depth_matches_brute_force() {
        let points: Vec<GeoPoint> = (0..60)
            .map(|i| {
                GeoPoint::new(
                    ((i * 37) % 100) as f64 * 0.31,
                    ((i * 53) % 100) as f64 * 0.17,
                    Some(format!("{:05}", i)),
                )
            })
            .collect();

        let tree = ApproxKdTree::new(points.clone(), 10);
        assert!(tree.max_depth() >= tree.height()); // bound exceeds every level
        let oracle = BruteForce::new(points);

        // Off-lattice query coordinates keep the k boundary free of ties
        for query in [
            GeoPoint::new(10.13, 5.07, None),
            GeoPoint::new(0.01, 0.02, None),
            GeoPoint::new(30.97, 16.93, None),
        ] {
            let mut got = ids(&tree.knn(&query, 7));
            let mut expected = ids(&oracle.knn(&query, 7));
            got.sort();
            expected.sort();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_depth_bound_limits_reachable_points() {
        let points: Vec<GeoPoint> = (0..31)
            .map(|i| GeoPoint::new(i as f64, 0.0, Some(format!("{:05}", i))))
            .collect();

        // Only the root is visitable, so only one point can come back
        let tree = ApproxKdTree::new(points, 0);
        let results = tree.knn(&GeoPoint::new(3.0, 0.0, None), 5);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_repeated_queries_identical() {
        let tree = ApproxKdTree::new(sample_points(), 10);
        let query = GeoPoint::new(-64.91, 18.32, None);

        let first = tree.knn(&query, 3);
        let second = tree.knn(&query, 3);
        assert_eq!(ids(&first), ids(&second));
    }
}

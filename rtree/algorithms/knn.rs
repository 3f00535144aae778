//! Branch-and-bound nearest-neighbor search for the R-tree.
//!
//! A min-heap of candidate nodes is ordered by each node's minimum possible
//! distance to the query (zero when the query sits inside the node's box,
//! otherwise the distance to the nearest edge). Because that bound never
//! exceeds the distance of any point stored below the node, a node whose
//! bound cannot beat the k-th best distance found so far can be discarded
//! with its whole subtree, and the search is exact once the heap drains.
//!
//! An optional node-visit budget turns the same traversal into an
//! approximate search with bounded latency, the counterpart of the k-d
//! tree's query depth bound.

use super::super::node::{Entry, Node};
use super::super::rtree::RTree;
use crate::points::{GeoPoint, KNearest, KnnIndex, Neighbor};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Candidate node in the search queue, keyed by its lower-bound distance.
/// The sequence number keeps equal bounds in a deterministic order.
#[derive(Debug)]
struct Candidate<'a> {
    bound: f64,
    seq: u64,
    node: &'a Node,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bound == other.bound && self.seq == other.seq
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .bound
            .partial_cmp(&self.bound)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl KnnIndex for RTree {
    fn knn(&self, query: &GeoPoint, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }
        let root = match self.root_ref() {
            Some(root) => root.as_ref(),
            None => return Vec::new(),
        };

        let mut best = KNearest::new(k);
        let mut seq: u64 = 0;
        let mut visited: usize = 0;
        let mut queue: BinaryHeap<Candidate<'_>> = BinaryHeap::new();
        queue.push(Candidate {
            bound: root.mbr.min_distance(query.x, query.y),
            seq,
            node: root,
        });

        while let Some(Candidate { bound, node, .. }) = queue.pop() {
            // The queue pops ascending bounds, so once a bound cannot beat
            // the worst retained distance nothing later can either
            if best.is_full() && !best.admits(bound) {
                break;
            }
            if let Some(budget) = self.node_budget() {
                if visited >= budget {
                    break;
                }
            }
            visited += 1;

            if node.is_leaf {
                for entry in &node.entries {
                    if let Entry::Data { point, .. } = entry {
                        best.push(Neighbor {
                            point: point.clone(),
                            distance: query.distance(point),
                        });
                    }
                }
            } else {
                for entry in &node.entries {
                    if let Entry::Node { mbr, node: child } = entry {
                        let child_bound = mbr.min_distance(query.x, query.y);
                        if best.admits(child_bound) {
                            seq += 1;
                            queue.push(Candidate {
                                bound: child_bound,
                                seq,
                                node: child.as_ref(),
                            });
                        }
                    }
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

    fn grid_points(side: usize) -> Vec<GeoPoint> {
        let mut points = Vec::new();
        for x in 0..side {
            for y in 0..side {
                points.push(GeoPoint::new(
                    x as f64 * 0.9,
                    y as f64 * 0.6,
                    Some(format!("{:02}{:02}", x, y)),
                ));
            }
        }
        points
    }

    fn build_tree(points: &[GeoPoint], max_children: usize) -> RTree {
        let mut tree = RTree::new(max_children);
        for point in points {
            tree.insert(point.clone());
        }
        tree
    }

    fn ids(neighbors: &[Neighbor]) -> Vec<String> {
        neighbors
            .iter()
            .filter_map(|n| n.point.id.clone())
            .collect()
    }

    #[test]
    fn test_empty_tree_returns_empty() {
        let tree = RTree::new(4);
        assert!(tree.knn(&GeoPoint::new(0.0, 0.0, None), 5).is_empty());
    }

    #[test]
    fn test_k_zero_returns_empty() {
        let tree = build_tree(&sample_points(), 4);
        assert!(tree.knn(&GeoPoint::new(0.0, 0.0, None), 0).is_empty());
    }

    #[test]
    fn test_exact_match_scenario() {
        let tree = build_tree(&sample_points(), 4);
        let results = tree.knn(&GeoPoint::new(-64.92, 18.34, None), 1);
        assert_eq!(ids(&results), vec!["00802"]);
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_k_greater_than_len_returns_all() {
        let tree = build_tree(&sample_points(), 4);
        let results = tree.knn(&GeoPoint::new(-64.92, 18.34, None), 10);
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_exact_against_brute_force() {
        // Unbudgeted branch-and-bound must match the oracle for any fan-out
        let points = grid_points(9);
        let oracle = BruteForce::new(points.clone());

        for max_children in [2, 3, 5, 16] {
            let tree = build_tree(&points, max_children);
            // Query coordinates sit off the grid's mirror axes so no two
            // points tie at the k boundary
            for query in [
                GeoPoint::new(3.97, 2.41, None),
                GeoPoint::new(0.01, 0.02, None),
                GeoPoint::new(-5.03, 9.07, None),
                GeoPoint::new(7.33, 4.79, None),
            ] {
                let mut got = ids(&tree.knn(&query, 6));
                let mut expected = ids(&oracle.knn(&query, 6));
                got.sort();
                expected.sort();
                assert_eq!(got, expected, "max_children = {}", max_children);
            }
        }
    }

    #[test]
    fn test_node_budget_bounds_work_not_correctness_of_order() {
        let points = grid_points(10);
        let tree = build_tree(&points, 3).with_node_budget(4);

        // A tiny budget still returns sorted results, just not exact ones
        let results = tree.knn(&GeoPoint::new(4.5, 3.0, None), 5);
        assert!(results.len() <= 5);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_repeated_queries_identical() {
        let tree = build_tree(&grid_points(6), 4);
        let query = GeoPoint::new(2.2, 1.7, None);
        assert_eq!(ids(&tree.knn(&query, 5)), ids(&tree.knn(&query, 5)));
    }
}

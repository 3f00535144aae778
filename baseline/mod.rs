//! Exhaustive-scan baseline.
//!
//! Defines ground truth for the benchmark harness: every stored point is
//! compared against the query with the same Euclidean metric the indexes use.
//! Not meant for production query paths.

use crate::points::{GeoPoint, KNearest, KnnIndex, Neighbor};

/// Exact k-NN by linear scan over the whole collection.
#[derive(Debug)]
pub struct BruteForce {
    points: Vec<GeoPoint>,
}

impl BruteForce {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        BruteForce { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl KnnIndex for BruteForce {
    fn knn(&self, query: &GeoPoint, k: usize) -> Vec<Neighbor> {
        let mut best = KNearest::new(k);
        for point in &self.points {
            best.push(Neighbor {
                point: point.clone(),
                distance: query.distance(point),
            });
        }
        best.into_sorted()
    }
}

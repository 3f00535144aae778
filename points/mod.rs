//! Shared point and distance primitives.
//!
//! Every index, the brute-force baseline, and the benchmark harness speak in
//! terms of [`GeoPoint`] and [`Neighbor`]. Coordinates are stored in (x, y) =
//! (longitude, latitude) order; all distance comparisons use the same Euclidean
//! metric so accuracy numbers are comparable across indexes.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A 2-D geographic point with an opaque identifier (e.g. a postal code).
///
/// The identifier is carried through queries but never participates in
/// distance comparisons. Query points typically leave it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[display(fmt = "GeoPoint {{ x: {}, y: {}, id: {:?} }}", x, y, id)]
pub struct GeoPoint {
    /// Longitude (projected x coordinate)
    pub x: f64,
    /// Latitude (projected y coordinate)
    pub y: f64,
    /// Opaque label carried through query results
    pub id: Option<String>,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64, id: Option<String>) -> Self {
        GeoPoint { x, y, id }
    }

    /// Coordinate on the given axis (0 = x, 1 = y).
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            _ => self.y,
        }
    }

    /// Squared Euclidean distance. Only valid where ordering alone matters.
    pub fn distance_sq(&self, other: &GeoPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &GeoPoint) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// Result element of a k-NN query: a stored point and its distance to the
/// query point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighbor {
    pub point: GeoPoint,
    pub distance: f64,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Bounded selector for the k smallest distances seen so far.
///
/// Internally a max-heap of size at most k: the root is the worst retained
/// neighbor, so a new candidate only displaces it when strictly closer. The
/// k-d tree, the R-tree, and the brute-force baseline all funnel candidates
/// through this type so their pruning bounds agree.
#[derive(Debug)]
pub struct KNearest {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl KNearest {
    pub fn new(k: usize) -> Self {
        KNearest {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    /// Offer a candidate; kept only if the selector is not yet full or the
    /// candidate beats the current worst retained distance.
    pub fn push(&mut self, neighbor: Neighbor) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(neighbor);
        } else if let Some(worst) = self.heap.peek() {
            if neighbor.distance < worst.distance {
                self.heap.pop();
                self.heap.push(neighbor);
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Worst retained distance, if any candidate has been kept.
    pub fn worst_distance(&self) -> Option<f64> {
        self.heap.peek().map(|n| n.distance)
    }

    /// True if a subtree whose best possible distance is `bound` could still
    /// contribute a result.
    pub fn admits(&self, bound: f64) -> bool {
        match self.worst_distance() {
            Some(worst) if self.is_full() => bound < worst,
            _ => true,
        }
    }

    /// Consume the selector, yielding neighbors sorted nearest first.
    pub fn into_sorted(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}

/// Common query interface between the benchmark harness and every index
/// (including the brute-force baseline).
pub trait KnnIndex {
    /// The up-to-k stored points most likely to be nearest to `query`,
    /// ordered by ascending distance. Asking for more neighbors than the
    /// index holds returns everything it holds.
    fn knn(&self, query: &GeoPoint, k: usize) -> Vec<Neighbor>;
}

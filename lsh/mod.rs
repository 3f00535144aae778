//! Multi-table locality-sensitive hashing over 2-D points.
//!
//! Each table pairs one random Gaussian projection matrix with a map from hash
//! code to bucket. A point's code is the sign pattern of its projection, so
//! nearby points collide with elevated probability; querying unions the
//! query's bucket from every table and ranks the candidates by true distance.
//!
//! The projection matrices are drawn once at construction from a seeded RNG
//! and stored on the index. The same vector must hash to the same code for
//! the index's whole lifetime, otherwise inserts and queries land in
//! unrelated buckets and recall collapses.
//!
//! Raising `num_tables` raises recall at the cost of more buckets scanned;
//! raising `hash_size` sharpens buckets, lowering false positives and recall
//! both.

use crate::points::{GeoPoint, KnnIndex, Neighbor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ensemble of independent hash tables built from random projections.
#[derive(Debug)]
pub struct MultiTableLsh {
    num_tables: usize,
    hash_size: usize,
    /// One fixed projection matrix per table: `hash_size` rows of 2-D vectors.
    projections: Vec<Vec<[f64; 2]>>,
    /// Hash code -> insertion-ordered bucket of indexes into `points`.
    tables: Vec<HashMap<u64, Vec<usize>>>,
    points: Vec<GeoPoint>,
}

impl MultiTableLsh {
    /// Create an empty index with all projection matrices drawn up-front from
    /// `seed`. Codes are packed into a `u64`, so `hash_size` is capped at 64.
    pub fn new(num_tables: usize, hash_size: usize, seed: u64) -> Self {
        assert!(num_tables >= 1, "num_tables must be at least 1");
        assert!(
            (1..=64).contains(&hash_size),
            "hash_size must be in 1..=64"
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let projections = (0..num_tables)
            .map(|_| {
                (0..hash_size)
                    .map(|_| [rng.sample(StandardNormal), rng.sample(StandardNormal)])
                    .collect()
            })
            .collect();

        MultiTableLsh {
            num_tables,
            hash_size,
            projections,
            tables: vec![HashMap::new(); num_tables],
            points: Vec::new(),
        }
    }

    pub fn num_tables(&self) -> usize {
        self.num_tables
    }

    pub fn hash_size(&self) -> usize {
        self.hash_size
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Hash a vector with the stored projection matrix for one table:
    /// project, then keep the sign bit of each component (positive -> 1).
    fn hash(&self, vector: [f64; 2], table_index: usize) -> u64 {
        let mut code = 0u64;
        for row in &self.projections[table_index] {
            let projected = row[0] * vector[0] + row[1] * vector[1];
            code = (code << 1) | u64::from(projected > 0.0);
        }
        code
    }

    /// Bulk-load points: every point is hashed once per table and appended to
    /// that table's bucket.
    pub fn insert(&mut self, points: &[GeoPoint]) {
        for point in points {
            let index = self.points.len();
            let vector = [point.x, point.y];
            for table_index in 0..self.num_tables {
                let code = self.hash(vector, table_index);
                self.tables[table_index]
                    .entry(code)
                    .or_default()
                    .push(index);
            }
            self.points.push(point.clone());
        }
    }
}

impl KnnIndex for MultiTableLsh {
    fn knn(&self, query: &GeoPoint, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let vector = [query.x, query.y];
        let mut candidates: Vec<usize> = Vec::new();
        for table_index in 0..self.num_tables {
            let code = self.hash(vector, table_index);
            if let Some(bucket) = self.tables[table_index].get(&code) {
                candidates.extend_from_slice(bucket);
            }
        }

        // Dedup on point index before ranking so ties resolve by insertion
        // order regardless of which table produced the candidate
        candidates.sort_unstable();
        candidates.dedup();

        let mut neighbors: Vec<Neighbor> = candidates
            .into_iter()
            .map(|index| {
                let point = &self.points[index];
                Neighbor {
                    point: point.clone(),
                    distance: query.distance(point),
                }
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
        });
        neighbors.truncate(k);
        neighbors
    }
}

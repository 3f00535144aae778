//! Benchmark harness: runs repeated queries against an index, timing each
//! call and scoring the retrieved identifier set against the brute-force
//! oracle's ground truth.
//!
//! Query points are sampled from the collection itself without replacement,
//! so every query has a distance-zero answer and accuracy is the fractional
//! overlap `|retrieved ∩ ground_truth| / k`, averaged over the sample.

use crate::baseline::BruteForce;
use crate::points::{GeoPoint, KnnIndex, Neighbor};
use crate::{Error, Result};
use derive_more::Display;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::debug;

/// Aggregated outcome of one benchmark run against one index.
#[derive(Debug, Clone, Serialize, Deserialize, Display)]
#[display(
    fmt = "{} - time: {:.6}s, accuracy: {:.2}",
    index,
    avg_query_seconds,
    avg_accuracy
)]
pub struct BenchmarkReport {
    /// Human-readable index name
    pub index: String,
    pub num_queries: usize,
    pub k: usize,
    /// Mean wall-clock seconds per query (index call only; oracle time is
    /// excluded)
    pub avg_query_seconds: f64,
    /// Mean fractional overlap with the oracle's top-k identifier set
    pub avg_accuracy: f64,
}

/// Drive `num_queries` k-NN queries against `index`, scoring each against
/// the oracle. Sampling is without replacement: asking for more queries than
/// the collection holds is an error, never a silent resample.
pub fn run_benchmark<I: KnnIndex>(
    name: &str,
    index: &I,
    points: &[GeoPoint],
    num_queries: usize,
    k: usize,
    seed: u64,
) -> Result<BenchmarkReport> {
    if num_queries == 0 {
        return Err(Error::InvalidConfig("num_queries must be positive".into()));
    }
    if k == 0 {
        return Err(Error::InvalidConfig("k must be positive".into()));
    }
    if num_queries > points.len() {
        return Err(Error::InsufficientData {
            requested: num_queries,
            available: points.len(),
        });
    }

    let oracle = BruteForce::new(points.to_vec());
    let mut rng = StdRng::seed_from_u64(seed);
    let sample = rand::seq::index::sample(&mut rng, points.len(), num_queries);

    let mut total_time = Duration::ZERO;
    let mut total_overlap = 0.0;

    for point_index in sample.iter() {
        let query = &points[point_index];
        let ground_truth = identifier_set(&oracle.knn(query, k));

        let start = Instant::now();
        let results = index.knn(query, k);
        total_time += start.elapsed();

        let retrieved = identifier_set(&results);
        total_overlap += retrieved.intersection(&ground_truth).count() as f64 / k as f64;
    }

    let report = BenchmarkReport {
        index: name.to_string(),
        num_queries,
        k,
        avg_query_seconds: total_time.as_secs_f64() / num_queries as f64,
        avg_accuracy: total_overlap / num_queries as f64,
    };
    debug!("benchmark finished: {}", report);

    Ok(report)
}

fn identifier_set(neighbors: &[Neighbor]) -> HashSet<String> {
    neighbors
        .iter()
        .filter_map(|n| n.point.id.clone())
        .collect()
}

/// Reproducible synthetic collection: points drawn uniformly from a
/// continental-US-shaped lon/lat box, labeled with zero-padded five-digit
/// identifiers.
pub fn generate_points(count: usize, seed: u64) -> Vec<GeoPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);

    for i in 0..count {
        let x = rng.gen_range(-124.0..-66.0); // longitude
        let y = rng.gen_range(25.0..49.0); // latitude
        points.push(GeoPoint::new(x, y, Some(format!("{:05}", i))));
    }

    points
}

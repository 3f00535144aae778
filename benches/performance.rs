//! Index construction and query benchmarks.
//!
//! Each index is measured on the same seeded synthetic collection, with the
//! brute-force scan as the baseline the speedups are judged against.

use criterion::{criterion_group, criterion_main, Criterion};
use geoknn::{generate_points, ApproxKdTree, BruteForce, GeoPoint, KnnIndex, MultiTableLsh, RTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BENCHMARK_SIZE: usize = 10_000;
const QUERY_COUNT: usize = 100;

/// Benchmark configuration
struct BenchConfig {
    size: usize,
    k: usize,
    max_depth: usize,
    num_tables: usize,
    hash_size: usize,
    max_children: usize,
    seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: BENCHMARK_SIZE,
            k: 5,
            max_depth: 12,
            num_tables: 3,
            hash_size: 4,
            max_children: 16,
            seed: 42,
        }
    }
}

/// Query points drawn from the same bounding box as the dataset, but not
/// from the dataset itself, so nothing is answered at distance zero.
fn generate_queries(count: usize, seed: u64) -> Vec<GeoPoint> {
    let mut rng = StdRng::seed_from_u64(seed + 1000);
    (0..count)
        .map(|_| {
            GeoPoint::new(
                rng.gen_range(-124.0..-66.0),
                rng.gen_range(25.0..49.0),
                None,
            )
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let config = BenchConfig::default();
    let points = generate_points(config.size, config.seed);

    c.bench_function("kdtree_build", |b| {
        b.iter(|| ApproxKdTree::new(points.clone(), config.max_depth));
    });

    c.bench_function("lsh_build", |b| {
        b.iter(|| {
            let mut lsh = MultiTableLsh::new(config.num_tables, config.hash_size, config.seed);
            lsh.insert(&points);
            lsh
        });
    });

    c.bench_function("rtree_insert", |b| {
        b.iter(|| {
            let mut rtree = RTree::new(config.max_children);
            for point in &points {
                rtree.insert(point.clone());
            }
            rtree
        });
    });
}

fn bench_query(c: &mut Criterion) {
    let config = BenchConfig::default();
    let points = generate_points(config.size, config.seed);
    let queries = generate_queries(QUERY_COUNT, config.seed);

    let kd_tree = ApproxKdTree::new(points.clone(), config.max_depth);
    let mut lsh = MultiTableLsh::new(config.num_tables, config.hash_size, config.seed);
    lsh.insert(&points);
    let mut rtree = RTree::new(config.max_children);
    for point in &points {
        rtree.insert(point.clone());
    }
    let brute_force = BruteForce::new(points);

    c.bench_function("kdtree_query", |b| {
        b.iter(|| {
            let mut total = 0;
            for query in &queries {
                total += kd_tree.knn(query, config.k).len();
            }
            total
        });
    });

    c.bench_function("lsh_query", |b| {
        b.iter(|| {
            let mut total = 0;
            for query in &queries {
                total += lsh.knn(query, config.k).len();
            }
            total
        });
    });

    c.bench_function("rtree_query", |b| {
        b.iter(|| {
            let mut total = 0;
            for query in &queries {
                total += rtree.knn(query, config.k).len();
            }
            total
        });
    });

    c.bench_function("brute_force_query", |b| {
        b.iter(|| {
            let mut total = 0;
            for query in &queries {
                total += brute_force.knn(query, config.k).len();
            }
            total
        });
    });
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);

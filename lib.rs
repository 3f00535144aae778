pub mod baseline;
pub mod benchmark;
pub mod config;
pub mod kdtree;
pub mod lsh;
pub mod points;
pub mod rtree;

use thiserror::Error;

// Re-export the main public interface
pub use baseline::BruteForce;
pub use benchmark::{generate_points, run_benchmark, BenchmarkReport};
// `self::` keeps the path unambiguous next to the `config` crate
pub use self::config::GeoknnConfig;
pub use kdtree::ApproxKdTree;
pub use lsh::MultiTableLsh;
pub use points::{GeoPoint, KnnIndex, Neighbor};
pub use rtree::{RTree, Rectangle};

#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient data: {requested} queries requested but only {available} points available")]
    InsufficientData { requested: usize, available: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load config: {0}")]
    ConfigLoad(#[from] ::config::ConfigError),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

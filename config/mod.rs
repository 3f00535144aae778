use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Benchmark suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoknnConfig {
    /// Synthetic dataset
    pub data: DataConfig,

    /// K-D tree parameters
    pub kdtree: KdTreeConfig,

    /// LSH parameters
    pub lsh: LshConfig,

    /// R-tree parameters
    pub rtree: RTreeConfig,

    /// Harness parameters
    pub benchmark: BenchmarkConfig,

    /// Logging
    pub logging: LoggingConfig,
}

/// Synthetic dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Number of points to generate
    #[serde(default = "default_num_points")]
    pub num_points: usize,

    /// Seed for dataset generation and query sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// K-D tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdTreeConfig {
    /// Query descent bound; construction depth is unbounded
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// LSH configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LshConfig {
    /// Number of independent hash tables
    #[serde(default = "default_num_tables")]
    pub num_tables: usize,

    /// Bits per hash code (1..=64)
    #[serde(default = "default_hash_size")]
    pub hash_size: usize,
}

/// R-tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RTreeConfig {
    /// Node fan-out bound before a split
    #[serde(default = "default_max_children")]
    pub max_children: usize,
}

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Queries sampled per index, without replacement
    #[serde(default = "default_num_queries")]
    pub num_queries: usize,

    /// Neighbors requested per query
    #[serde(default = "default_k")]
    pub k: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output: stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// Log file path (when output = file)
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

fn default_num_points() -> usize {
    10_000
}

fn default_seed() -> u64 {
    42
}

fn default_max_depth() -> usize {
    10
}

fn default_num_tables() -> usize {
    3
}

fn default_hash_size() -> usize {
    2
}

fn default_max_children() -> usize {
    64
}

fn default_num_queries() -> usize {
    100
}

fn default_k() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

// ============================================================================
// Implementation
// ============================================================================

impl Default for GeoknnConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                num_points: default_num_points(),
                seed: default_seed(),
            },
            kdtree: KdTreeConfig {
                max_depth: default_max_depth(),
            },
            lsh: LshConfig {
                num_tables: default_num_tables(),
                hash_size: default_hash_size(),
            },
            rtree: RTreeConfig {
                max_children: default_max_children(),
            },
            benchmark: BenchmarkConfig {
                num_queries: default_num_queries(),
                k: default_k(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                output: default_log_output(),
                log_file: None,
            },
        }
    }
}

impl GeoknnConfig {
    /// Load configuration from a file.
    ///
    /// Sources, lowest precedence first:
    /// 1. Embedded defaults (default.toml)
    /// 2. User config file (optional)
    /// 3. Environment variables (GEOKNN__ prefix, double underscore nesting)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use geoknn::config::GeoknnConfig;
    ///
    /// let config = GeoknnConfig::from_file("geoknn.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(
                include_str!("default.toml"),
                ::config::FileFormat::Toml,
            ))
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::with_prefix("GEOKNN").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Write the configuration to a TOML file.
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Check the configured values against the contracts the indexes and the
    /// harness enforce, so a bad file fails here instead of mid-run.
    pub fn validate(&self) -> crate::Result<()> {
        if self.data.num_points == 0 {
            return Err(crate::Error::InvalidConfig(
                "data.num_points must be positive".to_string(),
            ));
        }
        if self.kdtree.max_depth == 0 {
            return Err(crate::Error::InvalidConfig(
                "kdtree.max_depth must be positive".to_string(),
            ));
        }
        if self.lsh.num_tables == 0 {
            return Err(crate::Error::InvalidConfig(
                "lsh.num_tables must be positive".to_string(),
            ));
        }
        if !(1..=64).contains(&self.lsh.hash_size) {
            return Err(crate::Error::InvalidConfig(format!(
                "lsh.hash_size must be in 1..=64, got {}",
                self.lsh.hash_size
            )));
        }
        if self.rtree.max_children < 2 {
            return Err(crate::Error::InvalidConfig(format!(
                "rtree.max_children must be at least 2, got {}",
                self.rtree.max_children
            )));
        }
        if self.benchmark.num_queries == 0 || self.benchmark.k == 0 {
            return Err(crate::Error::InvalidConfig(
                "benchmark.num_queries and benchmark.k must be positive".to_string(),
            ));
        }
        if self.benchmark.num_queries > self.data.num_points {
            return Err(crate::Error::InvalidConfig(format!(
                "benchmark.num_queries ({}) exceeds data.num_points ({})",
                self.benchmark.num_queries, self.data.num_points
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(crate::Error::InvalidConfig(format!(
                    "invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    other
                )))
            }
        }
        if self.logging.output == "file" && self.logging.log_file.is_none() {
            return Err(crate::Error::InvalidConfig(
                "log output is 'file' but log_file path is not specified".to_string(),
            ));
        }

        Ok(())
    }

    /// Print a configuration summary.
    pub fn print_summary(&self) {
        println!("📋 geoknn configuration:");
        println!("   Points:       {}", self.data.num_points);
        println!("   Seed:         {}", self.data.seed);
        println!();
        println!("   KD max depth: {}", self.kdtree.max_depth);
        println!(
            "   LSH:          {} tables x {} bits",
            self.lsh.num_tables, self.lsh.hash_size
        );
        println!("   R-tree M:     {}", self.rtree.max_children);
        println!();
        println!(
            "   Benchmark:    {} queries, k = {}",
            self.benchmark.num_queries, self.benchmark.k
        );
        println!("   Log Level:    {}", self.logging.level);
        println!("   Log Output:   {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:     {}", log_file.display());
        }
        println!();
    }
}

use clap::Parser;
use geoknn::{
    generate_points, run_benchmark, ApproxKdTree, GeoknnConfig, MultiTableLsh, RTree, Result,
};
use std::time::Instant;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "geoknn.toml")]
    config: String,

    /// Generate a default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Number of points to generate (overrides config file)
    #[arg(long)]
    num_points: Option<usize>,

    /// Number of benchmark queries (overrides config file)
    #[arg(long)]
    num_queries: Option<usize>,

    /// Neighbors per query (overrides config file)
    #[arg(short, long)]
    k: Option<usize>,

    /// Dataset / sampling seed (overrides config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the reports as JSON after the run
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Generate a default config file
    if args.generate_config {
        let config = GeoknnConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        println!("📝 You can edit this file and rerun the benchmark.");
        return Ok(());
    }

    // Load configuration
    let mut config = GeoknnConfig::from_file(&args.config)?;

    // Command-line arguments override the config file
    if let Some(num_points) = args.num_points {
        config.data.num_points = num_points;
    }
    if let Some(num_queries) = args.num_queries {
        config.benchmark.num_queries = num_queries;
    }
    if let Some(k) = args.k {
        config.benchmark.k = k;
    }
    if let Some(seed) = args.seed {
        config.data.seed = seed;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    config.validate()?;

    init_logging(&config.logging);

    info!("🚀 Starting geoknn benchmark...");
    info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    config.print_summary();

    let points = generate_points(config.data.num_points, config.data.seed);
    let num_queries = config.benchmark.num_queries;
    let k = config.benchmark.k;
    let seed = config.data.seed;

    let mut reports = Vec::new();

    // K-D tree
    let start = Instant::now();
    let kd_tree = ApproxKdTree::new(points.clone(), config.kdtree.max_depth);
    info!(
        "Built k-d tree over {} points (height {}, query depth bound {}) in {:.3?}",
        points.len(),
        kd_tree.height(),
        config.kdtree.max_depth,
        start.elapsed()
    );
    let report = run_benchmark("Approximate KD-Tree", &kd_tree, &points, num_queries, k, seed)?;
    info!("{}", report);
    reports.push(report);

    // Multi-table LSH
    let start = Instant::now();
    let mut lsh = MultiTableLsh::new(config.lsh.num_tables, config.lsh.hash_size, seed);
    lsh.insert(&points);
    info!(
        "Built LSH index ({} tables x {} bits) in {:.3?}",
        config.lsh.num_tables,
        config.lsh.hash_size,
        start.elapsed()
    );
    let report = run_benchmark("Multi-Table LSH", &lsh, &points, num_queries, k, seed)?;
    info!("{}", report);
    reports.push(report);

    // R-tree
    let start = Instant::now();
    let mut rtree = RTree::new(config.rtree.max_children);
    for point in &points {
        rtree.insert(point.clone());
    }
    info!(
        "Built R-tree (max_children {}, height {}) in {:.3?}",
        config.rtree.max_children,
        rtree.height(),
        start.elapsed()
    );
    let report = run_benchmark("R-Tree", &rtree, &points, num_queries, k, seed)?;
    info!("{}", report);
    reports.push(report);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

/// Initialize the logging system
fn init_logging(config: &geoknn::config::LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match config.output.as_str() {
        "file" => {
            if let Some(log_file) = &config.log_file {
                if let Some(parent) = log_file.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }

                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(log_file)
                    .expect("Failed to open log file");

                tracing_subscriber::registry()
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_target(false),
                    )
                    .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                    .init();
            }
        }
        _ => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }
}

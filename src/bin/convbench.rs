//! Benchmark driver: sparse vs dense convolution, and dense matmul variants.
//!
//! Run with: `cargo run --release --bin convbench -- compare --input pointcloud.csv`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sparsebench::config::BenchConfig;
use sparsebench::conv::{conv2d, constant_kernel, ConvAlgorithm};
use sparsebench::loader::{load_feature_map_or_zeroed, synthetic_feature_map};
use sparsebench::matmul::{Matrix, MatmulAlgorithm, MatmulOperands, DEFAULT_TILE};
use sparsebench::metrics::{
    print_comparison, print_conv_run, print_matmul_run, run_conv, run_matmul, ConvRun, ConvStrategy,
};
use sparsebench::sparse::RulebookPolicy;
use sparsebench::tensor::FeatureMap;
use sparsebench::Result;

#[derive(Parser)]
#[command(author, version, about = "Sparse (rulebook) vs dense convolution benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time the rulebook-based sparse convolution
    Sparse {
        #[command(flatten)]
        common: CommonArgs,
        /// How the rulebook recovers kernel indices
        #[arg(long, value_enum, default_value_t = PolicyArg::Explicit)]
        policy: PolicyArg,
        /// Build the rulebook once and time accumulation only
        #[arg(long)]
        reuse_plan: bool,
    },
    /// Time one dense convolution baseline
    Conv {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, value_enum, default_value_t = ConvArg::Im2col)]
        algorithm: ConvArg,
    },
    /// Time every convolution strategy and check each against the direct result
    Compare {
        #[command(flatten)]
        common: CommonArgs,
        /// Skip the direct (naive) baseline timing; it is still used as the reference
        #[arg(long)]
        skip_naive: bool,
    },
    /// Time the dense matmul variants on random square matrices
    Matmul {
        /// Matrix edge length
        #[arg(long, default_value_t = 512)]
        size: usize,
        #[arg(long, default_value_t = 8)]
        iterations: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Run a single variant instead of all of them
        #[arg(long, value_enum)]
        algorithm: Option<MatmulArg>,
        /// Block edge for the tiled variant
        #[arg(long, default_value_t = DEFAULT_TILE)]
        tile: usize,
    },
}

/// Options shared by the convolution subcommands. Flags override the config file.
#[derive(Args)]
struct CommonArgs {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV feature map (missing file -> all-zero map)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Generate a random feature map with this nonzero density instead of reading a CSV
    #[arg(long)]
    synthetic: Option<f64>,
    /// Keep synthetic nonzeros at least KERNEL_SIZE-1 away from the edges
    #[arg(long)]
    interior: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    out_channels: Option<usize>,
    #[arg(long)]
    kernel_size: Option<usize>,
    #[arg(long)]
    padding: Option<usize>,
    #[arg(long)]
    iterations: Option<usize>,
    /// Value of every kernel weight
    #[arg(long)]
    kernel_fill: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Explicit,
    Positional,
}

impl From<PolicyArg> for RulebookPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Explicit => RulebookPolicy::Explicit,
            PolicyArg::Positional => RulebookPolicy::Positional,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ConvArg {
    Naive,
    Im2col,
    Winograd,
}

impl From<ConvArg> for ConvAlgorithm {
    fn from(a: ConvArg) -> Self {
        match a {
            ConvArg::Naive => ConvAlgorithm::Naive,
            ConvArg::Im2col => ConvAlgorithm::Im2col,
            ConvArg::Winograd => ConvAlgorithm::Winograd,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MatmulArg {
    Ijk,
    Ikj,
    TransposedA,
    TransposedB,
    Unrolled,
    Tiled,
    Strassen,
}

impl MatmulArg {
    fn algorithm(self, tile: usize) -> MatmulAlgorithm {
        match self {
            MatmulArg::Ijk => MatmulAlgorithm::Ijk,
            MatmulArg::Ikj => MatmulAlgorithm::Ikj,
            MatmulArg::TransposedA => MatmulAlgorithm::TransposedA,
            MatmulArg::TransposedB => MatmulAlgorithm::TransposedB,
            MatmulArg::Unrolled => MatmulAlgorithm::Unrolled,
            MatmulArg::Tiled => MatmulAlgorithm::Tiled(tile),
            MatmulArg::Strassen => MatmulAlgorithm::Strassen,
        }
    }
}

impl CommonArgs {
    fn resolve(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_file(path)?,
            None => BenchConfig::default(),
        };
        let g = &mut config.geometry;
        if let Some(v) = self.height {
            g.height = v;
        }
        if let Some(v) = self.width {
            g.width = v;
        }
        if let Some(v) = self.out_channels {
            g.out_channels = v;
        }
        if let Some(v) = self.kernel_size {
            g.kernel_size = v;
        }
        if let Some(v) = self.padding {
            g.padding = v;
        }
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.kernel_fill {
            config.kernel_fill = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.synthetic {
            config.density = v;
            config.synthetic = true;
        } else if let Some(path) = &self.input {
            config.input = Some(path.clone());
            config.synthetic = false;
        }
        config.validate()?;
        Ok(config)
    }

    fn feature_map(&self, config: &BenchConfig) -> FeatureMap {
        let g = &config.geometry;
        let map = match &config.input {
            Some(path) if !config.uses_synthetic() => load_feature_map_or_zeroed(path, g.height, g.width),
            _ => {
                let margin = if self.interior { g.kernel_size.saturating_sub(1) } else { 0 };
                synthetic_feature_map(g.height, g.width, config.density, margin, config.seed)
            }
        };
        info!(shape = %map, density = map.density(), "feature map ready");
        map
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sparse { common, policy, reuse_plan } => {
            let config = common.resolve()?;
            let map = common.feature_map(&config);
            let kernel = constant_kernel(&config.geometry, config.kernel_fill);
            let strategy = if reuse_plan {
                ConvStrategy::SparseReusedPlan(policy.into())
            } else {
                ConvStrategy::Sparse(policy.into())
            };
            let run = run_conv(strategy, &map, &kernel, &config.geometry, config.iterations, None)?;
            print_conv_run(&run);
        }
        Command::Conv { common, algorithm } => {
            let config = common.resolve()?;
            let map = common.feature_map(&config);
            let kernel = constant_kernel(&config.geometry, config.kernel_fill);
            let strategy = ConvStrategy::Dense(algorithm.into());
            let run = run_conv(strategy, &map, &kernel, &config.geometry, config.iterations, None)?;
            print_conv_run(&run);
        }
        Command::Compare { common, skip_naive } => {
            let config = common.resolve()?;
            let g = &config.geometry;
            let map = common.feature_map(&config);
            let kernel = constant_kernel(g, config.kernel_fill);
            let reference = conv2d(ConvAlgorithm::Naive, map.as_tensor(), &kernel, g)?;

            let mut strategies: Vec<ConvStrategy> = ConvAlgorithm::ALL
                .into_iter()
                .filter(|a| !(skip_naive && *a == ConvAlgorithm::Naive))
                .map(ConvStrategy::Dense)
                .collect();
            strategies.push(ConvStrategy::Sparse(RulebookPolicy::Explicit));
            strategies.push(ConvStrategy::SparseReusedPlan(RulebookPolicy::Explicit));

            let mut runs: Vec<ConvRun> = Vec::with_capacity(strategies.len());
            for strategy in strategies {
                let run = run_conv(strategy, &map, &kernel, g, config.iterations, Some(&reference))?;
                print_conv_run(&run);
                runs.push(run);
            }
            print_comparison(&runs);
        }
        Command::Matmul { size, iterations, seed, algorithm, tile } => {
            let algorithms: Vec<MatmulAlgorithm> = match algorithm {
                Some(a) => vec![a.algorithm(tile)],
                None => MatmulAlgorithm::ALL
                    .into_iter()
                    .map(|a| match a {
                        MatmulAlgorithm::Tiled(_) => MatmulAlgorithm::Tiled(tile),
                        other => other,
                    })
                    .collect(),
            };
            for alg in &algorithms {
                alg.validate()?;
            }

            let mut rng = StdRng::seed_from_u64(seed);
            let a = Matrix::random(size, size, 10, &mut rng);
            let b = Matrix::random(size, size, 10, &mut rng);
            let operands = MatmulOperands::new(a, b);
            let reference = operands.multiply(MatmulAlgorithm::Ikj);

            println!("===== n = {size} =====");
            for alg in algorithms {
                let run = run_matmul(alg, &operands, iterations, &reference);
                print_matmul_run(&run);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("convbench=info,sparsebench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

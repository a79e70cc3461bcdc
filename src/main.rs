//! Anytime TSP Solver - Command Line Interface
//!
//! Without a subcommand, reads `N` followed by `N` coordinate pairs from stdin
//! and prints the visiting order, one index per line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use anytime_tsp::benchmark::{Benchmark, BenchmarkConfig};
use anytime_tsp::heuristics::anytime::{solve, SearchConfig, DEFAULT_TIME_LIMIT};
use anytime_tsp::instance::{TspInstance, DEFAULT_MAX_POINTS};
use anytime_tsp::logging::init_logger;
use anytime_tsp::Result;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "anytime-tsp")]
#[command(version = "1.0")]
#[command(about = "An anytime heuristic solver for the Euclidean TSP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (RUST_LOG overrides it)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Prefix log lines with a timestamp
    #[arg(long, global = true)]
    log_timestamps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance and print the tour to stdout
    Solve(SolveArgs),

    /// Run repeated searches with different seeds
    Benchmark {
        /// Path to the instance file
        #[arg(short, long)]
        input: PathBuf,

        /// Number of runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Time limit per run in milliseconds
        #[arg(short, long, default_value = "1980")]
        time_limit_ms: u64,

        /// Seed of the first run; run r uses seed + r
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Run sequentially instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Output CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Maximum number of points accepted
        #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
        max_points: usize,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of points accepted
        #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
        max_points: usize,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Instance file (plain or TSP-LIB); stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Search budget in milliseconds
    #[arg(short, long, default_value = "1980")]
    time_limit_ms: u64,

    /// Random seed (drawn from OS entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many double-bridge perturbations
    #[arg(long)]
    max_perturbations: Option<usize>,

    /// Maximum number of points accepted
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    max_points: usize,

    /// Write a JSON report of the solution
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print a summary to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Default for SolveArgs {
    fn default() -> Self {
        SolveArgs {
            input: None,
            time_limit_ms: DEFAULT_TIME_LIMIT.as_millis() as u64,
            seed: None,
            max_perturbations: None,
            max_points: DEFAULT_MAX_POINTS,
            json: None,
            verbose: false,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.log_level.to_filter(), cli.log_timestamps) {
        eprintln!("{}", e);
    }

    let result = match cli.command {
        None => solve_instance(&SolveArgs::default()),
        Some(Commands::Solve(args)) => solve_instance(&args),
        Some(Commands::Benchmark { input, runs, time_limit_ms, seed, sequential, csv, max_points }) => {
            run_benchmark(&input, runs, time_limit_ms, seed, sequential, csv.as_deref(), max_points)
        }
        Some(Commands::Analyze { input, max_points }) => analyze_instance(&input, max_points),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_instance(input: Option<&Path>, max_points: usize) -> Result<TspInstance> {
    match input {
        Some(path) => TspInstance::from_file(path, max_points),
        None => TspInstance::from_reader(io::stdin().lock(), "stdin", max_points),
    }
}

fn solve_instance(args: &SolveArgs) -> Result<()> {
    let instance = load_instance(args.input.as_deref(), args.max_points)?;

    let config = SearchConfig {
        time_limit: Duration::from_millis(args.time_limit_ms),
        seed: args.seed,
        max_perturbations: args.max_perturbations,
    };
    let outcome = solve(&instance, &config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write!(out, "{}", outcome.tour)?;
    out.flush()?;

    if args.verbose {
        let stats = &outcome.stats;
        eprintln!("Instance: {} (n={})", instance.name, instance.dimension());
        eprintln!("Initial length: {:.4}", stats.initial_length);
        eprintln!("Best length: {:.4}", stats.best_length);
        eprintln!(
            "Passes: {}  Perturbations: {}  Incumbent updates: {}",
            stats.passes, stats.perturbations, stats.incumbent_updates
        );
        eprintln!("Time: {:.4}s", stats.elapsed_secs);
    }

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, json)?;
        log::info!("solution saved to {:?}", path);
    }

    Ok(())
}

fn run_benchmark(
    input: &Path,
    runs: usize,
    time_limit_ms: u64,
    seed: u64,
    sequential: bool,
    csv: Option<&Path>,
    max_points: usize,
) -> Result<()> {
    let instance = TspInstance::from_file(input, max_points)?;

    let config = BenchmarkConfig {
        runs,
        search: SearchConfig {
            time_limit: Duration::from_millis(time_limit_ms),
            ..Default::default()
        },
        base_seed: seed,
        parallel: !sequential,
        show_progress: true,
    };

    let mut benchmark = Benchmark::new(config);
    let summary = benchmark.run(&instance);

    println!("{}", benchmark.generate_report(&summary));

    if let Some(path) = csv {
        benchmark.export_to_csv(path)?;
        println!("Results exported to {:?}", path);
    }

    Ok(())
}

fn analyze_instance(input: &Path, max_points: usize) -> Result<()> {
    let instance = TspInstance::from_file(input, max_points)?;
    print!("{}", instance.statistics());
    Ok(())
}

//! Many-core cycle-synchronization simulator CLI.
//!
//! This binary drives the engine over a synthetic workload. It performs:
//! 1. **Run:** Load (or default) the configuration, apply command-line overrides, build
//!    the cores and shared resources, and run every frame, printing each frame report.
//! 2. **Config:** Print the effective configuration as JSON, as a starting point for
//!    `--config` files.

mod workload;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mcsim_core::common::SimResult;
use mcsim_core::config::Config;
use mcsim_core::sim::{Animation, Engine, FrameLoop};

use workload::{FrameCounter, ReportPrinter};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate many-core simulator",
    long_about = "Run a synthetic workload through the multi-threaded cycle-synchronization engine.\n\nExamples:\n  sim run --cores 16 --banks 4 --threads 8\n  sim run --serial --stop-cycle 5000\n  sim run --frames 10 --rebuild-every 3\n  sim config > sim.json && sim run --config sim.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the synthetic workload.
    Run(RunArgs),

    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Configuration file to start from.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file; command-line flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads (clamped to the number of cores).
    #[arg(short, long)]
    threads: Option<usize>,

    /// Run every core on the main thread without a barrier.
    #[arg(long)]
    serial: bool,

    /// Stop every core after this many cycles.
    #[arg(long)]
    stop_cycle: Option<u64>,

    /// Cores attached to each shared bank.
    #[arg(long)]
    cores: Option<usize>,

    /// Number of shared banks.
    #[arg(long)]
    banks: Option<usize>,

    /// Number of animation frames (0 runs a single frame without animation).
    #[arg(long)]
    frames: Option<usize>,

    /// Rebuild the spatial index every N frames (0 never rebuilds).
    #[arg(long)]
    rebuild_every: Option<u32>,

    /// Instructions each core issues before halting.
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    instructions: u64,

    /// Report sections to print (summary, utilization, shared); all when omitted.
    #[arg(long, value_delimiter = ',')]
    stats: Vec<String>,

    /// Print frame reports as JSON.
    #[arg(long)]
    json: bool,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Config(args) => cmd_config(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> SimResult<Config> {
    path.map_or_else(|| Ok(Config::default()), |p| Config::from_file(p))
}

/// Prints the configuration, after validation, as pretty JSON.
fn cmd_config(args: &ConfigArgs) -> SimResult<()> {
    let config = load_config(args.config.as_ref())?;
    config.validate()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Applies overrides, builds the workload, and runs every frame.
fn cmd_run(args: RunArgs) -> SimResult<()> {
    let mut config = load_config(args.config.as_ref())?;
    config.general.verbose |= args.verbose;
    init_logging(config.general.verbose);

    if let Some(threads) = args.threads {
        config.general.simulation_threads = threads;
    }
    config.general.serial_execution |= args.serial;
    if args.stop_cycle.is_some() {
        config.general.stop_cycle = args.stop_cycle;
    }
    if let Some(cores) = args.cores {
        config.system.cores_per_bank = cores;
    }
    if let Some(banks) = args.banks {
        config.system.num_banks = banks;
    }
    if let Some(frames) = args.frames {
        config.animation.num_frames = frames;
    }
    if let Some(every) = args.rebuild_every {
        config.animation.rebuild_frequency = every;
    }
    config.validate()?;

    info!(
        cores = config.total_cores(),
        banks = config.system.num_banks,
        threads = config.general.simulation_threads,
        serial = config.general.serial_execution,
        "building workload"
    );
    let (cores, shared) = workload::build(&config, args.instructions);
    let mut engine = Engine::new(cores, shared, &config)?;

    let mut animation = (config.animation.num_frames > 0)
        .then(|| FrameCounter::new(config.animation.num_frames));
    let mut printer = ReportPrinter {
        sections: args.stats,
        json: args.json,
    };

    let summary = FrameLoop::new(&config.animation).run(
        &mut engine,
        animation.as_mut().map(|a| a as &mut dyn Animation),
        &mut printer,
    )?;

    info!(
        frames = summary.frames,
        rebuilds = animation.as_ref().map_or(0, FrameCounter::rebuilds),
        total_cycles = summary.total_cycles,
        "simulation finished"
    );
    Ok(())
}

use octsim::configuration::config::{resolve_scenario_path, InitialConditions};
use octsim::simulation::barnes_hut::DEFAULT_MAX_DEPTH;
use octsim::{bench_gravity, bench_step, sample_bodies};
use octsim::{Engine, Environment, ForceAlgorithm, ForceLaw, Parameters, StepLogger, DEFAULT_THETA, G};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "N-body gravity with pairwise or Barnes-Hut forces")]
struct Args {
    /// Initial-condition YAML, as a path or a name under scenarios/
    #[arg(short, default_value = "cluster.yaml")]
    file_name: String,

    #[arg(long, value_enum, default_value_t = ForceAlgorithm::BarnesHut)]
    algorithm: ForceAlgorithm,

    /// Barnes-Hut opening angle, within [0, 1]
    #[arg(long, default_value_t = DEFAULT_THETA)]
    theta: f64,

    #[arg(long, value_enum, default_value_t = ForceLaw::PerAxis)]
    law: ForceLaw,

    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    #[arg(long, default_value_t = 10.0)]
    duration: f64,

    /// Write a CSV step log
    #[arg(long)]
    log: bool,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Overrides global.seed from the file
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Time both evaluators instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_initial_conditions(file_name: &str) -> Result<InitialConditions> {
    let config_path = resolve_scenario_path(file_name);
    InitialConditions::from_path(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_gravity(args.theta, args.law)?;
        bench_step(args.theta, args.law)?;
        return Ok(());
    }

    let engine = Engine::new(args.algorithm, args.theta, args.law)?;
    let params = Parameters {
        dt: args.dt,
        duration: args.duration,
        g: G,
        max_depth: args.max_depth,
        seed: args.seed,
    };

    let ic = load_initial_conditions(&args.file_name)?;
    let bodies = sample_bodies(&ic, params.seed)?;

    let mut env = Environment::new(bodies, &engine, &params);
    if args.log {
        let logger = StepLogger::rotating(&args.log_dir, "octsim");
        info!(path = %logger.path().display(), "logging steps");
        env = env.with_logger(logger);
    }

    let steps = env.simulate(params.duration, params.dt)?;
    info!(steps, time = env.time(), "done");

    Ok(())
}

//! Virtual grasp experiment sweep harness.
//!
//! Sweeps fusion method x weight x user-input point over every object in the
//! evaluation directory and checkpoints the result table after each object.
//!
//! # Usage
//!
//! ```bash
//! # Parameters from a config file
//! cargo run --release --bin run_experiments -- --config configs/sweep.yaml
//!
//! # Or fully from flags, against the in-process mock evaluator
//! cargo run --release --bin run_experiments -- \
//!     --model GQCNN-4.0-SUCTION \
//!     --camera-intr data/calib/basler.intr \
//!     --evaluator-config cfg/dex-net_4.0_suction.yaml \
//!     --evaluation-dir data/virtual_evaluation/renderings \
//!     --mock --seed 42
//! ```

use std::path::PathBuf;

use clap::Parser;

use fusion_eval::config::{EvaluatorConfig, SweepConfig};
use fusion_eval::evaluator::create_evaluator;
use fusion_eval::sweep::run_sweep;

#[derive(Parser)]
#[command(name = "run-experiments")]
#[command(about = "Run virtual grasp-fusion experiments over an evaluation directory")]
struct Args {
    /// Sweep configuration YAML; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grasp model identifier (e.g. GQCNN-4.0-SUCTION)
    #[arg(long)]
    model: Option<String>,

    /// Camera intrinsics file
    #[arg(long)]
    camera_intr: Option<PathBuf>,

    /// Evaluator configuration file (its name selects the gripper variant)
    #[arg(long)]
    evaluator_config: Option<PathBuf>,

    /// Root directory with one subdirectory per object
    #[arg(long)]
    evaluation_dir: Option<PathBuf>,

    /// Result table file name, created inside the evaluation directory
    #[arg(long)]
    output: Option<String>,

    /// Maximum user-input points per object
    #[arg(long)]
    max_points: Option<usize>,

    /// Maximum camera views per object
    #[arg(long)]
    max_views: Option<usize>,

    /// Use the in-process mock evaluator regardless of the config file
    #[arg(long)]
    mock: bool,

    /// Mock evaluator seed (0 = nondeterministic)
    #[arg(long, default_value = "0")]
    seed: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> fusion_eval::Result<()> {
    let config = build_config(args)?;

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║              VIRTUAL GRASP-FUSION EXPERIMENT SWEEP               ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("Model: {}", config.model_name);
    println!("Evaluation dir: {}", config.evaluation_dir.display());
    println!("Evaluator config: {}", config.evaluator_config_path.display());
    println!(
        "Limits: {} view(s), {} point(s) per object",
        config.limits.max_views_per_object, config.limits.max_user_points
    );
    match &config.evaluator {
        EvaluatorConfig::Process { command, .. } => println!("Evaluator: process ({command})"),
        EvaluatorConfig::Mock { seed, failure_rate } => {
            println!("Evaluator: mock (seed {seed}, failure rate {failure_rate})")
        }
    }
    println!();

    let mut evaluator = create_evaluator(&config.evaluator);
    let table = run_sweep(&config, evaluator.as_mut())?;

    println!();
    println!("=== Sweep Summary ===");
    println!();
    println!("Result rows: {}", table.len());
    println!("Fallback rows (no valid grasp): {}", table.fallback_count());
    println!("Result table: {}", config.output_path().display());

    Ok(())
}

fn build_config(args: &Args) -> fusion_eval::Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };

    if let Some(model) = &args.model {
        config.model_name = model.clone();
    }
    if let Some(camera_intr) = &args.camera_intr {
        config.camera_intr_path = camera_intr.clone();
    }
    if let Some(evaluator_config) = &args.evaluator_config {
        config.evaluator_config_path = evaluator_config.clone();
    }
    if let Some(evaluation_dir) = &args.evaluation_dir {
        config.evaluation_dir = evaluation_dir.clone();
    }
    if let Some(output) = &args.output {
        config.output_filename = output.clone();
    }
    if let Some(max_points) = args.max_points {
        config.limits.max_user_points = max_points;
    }
    if let Some(max_views) = args.max_views {
        config.limits.max_views_per_object = max_views;
    }
    if args.mock {
        config.evaluator = EvaluatorConfig::Mock {
            seed: args.seed,
            failure_rate: 0.0,
        };
    }

    config.validate()?;
    Ok(config)
}

//! Aggregate a persisted result table and render the comparison figure.
//!
//! Loads a CSV produced by `run_experiments`, groups it by fusion weight
//! within each fusion method, prints the per-group means, and writes a
//! stacked bar-chart SVG (one panel per method).
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin plot_results -- \
//!     renderings/virtual_experiments_results.csv \
//!     --output evaluation_results.svg --output-json summary.json
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;

use fusion_eval::aggregate::{aggregate, MethodSummary};
use fusion_eval::plot::{save_summary_chart, ChartConfig, DEFAULT_CHART_FILENAME};
use fusion_eval::table::ResultTable;
use fusion_eval::Error;

#[derive(Parser)]
#[command(name = "plot-results")]
#[command(about = "Aggregate experiment results and render the per-method comparison figure")]
struct Args {
    /// Result table CSV produced by run_experiments
    results: PathBuf,

    /// Output SVG file
    #[arg(short, long, default_value = DEFAULT_CHART_FILENAME)]
    output: PathBuf,

    /// Export the aggregated summary as JSON
    #[arg(long, value_name = "FILE")]
    output_json: Option<PathBuf>,

    /// Suppress the stdout summary table
    #[arg(long)]
    quiet: bool,
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
    let table = ResultTable::load(&args.results)?;
    let summaries = aggregate(&table);

    if !args.quiet {
        println!(
            "Loaded {} rows ({} fallbacks) from {}",
            table.len(),
            table.fallback_count(),
            args.results.display()
        );
        println!();
        print_summaries(&summaries);
    }

    save_summary_chart(&summaries, &ChartConfig::default(), &args.output)?;
    println!("Figure written to: {}", args.output.display());

    if let Some(json_path) = &args.output_json {
        export_json(&summaries, json_path)?;
        println!("JSON summary written to: {}", json_path.display());
    }

    Ok(())
}

fn print_summaries(summaries: &[MethodSummary]) {
    for summary in summaries {
        println!("{}", summary.method);
        println!("┌────────────┬─────────┬──────────┬──────────┬──────────┐");
        println!("│ Weight     │ Samples │ Distance │ Quality  │ Metric   │");
        println!("├────────────┼─────────┼──────────┼──────────┼──────────┤");
        for row in &summary.rows {
            println!(
                "│ {:10} │ {:7} │ {:>8} │ {:>8} │ {:>8} │",
                row.weight.as_str(),
                row.samples,
                format_mean(row.mean_distance),
                format_mean(row.mean_quality),
                format_mean(row.mean_metric),
            );
        }
        println!("└────────────┴─────────┴──────────┴──────────┴──────────┘");
        println!();
    }
}

fn format_mean(value: f64) -> String {
    if value.is_nan() {
        "N/A".to_string()
    } else {
        format!("{:.4}", value)
    }
}

fn export_json(summaries: &[MethodSummary], path: &Path) -> fusion_eval::Result<()> {
    let json = serde_json::to_string_pretty(summaries)
        .map_err(|e| Error::Config(format!("failed to serialize summary: {e}")))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

//! AdLens — campaign performance analyzer and budget-reallocation
//! planner.
//!
//! Loads a campaign CSV, runs the analysis pipeline, and prints the
//! performance summary, optimization recommendations, and the proposed
//! budget reallocation.

use adlens_analytics::run_analysis;
use adlens_core::config::AppConfig;
use adlens_ingest::load_campaigns;
use adlens_reporting::{render_reallocation, render_recommendations, render_summary, write_results_csv};
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adlens")]
#[command(about = "Campaign performance analyzer and budget-reallocation planner")]
#[command(version)]
struct Cli {
    /// Path to the campaign CSV file (overrides config)
    input: Option<String>,

    /// Average order value assumed per conversion (overrides config)
    #[arg(long, env = "ADLENS__ANALYSIS__AVERAGE_ORDER_VALUE")]
    aov: Option<f64>,

    /// Fraction of each bottom-quintile budget to reallocate (overrides config)
    #[arg(long, env = "ADLENS__ANALYSIS__CUT_FRACTION")]
    cut_fraction: Option<f64>,

    /// Export the ranked results to this CSV path (overrides config)
    #[arg(long)]
    output_csv: Option<String>,

    /// Print the full analysis outcome as JSON instead of the reports
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adlens=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(aov) = cli.aov {
        config.analysis.average_order_value = aov;
    }
    if let Some(cut_fraction) = cli.cut_fraction {
        config.analysis.cut_fraction = cut_fraction;
    }
    if let Some(path) = cli.output_csv {
        config.output_csv = Some(path);
    }

    let input = cli
        .input
        .or(config.input_path.clone())
        .context("no input file given; pass a CSV path or set ADLENS__INPUT_PATH")?;

    let records = load_campaigns(&input)?;
    info!(campaigns = records.len(), input = %input, "Campaign data loaded");

    let outcome = run_analysis(records, &config.analysis)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_summary(&outcome.ranked));
        println!();
        print!("{}", render_recommendations(&outcome.ranked));
        println!();
        print!("{}", render_reallocation(&outcome.plan));
    }

    if let Some(path) = &config.output_csv {
        write_results_csv(path, &outcome.ranked)?;
    }

    Ok(())
}

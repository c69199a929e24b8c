//! report-runner: headless pipeline runner for FilterWatch.
//!
//! Usage:
//!   report-runner --input data/dme_claims.csv
//!   report-runner --input data/dme_claims.csv --seed 42 --out report.json
//!   report-runner --config pipeline.json --out report.json

use anyhow::{bail, Result};
use filterwatch_core::{
    config::PipelineConfig,
    pipeline::{run_anomaly_pipeline, run_zone_pipeline},
    report::{AnomalyReport, ZoneReport},
};
use std::env;
use std::path::PathBuf;

/// Everything the presentation layer consumes, in one JSON document.
#[derive(serde::Serialize)]
struct ReportBundle {
    generated_at: String,
    seed: u64,
    input_path: String,
    anomaly: AnomalyReport,
    zones: ZoneReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match flag_value(&args, "--config") {
        Some(path) => PipelineConfig::from_file(&PathBuf::from(path))?,
        None => match flag_value(&args, "--input") {
            Some(input) => PipelineConfig::new(input),
            None => bail!("either --config <json> or --input <csv> is required"),
        },
    };
    // Explicit flags override the config file.
    if let Some(input) = flag_value(&args, "--input") {
        config.input_path = PathBuf::from(input);
    }
    if let Some(seed) = flag_value(&args, "--seed") {
        config.seed = seed.parse()?;
    }
    let out_path = flag_value(&args, "--out").map(PathBuf::from);

    println!("FilterWatch — report-runner");
    println!("  input: {}", config.input_path.display());
    println!("  seed:  {}", config.seed);
    println!();

    let anomaly = run_anomaly_pipeline(&config)?;
    let zones = run_zone_pipeline(&config)?;
    log::info!(
        "pipelines complete: {} providers screened, {} zoned",
        anomaly.kpis.total_providers,
        zones.kpis.total_providers
    );

    print_summary(&anomaly, &zones);

    if let Some(out) = out_path {
        let bundle = ReportBundle {
            generated_at: chrono::Local::now().to_rfc3339(),
            seed: config.seed,
            input_path: config.input_path.display().to_string(),
            anomaly,
            zones,
        };
        std::fs::write(&out, serde_json::to_string_pretty(&bundle)?)?;
        println!();
        println!("Report bundle written to {}", out.display());
    }

    Ok(())
}

fn print_summary(anomaly: &AnomalyReport, zones: &ZoneReport) {
    println!("=== USAGE SUMMARY ===");
    println!("  providers:        {}", zones.kpis.total_providers);
    println!("  rows dropped:     {}", zones.kpis.rows_dropped);
    println!("  total units used: {}", zones.kpis.total_units_used);
    println!(
        "  avg per provider: {:.1}",
        zones.kpis.mean_units_per_provider
    );

    println!();
    println!("=== OUTLIER SCREEN ===");
    println!("  anomalies detected: {}", anomaly.kpis.anomalies_detected);
    for entry in &anomaly.label_breakdown {
        println!("  {:<12} {}", entry.label, entry.count);
    }
    if let Some(top) = anomaly.anomalous_providers.first() {
        println!(
            "  top anomaly: {} / {} | claims: {} | units: {}",
            top.state, top.specialty, top.claim_count, top.units_used
        );
    }

    println!();
    println!("=== USAGE ZONES ===");
    println!("  over-consumers: {}", zones.kpis.over_consumers);
    for entry in &zones.zone_breakdown {
        println!("  {:<18} {}", entry.label, entry.count);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

use filterwatch_core::config::PipelineConfig;
use filterwatch_core::error::PipelineError;
use filterwatch_core::features::derive_features;
use filterwatch_core::loader::{self, load_claims};
use filterwatch_core::pipeline::{run_anomaly_pipeline, run_zone_pipeline};
use filterwatch_core::rng::{PipelineRng, StreamSlot};
use filterwatch_core::simulate::simulate_usage;
use std::path::PathBuf;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn fixture_config() -> PipelineConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    PipelineConfig::new(fixture("dme_claims_small.csv"))
}

// ── Load errors ──────────────────────────────────────────────────────────────

/// A missing required column is a fatal load error naming the column.
#[test]
fn missing_column_is_fatal() {
    let config = PipelineConfig::new(fixture("dme_claims_missing_copd.csv"));

    let result = run_zone_pipeline(&config);

    match result {
        Err(PipelineError::MissingColumn { name }) => {
            assert_eq!(name, loader::COL_COPD_PREVALENCE);
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

/// An unreadable input file is a fatal load error.
#[test]
fn missing_file_is_fatal() {
    let config = PipelineConfig::new(fixture("no_such_file.csv"));

    assert!(matches!(
        run_zone_pipeline(&config),
        Err(PipelineError::Open { .. })
    ));
}

// ── End-to-end scenarios ─────────────────────────────────────────────────────

/// The canonical row: {CA, Pulmonology, 1000 claims, 20% prevalence}
/// derives weight 0.2 and demand 1200 exactly, and simulates into the
/// 90%–110% band [1080, 1320].
#[test]
fn canonical_row_end_to_end() {
    let config = fixture_config();
    let claims = load_claims(&config.input_path).unwrap();
    let demand = derive_features(&claims);

    let ca = demand
        .iter()
        .find(|r| r.state == "CA")
        .expect("CA row in fixture");
    assert_eq!(ca.copd_weight, 0.2);
    assert_eq!(ca.adjusted_demand, 1200.0);

    let outcome = simulate_usage(
        &demand,
        &mut PipelineRng::for_stream(config.seed, StreamSlot::Usage),
    );
    let ca_usage = outcome
        .records
        .iter()
        .find(|r| r.state == "CA")
        .expect("CA row survives");
    assert!(
        (1080..=1320).contains(&ca_usage.units_used),
        "units {} outside the perturbation band of demand 1200",
        ca_usage.units_used
    );
}

/// The fixture carries two rows with missing numerics: both pipelines
/// surface the exclusion count and agree on the surviving row count.
#[test]
fn drop_count_is_observable() {
    let config = fixture_config();

    let zones = run_zone_pipeline(&config).unwrap();
    let anomaly = run_anomaly_pipeline(&config).unwrap();

    assert_eq!(zones.kpis.rows_dropped, 2);
    assert_eq!(zones.kpis.total_providers, 12);
    assert_eq!(anomaly.kpis.rows_dropped, 2);
    assert_eq!(anomaly.kpis.total_providers, 12);
}

/// Both variants consume the identical usage stream: their units_used
/// totals must match exactly.
#[test]
fn variants_share_the_usage_stream() {
    let config = fixture_config();

    let zones = run_zone_pipeline(&config).unwrap();
    let anomaly = run_anomaly_pipeline(&config).unwrap();

    assert_eq!(
        zones.kpis.total_units_used,
        anomaly.kpis.total_units_used
    );
    assert_eq!(
        zones.kpis.mean_units_per_provider,
        anomaly.kpis.mean_units_per_provider
    );
}

/// Every fixture provider lands in the zone its deviation dictates, and
/// the zone breakdown covers the full table.
#[test]
fn zone_breakdown_covers_table() {
    let config = fixture_config();

    let report = run_zone_pipeline(&config).unwrap();

    let total: usize = report.zone_breakdown.iter().map(|e| e.count).sum();
    assert_eq!(total, report.kpis.total_providers);
    assert_eq!(report.provider_table.len(), report.kpis.total_providers);
}

/// Twelve rows floor the 5% contamination target to zero: the screen
/// labels the whole fixture Normal rather than inventing an anomaly.
#[test]
fn small_fixture_screens_all_normal() {
    let config = fixture_config();

    let report = run_anomaly_pipeline(&config).unwrap();

    assert_eq!(report.kpis.anomalies_detected, 0);
    assert!(report.anomalous_providers.is_empty());
}

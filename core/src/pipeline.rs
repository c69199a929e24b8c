//! The pipeline — one batch execution per invocation.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Loader            (claims CSV → ClaimRecord table)
//!   2. Feature Deriver   (COPD weight, adjusted demand)
//!   3. Usage Simulator   (perturbed units_used; drops non-finite rows)
//!   4. Classifier        (variant A: outlier screen / variant B: zones)
//!   5. Report Assembler  (KPIs + presentation projections)
//!
//! RULES:
//!   - Single-threaded, synchronous, no retries: a failure means the
//!     input violated an upstream invariant and the run aborts.
//!   - All randomness flows through PipelineRng streams derived from the
//!     configured master seed. Both variants build the usage table from
//!     the same Usage stream, so their units_used columns are identical.

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::features::derive_features;
use crate::forest::screen_providers;
use crate::loader::load_claims;
use crate::report::{assemble_anomaly_report, assemble_zone_report, AnomalyReport, ZoneReport};
use crate::rng::{PipelineRng, StreamSlot};
use crate::simulate::{simulate_usage, SimulationOutcome};
use crate::zones::classify_zones;

/// Load, derive, and simulate — the stages shared by both variants.
fn build_usage_table(config: &PipelineConfig) -> PipelineResult<SimulationOutcome> {
    let claims = load_claims(&config.input_path)?;
    let demand = derive_features(&claims);
    let mut rng = PipelineRng::for_stream(config.seed, StreamSlot::Usage);
    Ok(simulate_usage(&demand, &mut rng))
}

/// Variant A: outlier screen over the usage table.
pub fn run_anomaly_pipeline(config: &PipelineConfig) -> PipelineResult<AnomalyReport> {
    let outcome = build_usage_table(config)?;
    let mut rng = PipelineRng::for_stream(config.seed, StreamSlot::OutlierModel);
    let screened = screen_providers(outcome.records, &mut rng)?;
    Ok(assemble_anomaly_report(&screened, outcome.rows_dropped))
}

/// Variant B: rule-based zone classification over the usage table.
pub fn run_zone_pipeline(config: &PipelineConfig) -> PipelineResult<ZoneReport> {
    let outcome = build_usage_table(config)?;
    let zoned = classify_zones(outcome.records);
    Ok(assemble_zone_report(&zoned, outcome.rows_dropped))
}

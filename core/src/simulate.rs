//! Usage simulation — perturbed consumable demand.
//!
//! Each row's adjusted demand is multiplied by one uniform draw from
//! [PERTURBATION_LOW, PERTURBATION_HIGH), rounded to the nearest integer,
//! and stored as `units_used`.
//!
//! RULES:
//!   - The i-th row of the table, in table order, consumes the i-th draw
//!     from the usage stream. Every row consumes its draw, including rows
//!     that are then dropped — survivors never shift onto a neighbor's draw.
//!   - Rows whose perturbed value is non-finite are excluded from the
//!     output. The exclusion count is returned and logged, not swallowed.

use crate::features::DemandRecord;
use crate::rng::PipelineRng;

// ── Constants ────────────────────────────────────────────────────────────────

pub const PERTURBATION_LOW: f64 = 0.9;
pub const PERTURBATION_HIGH: f64 = 1.1;

// ── Records ──────────────────────────────────────────────────────────────────

/// A fully concrete provider row: every survivor of the finiteness
/// filter has a finite demand and an integral usage figure.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub state: String,
    pub specialty: String,
    pub claim_count: u64,
    pub copd_weight: f64,
    pub adjusted_demand: f64,
    pub units_used: u64,
}

impl UsageRecord {
    /// Signed gap between simulated usage and expected demand.
    pub fn deviation(&self) -> f64 {
        self.units_used as f64 - self.adjusted_demand
    }
}

/// Surviving rows plus the observable exclusion count.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub records: Vec<UsageRecord>,
    pub rows_dropped: usize,
}

// ── Simulation ───────────────────────────────────────────────────────────────

/// Simulate per-provider usage over the demand table.
///
/// `rng` must be a fresh `StreamSlot::Usage` stream; both pipeline
/// variants pass one seeded from the same master seed, which is what
/// makes `units_used` identical across variants.
pub fn simulate_usage(demand: &[DemandRecord], rng: &mut PipelineRng) -> SimulationOutcome {
    let mut records = Vec::with_capacity(demand.len());
    let mut rows_dropped = 0usize;

    for rec in demand {
        let factor = rng.uniform_in(PERTURBATION_LOW, PERTURBATION_HIGH);
        let perturbed = rec.adjusted_demand * factor;

        let claim_count = match rec.claim_count {
            Some(count) if perturbed.is_finite() => count,
            _ => {
                rows_dropped += 1;
                continue;
            }
        };

        // Out-of-range source data can drive demand negative; usage is
        // defined as a non-negative integer, so clamp at zero.
        let units_used = perturbed.round().max(0.0) as u64;

        records.push(UsageRecord {
            state: rec.state.clone(),
            specialty: rec.specialty.clone(),
            claim_count,
            copd_weight: rec.copd_weight,
            adjusted_demand: rec.adjusted_demand,
            units_used,
        });
    }

    if rows_dropped > 0 {
        log::info!(
            "simulate: dropped {rows_dropped} of {} rows (non-finite usage)",
            demand.len()
        );
    }
    SimulationOutcome {
        records,
        rows_dropped,
    }
}

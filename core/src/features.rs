//! Feature derivation — COPD weight and adjusted demand.
//!
//! Pure pass over the claim table:
//!   copd_weight     = copd_prevalence_pct / 100
//!   adjusted_demand = claim_count * (1 + copd_weight)
//!
//! The claim count doubles as the theoretical (unweighted) unit demand;
//! the COPD weight scales it up as a proxy for expected consumable usage.
//! Missing source values derive to NaN and are excluded, with an
//! observable count, by the usage simulator.

use crate::loader::ClaimRecord;

/// A claim row enriched with derived demand features.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRecord {
    pub state: String,
    pub specialty: String,
    pub claim_count: Option<u64>,
    /// `copd_prevalence_pct / 100`, in [0, 1] for well-formed input.
    /// NaN when the prevalence is missing.
    pub copd_weight: f64,
    /// `claim_count * (1 + copd_weight)`. NaN when either source is missing.
    pub adjusted_demand: f64,
}

/// Derive demand features for every row. Row count and order preserved.
pub fn derive_features(claims: &[ClaimRecord]) -> Vec<DemandRecord> {
    claims
        .iter()
        .map(|claim| {
            let copd_weight = match claim.copd_prevalence_pct {
                Some(pct) => pct / 100.0,
                None => f64::NAN,
            };
            let adjusted_demand = match claim.claim_count {
                Some(count) => count as f64 * (1.0 + copd_weight),
                None => f64::NAN,
            };
            DemandRecord {
                state: claim.state.clone(),
                specialty: claim.specialty.clone(),
                claim_count: claim.claim_count,
                copd_weight,
                adjusted_demand,
            }
        })
        .collect()
}

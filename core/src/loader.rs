//! CSV loader for the CMS DME referring-provider dataset.
//!
//! The loader is a thin I/O wrapper with hardcoded column semantics:
//!   1. Locates the four required columns by header name
//!   2. Reads every row into an in-memory ClaimRecord table
//!   3. Loads blank or unparseable numeric cells as None
//!
//! A missing required column is a fatal load error. A missing *value* is
//! not — it flows downstream as NaN and falls out at the finiteness
//! filter in the usage simulator, where the exclusion is counted.

use crate::error::{PipelineError, PipelineResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ── Required columns ─────────────────────────────────────────────────────────

pub const COL_STATE: &str = "Rfrg_Prvdr_State_Abrvtn";
pub const COL_SPECIALTY: &str = "Rfrg_Prvdr_Spclty_Desc";
pub const COL_CLAIM_COUNT: &str = "DME_Tot_Suplr_Clms";
pub const COL_COPD_PREVALENCE: &str = "Bene_CC_PH_COPD_V2_Pct";

// ── Records ──────────────────────────────────────────────────────────────────

/// One loaded row: a referring-provider claim aggregate, as-sourced.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    pub state: String,
    pub specialty: String,
    /// Total DME supplier claims. None when the source cell is blank
    /// or not a non-negative integer.
    pub claim_count: Option<u64>,
    /// Percent of beneficiaries with COPD, in [0, 100]. None when the
    /// source cell is blank or unparseable.
    pub copd_prevalence_pct: Option<f64>,
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// Read the claims CSV at `path` into an in-memory table.
///
/// Extra columns are ignored. Row order is preserved — the usage
/// simulator's draw stream is aligned to it.
pub fn load_claims(path: &Path) -> PipelineResult<Vec<ClaimRecord>> {
    let file = File::open(path).map_err(|e| PipelineError::Open {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let find = |name: &'static str| -> PipelineResult<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(PipelineError::MissingColumn { name })
    };
    let state_idx = find(COL_STATE)?;
    let specialty_idx = find(COL_SPECIALTY)?;
    let claims_idx = find(COL_CLAIM_COUNT)?;
    let copd_idx = find(COL_COPD_PREVALENCE)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(ClaimRecord {
            state: field(&row, state_idx).to_string(),
            specialty: field(&row, specialty_idx).to_string(),
            claim_count: field(&row, claims_idx).parse::<u64>().ok(),
            copd_prevalence_pct: field(&row, copd_idx).parse::<f64>().ok(),
        });
    }

    log::info!(
        "loader: {} rows read from '{}'",
        records.len(),
        path.display()
    );
    Ok(records)
}

fn field<'a>(row: &'a csv::StringRecord, idx: usize) -> &'a str {
    row.get(idx).unwrap_or("").trim()
}

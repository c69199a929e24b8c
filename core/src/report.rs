//! Report assembly — KPIs and presentation projections.
//!
//! Everything here is read-only over the classified tables. The output
//! structs are the contract with the presentation collaborator: scalar
//! KPIs, a label-distribution breakdown for pie/bar rendering, a scatter
//! dataset, and a sorted provider detail table.
//!
//! Means are rounded to one decimal place. Breakdown categories come out
//! in fixed enum order so the report JSON is stable across runs.

use crate::forest::{AnomalyLabel, ScreenedRecord};
use crate::zones::{UsageZone, ZonedRecord};
use serde::Serialize;

// ── Shared shapes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

// ── Variant A: outlier screen report ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyKpis {
    pub total_providers: usize,
    pub rows_dropped: usize,
    pub total_units_used: u64,
    pub mean_units_per_provider: f64,
    pub anomalies_detected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyDetailRow {
    pub state: String,
    pub specialty: String,
    pub claim_count: u64,
    pub units_used: u64,
    pub copd_weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyReport {
    pub kpis: AnomalyKpis,
    pub label_breakdown: Vec<LabelCount>,
    /// x = copd_weight, y = units_used.
    pub scatter: Vec<ScatterPoint>,
    /// Anomalous providers only, descending by units_used.
    pub anomalous_providers: Vec<AnomalyDetailRow>,
}

pub fn assemble_anomaly_report(records: &[ScreenedRecord], rows_dropped: usize) -> AnomalyReport {
    let total_units_used: u64 = records.iter().map(|r| r.usage.units_used).sum();
    let anomalies_detected = records
        .iter()
        .filter(|r| r.label == AnomalyLabel::Anomaly)
        .count();

    let label_breakdown = [AnomalyLabel::Normal, AnomalyLabel::Anomaly]
        .iter()
        .map(|&label| LabelCount {
            label: label.to_string(),
            count: records.iter().filter(|r| r.label == label).count(),
        })
        .collect();

    let scatter = records
        .iter()
        .map(|r| ScatterPoint {
            x: r.usage.copd_weight,
            y: r.usage.units_used as f64,
            label: r.label.to_string(),
        })
        .collect();

    let mut anomalous_providers: Vec<AnomalyDetailRow> = records
        .iter()
        .filter(|r| r.label == AnomalyLabel::Anomaly)
        .map(|r| AnomalyDetailRow {
            state: r.usage.state.clone(),
            specialty: r.usage.specialty.clone(),
            claim_count: r.usage.claim_count,
            units_used: r.usage.units_used,
            copd_weight: r.usage.copd_weight,
        })
        .collect();
    anomalous_providers.sort_by(|a, b| b.units_used.cmp(&a.units_used));

    AnomalyReport {
        kpis: AnomalyKpis {
            total_providers: records.len(),
            rows_dropped,
            total_units_used,
            mean_units_per_provider: mean_units(total_units_used, records.len()),
            anomalies_detected,
        },
        label_breakdown,
        scatter,
        anomalous_providers,
    }
}

// ── Variant B: zone report ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ZoneKpis {
    pub total_providers: usize,
    pub rows_dropped: usize,
    pub total_units_used: u64,
    pub mean_units_per_provider: f64,
    pub over_consumers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneDetailRow {
    pub state: String,
    pub specialty: String,
    pub claim_count: u64,
    pub units_used: u64,
    pub zone: UsageZone,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneReport {
    pub kpis: ZoneKpis,
    pub zone_breakdown: Vec<LabelCount>,
    /// x = claim_count, y = units_used.
    pub scatter: Vec<ScatterPoint>,
    /// All providers, descending by units_used.
    pub provider_table: Vec<ZoneDetailRow>,
}

pub fn assemble_zone_report(records: &[ZonedRecord], rows_dropped: usize) -> ZoneReport {
    let total_units_used: u64 = records.iter().map(|r| r.usage.units_used).sum();
    let over_consumers = records
        .iter()
        .filter(|r| r.zone == UsageZone::OverConsumption)
        .count();

    let zone_breakdown = [
        UsageZone::OverConsumption,
        UsageZone::UnderConsumption,
        UsageZone::Optimal,
    ]
    .iter()
    .map(|&zone| LabelCount {
        label: zone.to_string(),
        count: records.iter().filter(|r| r.zone == zone).count(),
    })
    .collect();

    let scatter = records
        .iter()
        .map(|r| ScatterPoint {
            x: r.usage.claim_count as f64,
            y: r.usage.units_used as f64,
            label: r.zone.to_string(),
        })
        .collect();

    let mut provider_table: Vec<ZoneDetailRow> = records
        .iter()
        .map(|r| ZoneDetailRow {
            state: r.usage.state.clone(),
            specialty: r.usage.specialty.clone(),
            claim_count: r.usage.claim_count,
            units_used: r.usage.units_used,
            zone: r.zone,
        })
        .collect();
    provider_table.sort_by(|a, b| b.units_used.cmp(&a.units_used));

    ZoneReport {
        kpis: ZoneKpis {
            total_providers: records.len(),
            rows_dropped,
            total_units_used,
            mean_units_per_provider: mean_units(total_units_used, records.len()),
            over_consumers,
        },
        zone_breakdown,
        scatter,
        provider_table,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Mean units per provider, rounded to one decimal place. An empty table
/// reports 0.0 — NaN is not representable in the JSON bundle.
fn mean_units(total: u64, providers: usize) -> f64 {
    if providers == 0 {
        return 0.0;
    }
    let mean = total as f64 / providers as f64;
    (mean * 10.0).round() / 10.0
}

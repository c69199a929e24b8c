//! Zone classification — rule-based usage zones.
//!
//! A provider's deviation (`units_used - adjusted_demand`) places it in
//! exactly one zone. The ±50 unit margin is a fixed constant, not
//! configuration.

use crate::simulate::UsageRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Constants ────────────────────────────────────────────────────────────────

/// Deviations strictly beyond ±ZONE_MARGIN units leave the Optimal zone.
pub const ZONE_MARGIN: f64 = 50.0;

// ── Zones ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageZone {
    #[serde(rename = "Over-Consumption")]
    OverConsumption,
    #[serde(rename = "Under-Consumption")]
    UnderConsumption,
    Optimal,
}

impl UsageZone {
    /// Total over all real deviations: every input maps to exactly one zone.
    /// Boundary values (exactly ±ZONE_MARGIN) are Optimal.
    pub fn classify(deviation: f64) -> Self {
        if deviation > ZONE_MARGIN {
            Self::OverConsumption
        } else if deviation < -ZONE_MARGIN {
            Self::UnderConsumption
        } else {
            Self::Optimal
        }
    }
}

impl fmt::Display for UsageZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverConsumption => write!(f, "Over-Consumption"),
            Self::UnderConsumption => write!(f, "Under-Consumption"),
            Self::Optimal => write!(f, "Optimal"),
        }
    }
}

/// A usage row plus its deviation and assigned zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonedRecord {
    pub usage: UsageRecord,
    pub deviation: f64,
    pub zone: UsageZone,
}

/// Classify every row. Row count and order preserved.
pub fn classify_zones(records: Vec<UsageRecord>) -> Vec<ZonedRecord> {
    records
        .into_iter()
        .map(|usage| {
            let deviation = usage.deviation();
            ZonedRecord {
                usage,
                deviation,
                zone: UsageZone::classify(deviation),
            }
        })
        .collect()
}

use filterwatch_core::simulate::UsageRecord;
use filterwatch_core::zones::{classify_zones, UsageZone, ZONE_MARGIN};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn usage(units_used: u64, adjusted_demand: f64) -> UsageRecord {
    UsageRecord {
        state: "CA".to_string(),
        specialty: "Pulmonology".to_string(),
        claim_count: 1000,
        copd_weight: 0.2,
        adjusted_demand,
        units_used,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Boundary contract: exactly ±50 is Optimal; the first step beyond is not.
#[test]
fn zone_boundaries() {
    assert_eq!(UsageZone::classify(ZONE_MARGIN), UsageZone::Optimal);
    assert_eq!(UsageZone::classify(-ZONE_MARGIN), UsageZone::Optimal);
    assert_eq!(UsageZone::classify(50.0001), UsageZone::OverConsumption);
    assert_eq!(UsageZone::classify(-50.0001), UsageZone::UnderConsumption);
    assert_eq!(UsageZone::classify(0.0), UsageZone::Optimal);
    assert_eq!(UsageZone::classify(51.0), UsageZone::OverConsumption);
    assert_eq!(UsageZone::classify(-51.0), UsageZone::UnderConsumption);
}

/// Every deviation maps to exactly one of the three zones.
#[test]
fn classification_is_total() {
    let deviations = [
        f64::MIN,
        -1e9,
        -51.0,
        -50.0,
        -0.5,
        0.0,
        0.5,
        50.0,
        51.0,
        1e9,
        f64::MAX,
    ];
    for d in deviations {
        // Each zone owns exactly one side of the margin.
        match UsageZone::classify(d) {
            UsageZone::OverConsumption => assert!(d > ZONE_MARGIN),
            UsageZone::UnderConsumption => assert!(d < -ZONE_MARGIN),
            UsageZone::Optimal => assert!((-ZONE_MARGIN..=ZONE_MARGIN).contains(&d)),
        }
    }
}

/// classify_zones derives deviation from the row and labels every row.
#[test]
fn table_classification() {
    let records = vec![
        usage(1300, 1200.0), // deviation +100 → over
        usage(1100, 1200.0), // deviation -100 → under
        usage(1210, 1200.0), // deviation +10  → optimal
        usage(1000, 1051.0), // deviation -51  → under
        usage(1200, 1200.0), // deviation 0    → optimal
    ];

    let zoned = classify_zones(records);

    let zones: Vec<UsageZone> = zoned.iter().map(|r| r.zone).collect();
    assert_eq!(
        zones,
        vec![
            UsageZone::OverConsumption,
            UsageZone::UnderConsumption,
            UsageZone::Optimal,
            UsageZone::UnderConsumption,
            UsageZone::Optimal,
        ]
    );
    for rec in &zoned {
        assert_eq!(rec.deviation, rec.usage.units_used as f64 - rec.usage.adjusted_demand);
    }
}

/// The report-facing labels are the dashboard's exact category strings.
#[test]
fn zone_display_labels() {
    assert_eq!(UsageZone::OverConsumption.to_string(), "Over-Consumption");
    assert_eq!(UsageZone::UnderConsumption.to_string(), "Under-Consumption");
    assert_eq!(UsageZone::Optimal.to_string(), "Optimal");
}

//! FilterWatch core — simulated respiratory-filter usage analytics over
//! Medicare DME referring-provider claim aggregates.
//!
//! The crate is a linear, single-pass batch pipeline: load a fixed-schema
//! claims CSV, derive demand features from COPD prevalence, simulate
//! per-provider filter usage with a seeded perturbation, classify each
//! provider (outlier screen or rule-based zones), and assemble report
//! tables for the presentation layer. No persistence, no incremental
//! updates — records live in memory for one execution.

pub mod config;
pub mod error;
pub mod features;
pub mod forest;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod rng;
pub mod simulate;
pub mod types;
pub mod zones;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{run_anomaly_pipeline, run_zone_pipeline};
pub use report::{AnomalyReport, ZoneReport};

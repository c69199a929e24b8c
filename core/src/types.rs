//! Shared primitive types used across the entire pipeline.

/// The master seed for one pipeline execution. All randomness derives from it.
pub type Seed = u64;

/// One feature vector for the outlier model: [units_used, copd_weight].
pub type FeatureRow = [f64; 2];

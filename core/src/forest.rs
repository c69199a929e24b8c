//! Outlier screen — isolation forest over (units_used, copd_weight).
//!
//! This stage:
//!   1. Builds the two-column feature table from the usage records
//!   2. Fits an ensemble of randomized partitioning trees in one batch
//!   3. Scores every row in the same pass and labels the top
//!      contamination-fraction as Anomaly
//!
//! The forest is an opaque capability behind `fit_predict` — callers see
//! labels, never tree internals. Fit and scoring are deterministic: all
//! randomness comes from the OutlierModel stream of the master seed.
//!
//! Scoring follows the standard isolation-forest construction: points
//! that isolate in few random splits get short average path lengths and
//! scores near 1; interior points converge toward the average path
//! length of an unsuccessful search and score below the cutoff.

use crate::error::{PipelineError, PipelineResult};
use crate::rng::PipelineRng;
use crate::simulate::UsageRecord;
use crate::types::FeatureRow;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Constants ────────────────────────────────────────────────────────────────

const N_ESTIMATORS: usize = 100;
const CONTAMINATION: f64 = 0.05;
const SAMPLE_SIZE_CAP: usize = 256;
const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

const FEATURE_COUNT: usize = 2;

// ── Labels ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyLabel {
    Normal,
    Anomaly,
}

impl fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Anomaly => write!(f, "Anomaly"),
        }
    }
}

/// A usage row plus its outlier-screen verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenedRecord {
    pub usage: UsageRecord,
    pub label: AnomalyLabel,
}

// ── Forest ───────────────────────────────────────────────────────────────────

enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        below: Box<TreeNode>,
        above: Box<TreeNode>,
    },
    Leaf {
        size: usize,
    },
}

pub struct IsolationForest {
    trees: Vec<TreeNode>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit the ensemble over the whole feature table.
    ///
    /// An empty table cannot be fit and is a fatal error. A single-row or
    /// constant-feature table fits, but its scores are degenerate — the
    /// contamination target decides what, if anything, gets flagged.
    pub fn fit(features: &[FeatureRow], rng: &mut PipelineRng) -> PipelineResult<Self> {
        if features.is_empty() {
            return Err(PipelineError::ModelFit {
                reason: "empty feature table".to_string(),
            });
        }

        let sample_size = features.len().min(SAMPLE_SIZE_CAP);
        let height_limit = (sample_size as f64).log2().ceil() as usize;

        let trees = (0..N_ESTIMATORS)
            .map(|_| {
                let sample = sample_rows(features, sample_size, rng);
                grow_tree(sample, 0, height_limit, rng)
            })
            .collect();

        Ok(Self { trees, sample_size })
    }

    /// Anomaly score per row, in (0, 1]. Higher is more anomalous.
    pub fn decision_scores(&self, features: &[FeatureRow]) -> Vec<f64> {
        let normalizer = average_path_length(self.sample_size);
        features
            .iter()
            .map(|row| {
                let mean_path: f64 = self
                    .trees
                    .iter()
                    .map(|tree| path_length(tree, row, 0))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                2f64.powf(-mean_path / normalizer)
            })
            .collect()
    }

    /// Fit over `features` and label each row in one batch pass.
    ///
    /// Exactly `floor(CONTAMINATION * n)` rows are targeted as anomalies;
    /// score ties at the cutoff may flag more.
    pub fn fit_predict(
        features: &[FeatureRow],
        rng: &mut PipelineRng,
    ) -> PipelineResult<Vec<AnomalyLabel>> {
        let forest = Self::fit(features, rng)?;
        let scores = forest.decision_scores(features);

        let target = (features.len() as f64 * CONTAMINATION).floor() as usize;
        if target == 0 {
            return Ok(vec![AnomalyLabel::Normal; features.len()]);
        }

        let mut ranked = scores.clone();
        ranked.sort_by(|a, b| b.total_cmp(a));
        let cutoff = ranked[target - 1];

        Ok(scores
            .iter()
            .map(|&score| {
                if score >= cutoff {
                    AnomalyLabel::Anomaly
                } else {
                    AnomalyLabel::Normal
                }
            })
            .collect())
    }
}

/// Screen the usage table: build features, fit, and attach labels.
pub fn screen_providers(
    records: Vec<UsageRecord>,
    rng: &mut PipelineRng,
) -> PipelineResult<Vec<ScreenedRecord>> {
    let features: Vec<FeatureRow> = records
        .iter()
        .map(|rec| [rec.units_used as f64, rec.copd_weight])
        .collect();

    let labels = IsolationForest::fit_predict(&features, rng)?;
    let anomalies = labels
        .iter()
        .filter(|&&l| l == AnomalyLabel::Anomaly)
        .count();
    log::info!(
        "forest: {anomalies} of {} providers flagged as anomalous",
        records.len()
    );

    Ok(records
        .into_iter()
        .zip(labels)
        .map(|(usage, label)| ScreenedRecord { usage, label })
        .collect())
}

// ── Tree construction ────────────────────────────────────────────────────────

/// Subsample `count` rows without replacement, deterministically.
fn sample_rows(features: &[FeatureRow], count: usize, rng: &mut PipelineRng) -> Vec<FeatureRow> {
    let mut indices: Vec<usize> = (0..features.len()).collect();
    for i in 0..count {
        let j = i + rng.next_u64_below((indices.len() - i) as u64) as usize;
        indices.swap(i, j);
    }
    indices[..count].iter().map(|&i| features[i]).collect()
}

fn grow_tree(
    sample: Vec<FeatureRow>,
    depth: usize,
    height_limit: usize,
    rng: &mut PipelineRng,
) -> TreeNode {
    if depth >= height_limit || sample.len() <= 1 {
        return TreeNode::Leaf {
            size: sample.len(),
        };
    }

    // Only features with spread can split; a fully constant sample is done.
    let mut lo = [f64::INFINITY; FEATURE_COUNT];
    let mut hi = [f64::NEG_INFINITY; FEATURE_COUNT];
    for row in &sample {
        for f in 0..FEATURE_COUNT {
            lo[f] = lo[f].min(row[f]);
            hi[f] = hi[f].max(row[f]);
        }
    }
    let splittable: Vec<usize> = (0..FEATURE_COUNT).filter(|&f| hi[f] > lo[f]).collect();
    if splittable.is_empty() {
        return TreeNode::Leaf {
            size: sample.len(),
        };
    }

    let feature = splittable[rng.next_u64_below(splittable.len() as u64) as usize];
    let threshold = rng.uniform_in(lo[feature], hi[feature]);

    let (below, above): (Vec<FeatureRow>, Vec<FeatureRow>) = sample
        .into_iter()
        .partition(|row| row[feature] < threshold);

    TreeNode::Split {
        feature,
        threshold,
        below: Box::new(grow_tree(below, depth + 1, height_limit, rng)),
        above: Box::new(grow_tree(above, depth + 1, height_limit, rng)),
    }
}

fn path_length(node: &TreeNode, row: &FeatureRow, depth: usize) -> f64 {
    match node {
        TreeNode::Leaf { size } => depth as f64 + average_path_length(*size),
        TreeNode::Split {
            feature,
            threshold,
            below,
            above,
        } => {
            if row[*feature] < *threshold {
                path_length(below, row, depth + 1)
            } else {
                path_length(above, row, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points —
/// the standard isolation-forest normalizer c(n).
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            let harmonic = (n - 1.0).ln() + EULER_MASCHERONI;
            2.0 * harmonic - 2.0 * (n - 1.0) / n
        }
    }
}

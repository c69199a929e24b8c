//! Pipeline configuration.
//!
//! Only the input path and the master seed are configurable. The zone
//! margin, perturbation band, and contamination rate are fixed constants
//! owned by their stages.

use crate::error::{PipelineError, PipelineResult};
use crate::types::Seed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The master seed used when none is configured.
pub const DEFAULT_SEED: Seed = 42;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path to the DME referring-provider claims CSV.
    pub input_path: PathBuf,

    /// Master seed for all derived RNG streams.
    #[serde(default = "default_seed")]
    pub seed: Seed,
}

fn default_seed() -> Seed {
    DEFAULT_SEED
}

impl PipelineConfig {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::Open {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}

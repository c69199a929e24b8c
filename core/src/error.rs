use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{name}' missing from input header")]
    MissingColumn { name: &'static str },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Outlier model fit failed: {reason}")]
    ModelFit { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

//! Error types for the tdcontrol crate

use thiserror::Error;

/// Main error type for the tdcontrol crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unsupported number of fit iterations: {requested} (TD agents perform exactly 1 update per call)")]
    UnsupportedFitIterations { requested: usize },

    #[error("dataset is empty: at least one transition is required")]
    EmptyDataset,

    #[error("action space has no actions")]
    EmptyActionSpace,

    #[error("ensemble must have exactly {expected} models, got {actual}")]
    EnsembleSize { expected: usize, actual: usize },

    #[error("closed-form weight computation is not implemented; enable sampling")]
    ClosedFormWeightsUnsupported,

    #[error("model selector returned index {index}, expected 0 or 1")]
    InvalidModelIndex { index: usize },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid distribution: {message}")]
    InvalidDistribution { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("action {action} is not in the action space")]
    InvalidAction { action: usize },

    #[error("invalid algorithm '{input}'. Expected one of: {expected}")]
    ParseAlgorithm { input: String, expected: String },

    #[error("unsupported table format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

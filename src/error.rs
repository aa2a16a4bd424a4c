//! Error types for loading member books and running segmentation

use thiserror::Error;

/// Failures while reading a member book from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open member file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed member CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Row number is 1-indexed, excluding the header
    #[error("row {row}: member identifier is missing")]
    MissingId { row: usize },

    #[error("duplicate member identifier: {0}")]
    DuplicateId(String),
}

/// Failures in the segmentation pipeline
#[derive(Debug, Error, PartialEq)]
pub enum SegmentationError {
    #[error("no feature rows to process")]
    EmptyInput,

    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cluster count must be at least 1")]
    ZeroClusters,

    #[error("not enough members ({points}) for {clusters} clusters")]
    TooFewPoints { points: usize, clusters: usize },
}

/// Failures reading an engine configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

//! Estimation errors

use impact_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file {path} unreadable: {error}")]
    ConfigIo { path: String, error: String },

    #[error("Table {table} has no row for {key}")]
    ShapeMismatch { table: String, key: String },

    #[error("Table {table} is on a different session grid ({found} buckets, expected {expected})")]
    GridMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate {table} row for {key}")]
    DuplicateRow { table: String, key: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, EstimationError>;

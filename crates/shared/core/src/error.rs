//! Core domain errors
//!
//! Only structural problems with the input are errors. Missing or
//! degenerate numbers travel through the tables as NaN.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Malformed value {value:?} in column {column}: {reason}")]
    MalformedField {
        column: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate observation for {key} at {time}")]
    DuplicateObservation { key: String, time: String },

    #[error("Batch contains no observations")]
    EmptyBatch,

    #[error("Row {key} has {found} buckets, expected {expected}")]
    RaggedRow {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

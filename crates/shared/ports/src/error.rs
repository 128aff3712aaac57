use impact_core::CoreError;
use thiserror::Error;

/// Errors raised at the data boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Unknown batch: {0}")]
    UnknownBatch(String),

    #[error("Malformed input: {0}")]
    Core(#[from] CoreError),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

pub type DataResult<T> = std::result::Result<T, DataError>;

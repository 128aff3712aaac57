//! Runner errors

use impact_estimation::EstimationError;
use impact_ports::DataError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Estimation error: {0}")]
    Estimation(#[from] EstimationError),

    #[error("Observation source has no batches")]
    NoBatches,
}

pub type Result<T> = std::result::Result<T, RunnerError>;

use impact_core::BinnedObservation;

use crate::error::DataResult;

/// Port for loading binned observations
///
/// A batch is whatever unit the surrounding orchestration stores data in
/// (typically one calendar month). Implementations may read files, query a
/// database or serve fixtures from memory.
pub trait ObservationSource: Send + Sync {
    /// Identifiers of the available batches, in chronological order
    fn batches(&self) -> Vec<String>;

    /// Load every observation of one batch
    fn load(&self, batch: &str) -> DataResult<Vec<BinnedObservation>>;

    /// Get the source's name for logging
    fn name(&self) -> &str {
        "ObservationSource"
    }
}

mod kernel;
mod moments;
mod observation;
mod summary;

pub use kernel::ImpactKernel;
pub use moments::{MomentSummary, RegressionMoments, RegressionObservation, RegressionResult};
pub use observation::{
    BinnedObservation, ObservationBatch, REQUIRED_COLUMNS, fill_prices, parse_observations,
};
pub use summary::{DailySummary, ScalingFactor};

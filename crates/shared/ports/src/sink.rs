use impact_core::{DailySummary, ImpactKernel, MomentSummary, RegressionResult, ScalingFactor};

use crate::error::DataResult;

/// Port for publishing pipeline outputs
///
/// Takes `&self` so independent kernel pipelines can publish concurrently.
pub trait ResultSink: Send + Sync {
    /// Daily volatility/volume summaries of one batch
    fn write_daily_summaries(&self, batch: &str, rows: &[DailySummary]) -> DataResult<()>;

    /// Lagged rolling scaling factors for the whole period
    fn write_scaling_factors(&self, rows: &[ScalingFactor]) -> DataResult<()>;

    /// Per stock-day regression moments of one kernel and batch
    fn write_moment_summaries(
        &self,
        kernel: ImpactKernel,
        batch: &str,
        rows: &[MomentSummary],
    ) -> DataResult<()>;

    /// Walk-forward coefficients of one kernel
    fn write_coefficients(&self, kernel: ImpactKernel, rows: &[RegressionResult])
    -> DataResult<()>;
}

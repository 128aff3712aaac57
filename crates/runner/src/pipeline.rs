//! Pipeline - Full estimation run over an observation source
//!
//! Stages, in dependency order:
//! - Per batch: pivot, daily summary, intraday volume profile
//! - Once: scaling factors over every daily summary of the run
//! - Per kernel (in parallel): impact states and moments per batch, then the
//!   walk-forward ridge fit over all batches

use impact_core::{
    BucketPanel, DailySummary, ImpactKernel, MomentSummary, ObservationBatch, RegressionResult,
};
use impact_estimation::{
    EstimationConfig, ImpactStateEngine, RidgeEstimator, ScalingTable, daily_moment_summaries,
    intraday_volume_profile, rolling_scaling_factors, summarize,
};
use impact_ports::{DataError, ObservationSource, ResultSink};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RunnerError};

/// One batch after the kernel-independent stages
struct PreparedBatch {
    id: String,
    observations: ObservationBatch,
    intraday_volume: BucketPanel,
    summaries: Vec<DailySummary>,
}

/// Outcome of one kernel's pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelReport {
    pub kernel: ImpactKernel,
    /// Stock-days that contributed at least one regression observation
    pub stock_days: usize,
    /// Regression observations over the whole run
    pub observations: u64,
    pub coefficients: Vec<RegressionResult>,
}

/// Run results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub batches: Vec<String>,
    /// Stock-days summarized across all batches
    pub stock_days: usize,
    /// Scaling factors with both baselines defined
    pub defined_scaling_factors: usize,
    pub kernels: Vec<KernelReport>,
}

impl RunReport {
    pub fn kernel(&self, kernel: ImpactKernel) -> Option<&KernelReport> {
        self.kernels.iter().find(|k| k.kernel == kernel)
    }
}

/// Full impact estimation pipeline
pub struct ImpactPipeline {
    config: EstimationConfig,
}

impl ImpactPipeline {
    /// Create a pipeline; the configuration is validated up front
    pub fn new(config: EstimationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    /// Run every stage over all batches of `source`, publishing to `sink`
    pub fn run(&self, source: &dyn ObservationSource, sink: &dyn ResultSink) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let batch_ids = source.batches();
        if batch_ids.is_empty() {
            return Err(RunnerError::NoBatches);
        }
        info!(
            "[{}] Starting impact estimation over {} batches from {}",
            run_id,
            batch_ids.len(),
            source.name()
        );

        let decay = self.config.decay_factor();

        // Kernel-independent stages
        let prepared = batch_ids
            .par_iter()
            .map(|id| self.prepare_batch(source, id, decay))
            .collect::<Result<Vec<_>>>()?;
        for batch in &prepared {
            sink.write_daily_summaries(&batch.id, &batch.summaries)?;
        }

        // Scaling factors need the whole run's summaries
        let all_summaries: Vec<DailySummary> = prepared
            .iter()
            .flat_map(|b| b.summaries.iter().cloned())
            .collect();
        let factors = rolling_scaling_factors(&all_summaries, self.config.rolling_window_days)?;
        sink.write_scaling_factors(&factors)?;
        let defined_scaling_factors = factors.iter().filter(|f| f.is_defined()).count();
        if defined_scaling_factors == 0 {
            warn!(
                "[{}] No stock-day has a full {}-day lookback, every impact state will be NaN",
                run_id, self.config.rolling_window_days
            );
        }
        let table = ScalingTable::from_rows(factors);
        info!(
            "[{}] {} of {} scaling factors defined",
            run_id,
            defined_scaling_factors,
            table.len()
        );

        // Kernels are independent pipelines
        let kernels = self
            .config
            .kernels
            .par_iter()
            .map(|&kernel| self.run_kernel(kernel, &prepared, &table, decay, sink))
            .collect::<Result<Vec<_>>>()?;

        for report in &kernels {
            info!(
                "[{}] {}: {} observations over {} stock-days, {} coefficient rows",
                run_id,
                report.kernel,
                report.observations,
                report.stock_days,
                report.coefficients.len()
            );
        }
        info!("[{}] Impact estimation complete", run_id);

        Ok(RunReport {
            run_id,
            batches: batch_ids,
            stock_days: all_summaries.len(),
            defined_scaling_factors,
            kernels,
        })
    }

    fn prepare_batch(
        &self,
        source: &dyn ObservationSource,
        id: &str,
        decay: f64,
    ) -> Result<PreparedBatch> {
        let rows = source.load(id)?;
        let observations = ObservationBatch::pivot(&rows).map_err(DataError::from)?;
        info!(
            "Batch {}: pivoted {} rows into {} stock-days × {} buckets",
            id,
            rows.len(),
            observations.volume.len(),
            observations.grid().len()
        );

        let summaries = summarize(&observations, self.config.buckets_per_session)?;
        let intraday_volume = intraday_volume_profile(&observations.volume, decay)?;

        Ok(PreparedBatch {
            id: id.to_string(),
            observations,
            intraday_volume,
            summaries,
        })
    }

    fn run_kernel(
        &self,
        kernel: ImpactKernel,
        prepared: &[PreparedBatch],
        table: &ScalingTable,
        decay: f64,
        sink: &dyn ResultSink,
    ) -> Result<KernelReport> {
        let engine = ImpactStateEngine::new(table, decay);
        let mut summaries: Vec<MomentSummary> = Vec::new();

        for batch in prepared {
            let states = engine.compute(
                kernel,
                &batch.observations.volume,
                Some(&batch.intraday_volume),
            )?;
            let moments = daily_moment_summaries(
                &states,
                &batch.observations.price,
                self.config.horizon_buckets(),
                self.config.cutoff_time,
            )?;
            sink.write_moment_summaries(kernel, &batch.id, &moments)?;
            summaries.extend(moments);
        }

        let coefficients = RidgeEstimator::new(self.config.ridge_lambda).walk_forward(&summaries);
        sink.write_coefficients(kernel, &coefficients)?;

        Ok(KernelReport {
            kernel,
            stock_days: summaries.len(),
            observations: summaries.iter().map(|s| s.moments.count).sum(),
            coefficients,
        })
    }
}

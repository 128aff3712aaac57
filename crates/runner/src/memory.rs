//! In-memory source and sink adapters
//!
//! Thread-safe storage using DashMap, so kernel pipelines running on the
//! rayon pool can publish without a global lock. The run-wide scaling
//! factor table is a single slot behind an RwLock.

use dashmap::DashMap;
use impact_core::{
    BinnedObservation, DailySummary, ImpactKernel, MomentSummary, RegressionResult,
    ScalingFactor, parse_observations,
};
use impact_ports::{DataError, DataResult, ObservationSource, ResultSink};
use std::sync::{Arc, RwLock};

/// Observation batches held in memory, keyed by batch id
pub struct InMemorySource {
    batches: Arc<DashMap<String, Vec<BinnedObservation>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self {
            batches: Arc::new(DashMap::new()),
        }
    }

    /// Add or replace one batch
    pub fn insert(&self, batch: impl Into<String>, rows: Vec<BinnedObservation>) {
        self.batches.insert(batch.into(), rows);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_batch(self, batch: impl Into<String>, rows: Vec<BinnedObservation>) -> Self {
        self.insert(batch, rows);
        self
    }

    /// Add a batch from a JSON array of raw records
    pub fn insert_json(&self, batch: impl Into<String>, json: &str) -> DataResult<usize> {
        let rows = parse_observations(json)?;
        let count = rows.len();
        self.insert(batch, rows);
        Ok(count)
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemorySource {
    fn clone(&self) -> Self {
        Self {
            batches: Arc::clone(&self.batches),
        }
    }
}

impl ObservationSource for InMemorySource {
    /// Batch ids sorted ascending (`YYYY-MM` ids sort chronologically)
    fn batches(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.batches.iter().map(|b| b.key().clone()).collect();
        ids.sort();
        ids
    }

    fn load(&self, batch: &str) -> DataResult<Vec<BinnedObservation>> {
        self.batches
            .get(batch)
            .map(|rows| rows.value().clone())
            .ok_or_else(|| DataError::UnknownBatch(batch.to_string()))
    }

    fn name(&self) -> &str {
        "InMemorySource"
    }
}

/// Pipeline outputs held in memory
pub struct InMemorySink {
    daily_summaries: Arc<DashMap<String, Vec<DailySummary>>>,
    scaling_factors: Arc<RwLock<Vec<ScalingFactor>>>,
    moment_summaries: Arc<DashMap<(ImpactKernel, String), Vec<MomentSummary>>>,
    coefficients: Arc<DashMap<ImpactKernel, Vec<RegressionResult>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            daily_summaries: Arc::new(DashMap::new()),
            scaling_factors: Arc::new(RwLock::new(Vec::new())),
            moment_summaries: Arc::new(DashMap::new()),
            coefficients: Arc::new(DashMap::new()),
        }
    }

    pub fn daily_summaries(&self, batch: &str) -> Option<Vec<DailySummary>> {
        self.daily_summaries.get(batch).map(|r| r.value().clone())
    }

    pub fn scaling_factors(&self) -> Vec<ScalingFactor> {
        match self.scaling_factors.read() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn moment_summaries(&self, kernel: ImpactKernel, batch: &str) -> Option<Vec<MomentSummary>> {
        self.moment_summaries
            .get(&(kernel, batch.to_string()))
            .map(|r| r.value().clone())
    }

    pub fn coefficients(&self, kernel: ImpactKernel) -> Option<Vec<RegressionResult>> {
        self.coefficients.get(&kernel).map(|r| r.value().clone())
    }

    /// Number of (kernel, batch) moment tables written
    pub fn moment_table_count(&self) -> usize {
        self.moment_summaries.len()
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemorySink {
    fn clone(&self) -> Self {
        Self {
            daily_summaries: Arc::clone(&self.daily_summaries),
            scaling_factors: Arc::clone(&self.scaling_factors),
            moment_summaries: Arc::clone(&self.moment_summaries),
            coefficients: Arc::clone(&self.coefficients),
        }
    }
}

impl ResultSink for InMemorySink {
    fn write_daily_summaries(&self, batch: &str, rows: &[DailySummary]) -> DataResult<()> {
        self.daily_summaries.insert(batch.to_string(), rows.to_vec());
        Ok(())
    }

    fn write_scaling_factors(&self, rows: &[ScalingFactor]) -> DataResult<()> {
        let mut slot = self
            .scaling_factors
            .write()
            .map_err(|e| DataError::Backend(e.to_string()))?;
        *slot = rows.to_vec();
        Ok(())
    }

    fn write_moment_summaries(
        &self,
        kernel: ImpactKernel,
        batch: &str,
        rows: &[MomentSummary],
    ) -> DataResult<()> {
        self.moment_summaries
            .insert((kernel, batch.to_string()), rows.to_vec());
        Ok(())
    }

    fn write_coefficients(&self, kernel: ImpactKernel, rows: &[RegressionResult]) -> DataResult<()> {
        self.coefficients.insert(kernel, rows.to_vec());
        Ok(())
    }
}

//! Regression statistics
//!
//! For every bucket t at or after the session cutoff:
//!
//! ```text
//! x = I[t] - I[t-h]          impact-state change over the horizon
//! y = P[t] / P[t-h] - 1      return over the same horizon
//! ```
//!
//! Rows where x or y is not a finite number are dropped. Each surviving row
//! contributes the moments (x, y, xy, x², y², 1).

use impact_core::{
    BucketPanel, BucketTime, MomentSummary, RegressionMoments, RegressionObservation, StockDay,
};
use log::{info, warn};
use std::collections::BTreeMap;

use crate::error::{EstimationError, Result};

/// Moments of one stock-day row as (bucket index, moments)
///
/// `first` is the first bucket index allowed by the cutoff.
pub fn row_moments(
    states: &[f64],
    prices: &[f64],
    horizon: usize,
    first: usize,
) -> Vec<(usize, RegressionMoments)> {
    let n = states.len().min(prices.len());
    (first.max(horizon)..n)
        .filter_map(|t| {
            let x = states[t] - states[t - horizon];
            let y = prices[t] / prices[t - horizon] - 1.0;
            (x.is_finite() && y.is_finite()).then(|| (t, RegressionMoments::observation(x, y)))
        })
        .collect()
}

/// Per-observation regression moments of a batch
pub fn regression_observations(
    states: &BucketPanel,
    prices: &BucketPanel,
    horizon: usize,
    cutoff: BucketTime,
) -> Result<Vec<RegressionObservation>> {
    if states.grid() != prices.grid() {
        return Err(EstimationError::GridMismatch {
            table: "price".to_string(),
            expected: states.grid().len(),
            found: prices.grid().len(),
        });
    }

    let grid = states.grid();
    let first = grid.cutoff_index(cutoff);
    let mut observations = Vec::new();

    for (key, state_row) in states.rows() {
        let price_row = prices
            .row(key)
            .ok_or_else(|| EstimationError::ShapeMismatch {
                table: "price".to_string(),
                key: key.to_string(),
            })?;
        for (t, moments) in row_moments(state_row, price_row, horizon, first) {
            if let Some(time) = grid.time(t) {
                observations.push(RegressionObservation {
                    key: key.clone(),
                    time,
                    moments,
                });
            }
        }
    }

    Ok(observations)
}

/// Sum observation moments per stock-day (the per-kernel daily table)
pub fn summarize_by_stock_day(observations: &[RegressionObservation]) -> Vec<MomentSummary> {
    let mut sums: BTreeMap<&StockDay, RegressionMoments> = BTreeMap::new();
    for obs in observations {
        *sums.entry(&obs.key).or_default() += obs.moments;
    }
    sums.into_iter()
        .map(|(key, moments)| MomentSummary {
            stock: key.stock.clone(),
            date: key.date,
            moments,
        })
        .collect()
}

/// Daily moment summaries straight from state and price panels
pub fn daily_moment_summaries(
    states: &BucketPanel,
    prices: &BucketPanel,
    horizon: usize,
    cutoff: BucketTime,
) -> Result<Vec<MomentSummary>> {
    let observations = regression_observations(states, prices, horizon, cutoff)?;
    let summaries = summarize_by_stock_day(&observations);

    let dropped = states.len().saturating_sub(summaries.len());
    if dropped > 0 {
        warn!("{} stock-days produced no regression observations", dropped);
    }
    info!(
        "Aggregated {} observations into {} stock-day summaries",
        observations.len(),
        summaries.len()
    );
    Ok(summaries)
}

//! Rolling scaling factors
//!
//! Per stock, a trailing simple moving average of `px_vol` and `volume`
//! over the union of trading dates in the summary table, shifted one date
//! forward: the factor of date D only sees dates strictly before D.
//!
//! A stock without a summary on some date contributes NaN there, and any
//! window touching a NaN is NaN (the full window is required). The first
//! `window` dates of every stock are therefore undefined.

use impact_core::{DailySummary, ScalingFactor, StockDay, Ticker, TradeDate};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{EstimationError, Result};

/// Trailing mean over `window` values ending at each index (NaN until full)
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }
    for end in (window - 1)..values.len() {
        let slice = &values[end + 1 - window..=end];
        if slice.iter().all(|v| !v.is_nan()) {
            out[end] = slice.iter().sum::<f64>() / window as f64;
        }
    }
    out
}

/// Shift a series forward by one position (first value becomes NaN)
pub fn lag_one(values: &[f64]) -> Vec<f64> {
    std::iter::once(f64::NAN)
        .chain(values.iter().copied().take(values.len().saturating_sub(1)))
        .collect()
}

/// Lagged rolling baselines for every (stock, date) of the stock × date grid
pub fn rolling_scaling_factors(
    summaries: &[DailySummary],
    window: usize,
) -> Result<Vec<ScalingFactor>> {
    if window == 0 {
        return Err(EstimationError::InvalidConfig(
            "rolling window must be at least 1".to_string(),
        ));
    }

    let dates: Vec<TradeDate> = summaries
        .iter()
        .map(|s| s.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let date_index: HashMap<TradeDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    // One (px_vol, volume) column per stock
    let mut columns: BTreeMap<Ticker, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    let mut seen = BTreeSet::new();
    for summary in summaries {
        if !seen.insert(summary.key()) {
            return Err(EstimationError::DuplicateRow {
                table: "daily_summary".to_string(),
                key: summary.key().to_string(),
            });
        }
        let (px_vol, volume) = columns
            .entry(summary.stock.clone())
            .or_insert_with(|| (vec![f64::NAN; dates.len()], vec![f64::NAN; dates.len()]));
        let i = date_index[&summary.date];
        px_vol[i] = summary.px_vol;
        volume[i] = summary.volume;
    }

    let mut factors = Vec::with_capacity(columns.len() * dates.len());
    for (stock, (px_vol, volume)) in &columns {
        let px_vol = lag_one(&rolling_mean(px_vol, window));
        let volume = lag_one(&rolling_mean(volume, window));
        for (i, date) in dates.iter().enumerate() {
            factors.push(ScalingFactor {
                stock: stock.clone(),
                date: *date,
                px_vol: px_vol[i],
                volume: volume[i],
            });
        }
    }

    info!(
        "Computed scaling factors for {} stocks over {} dates ({}-day window)",
        columns.len(),
        dates.len(),
        window
    );
    Ok(factors)
}

/// Scaling factors indexed by stock-day
#[derive(Debug, Clone, Default)]
pub struct ScalingTable {
    factors: HashMap<StockDay, ScalingFactor>,
}

impl ScalingTable {
    pub fn from_rows(rows: impl IntoIterator<Item = ScalingFactor>) -> Self {
        Self {
            factors: rows.into_iter().map(|f| (f.key(), f)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Factor of a stock-day, undefined when the table has no row for it
    pub fn lookup(&self, key: &StockDay) -> ScalingFactor {
        match self.factors.get(key) {
            Some(factor) => factor.clone(),
            None => {
                debug!("No scaling factor for {}", key);
                ScalingFactor::undefined(key.stock.clone(), key.date)
            }
        }
    }
}

//! Daily volatility and volume summary
//!
//! One [`DailySummary`] per stock-day of a batch:
//! - `px_vol`: sample std of bucket-over-bucket returns × √(buckets per session)
//! - `volume`: Σ |signed volume|
//!
//! Stock-days with fewer than two valid returns get a NaN `px_vol`, which
//! flows into the scaling factors as missing data.

use impact_core::{DailySummary, ObservationBatch};
use log::{info, warn};
use rayon::prelude::*;

use crate::error::{EstimationError, Result};

/// Simple returns `p[t] / p[t-1] - 1`
pub fn pct_change(prices: &[f64], periods: usize) -> Vec<f64> {
    (0..prices.len())
        .map(|t| {
            if t < periods {
                f64::NAN
            } else {
                prices[t] / prices[t - periods] - 1.0
            }
        })
        .collect()
}

/// Sample standard deviation (n - 1) of the non-NaN values
pub fn sample_std(values: &[f64]) -> f64 {
    let valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.len() < 2 {
        return f64::NAN;
    }
    let n = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / n;
    let ss: f64 = valid.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// Session-scaled realized volatility of one filled price row
pub fn realized_volatility(prices: &[f64], buckets_per_session: usize) -> f64 {
    sample_std(&pct_change(prices, 1)) * (buckets_per_session as f64).sqrt()
}

/// Total absolute traded volume of one row
pub fn total_volume(volume: &[f64]) -> f64 {
    volume.iter().map(|v| v.abs()).sum()
}

/// Summarize every stock-day of a pivoted batch
pub fn summarize(batch: &ObservationBatch, buckets_per_session: usize) -> Result<Vec<DailySummary>> {
    let rows: Vec<_> = batch.volume.rows().collect();

    let summaries = rows
        .par_iter()
        .map(|(key, volume)| {
            let prices = batch
                .price
                .row(key)
                .ok_or_else(|| EstimationError::ShapeMismatch {
                    table: "price".to_string(),
                    key: key.to_string(),
                })?;
            Ok(DailySummary {
                stock: key.stock.clone(),
                date: key.date,
                px_vol: realized_volatility(prices, buckets_per_session),
                volume: total_volume(volume),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let undefined = summaries.iter().filter(|s| s.px_vol.is_nan()).count();
    if undefined > 0 {
        warn!(
            "{} of {} stock-days have too few prices for a volatility estimate",
            undefined,
            summaries.len()
        );
    }
    info!("Summarized {} stock-days", summaries.len());

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveTime};
    use impact_core::{BinnedObservation, StockDay};

    fn obs(stock: &str, s: u32, trade: f64, px: Option<f64>) -> BinnedObservation {
        BinnedObservation::new(
            stock,
            NaiveDate::from_ymd_opt(2019, 3, 4).unwrap(),
            NaiveTime::from_hms_opt(9, 30, s).unwrap(),
            trade,
            px,
        )
    }

    #[test]
    fn test_sample_std() {
        assert_relative_eq!(sample_std(&[1.0, 2.0, 3.0, 4.0]), 1.290_994_448_7, epsilon = 1e-9);
        assert!(sample_std(&[1.0]).is_nan());
        assert!(sample_std(&[f64::NAN, 1.0]).is_nan());
    }

    #[test]
    fn test_pct_change() {
        let r = pct_change(&[100.0, 110.0, 99.0], 1);
        assert!(r[0].is_nan());
        assert_relative_eq!(r[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r[2], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_summarize_batch() {
        let rows = vec![
            obs("AAPL", 10, 100.0, Some(100.0)),
            obs("AAPL", 20, -50.0, Some(101.0)),
            obs("AAPL", 30, 25.0, Some(100.0)),
            obs("MSFT", 10, 10.0, Some(50.0)),
        ];
        let batch = ObservationBatch::pivot(&rows).unwrap();
        let summaries = summarize(&batch, 2340).unwrap();
        assert_eq!(summaries.len(), 2);

        let aapl = &summaries[0];
        assert_eq!(aapl.key(), StockDay::new("AAPL", aapl.date));
        assert_eq!(aapl.volume, 175.0);
        let returns = [0.01, 100.0 / 101.0 - 1.0];
        assert_relative_eq!(
            aapl.px_vol,
            sample_std(&returns) * 2340f64.sqrt(),
            epsilon = 1e-12
        );

        // One quoted bucket back-filled across the grid: flat prices
        let msft = &summaries[1];
        assert_eq!(msft.volume, 10.0);
        assert_eq!(msft.px_vol, 0.0);
    }

    #[test]
    fn test_no_prices_gives_nan_volatility() {
        let rows = vec![obs("AAPL", 10, 1.0, None), obs("AAPL", 20, 1.0, None)];
        let batch = ObservationBatch::pivot(&rows).unwrap();
        let summaries = summarize(&batch, 2340).unwrap();
        assert!(summaries[0].px_vol.is_nan());
        assert_eq!(summaries[0].volume, 2.0);
    }
}

//! Intraday volume profile
//!
//! Decayed running sum of |volume| per stock-day, scaled by the number of
//! buckets in the session grid. Used (floor-clipped at 1) as the liquidity
//! denominator of the reduced-form kernel.

use impact_core::{BucketPanel, StockDay};
use log::info;
use rayon::prelude::*;

use crate::decay::decayed_recursion;
use crate::error::Result;

/// Smallest value the profile may take when used as a divisor
pub const PROFILE_FLOOR: f64 = 1.0;

/// Smoothed profile of one stock-day's volume row
pub fn smooth_row(volume: &[f64], decay: f64, session_buckets: usize) -> Vec<f64> {
    let absolute: Vec<f64> = volume.iter().map(|v| v.abs()).collect();
    decayed_recursion(&absolute, decay)
        .into_iter()
        .map(|v| v * session_buckets as f64)
        .collect()
}

/// Profile panel, same shape as the volume panel
pub fn intraday_volume_profile(volume: &BucketPanel, decay: f64) -> Result<BucketPanel> {
    let session_buckets = volume.grid().len();
    let rows: Vec<(&StockDay, &[f64])> = volume.rows().collect();

    let smoothed: Vec<(StockDay, Vec<f64>)> = rows
        .par_iter()
        .map(|(key, row)| ((*key).clone(), smooth_row(row, decay, session_buckets)))
        .collect();

    info!(
        "Smoothed intraday volume for {} stock-days over {} buckets",
        smoothed.len(),
        session_buckets
    );
    Ok(BucketPanel::from_rows(volume.grid().clone(), smoothed)?)
}

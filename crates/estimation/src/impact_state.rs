//! Impact State Engine
//!
//! Turns signed order flow into a decayed impact state per
//! (stock, date, bucket):
//!
//! ```text
//! z[t] = kernel(v[t]; ADV, intraday volume) × σ
//! I    = decayed_recursion(z, d)
//! ```
//!
//! where σ and ADV are the stock-day's lagged scaling factors. Kernels
//! differ only in the pre-normalization:
//!
//! | kernel        | pre-normalization                          |
//! |---------------|--------------------------------------------|
//! | reduced_form  | v / √ADV / √max(intraday volume, 1)        |
//! | linear        | v / ADV                                    |
//! | sqrt          | sign(v / ADV) × √\|v / ADV\|               |
//!
//! The recursion restarts on every stock-day. A stock-day without defined
//! scaling factors yields an all-NaN state row.

use impact_core::{BucketPanel, ImpactKernel, ScalingFactor, StockDay};
use log::{debug, info};
use rayon::prelude::*;

use crate::decay::decayed_recursion;
use crate::error::{EstimationError, Result};
use crate::intraday_volume::PROFILE_FLOOR;
use crate::scaling::ScalingTable;

/// Pre-normalization of raw order flow (one implementation per kernel)
pub trait FlowNormalization {
    /// Normalize one bucket's signed volume
    ///
    /// # Arguments
    /// * `flow` - Signed traded volume in the bucket
    /// * `adv` - Scaling-factor volume of the stock-day
    /// * `intraday_volume` - Intraday profile at the bucket (reduced form only)
    fn normalize(&self, flow: f64, adv: f64, intraday_volume: f64) -> f64;
}

impl FlowNormalization for ImpactKernel {
    #[inline]
    fn normalize(&self, flow: f64, adv: f64, intraday_volume: f64) -> f64 {
        match self {
            ImpactKernel::ReducedForm => {
                flow / adv.sqrt() / intraday_volume.max(PROFILE_FLOOR).sqrt()
            }
            ImpactKernel::Linear => flow / adv,
            ImpactKernel::Sqrt => {
                let z = flow / adv;
                signed_sqrt(z)
            }
        }
    }
}

/// sign(x)·√|x| (NaN stays NaN, zero stays zero)
#[inline]
pub fn signed_sqrt(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        x
    } else {
        x.signum() * x.abs().sqrt()
    }
}

/// Impact state of one stock-day row
///
/// `intraday_volume` is required for the reduced-form kernel and ignored
/// otherwise; buckets it does not cover get a NaN profile. An undefined
/// factor (including a zero volume baseline) gives an all-NaN row.
pub fn impact_state_row(
    kernel: ImpactKernel,
    volume: &[f64],
    factor: &ScalingFactor,
    intraday_volume: Option<&[f64]>,
    decay: f64,
) -> Vec<f64> {
    if !factor.is_defined() {
        return vec![f64::NAN; volume.len()];
    }
    let scaled: Vec<f64> = volume
        .iter()
        .enumerate()
        .map(|(t, &flow)| {
            let profile = intraday_volume
                .and_then(|p| p.get(t).copied())
                .unwrap_or(f64::NAN);
            kernel.normalize(flow, factor.volume, profile) * factor.px_vol
        })
        .collect();
    decayed_recursion(&scaled, decay)
}

/// Computes impact-state panels for a batch
pub struct ImpactStateEngine<'a> {
    factors: &'a ScalingTable,
    decay: f64,
}

impl<'a> ImpactStateEngine<'a> {
    pub fn new(factors: &'a ScalingTable, decay: f64) -> Self {
        Self { factors, decay }
    }

    /// Impact states of every stock-day in the volume panel
    pub fn compute(
        &self,
        kernel: ImpactKernel,
        volume: &BucketPanel,
        intraday_volume: Option<&BucketPanel>,
    ) -> Result<BucketPanel> {
        let profile = if kernel.uses_intraday_volume() {
            let profile = intraday_volume.ok_or_else(|| EstimationError::ShapeMismatch {
                table: "intraday_volume".to_string(),
                key: "<batch>".to_string(),
            })?;
            if profile.grid() != volume.grid() {
                return Err(EstimationError::GridMismatch {
                    table: "intraday_volume".to_string(),
                    expected: volume.grid().len(),
                    found: profile.grid().len(),
                });
            }
            Some(profile)
        } else {
            None
        };

        let rows: Vec<(&StockDay, &[f64])> = volume.rows().collect();
        let states = rows
            .par_iter()
            .map(|(key, flow)| {
                let factor = self.factors.lookup(key);
                if !factor.is_defined() {
                    debug!("{}: undefined scaling factor, impact state is NaN", key);
                }
                let profile_row = match profile {
                    Some(panel) => Some(panel.row(key).ok_or_else(|| {
                        EstimationError::ShapeMismatch {
                            table: "intraday_volume".to_string(),
                            key: key.to_string(),
                        }
                    })?),
                    None => None,
                };
                let state = impact_state_row(kernel, flow, &factor, profile_row, self.decay);
                Ok(((*key).clone(), state))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Computed {} impact states for {} stock-days",
            kernel,
            states.len()
        );
        Ok(BucketPanel::from_rows(volume.grid().clone(), states)?)
    }
}

//! Walk-forward ridge regression
//!
//! Fits `y = α + β·x` per stock from summed moments, in closed form:
//!
//! ```text
//! denom = (λ + Sxx)(λ + n) - Sx²
//! β     = ((λ + n)·Sxy - Sx·Sy) / denom
//! α     = ((λ + Sxx)·Sy - Sx·Sxy) / denom
//! ```
//!
//! Fit quality is expanded from the moments too, so raw observations are
//! never revisited:
//!
//! ```text
//! TSS = Syy - Sy²/n
//! RSS = Syy - 2β·Sxy - 2α·Sy + 2αβ·Sx + β²·Sxx + α²·n
//! R²  = 1 - RSS/TSS
//! ```
//!
//! Coefficients are fitted on month m and evaluated unchanged on month m+1.
//!
//! # Usage
//!
//! ```rust,ignore
//! let estimator = RidgeEstimator::new(0.0);
//! let results = estimator.walk_forward(&daily_summaries);
//! ```

use impact_core::{MomentSummary, RegressionMoments, RegressionResult, Ticker, YearMonth};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Fitted intercept and slope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RidgeFit {
    pub alpha: f64,
    pub beta: f64,
}

impl RidgeFit {
    pub const UNDEFINED: RidgeFit = RidgeFit {
        alpha: f64::NAN,
        beta: f64::NAN,
    };

    pub fn is_defined(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite()
    }

    /// Total sum of squares of y around its mean
    pub fn total_sum_of_squares(moments: &RegressionMoments) -> f64 {
        moments.yy - moments.y * moments.y / moments.n()
    }

    /// Residual sum of squares of this fit over the given moments
    pub fn residual_sum_of_squares(&self, moments: &RegressionMoments) -> f64 {
        let RidgeFit { alpha, beta } = *self;
        moments.yy - 2.0 * beta * moments.xy - 2.0 * alpha * moments.y
            + 2.0 * alpha * beta * moments.x
            + beta * beta * moments.xx
            + alpha * alpha * moments.n()
    }

    /// R² of this fit over the given moments (NaN when undefined)
    pub fn r_squared(&self, moments: &RegressionMoments) -> f64 {
        1.0 - self.residual_sum_of_squares(moments) / Self::total_sum_of_squares(moments)
    }
}

/// Closed-form ridge solver over moment sums
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeEstimator {
    lambda: f64,
}

impl Default for RidgeEstimator {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl RidgeEstimator {
    /// Create with penalty λ (0 = ordinary least squares)
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// Solve the regularized normal equations
    ///
    /// A zero determinant (no observations, a single observation or a
    /// constant regressor without penalty) gives an undefined fit.
    pub fn fit(&self, moments: &RegressionMoments) -> RidgeFit {
        let l = self.lambda;
        let n = moments.n();
        let denom = (l + moments.xx) * (l + n) - moments.x * moments.x;
        if denom == 0.0 {
            return RidgeFit::UNDEFINED;
        }
        RidgeFit {
            alpha: ((l + moments.xx) * moments.y - moments.x * moments.xy) / denom,
            beta: ((l + n) * moments.xy - moments.x * moments.y) / denom,
        }
    }

    /// Fit on one set of moments, evaluate on another
    pub fn fit_and_evaluate(
        &self,
        in_sample: &RegressionMoments,
        out_of_sample: &RegressionMoments,
    ) -> (RidgeFit, f64, f64) {
        let fit = self.fit(in_sample);
        (fit, fit.r_squared(in_sample), fit.r_squared(out_of_sample))
    }

    /// Per-stock fit on `in_sample` month evaluated on the following month
    ///
    /// Stocks missing from either month are dropped.
    pub fn fit_month_pair(
        &self,
        summaries: &[MomentSummary],
        in_sample: YearMonth,
    ) -> Vec<RegressionResult> {
        let out_of_sample = in_sample.next();
        let is_moments = monthly_moments(summaries, in_sample);
        let oos_moments = monthly_moments(summaries, out_of_sample);

        let mut results = Vec::with_capacity(is_moments.len());
        for (stock, is) in &is_moments {
            let Some(oos) = oos_moments.get(stock) else {
                warn!("{}: no {} data, dropped from {} fit", stock, out_of_sample, in_sample);
                continue;
            };
            let (fit, is_rsq, oos_rsq) = self.fit_and_evaluate(is, oos);
            if !fit.is_defined() {
                debug!("{}: degenerate {} moments, coefficients undefined", stock, in_sample);
            }
            results.push(RegressionResult {
                stock: stock.clone(),
                in_sample_month: in_sample,
                out_of_sample_month: out_of_sample,
                alpha_estimate: fit.alpha,
                beta_estimate: fit.beta,
                is_rsq,
                oos_rsq,
                in_sample: *is,
                out_of_sample: *oos,
            });
        }

        info!(
            "Fitted {} stocks on {} (evaluated on {}, λ={})",
            results.len(),
            in_sample,
            out_of_sample,
            self.lambda
        );
        results
    }

    /// Fit every consecutive month pair present in the summaries
    pub fn walk_forward(&self, summaries: &[MomentSummary]) -> Vec<RegressionResult> {
        let months: BTreeSet<YearMonth> = summaries.iter().map(MomentSummary::month).collect();
        months
            .iter()
            .filter(|m| months.contains(&m.next()))
            .flat_map(|m| self.fit_month_pair(summaries, *m))
            .collect()
    }
}

/// Moments summed per stock over one calendar month
pub fn monthly_moments(
    summaries: &[MomentSummary],
    month: YearMonth,
) -> BTreeMap<Ticker, RegressionMoments> {
    let mut sums: BTreeMap<Ticker, RegressionMoments> = BTreeMap::new();
    for summary in summaries.iter().filter(|s| month.contains(s.date)) {
        *sums.entry(summary.stock.clone()).or_default() += summary.moments;
    }
    sums
}

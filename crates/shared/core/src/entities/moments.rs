//! Regression sufficient statistics
//!
//! Sums of x, y, xy, x², y² and the observation count fully determine the
//! closed-form single-regressor fit. They add like vectors, so any
//! partition of the observations can be summed in any order.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::values::{BucketTime, StockDay, Ticker, TradeDate, YearMonth};

/// Additive moments of (x, y) pairs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegressionMoments {
    pub x: f64,
    pub y: f64,
    pub xy: f64,
    pub xx: f64,
    pub yy: f64,
    pub count: u64,
}

impl RegressionMoments {
    pub const ZERO: RegressionMoments = RegressionMoments {
        x: 0.0,
        y: 0.0,
        xy: 0.0,
        xx: 0.0,
        yy: 0.0,
        count: 0,
    };

    /// Moments of a single observation
    #[inline]
    pub fn observation(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            xy: x * y,
            xx: x * x,
            yy: y * y,
            count: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Count as a float for the closed-form algebra
    #[inline]
    pub fn n(&self) -> f64 {
        self.count as f64
    }
}

impl Add for RegressionMoments {
    type Output = RegressionMoments;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for RegressionMoments {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.xy += rhs.xy;
        self.xx += rhs.xx;
        self.yy += rhs.yy;
        self.count += rhs.count;
    }
}

impl Sum for RegressionMoments {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a RegressionMoments> for RegressionMoments {
    fn sum<I: Iterator<Item = &'a RegressionMoments>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Moments of one regression observation (stock, date, bucket)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionObservation {
    pub key: StockDay,
    pub time: BucketTime,
    pub moments: RegressionMoments,
}

/// Moments summed over one stock-day's session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentSummary {
    pub stock: Ticker,
    pub date: TradeDate,
    #[serde(flatten)]
    pub moments: RegressionMoments,
}

impl MomentSummary {
    pub fn key(&self) -> StockDay {
        StockDay::new(self.stock.clone(), self.date)
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }
}

/// Walk-forward ridge fit of one stock over a month pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub stock: Ticker,
    /// Month the coefficients were fitted on
    pub in_sample_month: YearMonth,
    /// Month the coefficients were evaluated on
    pub out_of_sample_month: YearMonth,
    pub alpha_estimate: f64,
    pub beta_estimate: f64,
    pub is_rsq: f64,
    pub oos_rsq: f64,
    /// Raw in-sample moments, kept for audit
    pub in_sample: RegressionMoments,
    /// Raw out-of-sample moments, kept for audit
    pub out_of_sample: RegressionMoments,
}

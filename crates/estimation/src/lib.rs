//! Impact Estimation
//!
//! Numerical core of the intraday price-impact pipeline:
//! - **Daily Summary**: Realized volatility and traded volume per stock-day
//! - **Scaling Factors**: Lagged rolling baselines of volatility and volume
//! - **Intraday Volume**: Decayed running |volume| profile per stock-day
//! - **Impact States**: Kernel-normalized, decayed order flow per bucket
//! - **Regression Moments**: Additive (x, y) sums of impact change vs. return
//! - **Ridge Fit**: Walk-forward month-on-month coefficients and R²
//!
//! ## Architecture
//!
//! ```text
//! Binned observations ──► pivot ──► volume / price panels
//!                                        │
//!          ┌─────────────────────────────┼───────────────────────────┐
//!          ▼                             ▼                           │
//!   Daily Summary ──► Scaling Factors   Intraday Volume              │
//!                          │                 │                       │
//!                          └──────┬──────────┘                       │
//!                                 ▼                                  │
//!                   Impact States (per kernel)                       │
//!                                 │                                  │
//!                                 ▼                                  ▼
//!                   Regression Moments ◄──────────────────── filled prices
//!                                 │
//!                                 ▼
//!                   Walk-forward Ridge ──► coefficients, IS/OOS R²
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use impact_estimation::{EstimationConfig, ImpactStateEngine, ScalingTable};
//!
//! let config = EstimationConfig::default();
//! let table = ScalingTable::from_rows(factors);
//! let engine = ImpactStateEngine::new(&table, config.decay_factor());
//! let states = engine.compute(ImpactKernel::Linear, &batch.volume, None)?;
//! ```

pub mod config;
pub mod decay;
pub mod error;
pub mod impact_state;
pub mod intraday_volume;
pub mod regression_stats;
pub mod ridge;
pub mod scaling;
pub mod summary;

pub use config::EstimationConfig;
pub use decay::{decay_factor, decayed_recursion, ewma};
pub use error::{EstimationError, Result};
pub use impact_state::{FlowNormalization, ImpactStateEngine, impact_state_row, signed_sqrt};
pub use intraday_volume::{PROFILE_FLOOR, intraday_volume_profile, smooth_row};
pub use regression_stats::{
    daily_moment_summaries, regression_observations, row_moments, summarize_by_stock_day,
};
pub use ridge::{RidgeEstimator, RidgeFit, monthly_moments};
pub use scaling::{ScalingTable, lag_one, rolling_mean, rolling_scaling_factors};
pub use summary::{pct_change, realized_volatility, sample_std, summarize, total_volume};

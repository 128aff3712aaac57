//! Impact Core Domain
//!
//! Pure domain types for intraday price-impact estimation.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod panel;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Input rows
    BinnedObservation,
    // Daily tables
    DailySummary,
    // Kernels
    ImpactKernel,
    // Regression tables
    MomentSummary,
    ObservationBatch,
    REQUIRED_COLUMNS,
    RegressionMoments,
    RegressionObservation,
    RegressionResult,
    ScalingFactor,
    fill_prices,
    parse_observations,
};
pub use error::{CoreError, Result};
pub use panel::{BucketPanel, PanelCell, SessionGrid};
pub use values::{BucketTime, StockDay, Ticker, TradeDate, YearMonth};

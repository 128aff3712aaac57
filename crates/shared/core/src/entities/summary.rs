use serde::{Deserialize, Serialize};

use crate::values::{StockDay, Ticker, TradeDate};

/// Realized volatility and traded volume of one stock-day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub stock: Ticker,
    pub date: TradeDate,
    /// Std of bucket returns scaled to a full session (NaN with < 2 returns)
    pub px_vol: f64,
    /// Total absolute traded volume
    pub volume: f64,
}

impl DailySummary {
    pub fn key(&self) -> StockDay {
        StockDay::new(self.stock.clone(), self.date)
    }
}

/// Lagged rolling baseline used to normalize a stock-day's order flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingFactor {
    pub stock: Ticker,
    pub date: TradeDate,
    pub px_vol: f64,
    pub volume: f64,
}

impl ScalingFactor {
    pub fn undefined(stock: impl Into<Ticker>, date: TradeDate) -> Self {
        Self {
            stock: stock.into(),
            date,
            px_vol: f64::NAN,
            volume: f64::NAN,
        }
    }

    pub fn key(&self) -> StockDay {
        StockDay::new(self.stock.clone(), self.date)
    }

    /// Both baselines available and the volume baseline usable as a divisor
    pub fn is_defined(&self) -> bool {
        self.px_vol.is_finite() && self.volume.is_finite() && self.volume > 0.0
    }
}

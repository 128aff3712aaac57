use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock identifier (exchange ticker)
pub type Ticker = String;

/// Trading date
pub type TradeDate = NaiveDate;

/// Label of a fixed-width intraday time bucket (bucket end time)
pub type BucketTime = NaiveTime;

/// Key of a single stock-day row in every (stock, date) table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockDay {
    pub stock: Ticker,
    pub date: TradeDate,
}

impl StockDay {
    pub fn new(stock: impl Into<Ticker>, date: TradeDate) -> Self {
        Self {
            stock: stock.into(),
            date,
        }
    }

    /// Calendar month the day belongs to
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }
}

impl fmt::Display for StockDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.stock, self.date)
    }
}

/// Calendar month, the unit of the walk-forward fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: TradeDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month (December rolls into January)
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn contains(&self, date: TradeDate) -> bool {
        Self::of(date) == *self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

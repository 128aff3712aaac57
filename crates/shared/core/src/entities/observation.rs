//! Binned trade/price observations and their pivot into wide panels

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

use crate::error::{CoreError, Result};
use crate::panel::{BucketPanel, SessionGrid};
use crate::values::{BucketTime, StockDay, Ticker, TradeDate};

/// Columns every input record must carry
pub const REQUIRED_COLUMNS: [&str; 5] = ["stock", "date", "time", "trade", "midEnd"];

const DATE_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// One (stock, date, bucket) row of binned market data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedObservation {
    pub stock: Ticker,
    pub date: TradeDate,
    pub time: BucketTime,
    /// Signed traded volume in the bucket (buys positive)
    pub trade: f64,
    /// Mid price at the end of the bucket
    #[serde(rename = "midEnd")]
    pub mid_end: Option<f64>,
}

impl BinnedObservation {
    pub fn new(
        stock: impl Into<Ticker>,
        date: TradeDate,
        time: BucketTime,
        trade: f64,
        mid_end: Option<f64>,
    ) -> Self {
        Self {
            stock: stock.into(),
            date,
            time,
            trade,
            mid_end,
        }
    }

    pub fn key(&self) -> StockDay {
        StockDay::new(self.stock.clone(), self.date)
    }

    /// Decode one raw record (`date` as `YYYYMMDD`, `time` as `HH:MM:SS`)
    pub fn from_record(record: &Map<String, Value>) -> Result<Self> {
        for column in REQUIRED_COLUMNS {
            if !record.contains_key(column) {
                return Err(CoreError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        let stock = match &record["stock"] {
            Value::String(s) if !s.is_empty() => s.clone(),
            other => return Err(malformed("stock", other, "expected a non-empty string")),
        };

        let date_text = match &record["date"] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(malformed("date", other, "expected YYYYMMDD")),
        };
        let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT)
            .map_err(|e| malformed("date", &record["date"], &e.to_string()))?;

        let time = match &record["time"] {
            Value::String(s) => BucketTime::parse_from_str(s, TIME_FORMAT)
                .map_err(|e| malformed("time", &record["time"], &e.to_string()))?,
            other => return Err(malformed("time", other, "expected HH:MM:SS")),
        };

        // Missing trade counts as no volume, missing price is forward-filled later
        let trade = optional_number("trade", &record["trade"])?.unwrap_or(0.0);
        let mid_end = optional_number("midEnd", &record["midEnd"])?;

        Ok(Self {
            stock,
            date,
            time,
            trade,
            mid_end,
        })
    }
}

fn malformed(column: &str, value: &Value, reason: &str) -> CoreError {
    CoreError::MalformedField {
        column: column.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn optional_number(column: &str, value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(malformed(column, other, "expected a number or null")),
    }
}

/// Parse a JSON array of raw observation records
pub fn parse_observations(json: &str) -> Result<Vec<BinnedObservation>> {
    let records: Vec<Map<String, Value>> =
        serde_json::from_str(json).map_err(|e| CoreError::Parse(e.to_string()))?;
    records.iter().map(BinnedObservation::from_record).collect()
}

/// A batch of observations pivoted to the wide layout
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBatch {
    /// Signed traded volume, 0 where a bucket has no row
    pub volume: BucketPanel,
    /// Mid price, forward- then backward-filled along each row
    pub price: BucketPanel,
}

impl ObservationBatch {
    /// Pivot narrow observations onto the batch's session grid
    pub fn pivot(observations: &[BinnedObservation]) -> Result<Self> {
        if observations.is_empty() {
            return Err(CoreError::EmptyBatch);
        }

        let grid = SessionGrid::new(observations.iter().map(|o| o.time));
        let width = grid.len();

        let mut seen = HashSet::with_capacity(observations.len());
        let mut volume: BTreeMap<StockDay, Vec<f64>> = BTreeMap::new();
        let mut price: BTreeMap<StockDay, Vec<f64>> = BTreeMap::new();

        for obs in observations {
            let key = obs.key();
            if !seen.insert((key.clone(), obs.time)) {
                return Err(CoreError::DuplicateObservation {
                    key: key.to_string(),
                    time: obs.time.to_string(),
                });
            }
            // Every label came from the batch itself
            let Some(column) = grid.index_of(obs.time) else {
                continue;
            };
            volume.entry(key.clone()).or_insert_with(|| vec![0.0; width])[column] = obs.trade;
            price.entry(key).or_insert_with(|| vec![f64::NAN; width])[column] =
                obs.mid_end.unwrap_or(f64::NAN);
        }

        for row in price.values_mut() {
            fill_prices(row);
        }

        Ok(Self {
            volume: BucketPanel::from_rows(grid.clone(), volume)?,
            price: BucketPanel::from_rows(grid, price)?,
        })
    }

    pub fn grid(&self) -> &SessionGrid {
        self.volume.grid()
    }
}

/// Forward-fill then backward-fill NaN gaps in place
pub fn fill_prices(row: &mut [f64]) {
    let mut last = f64::NAN;
    for value in row.iter_mut() {
        if value.is_nan() {
            *value = last;
        } else {
            last = *value;
        }
    }
    let mut next = f64::NAN;
    for value in row.iter_mut().rev() {
        if value.is_nan() {
            *value = next;
        } else {
            next = *value;
        }
    }
}

//! Wide (stock-day × bucket) tables
//!
//! The batch layout used at the data boundary: one row per stock-day, one
//! column per bucket of the [`SessionGrid`]. Every row has exactly
//! `grid.len()` values. Numerical code works on the row slices, and
//! [`BucketPanel::to_long`] gives the narrow one-row-per-observation view.

mod grid;

pub use grid::SessionGrid;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::values::{BucketTime, StockDay};

/// One observation of a panel in narrow layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelCell {
    pub key: StockDay,
    pub time: BucketTime,
    pub value: f64,
}

/// Wide table keyed by stock-day with one column per bucket
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketPanel {
    grid: SessionGrid,
    rows: BTreeMap<StockDay, Vec<f64>>,
}

impl BucketPanel {
    pub fn new(grid: SessionGrid) -> Self {
        Self {
            grid,
            rows: BTreeMap::new(),
        }
    }

    /// Build from complete rows, rejecting any row of the wrong width
    pub fn from_rows(
        grid: SessionGrid,
        rows: impl IntoIterator<Item = (StockDay, Vec<f64>)>,
    ) -> Result<Self> {
        let mut panel = Self::new(grid);
        for (key, values) in rows {
            panel.insert(key, values)?;
        }
        Ok(panel)
    }

    /// Rebuild a wide panel from narrow cells; absent cells become `fill`
    pub fn from_long(
        grid: SessionGrid,
        cells: impl IntoIterator<Item = PanelCell>,
        fill: f64,
    ) -> Result<Self> {
        let width = grid.len();
        let mut rows: BTreeMap<StockDay, Vec<f64>> = BTreeMap::new();
        for cell in cells {
            let column = grid
                .index_of(cell.time)
                .ok_or_else(|| CoreError::MalformedField {
                    column: "time".to_string(),
                    value: cell.time.to_string(),
                    reason: "bucket not on the session grid".to_string(),
                })?;
            rows.entry(cell.key).or_insert_with(|| vec![fill; width])[column] = cell.value;
        }
        Ok(Self { grid, rows })
    }

    pub fn insert(&mut self, key: StockDay, values: Vec<f64>) -> Result<()> {
        if values.len() != self.grid.len() {
            return Err(CoreError::RaggedRow {
                key: key.to_string(),
                expected: self.grid.len(),
                found: values.len(),
            });
        }
        self.rows.insert(key, values);
        Ok(())
    }

    pub fn grid(&self) -> &SessionGrid {
        &self.grid
    }

    /// Number of stock-day rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &StockDay) -> Option<&[f64]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Rows in key order
    pub fn rows(&self) -> impl Iterator<Item = (&StockDay, &[f64])> {
        self.rows.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Narrow view: one cell per (stock, date, bucket)
    pub fn to_long(&self) -> Vec<PanelCell> {
        self.rows
            .iter()
            .flat_map(|(key, values)| {
                self.grid
                    .times()
                    .iter()
                    .zip(values)
                    .map(move |(time, value)| PanelCell {
                        key: key.clone(),
                        time: *time,
                        value: *value,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(s: u32) -> BucketTime {
        BucketTime::from_hms_opt(9, 30, s).unwrap()
    }

    fn key(stock: &str) -> StockDay {
        StockDay::new(stock, NaiveDate::from_ymd_opt(2019, 1, 2).unwrap())
    }

    #[test]
    fn test_ragged_row_rejected() {
        let grid = SessionGrid::new([t(10), t(20)]);
        let err = BucketPanel::from_rows(grid, [(key("AAPL"), vec![1.0])]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RaggedRow {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_long_layout_preserves_cells() {
        let grid = SessionGrid::new([t(10), t(20)]);
        let panel = BucketPanel::from_rows(
            grid.clone(),
            [(key("AAPL"), vec![1.0, 2.0]), (key("MSFT"), vec![3.0, 4.0])],
        )
        .unwrap();

        let cells = panel.to_long();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[2].key, key("MSFT"));
        assert_eq!(cells[2].time, t(10));
        assert_eq!(cells[2].value, 3.0);

        let rebuilt = BucketPanel::from_long(grid, cells, 0.0).unwrap();
        assert_eq!(rebuilt, panel);
    }

    #[test]
    fn test_from_long_fills_missing_cells() {
        let grid = SessionGrid::new([t(10), t(20), t(30)]);
        let cells = vec![PanelCell {
            key: key("AAPL"),
            time: t(20),
            value: 5.0,
        }];
        let panel = BucketPanel::from_long(grid, cells, 0.0).unwrap();
        assert_eq!(panel.row(&key("AAPL")), Some(&[0.0, 5.0, 0.0][..]));
    }

    #[test]
    fn test_off_grid_cell_rejected() {
        let grid = SessionGrid::new([t(10)]);
        let cells = vec![PanelCell {
            key: key("AAPL"),
            time: t(40),
            value: 1.0,
        }];
        assert!(BucketPanel::from_long(grid, cells, 0.0).is_err());
    }
}

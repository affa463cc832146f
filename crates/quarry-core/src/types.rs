//! Core data types for fetched statements and derived series.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Cell`] - A raw statement cell as delivered by a provider
//! - [`StatementKind`] - Which of the three statements a table holds
//! - [`FinancialTable`] - One statement, rows = periods, columns = line items
//! - [`StatementBundle`] - The three tables fetched for one symbol
//! - [`TimeSeries`] - A dated numeric series derived from a table column
//! - [`MetricRecord`] - A named summary metric

use crate::error::{QuarryError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A raw table cell as delivered by the provider.
///
/// Providers mix numeric values with stray text and gaps. Coercion to a
/// number happens lazily via [`Cell::as_number`]; unparseable cells become
/// missing, never zero and never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    /// A numeric value.
    Number(f64),
    /// A textual value that may or may not parse as a number.
    Text(String),
    /// No value reported for this period.
    Empty,
}

impl Cell {
    /// Coerce the cell to a number, returning `None` for anything that
    /// cannot be parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Empty => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Empty => Ok(()),
        }
    }
}

/// Which financial statement a table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// File stem used for the raw CSV artifact of this statement.
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::BalanceSheet => "balance",
            Self::CashFlow => "cashflow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Income => "income statement",
            Self::BalanceSheet => "balance sheet",
            Self::CashFlow => "cash flow statement",
        };
        write!(f, "{name}")
    }
}

/// One financial statement: rows are reporting periods, columns are
/// provider-labeled line items.
///
/// Column labels are free text and inconsistent across providers and
/// tickers, so consumers locate columns by case-insensitive substring
/// match rather than exact keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialTable {
    statement: StatementKind,
    columns: Vec<String>,
    rows: Vec<(NaiveDate, Vec<Cell>)>,
}

impl FinancialTable {
    /// Create an empty table with the given column labels, preserving the
    /// provider's natural column order.
    pub fn new(statement: StatementKind, columns: Vec<String>) -> Self {
        Self {
            statement,
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a period row. The number of cells must match the number of
    /// column labels.
    pub fn push_row(&mut self, period: NaiveDate, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(QuarryError::Parse(format!(
                "row for {period} has {} cells, table has {} columns",
                cells.len(),
                self.columns.len()
            )));
        }
        self.rows.push((period, cells));
        Ok(())
    }

    /// Which statement this table holds.
    pub const fn statement(&self) -> StatementKind {
        self.statement
    }

    /// Column labels in the provider's natural order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Period rows in their current order.
    pub fn rows(&self) -> &[(NaiveDate, Vec<Cell>)] {
        &self.rows
    }

    /// Number of period rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sort rows ascending by period (oldest first). Growth formulas assume
    /// first element = earliest period.
    pub fn sort_chronological(&mut self) {
        self.rows.sort_by_key(|(period, _)| *period);
    }

    /// Coerced numeric values of one column, one entry per period, with
    /// unparseable cells surfaced as `None`.
    pub fn numeric_column(&self, idx: usize) -> Vec<(NaiveDate, Option<f64>)> {
        self.rows
            .iter()
            .map(|(period, cells)| (*period, cells[idx].as_number()))
            .collect()
    }

    /// One column as a [`TimeSeries`], with missing values dropped (not
    /// interpolated).
    pub fn series(&self, idx: usize) -> TimeSeries {
        let points = self
            .numeric_column(idx)
            .into_iter()
            .filter_map(|(period, value)| value.map(|v| (period, v)))
            .collect();
        TimeSeries::new(points)
    }
}

/// The three statements fetched for one symbol.
#[derive(Debug, Clone)]
pub struct StatementBundle {
    /// Symbol the statements belong to.
    pub symbol: String,
    /// Income statement.
    pub income: FinancialTable,
    /// Balance sheet.
    pub balance: FinancialTable,
    /// Cash flow statement.
    pub cash_flow: FinancialTable,
}

/// A dated numeric series, sorted ascending by period on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    /// Create a series from dated points, sorting ascending by period.
    pub fn new(mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(period, _)| *period);
        Self { points }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points, oldest first.
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    /// Value at the earliest period, if any.
    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|(_, v)| *v)
    }

    /// Value at the latest period, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|(_, v)| *v)
    }

    /// Value at a specific period, if present.
    pub fn value_at(&self, period: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&period, |(p, _)| *p)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Earliest and latest period, if the series is non-empty.
    pub fn period_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some((first, _)), Some((last, _))) => Some((*first, *last)),
            _ => None,
        }
    }

    /// Smallest and largest value, if the series is non-empty.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|(_, v)| *v).fold(None, |acc, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    }

    /// Inner alignment: intersect two series by period, keeping chronological
    /// order. Only periods present in both survive; both outputs cover the
    /// identical period set.
    pub fn align_inner(&self, other: &Self) -> (Self, Self) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for (period, value) in &self.points {
            if let Some(other_value) = other.value_at(*period) {
                left.push((*period, *value));
                right.push((*period, other_value));
            }
        }
        (Self { points: left }, Self { points: right })
    }
}

/// A named summary metric produced by one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRecord {
    /// Human-readable metric name.
    #[serde(rename = "Metric")]
    pub name: &'static str,
    /// Metric value as a plain ratio (0.10 = 10%).
    #[serde(rename = "Value")]
    pub value: f64,
}

impl MetricRecord {
    /// Create a new metric record.
    pub const fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}%", self.name, self.value * 100.0)
    }
}

//! CSV export for raw statements and summary metrics.

use chrono::NaiveDate;
use quarry_core::{Cell, FinancialTable, MetricRecord};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing artifacts.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart rendering error.
    #[error("chart rendering error: {0}")]
    Chart(String),
}

/// Trait for serializing pipeline data to CSV.
///
/// The string-level method keeps the serialization testable without touching
/// the filesystem; `write_csv` adds directory creation and the file write.
pub trait CsvExport {
    /// Serialize to a CSV string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_csv_string(&self) -> Result<String, OutputError>;

    /// Serialize to a CSV file, creating the destination directory if
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn write_csv(&self, path: &Path) -> Result<(), OutputError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_csv_string()?)?;
        Ok(())
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) => v.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Empty => String::new(),
    }
}

fn format_period(period: NaiveDate) -> String {
    period.format("%Y-%m-%d").to_string()
}

impl CsvExport for FinancialTable {
    /// Lossless export: one row per period in current row order, first
    /// column `period`, then every provider column label verbatim. Text
    /// cells are written as-is and empty cells as blanks, never zeros.
    fn to_csv_string(&self) -> Result<String, OutputError> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = vec!["period".to_string()];
        header.extend(self.columns().iter().cloned());
        wtr.write_record(&header)?;

        for (period, cells) in self.rows() {
            let mut record = vec![format_period(*period)];
            record.extend(cells.iter().map(format_cell));
            wtr.write_record(&record)?;
        }

        let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
        Ok(data)
    }
}

impl CsvExport for Vec<MetricRecord> {
    /// Summary export with header `Metric,Value`, one row per record in
    /// emission order.
    fn to_csv_string(&self) -> Result<String, OutputError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in self {
            wtr.serialize(record)?;
        }
        let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::StatementKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_table_export_is_lossless() {
        let mut table = FinancialTable::new(
            StatementKind::Income,
            vec!["Total Revenue".to_string(), "Footnote".to_string()],
        );
        table
            .push_row(
                d(2022, 9, 24),
                vec![Cell::Number(394328000000.0), Cell::Text("restated".to_string())],
            )
            .unwrap();
        table
            .push_row(d(2023, 9, 30), vec![Cell::Number(383285000000.0), Cell::Empty])
            .unwrap();

        let csv = table.to_csv_string().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("period,Total Revenue,Footnote"));
        assert_eq!(lines.next(), Some("2022-09-24,394328000000,restated"));
        assert_eq!(lines.next(), Some("2023-09-30,383285000000,"));
    }

    #[test]
    fn test_summary_export_header_and_order() {
        let records = vec![
            MetricRecord::new("Revenue CAGR", 0.10),
            MetricRecord::new("Free Cash Flow CAGR", 0.118),
            MetricRecord::new("Average Free Cash Flow Margin", 0.407),
        ];

        let csv = records.to_csv_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Revenue CAGR,0.1"));
        assert!(lines[2].starts_with("Free Cash Flow CAGR,"));
        assert!(lines[3].starts_with("Average Free Cash Flow Margin,"));
    }

    #[test]
    fn test_write_csv_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary_metrics.csv");
        let records = vec![MetricRecord::new("Revenue CAGR", 0.10)];

        records.write_csv(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Revenue CAGR"));
    }
}

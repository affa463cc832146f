//! ASCII summary table for terminal display.

use quarry_core::MetricRecord;

/// Format the summary metrics as an ASCII table.
pub fn summary_table(symbol: &str, records: &[MetricRecord]) -> String {
    let mut output = String::new();

    output.push_str(&format!("\nSummary Metrics: {symbol}\n"));
    output.push_str(&"=".repeat(48));
    output.push('\n');
    output.push_str(&format!("{:<36}{:>12}\n", "Metric", "Value"));
    output.push_str(&"-".repeat(48));
    output.push('\n');

    for record in records {
        let value = if record.value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{:.2}%", record.value * 100.0)
        };
        output.push_str(&format!("{:<36}{value:>12}\n", record.name));
    }

    output.push_str(&"=".repeat(48));
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_table_contents() {
        let records = vec![
            MetricRecord::new("Revenue CAGR", 0.10),
            MetricRecord::new("Free Cash Flow CAGR", 0.118),
            MetricRecord::new("Average Free Cash Flow Margin", 0.407),
        ];

        let table = summary_table("AAPL", &records);
        assert!(table.contains("Summary Metrics: AAPL"));
        assert!(table.contains("Revenue CAGR"));
        assert!(table.contains("10.00%"));
        assert!(table.contains("40.70%"));
    }

    #[test]
    fn test_nan_is_printed_verbatim() {
        let records = vec![MetricRecord::new("Average Free Cash Flow Margin", f64::NAN)];
        let table = summary_table("AAPL", &records);
        assert!(table.contains("NaN"));
    }
}

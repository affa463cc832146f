//! Financial statement fetching from Yahoo Finance.

use async_trait::async_trait;
use chrono::NaiveDate;
use quarry_core::{
    Cell, FinancialTable, QuarryError, Result, StatementBundle, StatementKind, StatementProvider,
};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory";

/// Entry keys that are statement metadata rather than line items.
const METADATA_KEYS: [&str; 2] = ["endDate", "maxAge"];

/// Yahoo Finance statements provider with rate limiting.
#[derive(Debug)]
pub struct YahooStatementsProvider {
    client: reqwest::Client,
    rate_limit_delay: Duration,
}

impl YahooStatementsProvider {
    /// Create a new provider with default rate limiting (1 req/sec).
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a new provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
                .build()
                .expect("Failed to create HTTP client"),
            rate_limit_delay,
        }
    }
}

impl Default for YahooStatementsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatementProvider for YahooStatementsProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch_statements(&self, symbol: &str) -> Result<StatementBundle> {
        if symbol.is_empty() {
            return Err(QuarryError::InvalidSymbol("Empty symbol".to_string()));
        }

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules={MODULES}");
        info!(%symbol, "fetching statements from Yahoo Finance");

        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_quote_summary(symbol, &body)
    }
}

/// Parse a quoteSummary response body into the three statement tables.
fn parse_quote_summary(symbol: &str, body: &Value) -> Result<StatementBundle> {
    let result = body
        .pointer("/quoteSummary/result/0")
        .ok_or_else(|| QuarryError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })?;

    let income = parse_statement(
        StatementKind::Income,
        result.pointer("/incomeStatementHistory/incomeStatementHistory"),
    )?;
    let balance = parse_statement(
        StatementKind::BalanceSheet,
        result.pointer("/balanceSheetHistory/balanceSheetStatements"),
    )?;
    let cash_flow = parse_statement(
        StatementKind::CashFlow,
        result.pointer("/cashflowStatementHistory/cashflowStatements"),
    )?;

    if income.is_empty() && balance.is_empty() && cash_flow.is_empty() {
        return Err(QuarryError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "no statements returned".to_string(),
        });
    }

    Ok(StatementBundle {
        symbol: symbol.to_string(),
        income,
        balance,
        cash_flow,
    })
}

/// Parse one statement's period entries into a table.
///
/// Every key except the period metadata becomes a column, in first-seen
/// order. Value objects carry the number under `raw`; bare numbers and
/// strings are taken as-is; anything else is an empty cell.
fn parse_statement(kind: StatementKind, entries: Option<&Value>) -> Result<FinancialTable> {
    let entries = match entries.and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Ok(FinancialTable::new(kind, Vec::new())),
    };

    let mut columns: Vec<String> = Vec::new();
    for entry in entries {
        if let Some(object) = entry.as_object() {
            for key in object.keys() {
                if !METADATA_KEYS.contains(&key.as_str()) && !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut table = FinancialTable::new(kind, columns);
    for entry in entries {
        let object = match entry.as_object() {
            Some(object) => object,
            None => continue,
        };
        let period = match object.get("endDate").and_then(parse_period) {
            Some(period) => period,
            None => continue,
        };
        let cells = table
            .columns()
            .iter()
            .map(|label| object.get(label).map_or(Cell::Empty, parse_cell))
            .collect();
        table.push_row(period, cells)?;
    }

    Ok(table)
}

/// Period end date from an `endDate` value: the `fmt` field as YYYY-MM-DD,
/// falling back to the `raw` unix timestamp.
fn parse_period(end_date: &Value) -> Option<NaiveDate> {
    if let Some(fmt) = end_date.get("fmt").and_then(Value::as_str) {
        if let Ok(date) = NaiveDate::parse_from_str(fmt, "%Y-%m-%d") {
            return Some(date);
        }
    }
    let raw = end_date.get("raw").and_then(Value::as_i64)?;
    chrono::DateTime::from_timestamp(raw, 0).map(|dt| dt.date_naive())
}

/// Single line-item value to a raw cell.
fn parse_cell(value: &Value) -> Cell {
    match value {
        Value::Object(object) => object.get("raw").map_or(Cell::Empty, parse_cell),
        Value::Number(n) => n.as_f64().map_or(Cell::Empty, Cell::Number),
        Value::String(s) => Cell::Text(s.clone()),
        _ => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Value {
        serde_json::json!({
            "quoteSummary": {
                "result": [{
                    "incomeStatementHistory": {
                        "incomeStatementHistory": [
                            {
                                "maxAge": 1,
                                "endDate": {"raw": 1695945600, "fmt": "2023-09-30"},
                                "totalRevenue": {"raw": 383285000000.0, "fmt": "383.29B"},
                                "netIncome": {"raw": 96995000000.0, "fmt": "97.0B"}
                            },
                            {
                                "maxAge": 1,
                                "endDate": {"raw": 1664150400, "fmt": "2022-09-24"},
                                "totalRevenue": {"raw": 394328000000.0, "fmt": "394.33B"},
                                "netIncome": null
                            }
                        ]
                    },
                    "balanceSheetHistory": {
                        "balanceSheetStatements": [
                            {
                                "maxAge": 1,
                                "endDate": {"raw": 1695945600, "fmt": "2023-09-30"},
                                "totalAssets": {"raw": 352583000000.0}
                            }
                        ]
                    },
                    "cashflowStatementHistory": {
                        "cashflowStatements": [
                            {
                                "maxAge": 1,
                                "endDate": {"raw": 1695945600, "fmt": "2023-09-30"},
                                "totalCashFromOperatingActivities": {"raw": 110543000000.0},
                                "capitalExpenditures": {"raw": -10959000000.0},
                                "annotation": "restated"
                            }
                        ]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_parse_quote_summary_fixture() {
        let bundle = parse_quote_summary("AAPL", &fixture()).unwrap();
        assert_eq!(bundle.symbol, "AAPL");

        assert_eq!(bundle.income.columns(), ["totalRevenue", "netIncome"]);
        assert_eq!(bundle.income.height(), 2);
        assert_eq!(bundle.balance.height(), 1);
        assert_eq!(bundle.cash_flow.height(), 1);

        let (period, cells) = &bundle.income.rows()[0];
        assert_eq!(*period, NaiveDate::from_ymd_opt(2023, 9, 30).unwrap());
        assert_eq!(cells[0], Cell::Number(383285000000.0));

        // Null values become empty cells, not zeros.
        let (_, cells) = &bundle.income.rows()[1];
        assert_eq!(cells[1], Cell::Empty);
    }

    #[test]
    fn test_text_cells_survive_parsing() {
        let bundle = parse_quote_summary("AAPL", &fixture()).unwrap();
        let annotation_idx = bundle
            .cash_flow
            .columns()
            .iter()
            .position(|c| c == "annotation")
            .unwrap();
        let (_, cells) = &bundle.cash_flow.rows()[0];
        assert_eq!(cells[annotation_idx], Cell::Text("restated".to_string()));
    }

    #[test]
    fn test_empty_result_is_data_unavailable() {
        let body = serde_json::json!({"quoteSummary": {"result": [], "error": null}});
        let err = parse_quote_summary("NOPE", &body).unwrap_err();
        assert!(matches!(err, QuarryError::DataUnavailable { .. }));
    }

    #[test]
    fn test_all_statements_empty_is_data_unavailable() {
        let body = serde_json::json!({"quoteSummary": {"result": [{}], "error": null}});
        let err = parse_quote_summary("NOPE", &body).unwrap_err();
        match err {
            QuarryError::DataUnavailable { symbol, .. } => assert_eq!(symbol, "NOPE"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_period_falls_back_to_raw_timestamp() {
        let end_date = serde_json::json!({"raw": 1695945600});
        assert_eq!(
            parse_period(&end_date),
            Some(NaiveDate::from_ymd_opt(2023, 9, 29).unwrap())
        );
    }
}

//! Run configuration.
//!
//! The original one-shot script hardcoded the ticker, the output folders and
//! the lookup keywords. They live here as named fields with defaults so the
//! derivation logic can be exercised with synthetic tables and no real
//! filesystem or network.

use std::path::PathBuf;

/// Keyword lists used to locate line-item columns by case-insensitive
/// substring match.
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    /// Substrings identifying the revenue column, tested in order.
    pub revenue: Vec<String>,
    /// Substrings identifying a reported free-cash-flow column.
    pub free_cash_flow: Vec<String>,
    /// Substrings identifying the operating-cash-flow column.
    pub operating_cash_flow: Vec<String>,
    /// Substrings identifying the capital-expenditures column.
    pub capital_expenditure: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            revenue: list(&["total revenue", "revenue", "revenues"]),
            free_cash_flow: list(&["free cash flow", "fcf"]),
            operating_cash_flow: list(&["operat"]),
            capital_expenditure: list(&["capex", "capital"]),
        }
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Ticker symbol to fetch.
    pub ticker: String,
    /// Directory receiving the raw statement and summary CSVs.
    pub table_dir: PathBuf,
    /// Directory receiving the chart images.
    pub chart_dir: PathBuf,
    /// Column lookup keywords.
    pub keywords: KeywordConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            table_dir: PathBuf::from("tables"),
            chart_dir: PathBuf::from("charts"),
            keywords: KeywordConfig::default(),
        }
    }
}

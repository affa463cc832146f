//! Keyword-based column resolution.
//!
//! Statement column labels are provider-defined free text ("Total Revenue",
//! "totalRevenue", "Revenues", ...), so a semantic field is located by an
//! ordered list of case-insensitive substring rules rather than exact keys.
//! Columns are scanned in the table's natural order and the first label
//! containing any keyword wins.

use quarry_core::{FinancialTable, QuarryError, Result};
use std::fmt;

/// The semantic line items the deriver needs to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticField {
    /// Top-line revenue on the income statement.
    Revenue,
    /// A directly reported free-cash-flow line on the cash flow statement.
    FreeCashFlow,
    /// Cash generated from operations.
    OperatingCashFlow,
    /// Cash spent on fixed assets.
    CapitalExpenditures,
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Revenue => "revenue",
            Self::FreeCashFlow => "free cash flow",
            Self::OperatingCashFlow => "operating cash flow",
            Self::CapitalExpenditures => "capital expenditures",
        };
        write!(f, "{name}")
    }
}

/// Locate a column by keyword, returning its index, or `None` when no label
/// matches.
pub fn try_resolve_column(table: &FinancialTable, keywords: &[String]) -> Option<usize> {
    table.columns().iter().position(|label| {
        let label = label.to_lowercase();
        keywords.iter().any(|keyword| label.contains(keyword.as_str()))
    })
}

/// Locate a required column by keyword.
///
/// Fails with [`QuarryError::MetricResolution`] carrying the table's actual
/// column labels when no label matches, so the caller can see what the
/// provider delivered.
pub fn resolve_column(
    table: &FinancialTable,
    field: SemanticField,
    keywords: &[String],
) -> Result<usize> {
    try_resolve_column(table, keywords).ok_or_else(|| QuarryError::MetricResolution {
        field: field.to_string(),
        available: table.columns().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quarry_core::{Cell, KeywordConfig, StatementKind};
    use rstest::rstest;

    fn income_table(columns: &[&str]) -> FinancialTable {
        let mut table = FinancialTable::new(
            StatementKind::Income,
            columns.iter().map(|c| (*c).to_string()).collect(),
        );
        table
            .push_row(
                NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
                vec![Cell::Number(1.0); columns.len()],
            )
            .unwrap();
        table
    }

    #[rstest]
    #[case("Total Revenue")]
    #[case("TOTAL REVENUE")]
    #[case("total revenue")]
    fn test_exact_total_revenue_any_case(#[case] label: &str) {
        let keywords = KeywordConfig::default();
        let table = income_table(&["Cost Of Revenue", label]);
        // "Cost Of Revenue" matches the "revenue" keyword too, and it comes
        // first in natural order, so it wins unless the exact label is first.
        let idx = resolve_column(&table, SemanticField::Revenue, &keywords.revenue).unwrap();
        assert_eq!(idx, 0);

        let table = income_table(&[label, "Net Income"]);
        let idx = resolve_column(&table, SemanticField::Revenue, &keywords.revenue).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(table.columns()[idx], label);
    }

    #[test]
    fn test_camel_case_provider_label() {
        let keywords = KeywordConfig::default();
        let table = income_table(&["netIncome", "totalRevenue"]);
        let idx = resolve_column(&table, SemanticField::Revenue, &keywords.revenue).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_resolution_failure_lists_columns() {
        let keywords = KeywordConfig::default();
        let table = income_table(&["Gross Profit", "Net Income"]);
        let err =
            resolve_column(&table, SemanticField::Revenue, &keywords.revenue).unwrap_err();
        match err {
            QuarryError::MetricResolution { field, available } => {
                assert_eq!(field, "revenue");
                assert_eq!(available, vec!["Gross Profit", "Net Income"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_try_resolve_optional() {
        let keywords = KeywordConfig::default();
        let table = income_table(&["Operating Cash Flow", "Capital Expenditures"]);
        assert_eq!(try_resolve_column(&table, &keywords.free_cash_flow), None);
        assert_eq!(try_resolve_column(&table, &keywords.operating_cash_flow), Some(0));
        assert_eq!(try_resolve_column(&table, &keywords.capital_expenditure), Some(1));
    }
}

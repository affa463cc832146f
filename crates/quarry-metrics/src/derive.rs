//! Metric derivation over fetched statements.
//!
//! The pipeline here mirrors the annual-report workflow: sort both tables
//! oldest-first, coerce cells to numbers, locate the revenue and free cash
//! flow series by keyword, intersect them by period, then compute the three
//! summary metrics.

use crate::resolve::{SemanticField, resolve_column, try_resolve_column};
use quarry_core::{FinancialTable, KeywordConfig, MetricRecord, QuarryError, Result, TimeSeries};
use tracing::debug;

/// Metric name for revenue growth.
pub const REVENUE_CAGR: &str = "Revenue CAGR";
/// Metric name for free cash flow growth.
pub const FCF_CAGR: &str = "Free Cash Flow CAGR";
/// Metric name for the average free cash flow margin.
pub const AVERAGE_FCF_MARGIN: &str = "Average Free Cash Flow Margin";

/// Output of one derivation: the aligned series and the summary records.
#[derive(Debug, Clone)]
pub struct DerivedMetrics {
    /// Revenue series restricted to periods shared with free cash flow.
    pub revenue: TimeSeries,
    /// Free cash flow series restricted to periods shared with revenue.
    pub free_cash_flow: TimeSeries,
    /// Summary records in fixed order: Revenue CAGR, Free Cash Flow CAGR,
    /// Average Free Cash Flow Margin.
    pub records: Vec<MetricRecord>,
}

/// Compound annual growth rate of a series.
///
/// `(last / first) ^ (1 / (n - 1)) - 1` where `n` is the point count. The
/// exponent uses point count rather than elapsed calendar years, assuming an
/// uninterrupted annual-report cadence; a missing fiscal year shifts the
/// result. This approximation is deliberate and kept as the source behavior.
pub fn cagr(series: &TimeSeries) -> Result<f64> {
    let n = series.len();
    if n < 2 {
        return Err(QuarryError::InsufficientData { points: n });
    }
    let (Some(first), Some(last)) = (series.first_value(), series.last_value()) else {
        return Err(QuarryError::InsufficientData { points: n });
    };
    Ok((last / first).powf(1.0 / (n as f64 - 1.0)) - 1.0)
}

/// Mean of per-period `numerator / denominator` over two aligned series.
///
/// Periods with a zero denominator are undefined and skipped; if every
/// period is skipped the result is NaN, surfaced as-is rather than zeroed.
pub fn average_margin(numerator: &TimeSeries, denominator: &TimeSeries) -> f64 {
    let ratios: Vec<f64> = numerator
        .points()
        .iter()
        .zip(denominator.points().iter())
        .filter(|((_, _), (_, denom))| *denom != 0.0)
        .map(|((_, num), (_, denom))| num / denom)
        .collect();
    if ratios.is_empty() {
        return f64::NAN;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Free cash flow series from a cash flow statement.
///
/// A directly reported FCF column is used when the provider has one.
/// Otherwise FCF is derived element-wise by period as operating cash flow
/// minus capital expenditures; a period missing either operand is dropped.
pub fn free_cash_flow_series(
    cash_flow: &FinancialTable,
    keywords: &KeywordConfig,
) -> Result<TimeSeries> {
    if let Some(idx) = try_resolve_column(cash_flow, &keywords.free_cash_flow) {
        debug!(column = %cash_flow.columns()[idx], "using reported free cash flow column");
        return Ok(cash_flow.series(idx));
    }

    let cfo_idx = resolve_column(
        cash_flow,
        SemanticField::OperatingCashFlow,
        &keywords.operating_cash_flow,
    )?;
    let capex_idx = resolve_column(
        cash_flow,
        SemanticField::CapitalExpenditures,
        &keywords.capital_expenditure,
    )?;
    debug!(
        cfo = %cash_flow.columns()[cfo_idx],
        capex = %cash_flow.columns()[capex_idx],
        "deriving free cash flow as operating cash flow minus capex"
    );

    let points = cash_flow
        .numeric_column(cfo_idx)
        .into_iter()
        .zip(cash_flow.numeric_column(capex_idx))
        .filter_map(|((period, cfo), (_, capex))| match (cfo, capex) {
            (Some(cfo), Some(capex)) => Some((period, cfo - capex)),
            _ => None,
        })
        .collect();
    Ok(TimeSeries::new(points))
}

/// Derive the three summary metrics from the income and cash flow
/// statements.
///
/// Both tables are sorted chronologically before anything else; the growth
/// formulas assume first element = earliest period. Fails with
/// [`QuarryError::MetricResolution`] when a required column cannot be
/// located and [`QuarryError::InsufficientData`] when fewer than two
/// aligned periods survive.
pub fn derive_metrics(
    mut income: FinancialTable,
    mut cash_flow: FinancialTable,
    keywords: &KeywordConfig,
) -> Result<DerivedMetrics> {
    income.sort_chronological();
    cash_flow.sort_chronological();

    let revenue_idx = resolve_column(&income, SemanticField::Revenue, &keywords.revenue)?;
    let revenue = income.series(revenue_idx);
    let fcf = free_cash_flow_series(&cash_flow, keywords)?;

    let (revenue, fcf) = revenue.align_inner(&fcf);
    if revenue.len() < 2 {
        return Err(QuarryError::InsufficientData {
            points: revenue.len(),
        });
    }

    let revenue_cagr = cagr(&revenue)?;
    let fcf_cagr = cagr(&fcf)?;
    let fcf_margin = average_margin(&fcf, &revenue);

    Ok(DerivedMetrics {
        revenue,
        free_cash_flow: fcf,
        records: vec![
            MetricRecord::new(REVENUE_CAGR, revenue_cagr),
            MetricRecord::new(FCF_CAGR, fcf_cagr),
            MetricRecord::new(AVERAGE_FCF_MARGIN, fcf_margin),
        ],
    })
}

//! Provider trait for fetching financial statements.
//!
//! Data sources implement [`StatementProvider`] so the pipeline can be
//! exercised against mock providers in tests.

use crate::error::Result;
use crate::types::StatementBundle;
use async_trait::async_trait;
use std::fmt::Debug;

/// A source of financial statements for a symbol.
///
/// Implementations return the three statements oriented rows = periods,
/// columns = line items. An unreachable source or an empty result is a
/// [`crate::QuarryError::DataUnavailable`] and aborts the run; there is no
/// retry or partial-result handling.
#[async_trait]
pub trait StatementProvider: Send + Sync + Debug {
    /// Name of this provider (e.g. "Yahoo Finance").
    fn name(&self) -> &str;

    /// Fetch income statement, balance sheet and cash flow statement for
    /// one symbol.
    async fn fetch_statements(&self, symbol: &str) -> Result<StatementBundle>;
}

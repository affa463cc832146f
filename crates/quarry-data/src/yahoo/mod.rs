//! Yahoo Finance data providers.

pub mod statements;

pub use statements::YahooStatementsProvider;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod derive;
pub mod resolve;

pub use derive::{
    AVERAGE_FCF_MARGIN, DerivedMetrics, FCF_CAGR, REVENUE_CAGR, average_margin, cagr,
    derive_metrics, free_cash_flow_series,
};
pub use resolve::{SemanticField, resolve_column, try_resolve_column};

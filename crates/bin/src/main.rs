//! Quarry CLI binary.
//!
//! One-shot pipeline: fetch a company's financial statements, persist them
//! as CSV, derive growth and profitability metrics, and write the summary
//! table and charts. Every failure is fatal; nothing is retried.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use quarry_core::{RunConfig, StatementProvider};
use quarry_data::YahooStatementsProvider;
use quarry_metrics::derive_metrics;
use quarry_output::{CsvExport, render_line_chart, summary_table};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Fetch financial statements and derive growth metrics", long_about = None)]
#[command(version)]
struct Cli {
    /// Stock symbol to analyze
    #[arg(default_value = "AAPL")]
    symbol: String,

    /// Base directory for output artifacts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Rate-limit delay before the provider request, in milliseconds
    #[arg(long, default_value = "1000")]
    rate_limit_ms: u64,
}

impl Cli {
    fn into_config(self) -> (RunConfig, u64) {
        let defaults = RunConfig::default();
        let config = RunConfig {
            ticker: self.symbol.to_uppercase(),
            table_dir: self.output_dir.join(defaults.table_dir),
            chart_dir: self.output_dir.join(defaults.chart_dir),
            keywords: defaults.keywords,
        };
        (config, self.rate_limit_ms)
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let (config, rate_limit_ms) = cli.into_config();

    let provider = YahooStatementsProvider::with_rate_limit(Duration::from_millis(rate_limit_ms));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Fetching {} statements from {}...",
        config.ticker,
        provider.name()
    ));

    let fetched = provider.fetch_statements(&config.ticker).await;
    spinner.finish_and_clear();
    let mut bundle = fetched?;

    // Raw CSVs carry rows in chronological order, oldest first.
    bundle.income.sort_chronological();
    bundle.balance.sort_chronological();
    bundle.cash_flow.sort_chronological();

    for table in [&bundle.income, &bundle.balance, &bundle.cash_flow] {
        let path = config
            .table_dir
            .join(format!("{}.csv", table.statement().file_stem()));
        table.write_csv(&path)?;
        info!(statement = %table.statement(), path = %path.display(), rows = table.height(), "wrote raw statement");
    }

    let derived = derive_metrics(
        bundle.income.clone(),
        bundle.cash_flow.clone(),
        &config.keywords,
    )?;
    info!(
        periods = derived.revenue.len(),
        "derived metrics over aligned periods"
    );

    render_line_chart(
        &derived.revenue,
        &format!("{} Revenue Over Time", config.ticker),
        "Revenue ($)",
        &config.chart_dir.join("revenue_over_time.png"),
    )?;
    render_line_chart(
        &derived.free_cash_flow,
        &format!("{} Free Cash Flow Over Time", config.ticker),
        "FCF ($)",
        &config.chart_dir.join("fcf_over_time.png"),
    )?;
    info!(dir = %config.chart_dir.display(), "wrote charts");

    let summary_path = config.table_dir.join("summary_metrics.csv");
    derived.records.write_csv(&summary_path)?;
    info!(path = %summary_path.display(), "wrote summary metrics");

    print!("{}", summary_table(&config.ticker, &derived.records));

    Ok(())
}

//! Command line definition. Each subcommand is one dashboard tab.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use sales_forecast::aggregate::{Metric, Period};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sales_dashboard",
    about = "Sales and inventory dashboard with seasonal demand forecasts",
    version
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render the tab as pretty JSON instead of text"
    )]
    pub json: bool,
    #[arg(long, global = true, help = "JSON file overriding the forecast settings")]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Log more detail to stderr (-v debug, -vv trace)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview and summary statistics of the uploaded tables
    Overview(UploadArgs),
    /// Grouped sums, means, rankings and revenue shares
    Sales(SalesArgs),
    /// Stock-to-sales ratios and excess inventory warnings
    Inventory(InventoryArgs),
    /// Daily forecast of one product with a holdout backtest
    Forecast(ForecastArgs),
    /// Write synthetic sales and stock files to try the dashboard
    Sample(SampleArgs),
}

#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    #[arg(long, help = "Sales table (CSV or Excel)")]
    pub sales: Option<PathBuf>,
    #[arg(long, help = "Stock table (CSV or Excel)")]
    pub stock: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
    Year,
}

impl From<PeriodArg> for Period {
    fn from(value: PeriodArg) -> Self {
        match value {
            PeriodArg::Day => Period::Day,
            PeriodArg::Week => Period::Week,
            PeriodArg::Month => Period::Month,
            PeriodArg::Year => Period::Year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Quantity,
    Revenue,
}

impl From<MetricArg> for Metric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Quantity => Metric::Quantity,
            MetricArg::Revenue => Metric::Revenue,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SalesArgs {
    #[command(flatten)]
    pub upload: UploadArgs,
    #[arg(long, value_enum, default_value_t = PeriodArg::Month, help = "Bucket for grouped sums")]
    pub period: PeriodArg,
    #[arg(
        long,
        default_value_t = 5,
        value_parser = parse_positive_usize,
        help = "Number of products in the ranking"
    )]
    pub top: usize,
    #[arg(
        long,
        value_enum,
        default_value_t = MetricArg::Quantity,
        help = "Column used for the ranking"
    )]
    pub metric: MetricArg,
}

#[derive(Debug, Clone, Args)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub upload: UploadArgs,
    #[arg(long, help = "Write the ratio table to this CSV file")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub upload: UploadArgs,
    #[arg(long, help = "Product to forecast")]
    pub product: String,
    #[arg(
        long,
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Months of 30 days to forecast"
    )]
    pub months: usize,
    #[arg(long, default_value_t = 14, help = "Days of history shown before the forecast")]
    pub history: usize,
}

#[derive(Debug, Clone, Args)]
pub struct SampleArgs {
    #[arg(long, default_value = ".", help = "Directory receiving sales.csv and stock.csv")]
    pub out: PathBuf,
    #[arg(
        long,
        default_value_t = 180,
        value_parser = parse_positive_usize,
        help = "Days of sales history"
    )]
    pub days: usize,
    #[arg(long, default_value_t = 42, help = "Random seed")]
    pub seed: u64,
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", raw))?;
    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

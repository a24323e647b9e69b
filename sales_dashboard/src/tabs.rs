//! Dashboard tabs. Each one loads its inputs, computes its view and
//! writes it as text or JSON.

use crate::cli::{ForecastArgs, InventoryArgs, SalesArgs, SampleArgs, UploadArgs};
use crate::messages::{describe_error, user_message, MISSING_UPLOADS};
use crate::render;
use crate::sample;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Days, Local, NaiveDate};
use sales_forecast::aggregate::{
    mean_by_product, product_names, revenue_share, sales_by_period, top_n, Metric, Period,
    PeriodTotal, ProductMean, ProductTotal, RevenueShare,
};
use sales_forecast::data::{DatasetKind, LoadedData};
use sales_forecast::inventory::{
    excess_inventory, inventory_ratios, ratio_summary, write_ratio_csv, InventoryRatio,
};
use sales_forecast::{
    backtest, build_daily_series, BacktestResult, DataLoader, ForecastConfig, ForecastEngine,
    ForecastError, ForecastResult, SalesRecord, StockRecord, Table,
};
use serde::Serialize;
use series_math::{describe, Summary};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PREVIEW_ROWS: usize = 5;

/// Settings shared by every tab of one invocation
#[derive(Debug, Clone, Default)]
pub struct TabContext {
    pub config: ForecastConfig,
    pub json: bool,
}

impl TabContext {
    /// Build the context, reading the forecast settings file when given
    pub fn new(config_path: Option<&Path>, json: bool) -> Result<Self> {
        let config = match config_path {
            Some(path) => ForecastConfig::from_json_file(path)
                .with_context(|| format!("reading settings from {}", path.display()))?,
            None => ForecastConfig::default(),
        };
        Ok(Self { config, json })
    }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn load_sales(path: &Path) -> Result<LoadedData<SalesRecord>> {
    DataLoader::load_sales(path).with_context(|| format!("loading sales file {}", path.display()))
}

fn load_stock(path: &Path) -> Result<LoadedData<StockRecord>> {
    DataLoader::load_stock(path).with_context(|| format!("loading stock file {}", path.display()))
}

fn require_sales(upload: &UploadArgs) -> Result<&Path> {
    upload
        .sales
        .as_deref()
        .ok_or_else(|| anyhow!("please upload the sales file with --sales"))
}

#[derive(Debug, Serialize)]
struct ColumnSummary {
    column: String,
    #[serde(flatten)]
    summary: Summary,
}

#[derive(Debug, Serialize)]
struct UploadOverview {
    dataset: String,
    path: PathBuf,
    rows: usize,
    preview: Table,
    statistics: Vec<ColumnSummary>,
    /// Present when the table does not fit its schema
    problem: Option<String>,
}

fn overview_of(kind: DatasetKind, path: &Path) -> Result<UploadOverview> {
    let table = DataLoader::read_table(path)
        .with_context(|| format!("loading {} file {}", kind, path.display()))?;

    let statistics = table
        .numeric_columns()
        .into_iter()
        .filter_map(|(column, values)| {
            describe(&values)
                .ok()
                .map(|summary| ColumnSummary { column, summary })
        })
        .collect();

    let validation = match kind {
        DatasetKind::Sales => DataLoader::sales_from_table(&table).map(|r| r.len()),
        DatasetKind::Stock => DataLoader::stock_from_table(&table).map(|r| r.len()),
    };
    let problem = match validation {
        Ok(records) => {
            debug!(dataset = %kind, records, "upload matches its schema");
            None
        }
        Err(err) => Some(user_message(&err)),
    };

    Ok(UploadOverview {
        dataset: kind.to_string(),
        path: path.to_path_buf(),
        rows: table.len(),
        preview: table.head(PREVIEW_ROWS),
        statistics,
        problem,
    })
}

/// Preview and statistics of whichever uploads were given
pub fn overview(args: &UploadArgs, ctx: &TabContext, out: &mut dyn Write) -> Result<()> {
    let uploads: Vec<(DatasetKind, &Path)> = [
        (DatasetKind::Sales, args.sales.as_deref()),
        (DatasetKind::Stock, args.stock.as_deref()),
    ]
    .into_iter()
    .filter_map(|(kind, path)| path.map(|p| (kind, p)))
    .collect();

    if uploads.is_empty() {
        bail!(MISSING_UPLOADS);
    }

    let mut overviews = Vec::new();
    let mut failures = Vec::new();
    for (kind, path) in uploads {
        match overview_of(kind, path) {
            Ok(overview) => overviews.push(overview),
            Err(err) => failures.push(err),
        }
    }

    if ctx.json {
        write_json(out, &overviews)?;
    } else {
        for overview in &overviews {
            writeln!(
                out,
                "== {} data: {} ({} rows) ==",
                overview.dataset,
                overview.path.display(),
                overview.rows
            )?;
            writeln!(out, "\nPreview (first {} rows)", PREVIEW_ROWS)?;
            write!(out, "{}", render::raw_table(&overview.preview))?;
            writeln!(out, "\nSummary statistics")?;
            for column in &overview.statistics {
                writeln!(out, "[{}]\n{}", column.column, column.summary)?;
            }
            if let Some(problem) = &overview.problem {
                writeln!(out, "\nwarning: {}", problem)?;
            }
            writeln!(out)?;
        }
    }

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => {
            let messages: Vec<String> = failures.iter().map(describe_error).collect();
            Err(anyhow!(messages.join("; ")))
        }
    }
}

#[derive(Debug, Serialize)]
struct SalesReport {
    period: Period,
    metric: Metric,
    grouped: Vec<PeriodTotal>,
    means: Vec<ProductMean>,
    top: Vec<ProductTotal>,
    shares: Vec<RevenueShare>,
}

/// Grouped sums, means, ranking and revenue share of the sales upload
pub fn sales(args: &SalesArgs, ctx: &TabContext, out: &mut dyn Write) -> Result<()> {
    let loaded = load_sales(require_sales(&args.upload)?)?;
    let records = &loaded.records;
    if records.is_empty() {
        return Err(ForecastError::InsufficientDataError(
            "the sales file has no rows".to_string(),
        ))
        .context("building the sales tab");
    }

    let period: Period = args.period.into();
    let metric: Metric = args.metric.into();
    let report = SalesReport {
        period,
        metric,
        grouped: sales_by_period(records, period)?,
        means: mean_by_product(records)?,
        top: top_n(records, args.top, metric)?,
        shares: revenue_share(records)?,
    };

    if ctx.json {
        return write_json(out, &report);
    }

    writeln!(out, "== Sales by {} ==", period)?;
    let rows: Vec<Vec<String>> = report
        .grouped
        .iter()
        .map(|t| {
            vec![
                t.period.clone(),
                t.product_name.clone(),
                t.quantity.to_string(),
                format!("{:.2}", t.revenue),
            ]
        })
        .collect();
    let period_header = period.to_string();
    let headers = [period_header.as_str(), "product", "quantity", "revenue"];
    write!(out, "{}", render::table(&headers, &rows))?;

    writeln!(out, "\n== Mean per transaction ==")?;
    let rows: Vec<Vec<String>> = report
        .means
        .iter()
        .map(|m| {
            vec![
                m.product_name.clone(),
                m.transactions.to_string(),
                format!("{:.2}", m.mean_quantity),
                format!("{:.2}", m.mean_revenue),
            ]
        })
        .collect();
    write!(out, "{}", render::table(&["product", "transactions", "quantity", "revenue"], &rows))?;

    let metric_name = match metric {
        Metric::Quantity => "quantity",
        Metric::Revenue => "revenue",
    };
    writeln!(out, "\n== Top {} products by {} ==", args.top, metric_name)?;
    let bars: Vec<(String, f64)> = report
        .top
        .iter()
        .map(|t| (t.product_name.clone(), t.metric(metric)))
        .collect();
    write!(out, "{}", render::bar_chart(&bars))?;

    writeln!(out, "\n== Revenue share ==")?;
    let shares: Vec<(String, f64)> = report
        .shares
        .iter()
        .map(|s| (s.product_name.clone(), s.share))
        .collect();
    write!(out, "{}", render::share_chart(&shares))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct InventoryReport {
    threshold: f64,
    ratios: Vec<InventoryRatio>,
    excess: Vec<InventoryRatio>,
    statistics: Option<Summary>,
    exported_to: Option<PathBuf>,
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio
        .map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "-".to_string())
}

/// Stock-to-sales ratios, warnings, statistics and optional CSV export
pub fn inventory(args: &InventoryArgs, ctx: &TabContext, out: &mut dyn Write) -> Result<()> {
    let (sales_path, stock_path) = match (&args.upload.sales, &args.upload.stock) {
        (Some(sales), Some(stock)) => (sales, stock),
        _ => bail!(MISSING_UPLOADS),
    };
    let sales = load_sales(sales_path).context(MISSING_UPLOADS)?;
    let stock = load_stock(stock_path).context(MISSING_UPLOADS)?;

    let threshold = ctx.config.excess_ratio_threshold;
    let ratios = inventory_ratios(&sales.records, &stock.records)?;
    let excess: Vec<InventoryRatio> = excess_inventory(&ratios, threshold)
        .into_iter()
        .cloned()
        .collect();
    let statistics = match ratio_summary(&ratios) {
        Ok(summary) => Some(summary),
        Err(err) => {
            warn!(error = %err, "no ratio statistics");
            None
        }
    };

    let exported_to = match &args.export {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating export file {}", path.display()))?;
            write_ratio_csv(&ratios, file)
                .with_context(|| format!("writing export file {}", path.display()))?;
            Some(path.clone())
        }
        None => None,
    };

    let report = InventoryReport {
        threshold,
        ratios,
        excess,
        statistics,
        exported_to,
    };

    if ctx.json {
        return write_json(out, &report);
    }

    writeln!(out, "== Inventory ratio (stock / sales) ==")?;
    let rows: Vec<Vec<String>> = report
        .ratios
        .iter()
        .map(|r| {
            vec![
                r.product_id.clone(),
                r.sales.to_string(),
                r.inventory.to_string(),
                format_ratio(r.ratio),
            ]
        })
        .collect();
    write!(out, "{}", render::table(&["product_id", "sales", "inventory", "ratio"], &rows))?;
    if report.ratios.is_empty() {
        writeln!(out, "no product appears in both files")?;
    }

    if !report.excess.is_empty() {
        writeln!(out, "\n== Excess inventory (ratio >= {}) ==", threshold)?;
        for row in &report.excess {
            match row.ratio {
                Some(ratio) => writeln!(
                    out,
                    "warning: excess stock for {} (ratio {:.2})",
                    row.product_id, ratio
                )?,
                None => writeln!(
                    out,
                    "warning: excess stock for {} ({} in stock, no sales)",
                    row.product_id, row.inventory
                )?,
            }
        }
    }

    if let Some(summary) = &report.statistics {
        writeln!(out, "\n== Ratio statistics ==\n{}", summary)?;
    }

    let bars: Vec<(String, f64)> = report
        .ratios
        .iter()
        .filter_map(|r| r.ratio.map(|ratio| (r.product_id.clone(), ratio)))
        .collect();
    if !bars.is_empty() {
        writeln!(out, "\n== Ratio by product ==")?;
        write!(out, "{}", render::bar_chart(&bars))?;
    }

    if let Some(path) = &report.exported_to {
        writeln!(out, "\nratio table written to {}", path.display())?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct HistoryPoint {
    date: NaiveDate,
    quantity: u64,
}

/// What became of the holdout backtest
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum HoldoutOutcome {
    /// History not longer than the holdout window
    Skipped,
    Failed { reason: String },
    Scored(BacktestResult),
}

#[derive(Debug, Serialize)]
struct ForecastReport {
    product: String,
    history_days: usize,
    history: Vec<HistoryPoint>,
    forecast: ForecastResult,
    backtest: HoldoutOutcome,
}

/// Daily forecast of one product plus the holdout backtest
pub fn forecast(args: &ForecastArgs, ctx: &TabContext, out: &mut dyn Write) -> Result<()> {
    let loaded = load_sales(require_sales(&args.upload)?)?;
    let engine = ForecastEngine::new(ctx.config.clone())?;

    let series = match build_daily_series(&loaded.records, &args.product) {
        Ok(series) => series,
        Err(err) => {
            let known = product_names(&loaded.records);
            return Err(err).with_context(|| {
                format!(
                    "no sales of '{}'; products in the file: {}",
                    args.product,
                    known.join(", ")
                )
            });
        }
    };

    let result = engine
        .forecast(&series, args.months)
        .with_context(|| format!("forecasting '{}'", args.product))?;

    let holdout = match backtest(&series, &engine) {
        Ok(Some(result)) => HoldoutOutcome::Scored(result),
        Ok(None) => HoldoutOutcome::Skipped,
        Err(err) => {
            warn!(product = %args.product, error = %err, "backtest unavailable");
            HoldoutOutcome::Failed {
                reason: user_message(&err),
            }
        }
    };

    let skip = series.len().saturating_sub(args.history);
    let report = ForecastReport {
        product: args.product.clone(),
        history_days: series.len(),
        history: series
            .points()
            .skip(skip)
            .map(|(date, quantity)| HistoryPoint { date, quantity })
            .collect(),
        forecast: result,
        backtest: holdout,
    };

    if ctx.json {
        return write_json(out, &report);
    }

    writeln!(
        out,
        "== {}: last {} of {} days ==",
        report.product,
        report.history.len(),
        report.history_days
    )?;
    let rows: Vec<Vec<String>> = report
        .history
        .iter()
        .map(|p| vec![p.date.to_string(), p.quantity.to_string()])
        .collect();
    write!(out, "{}", render::table(&["date", "quantity"], &rows))?;

    let confidence = report.forecast.confidence_level * 100.0;
    writeln!(
        out,
        "\n== Forecast, {} days with {:.0}% interval ==",
        report.forecast.horizon(),
        confidence
    )?;
    let rows: Vec<Vec<String>> = report
        .forecast
        .rows()
        .map(|(date, lower, point, upper)| {
            vec![
                date.to_string(),
                format!("{:.2}", lower),
                format!("{:.2}", point),
                format!("{:.2}", upper),
            ]
        })
        .collect();
    write!(out, "{}", render::table(&["date", "lower", "forecast", "upper"], &rows))?;
    writeln!(out, "\n== Interval chart ==")?;
    write!(out, "{}", render::forecast_bands(&report.forecast))?;
    writeln!(out, "\nforecast total: {:.2}", report.forecast.total())?;

    match &report.backtest {
        HoldoutOutcome::Scored(result) => writeln!(
            out,
            "backtest over the last {} days: MAE {:.2}, RMSE {:.2}",
            result.actual.len(),
            result.mean_absolute_error,
            result.root_mean_squared_error
        )?,
        HoldoutOutcome::Skipped => writeln!(
            out,
            "backtest skipped: {} days of history, more than {} needed",
            report.history_days, ctx.config.holdout_days
        )?,
        HoldoutOutcome::Failed { reason } => writeln!(out, "backtest unavailable: {}", reason)?,
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SampleReport {
    sales_path: PathBuf,
    stock_path: PathBuf,
    sales_rows: usize,
    stock_rows: usize,
    first_day: NaiveDate,
}

/// Write synthetic uploads ending yesterday
pub fn sample(args: &SampleArgs, ctx: &TabContext, out: &mut dyn Write) -> Result<()> {
    let today = Local::now().date_naive();
    let first_day = today
        .checked_sub_days(Days::new(args.days as u64))
        .ok_or_else(|| anyhow!("{} days of history reach before the calendar start", args.days))?;

    let data = sample::generate(first_day, args.days, args.seed);
    let (sales_path, stock_path) = sample::write_sample(&args.out, &data)?;

    let report = SampleReport {
        sales_path,
        stock_path,
        sales_rows: data.sales.len(),
        stock_rows: data.stock.len(),
        first_day,
    };

    if ctx.json {
        return write_json(out, &report);
    }
    writeln!(
        out,
        "wrote {} ({} rows) and {} ({} rows)",
        report.sales_path.display(),
        report.sales_rows,
        report.stock_path.display(),
        report.stock_rows
    )?;
    writeln!(
        out,
        "try: sales_dashboard forecast --sales {} --product \"Ceramic Mug\"",
        report.sales_path.display()
    )?;
    Ok(())
}

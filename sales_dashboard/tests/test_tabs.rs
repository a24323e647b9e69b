use chrono::NaiveDate;
use clap::Parser;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_dashboard::cli::Cli;
use sales_dashboard::messages::{describe_error, MISSING_UPLOADS};
use sales_dashboard::sample::{generate, write_sample};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Uploads {
    _dir: TempDir,
    sales: PathBuf,
    stock: PathBuf,
}

fn sample_uploads() -> Uploads {
    let dir = tempdir().unwrap();
    let data = generate(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 150, 9);
    let (sales, stock) = write_sample(dir.path(), &data).unwrap();
    Uploads {
        _dir: dir,
        sales,
        stock,
    }
}

fn run(args: &[&str]) -> (anyhow::Result<()>, String) {
    let cli = Cli::try_parse_from(std::iter::once("sales_dashboard").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    let result = sales_dashboard::run(&cli, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_overview_shows_preview_and_statistics() {
    let uploads = sample_uploads();
    let (result, output) = run(&[
        "overview",
        "--sales",
        path(&uploads.sales),
        "--stock",
        path(&uploads.stock),
    ]);

    result.unwrap();
    assert!(output.contains("== sales data"));
    assert!(output.contains("== stock data"));
    assert!(output.contains("[quantity]"));
    assert!(output.contains("[stock_quantity]"));
}

#[test]
fn test_overview_without_uploads() {
    let (result, _) = run(&["overview"]);
    assert_eq!(describe_error(&result.unwrap_err()), MISSING_UPLOADS);
}

#[test]
fn test_sales_tab_as_json() {
    let uploads = sample_uploads();
    let (result, output) = run(&["sales", "--sales", path(&uploads.sales), "--top", "2", "--json"]);

    result.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["period"], "Month");
    assert_eq!(value["top"].as_array().unwrap().len(), 2);
    let share_total: f64 = value["shares"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["share"].as_f64().unwrap())
        .sum();
    assert!((share_total - 1.0).abs() < 1e-9);
}

#[rstest]
#[case(&["inventory"])]
#[case(&["inventory", "--sales", "sales.csv"])]
fn test_inventory_needs_both_uploads(#[case] args: &[&str]) {
    let (result, output) = run(args);
    let message = describe_error(&result.unwrap_err());
    assert!(message.starts_with(MISSING_UPLOADS));
    assert!(output.is_empty());
}

#[test]
fn test_inventory_reports_unreadable_stock() {
    let uploads = sample_uploads();
    let bad_stock = uploads.sales.with_file_name("stock.txt");
    fs::write(&bad_stock, "product_name,stock_quantity\n").unwrap();

    let (result, _) = run(&[
        "inventory",
        "--sales",
        path(&uploads.sales),
        "--stock",
        path(&bad_stock),
    ]);
    let message = describe_error(&result.unwrap_err());
    assert!(message.starts_with(MISSING_UPLOADS));
    assert!(message.contains("upload a CSV or Excel file"));
}

#[test]
fn test_inventory_reports_stock_without_quantity_column() {
    let uploads = sample_uploads();
    let bad_stock = uploads.sales.with_file_name("stock_notes.csv");
    fs::write(&bad_stock, "product_name,note\nA,x\n").unwrap();

    let (result, output) = run(&[
        "inventory",
        "--sales",
        path(&uploads.sales),
        "--stock",
        path(&bad_stock),
    ]);
    let message = describe_error(&result.unwrap_err());
    assert!(message.starts_with(MISSING_UPLOADS));
    assert!(message.contains("missing required columns: stock_quantity"));
    assert!(output.is_empty());
}

#[test]
fn test_inventory_flags_and_exports() {
    let uploads = sample_uploads();
    let export = uploads.sales.with_file_name("ratios.csv");

    let (result, output) = run(&[
        "inventory",
        "--sales",
        path(&uploads.sales),
        "--stock",
        path(&uploads.stock),
        "--export",
        path(&export),
    ]);

    result.unwrap();
    // the sample holds a year of cover for two products
    assert!(output.contains("warning: excess stock for Cake Stand"));
    assert!(output.contains("warning: excess stock for Coaster Set"));
    assert!(!output.contains("warning: excess stock for Ceramic Mug"));

    let exported = fs::read_to_string(&export).unwrap();
    assert!(exported.starts_with("product_id,sales,inventory,ratio\n"));
    assert_eq!(exported.lines().count(), 6);
}

#[test]
fn test_forecast_tab() {
    let uploads = sample_uploads();
    let (result, output) = run(&[
        "forecast",
        "--sales",
        path(&uploads.sales),
        "--product",
        "Ceramic Mug",
        "--months",
        "1",
        "--json",
    ]);

    result.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["forecast"]["point_estimate"].as_array().unwrap().len(), 30);
    assert_eq!(value["forecast"]["forecast_dates"][0], "2024-05-30");
    assert_eq!(value["backtest"]["status"], "scored");
    assert!(value["backtest"]["mean_absolute_error"].as_f64().unwrap() >= 0.0);
    assert_eq!(value["history"].as_array().unwrap().len(), 14);
}

/// Fifty days: enough to forecast, too short to fit the backtest's training part
fn short_sales_upload(dir: &Path) -> PathBuf {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut csv = String::from("product_name,sale_date,quantity,revenue\n");
    for offset in 0..50u64 {
        let date = start + chrono::Days::new(offset);
        let quantity = 3 + offset % 7;
        csv.push_str(&format!("A,{},{},{}\n", date, quantity, quantity * 10));
    }
    let sales = dir.join("short_sales.csv");
    fs::write(&sales, csv).unwrap();
    sales
}

#[test]
fn test_forecast_reports_failed_backtest_fit() {
    let dir = tempdir().unwrap();
    let sales = short_sales_upload(dir.path());

    let (result, output) = run(&[
        "forecast",
        "--sales",
        path(&sales),
        "--product",
        "A",
        "--months",
        "1",
    ]);

    result.unwrap();
    let last = output.lines().last().unwrap();
    assert!(last.starts_with("backtest unavailable: the forecast model could not be fitted"));
    assert!(last.contains("insufficient or non-seasonal"));
    assert!(!output.contains("backtest skipped"));
}

#[test]
fn test_forecast_json_carries_backtest_failure_reason() {
    let dir = tempdir().unwrap();
    let sales = short_sales_upload(dir.path());

    let (result, output) = run(&[
        "forecast",
        "--sales",
        path(&sales),
        "--product",
        "A",
        "--months",
        "1",
        "--json",
    ]);

    result.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["backtest"]["status"], "failed");
    assert!(value["backtest"]["reason"]
        .as_str()
        .unwrap()
        .contains("insufficient or non-seasonal"));
}

#[test]
fn test_forecast_of_unknown_product_lists_known_ones() {
    let uploads = sample_uploads();
    let (result, _) = run(&[
        "forecast",
        "--sales",
        path(&uploads.sales),
        "--product",
        "Kettle",
    ]);

    let message = describe_error(&result.unwrap_err());
    assert!(message.contains("Ceramic Mug"));
    assert!(message.contains("not enough data"));
}

#[test]
fn test_invalid_settings_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("settings.json");
    fs::write(&config, r#"{ "confidence_level": 1.5 }"#).unwrap();

    let (result, _) = run(&["--config", path(&config), "overview"]);
    let message = describe_error(&result.unwrap_err());
    assert!(message.contains("invalid setting"));
}

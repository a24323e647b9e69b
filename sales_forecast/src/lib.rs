//! # Sales Forecast
//!
//! A Rust library for sales and inventory analysis with seasonal demand
//! forecasting.
//!
//! ## Features
//!
//! - CSV and spreadsheet loading with explicit sales and stock schemas
//! - Grouped sums, per-product means, top-N rankings and revenue shares
//! - Stock-to-sales ratios with excess inventory flags and CSV export
//! - Zero-filled daily series per product
//! - Seasonal ARIMA forecasts with confidence bounds
//! - Holdout backtests reporting mean absolute error
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::{backtest, build_daily_series, DataLoader, ForecastEngine};
//!
//! # fn main() -> sales_forecast::error::Result<()> {
//! let sales = DataLoader::load_sales("sales.csv")?;
//!
//! // One value per calendar day, silent days filled with zero
//! let series = build_daily_series(&sales.records, "Widget")?;
//!
//! // Three 30-day months with 95% bounds
//! let engine = ForecastEngine::default();
//! let forecast = engine.forecast(&series, 3)?;
//! assert_eq!(forecast.horizon(), 90);
//!
//! if let Some(result) = backtest(&series, &engine)? {
//!     println!("MAE over the last 30 days: {:.2}", result.mean_absolute_error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod backtest;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod metrics;
pub mod models;
pub mod series;

// Re-export commonly used types
pub use crate::backtest::{backtest, BacktestResult};
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, SalesRecord, StockRecord, Table};
pub use crate::engine::ForecastEngine;
pub use crate::error::ForecastError;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::series::{build_daily_series, DailySeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

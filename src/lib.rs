//! # Sales Forecast Workspace
//!
//! Umbrella crate for the sales dashboard libraries.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sales_forecast_workspace::sales_forecast::{build_daily_series, SalesRecord};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let records = vec![SalesRecord::new("Widget", day, 4, 40.0)];
//! let series = build_daily_series(&records, "Widget").unwrap();
//! assert_eq!(series.len(), 1);
//! ```

pub use sales_forecast;
pub use series_math;

pub use sales_forecast::{
    backtest, build_daily_series, BacktestResult, DailySeries, ForecastConfig, ForecastEngine,
    ForecastError, ForecastResult, SalesRecord, StockRecord,
};

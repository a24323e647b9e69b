//! Holdout backtest of the forecast engine

use crate::engine::ForecastEngine;
use crate::error::Result;
use crate::metrics::{mean_absolute_error, root_mean_squared_error};
use crate::series::DailySeries;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Accuracy of a forecast against the withheld trailing days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
    pub holdout_dates: Vec<NaiveDate>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

/// Fit on all but the trailing `holdout_days` and score the forecast of
/// those days.
///
/// Returns `Ok(None)` without fitting anything when the series is not
/// longer than the holdout window.
pub fn backtest(series: &DailySeries, engine: &ForecastEngine) -> Result<Option<BacktestResult>> {
    let holdout = engine.config().holdout_days;
    if series.len() <= holdout {
        debug!(
            product = series.product(),
            days = series.len(),
            holdout,
            "series too short for a backtest, skipping"
        );
        return Ok(None);
    }

    let (train, test) = match series.split_at(series.len() - holdout) {
        Some(parts) => parts,
        None => return Ok(None),
    };

    let forecast = engine.forecast_days(&train, holdout)?;
    let actual = test.values();
    let predicted = forecast.point_estimate;

    Ok(Some(BacktestResult {
        mean_absolute_error: mean_absolute_error(&actual, &predicted),
        root_mean_squared_error: root_mean_squared_error(&actual, &predicted),
        holdout_dates: test.dates().collect(),
        actual,
        predicted,
    }))
}

//! Forecasting models for daily sales series

use crate::error::{ForecastError, Result};
use crate::series::DailySeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;

/// Forecast with per-day confidence bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Days following the last historical date
    pub forecast_dates: Vec<NaiveDate>,
    /// Point forecasts, aligned with `forecast_dates`
    pub point_estimate: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub upper_bound: Vec<f64>,
    /// Coverage of the bounds, e.g. 0.95
    pub confidence_level: f64,
}

impl ForecastResult {
    /// Create a forecast result, checking alignment and bound ordering
    pub fn new(
        forecast_dates: Vec<NaiveDate>,
        point_estimate: Vec<f64>,
        lower_bound: Vec<f64>,
        upper_bound: Vec<f64>,
        confidence_level: f64,
    ) -> Result<Self> {
        let horizon = forecast_dates.len();
        if point_estimate.len() != horizon
            || lower_bound.len() != horizon
            || upper_bound.len() != horizon
        {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast sequences must all have length {} (points {}, lower {}, upper {})",
                horizon,
                point_estimate.len(),
                lower_bound.len(),
                upper_bound.len()
            )));
        }

        for i in 0..horizon {
            let (lower, point, upper) = (lower_bound[i], point_estimate[i], upper_bound[i]);
            if !(lower <= point && point <= upper) {
                return Err(ForecastError::ModelFitError(format!(
                    "forecast bounds out of order on {}: {} <= {} <= {}",
                    forecast_dates[i], lower, point, upper
                )));
            }
        }

        Ok(Self {
            forecast_dates,
            point_estimate,
            lower_bound,
            upper_bound,
            confidence_level,
        })
    }

    /// Number of forecast days
    pub fn horizon(&self) -> usize {
        self.forecast_dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast_dates.is_empty()
    }

    /// `(date, lower, point, upper)` rows
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64, f64, f64)> + '_ {
        (0..self.horizon()).map(move |i| {
            (
                self.forecast_dates[i],
                self.lower_bound[i],
                self.point_estimate[i],
                self.upper_bound[i],
            )
        })
    }

    /// Sum of the point forecasts
    pub fn total(&self) -> f64 {
        self.point_estimate.iter().sum()
    }

    /// Calculate mean absolute error between forecast and actual values
    pub fn mean_absolute_error(&self, actual: &[f64]) -> Result<f64> {
        if self.point_estimate.len() != actual.len() || actual.is_empty() {
            return Err(ForecastError::InvalidParameter(format!(
                "Forecast length ({}) doesn't match actual length ({})",
                self.point_estimate.len(),
                actual.len()
            )));
        }

        Ok(crate::metrics::mean_absolute_error(actual, &self.point_estimate))
    }

    /// Serialize the forecast to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::InvalidParameter(format!("cannot serialize forecast: {}", e)))
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for the days after the training series
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// One-step-ahead fitted values over the training series
    fn fitted_values(&self) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a daily series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a daily series
    fn train(&self, series: &DailySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod sarima;

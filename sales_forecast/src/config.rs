//! Forecast configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! gives the fixed seasonal model: ARIMA(1,1,1)x(1,1,1,30) with 95%
//! intervals, 30-day months and a 30-day holdout.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Non-seasonal ARIMA order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self { p: 1, d: 1, q: 1 }
    }
}

/// Seasonal ARIMA order with its period in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub period: usize,
}

impl SeasonalOrder {
    pub fn has_terms(&self) -> bool {
        self.p + self.d + self.q > 0
    }
}

impl Default for SeasonalOrder {
    fn default() -> Self {
        Self {
            p: 1,
            d: 1,
            q: 1,
            period: 30,
        }
    }
}

/// Settings for the coefficient search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub initial_step: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
            initial_step: 0.1,
        }
    }
}

/// Configuration shared by the forecast engine, the backtest and the
/// inventory checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub order: ArimaOrder,
    pub seasonal_order: SeasonalOrder,
    /// Two-sided interval coverage, strictly between 0 and 1
    pub confidence_level: f64,
    /// Days per requested month
    pub days_per_month: usize,
    /// Trailing days withheld by the backtest
    pub holdout_days: usize,
    /// Stock-to-sales ratio at which a product is flagged
    pub excess_ratio_threshold: f64,
    pub optimizer: OptimizerConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            seasonal_order: SeasonalOrder::default(),
            confidence_level: 0.95,
            days_per_month: 30,
            holdout_days: 30,
            excess_ratio_threshold: 1.5,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ForecastConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings describe a usable model
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if self.seasonal_order.has_terms() && self.seasonal_order.period < 2 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be at least 2 when seasonal terms are used".to_string(),
            ));
        }
        if self.days_per_month == 0 {
            return Err(ForecastError::InvalidParameter(
                "days_per_month must be greater than zero".to_string(),
            ));
        }
        if self.holdout_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "holdout_days must be greater than zero".to_string(),
            ));
        }
        if !(self.excess_ratio_threshold > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "excess_ratio_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Forecast horizon in days for a number of months
    pub fn horizon_days(&self, months: usize) -> usize {
        months * self.days_per_month
    }
}

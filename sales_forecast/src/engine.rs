//! Forecast engine: the configured seasonal model applied to one series

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::sarima::SeasonalArima;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::DailySeries;
use tracing::info;

/// Fits the configured seasonal model and forecasts whole months
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// The seasonal model this engine fits
    pub fn model(&self) -> Result<SeasonalArima> {
        SeasonalArima::from_config(&self.config)
    }

    /// Forecast `months` months of `days_per_month` days each
    pub fn forecast(&self, series: &DailySeries, months: usize) -> Result<ForecastResult> {
        if months == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be at least one month".to_string(),
            ));
        }
        self.forecast_days(series, self.config.horizon_days(months))
    }

    /// Fit on the whole series and forecast `days` days past its end.
    ///
    /// The fitted model is dropped before returning.
    pub fn forecast_days(&self, series: &DailySeries, days: usize) -> Result<ForecastResult> {
        let model = self.model()?;
        let trained = model.train(series)?;
        let result = trained.forecast(days)?;

        info!(
            model = trained.name(),
            product = series.product(),
            history_days = series.len(),
            horizon_days = days,
            "forecast complete"
        );
        Ok(result)
    }
}

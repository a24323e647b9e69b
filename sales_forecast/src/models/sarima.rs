//! Seasonal ARIMA model for daily demand
//!
//! The series is differenced with `(1-B)^d (1-B^s)^D` and an ARMA model
//! with multiplicative seasonal factors is fitted to the result by
//! conditional sum of squares, pre-sample values taken as zero.
//! Coefficients are not constrained to the stationary or invertible
//! region; explosive candidates simply score `+inf`.

use crate::config::{ArimaOrder, ForecastConfig, OptimizerConfig, SeasonalOrder};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::DailySeries;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use series_math::{DifferencingPlan, LagPolynomial, NelderMead};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, warn};

/// Seasonal ARIMA(p,d,q)x(P,D,Q,s) model
#[derive(Debug, Clone)]
pub struct SeasonalArima {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    seasonal: SeasonalOrder,
    confidence_level: f64,
    optimizer: OptimizerConfig,
}

/// Estimated coefficients of a seasonal ARIMA model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarimaCoefficients {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaCoefficients {
    /// Split a flat parameter vector `[ar.., ma.., sar.., sma..]`
    fn from_params(params: &[f64], order: &ArimaOrder, seasonal: &SeasonalOrder) -> Self {
        let (ar, rest) = params.split_at(order.p);
        let (ma, rest) = rest.split_at(order.q);
        let (seasonal_ar, seasonal_ma) = rest.split_at(seasonal.p);
        Self {
            ar: ar.to_vec(),
            ma: ma.to_vec(),
            seasonal_ar: seasonal_ar.to_vec(),
            seasonal_ma: seasonal_ma.to_vec(),
        }
    }

    /// `phi(B) * Phi(B^s)`
    pub fn ar_polynomial(&self, period: usize) -> LagPolynomial {
        LagPolynomial::autoregressive(&self.ar, 1)
            .multiply(&LagPolynomial::autoregressive(&self.seasonal_ar, period))
    }

    /// `theta(B) * Theta(B^s)`
    pub fn ma_polynomial(&self, period: usize) -> LagPolynomial {
        LagPolynomial::moving_average(&self.ma, 1)
            .multiply(&LagPolynomial::moving_average(&self.seasonal_ma, period))
    }
}

/// Trained seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalArima {
    /// Name of the model
    name: String,
    coefficients: SarimaCoefficients,
    period: usize,
    plan: DifferencingPlan,
    /// Innovation variance
    sigma2: f64,
    confidence_level: f64,
    /// Training observations in levels
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    last_date: NaiveDate,
    iterations: usize,
    converged: bool,
}

impl SeasonalArima {
    /// Create a new seasonal ARIMA model with 95% intervals
    pub fn new(order: ArimaOrder, seasonal: SeasonalOrder) -> Result<Self> {
        if seasonal.p + seasonal.d + seasonal.q > 0 && seasonal.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                seasonal.period
            )));
        }

        Ok(Self {
            name: format!(
                "SARIMA({},{},{})x({},{},{},{})",
                order.p, order.d, order.q, seasonal.p, seasonal.d, seasonal.q, seasonal.period
            ),
            order,
            seasonal,
            confidence_level: 0.95,
            optimizer: OptimizerConfig::default(),
        })
    }

    /// Build the model described by a configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Ok(Self::new(config.order, config.seasonal_order)?
            .with_confidence_level(config.confidence_level)?
            .with_optimizer(config.optimizer))
    }

    /// Set the two-sided interval coverage
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Result<Self> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }
        self.confidence_level = confidence_level;
        Ok(self)
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Number of estimated ARMA coefficients
    pub fn parameter_count(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    fn plan(&self) -> Result<DifferencingPlan> {
        Ok(DifferencingPlan::new(
            self.order.d,
            self.seasonal.d,
            self.seasonal.period,
        )?)
    }

    /// Shortest series the model will fit: the observations lost to
    /// differencing plus two differenced points per coefficient.
    pub fn minimum_observations(&self) -> usize {
        let lost = self.order.d + self.seasonal.d * self.seasonal.period;
        lost + 2 * self.parameter_count().max(1)
    }
}

/// Residuals of an ARMA recursion, pre-sample values taken as zero
fn conditional_residuals(w: &[f64], ar: &LagPolynomial, ma: &LagPolynomial) -> Vec<f64> {
    let mut residuals: Vec<f64> = Vec::with_capacity(w.len());
    for t in 0..w.len() {
        let mut value = w[t];
        for k in 1..=ar.degree().min(t) {
            value += ar.coefficient(k) * w[t - k];
        }
        for k in 1..=ma.degree().min(t) {
            value -= ma.coefficient(k) * residuals[t - k];
        }
        residuals.push(value);
    }
    residuals
}

impl ForecastModel for SeasonalArima {
    type Trained = TrainedSeasonalArima;

    fn train(&self, series: &DailySeries) -> Result<TrainedSeasonalArima> {
        let values = series.values();
        let minimum = self.minimum_observations();
        if values.len() < minimum {
            return Err(ForecastError::ModelFitError(format!(
                "{} needs at least {} daily observations, '{}' has {}",
                self.name,
                minimum,
                series.product(),
                values.len()
            )));
        }
        if values.iter().all(|v| *v == 0.0) {
            return Err(ForecastError::ModelFitError(format!(
                "every observation of '{}' is zero",
                series.product()
            )));
        }

        let plan = self.plan()?;
        let differenced = plan.apply(&values)?;
        let period = self.seasonal.period;

        let objective = |params: &[f64]| {
            let coefficients = SarimaCoefficients::from_params(params, &self.order, &self.seasonal);
            conditional_residuals(
                &differenced,
                &coefficients.ar_polynomial(period),
                &coefficients.ma_polynomial(period),
            )
            .iter()
            .map(|e| e * e)
            .sum::<f64>()
        };

        let minimizer = NelderMead::new(
            self.optimizer.max_iterations,
            self.optimizer.tolerance,
            self.optimizer.initial_step,
        )?;
        let minimum = minimizer.minimize(objective, &vec![0.0; self.parameter_count()])?;

        if !minimum.value.is_finite() || minimum.point.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::ModelFitError(format!(
                "{} did not reach a finite sum of squares for '{}'",
                self.name,
                series.product()
            )));
        }
        if !minimum.converged {
            warn!(
                model = %self.name,
                product = series.product(),
                iterations = minimum.iterations,
                "coefficient search stopped at the iteration limit"
            );
        }

        let coefficients =
            SarimaCoefficients::from_params(&minimum.point, &self.order, &self.seasonal);
        let residuals = conditional_residuals(
            &differenced,
            &coefficients.ar_polynomial(period),
            &coefficients.ma_polynomial(period),
        );
        let sigma2 = minimum.value / differenced.len() as f64;

        debug!(
            model = %self.name,
            product = series.product(),
            sigma2,
            iterations = minimum.iterations,
            coefficients = ?coefficients,
            "fitted seasonal model"
        );

        Ok(TrainedSeasonalArima {
            name: self.name.clone(),
            coefficients,
            period,
            plan,
            sigma2,
            confidence_level: self.confidence_level,
            history: values,
            differenced,
            residuals,
            last_date: series.last_date(),
            iterations: minimum.iterations,
            converged: minimum.converged,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalArima {
    pub fn coefficients(&self) -> &SarimaCoefficients {
        &self.coefficients
    }

    /// Estimated innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Point forecasts of the differenced series
    fn forecast_differenced(&self, horizon: usize) -> Vec<f64> {
        let ar = self.coefficients.ar_polynomial(self.period);
        let ma = self.coefficients.ma_polynomial(self.period);

        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();
        for _ in 0..horizon {
            let t = w.len();
            let mut value = 0.0;
            for k in 1..=ar.degree().min(t) {
                value -= ar.coefficient(k) * w[t - k];
            }
            for k in 1..=ma.degree().min(t) {
                value += ma.coefficient(k) * e[t - k];
            }
            w.push(value);
            e.push(0.0);
        }
        w.split_off(self.differenced.len())
    }
}

impl TrainedForecastModel for TrainedSeasonalArima {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be at least one day".to_string(),
            ));
        }

        let levels = self
            .plan
            .invert(&self.history, &self.forecast_differenced(horizon))?;

        // psi-weights of the full model, differencing included
        let full_ar = self
            .coefficients
            .ar_polynomial(self.period)
            .multiply(&self.plan.polynomial());
        let psi = LagPolynomial::psi_weights(
            &self.coefficients.ma_polynomial(self.period),
            &full_ar,
            horizon,
        );

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.confidence_level / 2.0);

        let mut dates = Vec::with_capacity(horizon);
        let mut points = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        let mut cumulative = 0.0;

        for (h, (level, weight)) in levels.iter().zip(&psi).enumerate() {
            cumulative += weight * weight;
            let margin = z * (self.sigma2 * cumulative).sqrt();
            if !level.is_finite() || !margin.is_finite() {
                return Err(ForecastError::ModelFitError(format!(
                    "{} forecast diverged at step {}",
                    self.name,
                    h + 1
                )));
            }

            let date = self
                .last_date
                .checked_add_days(Days::new(h as u64 + 1))
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(
                        "forecast extends past the supported calendar".to_string(),
                    )
                })?;

            // demand cannot be negative
            dates.push(date);
            points.push(level.max(0.0));
            lower.push((level - margin).max(0.0));
            upper.push((level + margin).max(0.0));
        }

        ForecastResult::new(dates, points, lower, upper, self.confidence_level)
    }

    fn fitted_values(&self) -> Vec<f64> {
        let lost = self.history.len() - self.differenced.len();
        self.history
            .iter()
            .enumerate()
            .map(|(t, y)| if t < lost { *y } else { y - self.residuals[t - lost] })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

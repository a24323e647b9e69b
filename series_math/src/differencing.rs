//! Regular and seasonal differencing
//!
//! Contains the forward transform `(1-B)^d (1-B^s)^D` applied before
//! fitting an ARMA model and the inverse used to turn forecasts of the
//! differenced series back into levels.

use crate::polynomial::LagPolynomial;
use crate::{MathError, Result};

/// Difference a series once at the given lag: `w[t] = y[t + lag] - y[t]`
pub fn difference(values: &[f64], lag: usize) -> Result<Vec<f64>> {
    if lag == 0 {
        return Err(MathError::InvalidInput(
            "Differencing lag must be greater than zero".to_string(),
        ));
    }
    if values.len() <= lag {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} values to difference at lag {}, have {}",
            lag,
            lag,
            values.len()
        )));
    }

    Ok(values
        .windows(lag + 1)
        .map(|w| w[lag] - w[0])
        .collect())
}

/// Undo a differencing polynomial for values that follow `history`.
///
/// `differenced` holds the future values of the differenced series; the
/// returned vector holds the corresponding levels. `history` must hold at
/// least `polynomial.degree()` observations.
pub fn integrate(
    history: &[f64],
    differenced: &[f64],
    polynomial: &LagPolynomial,
) -> Result<Vec<f64>> {
    let degree = polynomial.degree();
    if history.len() < degree {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} historical values to integrate, have {}",
            degree,
            history.len()
        )));
    }

    let mut levels = history[history.len() - degree..].to_vec();
    for &w in differenced {
        let t = levels.len();
        let mut value = w;
        for k in 1..=degree {
            value -= polynomial.coefficient(k) * levels[t - k];
        }
        levels.push(value);
    }

    Ok(levels.split_off(degree))
}

/// Combined regular and seasonal differencing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferencingPlan {
    /// Number of lag-1 differences
    pub regular: usize,
    /// Number of seasonal differences
    pub seasonal: usize,
    /// Seasonal period in observations
    pub period: usize,
}

impl DifferencingPlan {
    pub fn new(regular: usize, seasonal: usize, period: usize) -> Result<Self> {
        if seasonal > 0 && period < 2 {
            return Err(MathError::InvalidInput(
                "Seasonal differencing requires a period of at least 2".to_string(),
            ));
        }
        Ok(Self {
            regular,
            seasonal,
            period,
        })
    }

    /// Observations consumed by the transform
    pub fn lost_observations(&self) -> usize {
        self.regular + self.seasonal * self.period
    }

    /// `(1-B)^d (1-B^s)^D`
    pub fn polynomial(&self) -> LagPolynomial {
        let regular = LagPolynomial::differencing(1).pow(self.regular);
        if self.seasonal == 0 {
            return regular;
        }
        regular.multiply(&LagPolynomial::differencing(self.period).pow(self.seasonal))
    }

    /// Apply the transform to a series
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>> {
        let mut current = values.to_vec();
        for _ in 0..self.regular {
            current = difference(&current, 1)?;
        }
        for _ in 0..self.seasonal {
            current = difference(&current, self.period)?;
        }
        Ok(current)
    }

    /// Turn forecasts of the differenced series back into levels
    pub fn invert(&self, history: &[f64], differenced: &[f64]) -> Result<Vec<f64>> {
        integrate(history, differenced, &self.polynomial())
    }
}

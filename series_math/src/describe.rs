//! Descriptive statistics for numeric columns

use crate::{MathError, Result};
use serde::Serialize;
use std::fmt;

/// Count, moments and quartiles of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, NaN for a single value
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarise a column of values
pub fn describe(values: &[f64]) -> Result<Summary> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot describe an empty column".to_string(),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Column contains non-finite values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance =
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    } else {
        f64::NAN
    };

    Ok(Summary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolated quantile of an ascending slice
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count {:>12}", self.count)?;
        writeln!(f, "mean  {:>12.4}", self.mean)?;
        writeln!(f, "std   {:>12.4}", self.std)?;
        writeln!(f, "min   {:>12.4}", self.min)?;
        writeln!(f, "25%   {:>12.4}", self.q25)?;
        writeln!(f, "50%   {:>12.4}", self.median)?;
        writeln!(f, "75%   {:>12.4}", self.q75)?;
        write!(f, "max   {:>12.4}", self.max)
    }
}

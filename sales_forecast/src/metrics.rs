//! Metrics for evaluating forecast performance
//!
//! All functions return NaN when the inputs are empty or of different
//! lengths.

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Mean squared error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_regression_metrics() {
        let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

        assert_abs_diff_eq!(mean_absolute_error(&actual, &predicted), 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(mean_squared_error(&actual, &predicted), 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            root_mean_squared_error(&actual, &predicted),
            6.0f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_error_handling() {
        let empty: Vec<f64> = vec![];
        assert!(mean_absolute_error(&empty, &empty).is_nan());
        assert!(mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_nan());
    }
}

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use sales_forecast::metrics::{mean_absolute_error, mean_squared_error, root_mean_squared_error};
use sales_forecast::ForecastResult;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    assert_abs_diff_eq!(mean_absolute_error(&actual, &predicted), 2.4, epsilon = 1e-12);
    assert_abs_diff_eq!(mean_squared_error(&actual, &predicted), 6.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        root_mean_squared_error(&actual, &predicted),
        6.0_f64.sqrt(),
        epsilon = 1e-12
    );
}

#[test]
fn test_error_handling() {
    let empty: Vec<f64> = vec![];
    assert!(mean_absolute_error(&empty, &[1.0, 2.0]).is_nan());
    assert!(mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_nan());
}

#[test]
fn test_metrics_agree_with_forecast_result() {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let dates = (0..3).map(|i| start + chrono::Days::new(i)).collect();
    let forecast = ForecastResult::new(
        dates,
        vec![100.0, 102.0, 104.0],
        vec![90.0, 91.0, 92.0],
        vec![110.0, 113.0, 116.0],
        0.95,
    )
    .unwrap();

    let actual = vec![101.0, 103.0, 103.0];
    assert_abs_diff_eq!(
        forecast.mean_absolute_error(&actual).unwrap(),
        mean_absolute_error(&actual, &forecast.point_estimate)
    );
    assert_abs_diff_eq!(
        mean_squared_error(&actual, &forecast.point_estimate),
        1.0,
        epsilon = 1e-12
    );
}

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use sales_forecast::config::{ArimaOrder, SeasonalOrder};
use sales_forecast::models::sarima::SeasonalArima;
use sales_forecast::{
    DailySeries, ForecastConfig, ForecastEngine, ForecastError, ForecastModel, ForecastResult,
    TrainedForecastModel,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn constant_series(days: usize, quantity: u64) -> DailySeries {
    DailySeries::new("Widget", start(), vec![quantity; days]).unwrap()
}

// Monthly cycle around 20 units a day with uniform noise
fn seasonal_series(days: usize, seed: u64) -> DailySeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let quantities = (0..days)
        .map(|t| {
            let cycle = 8.0 * (2.0 * std::f64::consts::PI * t as f64 / 30.0).sin();
            let noise: f64 = rng.gen_range(-2.0..2.0);
            (20.0 + cycle + noise).round().max(0.0) as u64
        })
        .collect();
    DailySeries::new("Widget", start(), quantities).unwrap()
}

fn assert_bounds_ordered(forecast: &ForecastResult) {
    for (_, lower, point, upper) in forecast.rows() {
        assert!(lower.is_finite() && point.is_finite() && upper.is_finite());
        assert!(0.0 <= lower, "lower bound {} is negative", lower);
        assert!(lower <= point && point <= upper, "{} <= {} <= {}", lower, point, upper);
    }
}

#[test]
fn test_constant_series_forecasts_constant() {
    let series = constant_series(90, 10);
    let forecast = ForecastEngine::default().forecast(&series, 3).unwrap();

    assert_eq!(forecast.horizon(), 90);
    for value in &forecast.point_estimate {
        assert_abs_diff_eq!(*value, 10.0, epsilon = 1e-6);
    }
    assert_bounds_ordered(&forecast);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(6)]
fn test_forecast_length_is_months_times_thirty(#[case] months: usize) {
    let series = seasonal_series(120, 11);
    let forecast = ForecastEngine::default().forecast(&series, months).unwrap();

    assert_eq!(forecast.horizon(), months * 30);
    assert_eq!(forecast.point_estimate.len(), months * 30);
    assert_eq!(forecast.lower_bound.len(), months * 30);
    assert_eq!(forecast.upper_bound.len(), months * 30);
}

#[test]
fn test_forecast_dates_follow_history() {
    let series = seasonal_series(100, 3);
    let forecast = ForecastEngine::default().forecast(&series, 1).unwrap();

    assert_eq!(forecast.forecast_dates[0], series.last_date().succ_opt().unwrap());
    for pair in forecast.forecast_dates.windows(2) {
        assert_eq!(pair[1].signed_duration_since(pair[0]).num_days(), 1);
    }
}

#[rstest]
#[case(5)]
#[case(17)]
#[case(42)]
fn test_noisy_seasonal_forecast_is_well_formed(#[case] seed: u64) {
    let series = seasonal_series(180, seed);
    let forecast = ForecastEngine::default().forecast(&series, 1).unwrap();

    assert_bounds_ordered(&forecast);
    let mean = forecast.total() / forecast.horizon() as f64;
    assert!(mean > 5.0 && mean < 40.0, "mean forecast {}", mean);
}

#[test]
fn test_intervals_widen_with_horizon() {
    let series = seasonal_series(150, 9);
    let forecast = ForecastEngine::default().forecast(&series, 2).unwrap();

    let first = forecast.upper_bound[0] - forecast.lower_bound[0];
    let last = forecast.upper_bound[59] - forecast.lower_bound[59];
    assert!(last >= first);
}

#[test]
fn test_short_series_is_a_fit_error() {
    let series = seasonal_series(20, 1);
    let err = ForecastEngine::default().forecast(&series, 1).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitError(_)));
}

#[test]
fn test_all_zero_series_is_a_fit_error() {
    let series = constant_series(90, 0);
    let err = ForecastEngine::default().forecast(&series, 1).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitError(_)));
}

#[test]
fn test_zero_months_is_rejected() {
    let err = ForecastEngine::default()
        .forecast(&constant_series(90, 10), 0)
        .unwrap_err();
    assert!(matches!(err, ForecastError::InvalidParameter(_)));
}

#[test]
fn test_confidence_level_controls_width() {
    let series = seasonal_series(150, 21);
    let narrow_engine = ForecastEngine::new(ForecastConfig {
        confidence_level: 0.5,
        ..ForecastConfig::default()
    })
    .unwrap();

    let wide = ForecastEngine::default().forecast(&series, 1).unwrap();
    let narrow = narrow_engine.forecast(&series, 1).unwrap();

    let width = |f: &ForecastResult| f.upper_bound[10] - f.lower_bound[10];
    assert!(width(&narrow) <= width(&wide));
    assert_eq!(narrow.confidence_level, 0.5);
}

#[test]
fn test_trained_model_exposes_fit() {
    let model = SeasonalArima::new(ArimaOrder::default(), SeasonalOrder::default()).unwrap();
    let series = seasonal_series(120, 8);
    let trained = model.train(&series).unwrap();

    assert_eq!(trained.name(), "SARIMA(1,1,1)x(1,1,1,30)");
    assert_eq!(trained.fitted_values().len(), series.len());
    assert!(trained.sigma2() > 0.0);
    assert_eq!(trained.coefficients().ar.len(), 1);
    assert_eq!(trained.coefficients().seasonal_ma.len(), 1);
}

#[test]
fn test_invalid_model_settings() {
    let bad_period = SeasonalArima::new(
        ArimaOrder::default(),
        SeasonalOrder {
            p: 1,
            d: 1,
            q: 1,
            period: 1,
        },
    );
    assert!(bad_period.is_err());

    let model = SeasonalArima::new(ArimaOrder::default(), SeasonalOrder::default()).unwrap();
    assert!(model.clone().with_confidence_level(1.5).is_err());
    assert!(model.with_confidence_level(0.0).is_err());
}

#[test]
fn test_forecast_result_validation() {
    let dates = vec![start(), start().succ_opt().unwrap()];

    let mismatched = ForecastResult::new(dates.clone(), vec![1.0], vec![0.0], vec![2.0], 0.95);
    assert!(mismatched.is_err());

    let unordered = ForecastResult::new(
        dates.clone(),
        vec![1.0, 1.0],
        vec![0.0, 2.0],
        vec![2.0, 3.0],
        0.95,
    );
    assert!(unordered.is_err());

    let forecast =
        ForecastResult::new(dates, vec![105.0, 106.0], vec![100.0, 100.0], vec![110.0, 112.0], 0.95)
            .unwrap();
    assert_abs_diff_eq!(forecast.mean_absolute_error(&[106.0, 107.0]).unwrap(), 1.0);
    assert!(forecast.mean_absolute_error(&[1.0]).is_err());

    let json = forecast.to_json().unwrap();
    assert!(json.contains("\"forecast_dates\":[\"2024-01-01\",\"2024-01-02\"]"));
}

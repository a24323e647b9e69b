use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::aggregate::{
    mean_by_product, product_names, revenue_share, sales_by_period, top_n, Metric, Period,
};
use sales_forecast::inventory::{excess_inventory, inventory_ratios, ratio_summary};
use sales_forecast::{ForecastError, SalesRecord, StockRecord};

fn create_sales() -> Vec<SalesRecord> {
    let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
    vec![
        SalesRecord::new("Apple", d(1, 3), 10, 100.0),
        SalesRecord::new("Apple", d(1, 20), 5, 50.0),
        SalesRecord::new("Apple", d(2, 2), 7, 70.0),
        SalesRecord::new("Pear", d(1, 15), 4, 80.0),
        SalesRecord::new("Pear", d(2, 28), 6, 120.0),
        SalesRecord::new("Fig", d(2, 10), 1, 30.0),
    ]
}

#[test]
fn test_monthly_sums_by_product() {
    let totals = sales_by_period(&create_sales(), Period::Month).unwrap();
    let rows: Vec<(String, String, u64)> = totals
        .iter()
        .map(|t| (t.period.clone(), t.product_name.clone(), t.quantity))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("2024-01".to_string(), "Apple".to_string(), 15),
            ("2024-01".to_string(), "Pear".to_string(), 4),
            ("2024-02".to_string(), "Apple".to_string(), 7),
            ("2024-02".to_string(), "Fig".to_string(), 1),
            ("2024-02".to_string(), "Pear".to_string(), 6),
        ]
    );
    assert_abs_diff_eq!(totals[0].revenue, 150.0);
}

#[rstest]
#[case(Period::Day, 6)]
#[case(Period::Week, 6)]
#[case(Period::Month, 5)]
#[case(Period::Year, 3)]
fn test_group_counts_per_period(#[case] period: Period, #[case] groups: usize) {
    assert_eq!(sales_by_period(&create_sales(), period).unwrap().len(), groups);
}

#[test]
fn test_grouped_sums_conserve_totals() {
    let sales = create_sales();
    let raw: u64 = sales.iter().map(|r| r.quantity).sum();
    for period in [Period::Day, Period::Week, Period::Month, Period::Year] {
        let grouped: u64 = sales_by_period(&sales, period).unwrap().iter().map(|t| t.quantity).sum();
        assert_eq!(grouped, raw);
    }
}

#[test]
fn test_mean_by_product() {
    let means = mean_by_product(&create_sales()).unwrap();
    let apple = means.iter().find(|m| m.product_name == "Apple").unwrap();

    assert_eq!(apple.transactions, 3);
    assert_abs_diff_eq!(apple.mean_quantity, 22.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(apple.mean_revenue, 220.0 / 3.0, epsilon = 1e-12);
}

#[rstest]
#[case(Metric::Quantity, vec!["Apple", "Pear"])]
#[case(Metric::Revenue, vec!["Apple", "Pear"])]
fn test_top_n(#[case] metric: Metric, #[case] expected: Vec<&str>) {
    let top: Vec<String> = top_n(&create_sales(), 2, metric)
        .unwrap()
        .into_iter()
        .map(|t| t.product_name)
        .collect();
    assert_eq!(top, expected);
}

#[test]
fn test_top_n_breaks_ties_by_name() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let sales = vec![
        SalesRecord::new("Zucchini", d, 3, 1.0),
        SalesRecord::new("Bean", d, 3, 1.0),
    ];
    let top = top_n(&sales, 1, Metric::Quantity).unwrap();
    assert_eq!(top[0].product_name, "Bean");
}

#[test]
fn test_revenue_share_sums_to_one() {
    let shares = revenue_share(&create_sales()).unwrap();
    let total: f64 = shares.iter().map(|s| s.share).sum();

    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
    assert_eq!(shares[0].product_name, "Apple");
    assert_eq!(product_names(&create_sales()), vec!["Apple", "Fig", "Pear"]);
}

#[test]
fn test_excess_inventory_at_one_and_a_half_times_sales() {
    let sales = create_sales();
    // Apple sold 22, Pear 10, Fig 1
    let stock = vec![
        StockRecord::new("Apple", 33),
        StockRecord::new("Pear", 14),
        StockRecord::new("Fig", 2),
    ];

    let ratios = inventory_ratios(&sales, &stock).unwrap();
    let flagged: Vec<&str> = excess_inventory(&ratios, 1.5)
        .iter()
        .map(|r| r.product_id.as_str())
        .collect();

    assert_eq!(flagged, vec!["Apple", "Fig"]);

    let summary = ratio_summary(&ratios).unwrap();
    assert_eq!(summary.count, 3);
    assert_abs_diff_eq!(summary.max, 2.0);
    assert_abs_diff_eq!(summary.min, 1.4);
}

#[test]
fn test_ratio_summary_without_overlap() {
    let ratios = inventory_ratios(&create_sales(), &[StockRecord::new("Kiwi", 1)]).unwrap();
    assert!(ratios.is_empty());
    assert!(ratio_summary(&ratios).is_err());
}

#[test]
fn test_quantity_overflow_names_the_product() {
    let mut sales = create_sales();
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    sales.push(SalesRecord::new("Pear", day, u64::MAX, 1.0));

    for err in [
        sales_by_period(&sales, Period::Year).unwrap_err(),
        top_n(&sales, 1, Metric::Quantity).unwrap_err(),
        inventory_ratios(&sales, &[StockRecord::new("Pear", 1)]).unwrap_err(),
    ] {
        match err {
            ForecastError::FileFormatError(detail) => assert!(detail.contains("'Pear'")),
            other => panic!("unexpected error {:?}", other),
        }
    }
    // names need no sums
    assert_eq!(product_names(&sales), vec!["Apple", "Fig", "Pear"]);
}

#[test]
fn test_stock_overflow_is_reported() {
    let stock = [StockRecord::new("Fig", u64::MAX), StockRecord::new("Fig", 2)];
    assert!(matches!(
        inventory_ratios(&create_sales(), &stock),
        Err(ForecastError::FileFormatError(_))
    ));
}

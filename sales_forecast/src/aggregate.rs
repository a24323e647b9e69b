//! Grouped aggregations over sales records
//!
//! Pure functions feeding the summary, chart and ranking views. Results
//! are sorted so output is stable from run to run.

use crate::data::SalesRecord;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Calendar bucket used for grouped sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    Day,
    /// ISO week, starting Monday
    Week,
    Month,
    Year,
}

impl Period {
    /// First day of the bucket containing `date`
    pub fn start_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => date - Days::new(date.weekday().num_days_from_monday() as u64),
            Period::Month => date.with_day(1).unwrap_or(date),
            Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Display label of the bucket starting at `start`
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Period::Day => start.format("%Y-%m-%d").to_string(),
            Period::Week => start.format("%G-W%V").to_string(),
            Period::Month => start.format("%Y-%m").to_string(),
            Period::Year => start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        };
        write!(f, "{}", name)
    }
}

/// Numeric column used for rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Quantity,
    Revenue,
}

/// Sales of one product within one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub period_start: NaiveDate,
    pub period: String,
    pub product_name: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Totals of one product over the whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub product_name: String,
    pub quantity: u64,
    pub revenue: f64,
    pub transactions: usize,
}

impl ProductTotal {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Quantity => self.quantity as f64,
            Metric::Revenue => self.revenue,
        }
    }
}

/// Per-transaction averages of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMean {
    pub product_name: String,
    pub mean_quantity: f64,
    pub mean_revenue: f64,
    pub transactions: usize,
}

/// A product's fraction of total revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueShare {
    pub product_name: String,
    pub revenue: f64,
    pub share: f64,
}

/// Add `quantity` to a running total of `product`, failing on overflow
pub(crate) fn add_quantity(total: u64, quantity: u64, product: &str) -> Result<u64> {
    total.checked_add(quantity).ok_or_else(|| {
        ForecastError::FileFormatError(format!(
            "total quantity of '{}' is larger than {}",
            product,
            u64::MAX
        ))
    })
}

/// Quantity and revenue summed by (period, product)
pub fn sales_by_period(records: &[SalesRecord], period: Period) -> Result<Vec<PeriodTotal>> {
    let mut groups: BTreeMap<(NaiveDate, &str), (u64, f64)> = BTreeMap::new();
    for record in records {
        let key = (period.start_of(record.sale_date), record.product_name.as_str());
        let entry = groups.entry(key).or_insert((0, 0.0));
        entry.0 = add_quantity(entry.0, record.quantity, &record.product_name)?;
        entry.1 += record.revenue;
    }

    Ok(groups
        .into_iter()
        .map(|((start, product), (quantity, revenue))| PeriodTotal {
            period_start: start,
            period: period.label(start),
            product_name: product.to_string(),
            quantity,
            revenue,
        })
        .collect())
}

/// Totals per product, sorted by product name
pub fn product_totals(records: &[SalesRecord]) -> Result<Vec<ProductTotal>> {
    let mut groups: BTreeMap<&str, ProductTotal> = BTreeMap::new();
    for record in records {
        let entry = groups
            .entry(record.product_name.as_str())
            .or_insert_with(|| ProductTotal {
                product_name: record.product_name.clone(),
                quantity: 0,
                revenue: 0.0,
                transactions: 0,
            });
        entry.quantity = add_quantity(entry.quantity, record.quantity, &record.product_name)?;
        entry.revenue += record.revenue;
        entry.transactions += 1;
    }
    Ok(groups.into_values().collect())
}

/// Mean quantity and revenue per transaction, by product
pub fn mean_by_product(records: &[SalesRecord]) -> Result<Vec<ProductMean>> {
    Ok(product_totals(records)?
        .into_iter()
        .map(|total| ProductMean {
            mean_quantity: total.quantity as f64 / total.transactions as f64,
            mean_revenue: total.revenue / total.transactions as f64,
            product_name: total.product_name,
            transactions: total.transactions,
        })
        .collect())
}

/// The `n` products with the largest total `metric`, ties by name
pub fn top_n(records: &[SalesRecord], n: usize, metric: Metric) -> Result<Vec<ProductTotal>> {
    let mut totals = product_totals(records)?;
    totals.sort_by(|a, b| {
        b.metric(metric)
            .total_cmp(&a.metric(metric))
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    totals.truncate(n);
    Ok(totals)
}

/// Revenue share of every product, largest first
pub fn revenue_share(records: &[SalesRecord]) -> Result<Vec<RevenueShare>> {
    let totals = top_n(records, usize::MAX, Metric::Revenue)?;
    let grand_total: f64 = totals.iter().map(|t| t.revenue).sum();

    Ok(totals
        .into_iter()
        .map(|t| RevenueShare {
            share: if grand_total > 0.0 {
                t.revenue / grand_total
            } else {
                0.0
            },
            revenue: t.revenue,
            product_name: t.product_name,
        })
        .collect())
}

/// Distinct product names, sorted
pub fn product_names(records: &[SalesRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().map(|r| r.product_name.as_str()).collect();
    names.into_iter().map(str::to_string).collect()
}

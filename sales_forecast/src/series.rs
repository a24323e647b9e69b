//! Daily demand series construction
//!
//! Transactions are irregular: a product may sell several times a day or
//! not at all for weeks. Forecasting needs one value per calendar day, so
//! the builder sums each day and fills silent days with zero.

use crate::aggregate::add_quantity;
use crate::data::SalesRecord;
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Gap-free daily quantities of one product.
///
/// Dates are derived from `start` and the position of each value, so
/// consecutive entries always differ by exactly one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    product: String,
    start: NaiveDate,
    quantities: Vec<u64>,
}

impl DailySeries {
    /// Create a series starting at `start`, one quantity per day
    pub fn new(product: impl Into<String>, start: NaiveDate, quantities: Vec<u64>) -> Result<Self> {
        if quantities.is_empty() {
            return Err(ForecastError::InsufficientDataError(
                "a daily series needs at least one day".to_string(),
            ));
        }
        if start
            .checked_add_days(Days::new(quantities.len() as u64 - 1))
            .is_none()
        {
            return Err(ForecastError::InvalidParameter(
                "series extends past the supported calendar".to_string(),
            ));
        }
        Ok(Self {
            product: product.into(),
            start,
            quantities,
        })
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn last_date(&self) -> NaiveDate {
        self.date_at(self.quantities.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn quantities(&self) -> &[u64] {
        &self.quantities
    }

    /// Quantities as floating point values for modelling
    pub fn values(&self) -> Vec<f64> {
        self.quantities.iter().map(|&q| q as f64).collect()
    }

    pub fn total(&self) -> u64 {
        self.quantities
            .iter()
            .fold(0, |acc: u64, q| acc.saturating_add(*q))
    }

    /// Calendar date of the `index`-th observation
    pub fn date_at(&self, index: usize) -> NaiveDate {
        // in range: checked in `new`
        self.start + Days::new(index as u64)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.quantities.len()).map(move |i| self.date_at(i))
    }

    /// `(date, quantity)` pairs in calendar order
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.dates().zip(self.quantities.iter().copied())
    }

    /// Split into the first `len` days and the remainder.
    ///
    /// Returns `None` when either side would be empty.
    pub fn split_at(&self, len: usize) -> Option<(DailySeries, DailySeries)> {
        if len == 0 || len >= self.quantities.len() {
            return None;
        }
        let (head, tail) = self.quantities.split_at(len);
        Some((
            DailySeries {
                product: self.product.clone(),
                start: self.start,
                quantities: head.to_vec(),
            },
            DailySeries {
                product: self.product.clone(),
                start: self.date_at(len),
                quantities: tail.to_vec(),
            },
        ))
    }
}

/// Build the zero-filled daily series of one product
pub fn build_daily_series(records: &[SalesRecord], product: &str) -> Result<DailySeries> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    // every day is bounded by the product total
    let mut total = 0;
    for record in records.iter().filter(|r| r.product_name == product) {
        total = add_quantity(total, record.quantity, product)?;
        *per_day.entry(record.sale_date).or_insert(0) += record.quantity;
    }

    let (first, last) = match (per_day.keys().next(), per_day.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(ForecastError::InsufficientDataError(format!(
                "no sales rows for product '{}'",
                product
            )))
        }
    };

    let quantities: Vec<u64> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| per_day.get(&day).copied().unwrap_or(0))
        .collect();

    debug!(
        product,
        days = quantities.len(),
        active_days = per_day.len(),
        "built daily series"
    );

    DailySeries::new(product, first, quantities)
}

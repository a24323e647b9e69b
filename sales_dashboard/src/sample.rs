//! Synthetic sales and stock files

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sales_forecast::{SalesRecord, StockRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

struct ProductProfile {
    name: &'static str,
    unit_price: f64,
    base_demand: f64,
    /// Amplitude of the 30-day cycle relative to the base
    cycle: f64,
    /// Days of cover held in stock
    cover_days: f64,
}

const PRODUCTS: [ProductProfile; 5] = [
    ProductProfile {
        name: "Ceramic Mug",
        unit_price: 12.5,
        base_demand: 18.0,
        cycle: 0.35,
        cover_days: 20.0,
    },
    ProductProfile {
        name: "Teapot",
        unit_price: 34.0,
        base_demand: 6.0,
        cycle: 0.5,
        cover_days: 45.0,
    },
    ProductProfile {
        name: "Tea Towel",
        unit_price: 7.9,
        base_demand: 11.0,
        cycle: 0.2,
        cover_days: 25.0,
    },
    ProductProfile {
        name: "Cake Stand",
        unit_price: 48.0,
        base_demand: 1.5,
        cycle: 0.6,
        cover_days: 400.0,
    },
    ProductProfile {
        name: "Coaster Set",
        unit_price: 15.0,
        base_demand: 9.0,
        cycle: 0.3,
        cover_days: 300.0,
    },
];

/// Generated tables, sales ordered by date
#[derive(Debug, Clone)]
pub struct SampleData {
    pub sales: Vec<SalesRecord>,
    pub stock: Vec<StockRecord>,
}

/// Daily transactions for `days` days starting at `start`
pub fn generate(start: NaiveDate, days: usize, seed: u64) -> SampleData {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sales = Vec::new();
    let mut sold = vec![0u64; PRODUCTS.len()];

    for day in 0..days {
        let Some(date) = start.checked_add_days(Days::new(day as u64)) else {
            break;
        };
        let phase = 2.0 * std::f64::consts::PI * (day % 30) as f64 / 30.0;
        for (idx, profile) in PRODUCTS.iter().enumerate() {
            let expected = profile.base_demand * (1.0 + profile.cycle * phase.sin());
            let noise: f64 = rng.gen_range(-0.3_f64..0.3) * profile.base_demand;
            let quantity = (expected + noise).round().max(0.0) as u64;
            if quantity == 0 {
                continue;
            }
            let discount: f64 = if rng.gen_bool(0.1) { 0.9 } else { 1.0 };
            let revenue = (quantity as f64 * profile.unit_price * discount * 100.0).round() / 100.0;
            sold[idx] += quantity;
            sales.push(SalesRecord::new(profile.name, date, quantity, revenue));
        }
    }

    let stock = PRODUCTS
        .iter()
        .zip(&sold)
        .map(|(profile, total)| {
            let daily = *total as f64 / days.max(1) as f64;
            StockRecord::new(profile.name, (daily * profile.cover_days).round() as u64)
        })
        .collect();

    SampleData { sales, stock }
}

/// Write `sales.csv` and `stock.csv` into `dir`, creating it if needed
pub fn write_sample(dir: &Path, data: &SampleData) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let sales_path = dir.join("sales.csv");
    let mut writer = csv::Writer::from_path(&sales_path)
        .with_context(|| format!("creating {}", sales_path.display()))?;
    for record in &data.sales {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let stock_path = dir.join("stock.csv");
    let mut writer = csv::Writer::from_path(&stock_path)
        .with_context(|| format!("creating {}", stock_path.display()))?;
    for record in &data.stock {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        sales_rows = data.sales.len(),
        stock_rows = data.stock.len(),
        dir = %dir.display(),
        "wrote sample data"
    );
    Ok((sales_path, stock_path))
}

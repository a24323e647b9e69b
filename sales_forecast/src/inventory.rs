//! Stock-to-sales ratios and excess inventory checks

use crate::aggregate::{add_quantity, product_totals};
use crate::data::{SalesRecord, StockRecord};
use crate::error::{ForecastError, Result};
use serde::Serialize;
use series_math::{describe, Summary};
use std::collections::BTreeMap;
use std::io::Write;

/// Stock on hand relative to units sold for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRatio {
    pub product_id: String,
    /// Units sold over the whole sales table
    pub sales: u64,
    /// Units in stock
    pub inventory: u64,
    /// `inventory / sales`, absent when nothing was sold
    pub ratio: Option<f64>,
}

impl InventoryRatio {
    /// Whether stock reaches `threshold` times sales. Unsold products
    /// with stock on hand always qualify.
    pub fn is_excess(&self, threshold: f64) -> bool {
        match self.ratio {
            Some(ratio) => ratio >= threshold,
            None => self.inventory > 0,
        }
    }
}

/// Join sales totals and stock levels on product name.
///
/// Only products present in both tables are returned; duplicate stock
/// rows of a product are summed.
pub fn inventory_ratios(
    sales: &[SalesRecord],
    stock: &[StockRecord],
) -> Result<Vec<InventoryRatio>> {
    let mut stock_by_product: BTreeMap<&str, u64> = BTreeMap::new();
    for record in stock {
        let on_hand = stock_by_product
            .entry(record.product_name.as_str())
            .or_insert(0);
        *on_hand = add_quantity(*on_hand, record.stock_quantity, &record.product_name)?;
    }

    Ok(product_totals(sales)?
        .into_iter()
        .filter_map(|total| {
            let inventory = *stock_by_product.get(total.product_name.as_str())?;
            let ratio = if total.quantity > 0 {
                Some(inventory as f64 / total.quantity as f64)
            } else {
                None
            };
            Some(InventoryRatio {
                product_id: total.product_name,
                sales: total.quantity,
                inventory,
                ratio,
            })
        })
        .collect())
}

/// Products whose stock is at least `threshold` times their sales
pub fn excess_inventory(ratios: &[InventoryRatio], threshold: f64) -> Vec<&InventoryRatio> {
    ratios.iter().filter(|r| r.is_excess(threshold)).collect()
}

/// Descriptive statistics of the defined ratios
pub fn ratio_summary(ratios: &[InventoryRatio]) -> Result<Summary> {
    let values: Vec<f64> = ratios.iter().filter_map(|r| r.ratio).collect();
    if values.is_empty() {
        return Err(ForecastError::InsufficientDataError(
            "no product has both sales and stock".to_string(),
        ));
    }
    Ok(describe(&values)?)
}

/// Write the ratio table as CSV: `product_id,sales,inventory,ratio`
pub fn write_ratio_csv<W: Write>(ratios: &[InventoryRatio], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if ratios.is_empty() {
        csv_writer.write_record(["product_id", "sales", "inventory", "ratio"])?;
    }
    for ratio in ratios {
        csv_writer.serialize(ratio)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(product: &str, quantity: u64) -> SalesRecord {
        SalesRecord::new(
            product,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quantity,
            quantity as f64 * 10.0,
        )
    }

    #[test]
    fn test_inner_join_and_ratio() {
        let sales = vec![sale("A", 4), sale("A", 6), sale("B", 5), sale("C", 1)];
        let stock = vec![
            StockRecord::new("A", 20),
            StockRecord::new("B", 5),
            StockRecord::new("D", 9),
        ];

        let ratios = inventory_ratios(&sales, &stock).unwrap();

        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].product_id, "A");
        assert_eq!(ratios[0].sales, 10);
        assert_eq!(ratios[0].ratio, Some(2.0));
        assert_eq!(ratios[1].ratio, Some(1.0));
    }

    #[test]
    fn test_unsold_stock_is_excess() {
        let ratio = InventoryRatio {
            product_id: "A".to_string(),
            sales: 0,
            inventory: 3,
            ratio: None,
        };
        assert!(ratio.is_excess(1.5));
    }

    #[test]
    fn test_csv_export() {
        let ratios = inventory_ratios(&[sale("A", 2)], &[StockRecord::new("A", 3)]).unwrap();
        let mut out = Vec::new();
        write_ratio_csv(&ratios, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "product_id,sales,inventory,ratio\nA,2,3,1.5\n");
    }
}

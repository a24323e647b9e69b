//! Sales and stock table loading
//!
//! Uploaded files are read into a raw [`Table`] of strings, then a schema
//! resolves the required columns once and turns every row into a typed
//! record. Headers are matched case-insensitively against a small set of
//! aliases, including the Korean headers used by the shop exports.

use crate::error::{ForecastError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// One sales transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,
    pub sale_date: NaiveDate,
    pub quantity: u64,
    pub revenue: f64,
}

impl SalesRecord {
    pub fn new(
        product_name: impl Into<String>,
        sale_date: NaiveDate,
        quantity: u64,
        revenue: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            sale_date,
            quantity,
            revenue,
        }
    }
}

/// Stock level of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_name: String,
    pub stock_quantity: u64,
}

impl StockRecord {
    pub fn new(product_name: impl Into<String>, stock_quantity: u64) -> Self {
        Self {
            product_name: product_name.into(),
            stock_quantity,
        }
    }
}

/// Which upload a table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Sales,
    Stock,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Sales => write!(f, "sales"),
            DatasetKind::Stock => write!(f, "stock"),
        }
    }
}

/// Raw rows of an uploaded file, every cell kept as text
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a CSV table with a header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ForecastError::FileFormatError(format!("CSV header error: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| {
                ForecastError::FileFormatError(format!(
                    "CSV parse error at line {}: {}",
                    line_num + 2,
                    e
                ))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Read the first worksheet of a spreadsheet file
    pub fn from_workbook<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let range = workbook.worksheet_range_at(0).ok_or_else(|| {
            ForecastError::FileFormatError("Workbook contains no worksheets".to_string())
        })??;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row.iter().map(cell_to_string).collect(),
            None => Vec::new(),
        };
        let rows = rows
            .map(|r| r.iter().map(cell_to_string).collect::<Vec<_>>())
            .filter(|r| r.iter().any(|cell| !cell.is_empty()))
            .collect();

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for previews
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Columns whose non-empty cells all parse as numbers
    pub fn numeric_columns(&self) -> Vec<(String, Vec<f64>)> {
        let mut columns = Vec::new();
        for (idx, header) in self.headers.iter().enumerate() {
            let mut values = Vec::with_capacity(self.rows.len());
            let mut numeric = true;
            for row in &self.rows {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                match parse_amount(cell) {
                    Some(v) => values.push(v),
                    None => {
                        numeric = false;
                        break;
                    }
                }
            }
            if numeric && !values.is_empty() {
                columns.push((header.clone(), values));
            }
        }
        columns
    }
}

const PRODUCT_NAME_ALIASES: &[&str] = &["product_name", "product", "product_id", "제품명", "상품명"];
const SALE_DATE_ALIASES: &[&str] = &["sale_date", "date", "order_date", "판매일", "판매일자", "날짜"];
const QUANTITY_ALIASES: &[&str] = &["quantity", "qty", "sales", "판매량", "판매수량"];
const REVENUE_ALIASES: &[&str] = &["revenue", "amount", "sales_amount", "매출액", "매출"];
const STOCK_QUANTITY_ALIASES: &[&str] = &["stock_quantity", "stock", "inventory", "재고량", "재고"];

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace([' ', '-'], "_")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    aliases
        .iter()
        .find_map(|alias| normalized.iter().position(|h| h == alias))
}

/// Column positions of the required sales fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesSchema {
    product_name: usize,
    sale_date: usize,
    quantity: usize,
    revenue: usize,
}

impl SalesSchema {
    /// Resolve every required column, reporting all missing ones at once
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let product_name = find_column(headers, PRODUCT_NAME_ALIASES);
        let sale_date = find_column(headers, SALE_DATE_ALIASES);
        let quantity = find_column(headers, QUANTITY_ALIASES);
        let revenue = find_column(headers, REVENUE_ALIASES);

        match (product_name, sale_date, quantity, revenue) {
            (Some(product_name), Some(sale_date), Some(quantity), Some(revenue)) => Ok(Self {
                product_name,
                sale_date,
                quantity,
                revenue,
            }),
            _ => {
                let missing = [
                    ("product_name", product_name),
                    ("sale_date", sale_date),
                    ("quantity", quantity),
                    ("revenue", revenue),
                ]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
                Err(ForecastError::MissingColumnError {
                    dataset: DatasetKind::Sales.to_string(),
                    columns: missing,
                })
            }
        }
    }

    /// Parse one data row; `line` is the 1-based file line for messages
    pub fn parse_row(&self, row: &[String], line: usize) -> Result<SalesRecord> {
        let product_name = required_cell(row, self.product_name, "product_name", line)?;
        let date_cell = required_cell(row, self.sale_date, "sale_date", line)?;
        let sale_date = parse_date(date_cell).ok_or_else(|| {
            ForecastError::FileFormatError(format!(
                "line {}: cannot parse sale_date '{}'",
                line, date_cell
            ))
        })?;
        let quantity_cell = required_cell(row, self.quantity, "quantity", line)?;
        let quantity = parse_count(quantity_cell).ok_or_else(|| {
            ForecastError::FileFormatError(format!(
                "line {}: quantity '{}' is not a non-negative integer",
                line, quantity_cell
            ))
        })?;
        let revenue_cell = required_cell(row, self.revenue, "revenue", line)?;
        let revenue = parse_amount(revenue_cell)
            .filter(|v| *v >= 0.0)
            .ok_or_else(|| {
                ForecastError::FileFormatError(format!(
                    "line {}: revenue '{}' is not a non-negative amount",
                    line, revenue_cell
                ))
            })?;

        Ok(SalesRecord::new(product_name, sale_date, quantity, revenue))
    }
}

/// Column positions of the required stock fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSchema {
    product_name: usize,
    stock_quantity: usize,
}

impl StockSchema {
    /// Resolve every required column, reporting all missing ones at once
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let product_name = find_column(headers, PRODUCT_NAME_ALIASES);
        let stock_quantity = find_column(headers, STOCK_QUANTITY_ALIASES);

        match (product_name, stock_quantity) {
            (Some(product_name), Some(stock_quantity)) => Ok(Self {
                product_name,
                stock_quantity,
            }),
            _ => {
                let mut missing = Vec::new();
                if product_name.is_none() {
                    missing.push("product_name".to_string());
                }
                if stock_quantity.is_none() {
                    missing.push("stock_quantity".to_string());
                }
                Err(ForecastError::MissingColumnError {
                    dataset: DatasetKind::Stock.to_string(),
                    columns: missing,
                })
            }
        }
    }

    /// Parse one data row; `line` is the 1-based file line for messages
    pub fn parse_row(&self, row: &[String], line: usize) -> Result<StockRecord> {
        let product_name = required_cell(row, self.product_name, "product_name", line)?;
        let cell = required_cell(row, self.stock_quantity, "stock_quantity", line)?;
        let stock_quantity = parse_count(cell).ok_or_else(|| {
            ForecastError::FileFormatError(format!(
                "line {}: stock_quantity '{}' is not a non-negative integer",
                line, cell
            ))
        })?;

        Ok(StockRecord::new(product_name, stock_quantity))
    }
}

fn required_cell<'a>(row: &'a [String], idx: usize, column: &str, line: usize) -> Result<&'a str> {
    match row.get(idx).map(|c| c.trim()) {
        Some(cell) if !cell.is_empty() => Ok(cell),
        _ => Err(ForecastError::FileFormatError(format!(
            "line {}: {} is empty",
            line, column
        ))),
    }
}

/// Parse a calendar date, ignoring any time-of-day suffix
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

    let date_part = text.trim().split([' ', 'T']).next().unwrap_or("");
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(text: &str) -> Option<u64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if let Ok(value) = cleaned.parse::<u64>() {
        return Some(value);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
        .map(|v| v as u64)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v
            .as_datetime()
            .map(|dt| dt.date().to_string())
            .unwrap_or_else(|| v.to_string()),
        Data::DateTimeIso(v) => v.clone(),
        Data::DurationIso(v) => v.clone(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// A loaded upload: the raw table for previews plus its typed records
#[derive(Debug, Clone)]
pub struct LoadedData<T> {
    pub table: Table,
    pub records: Vec<T>,
}

/// Loader for the sales and stock uploads
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Read a raw table, choosing the parser by file extension
    pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Table::from_csv_reader(File::open(path)?),
            "xlsx" | "xlsm" | "xls" | "ods" => Table::from_workbook(path),
            other => Err(ForecastError::FileFormatError(format!(
                "unsupported file type '{}' for {}; upload a CSV or Excel file",
                other,
                path.display()
            ))),
        }
    }

    /// Load and validate the sales upload
    pub fn load_sales<P: AsRef<Path>>(path: P) -> Result<LoadedData<SalesRecord>> {
        let table = Self::read_table(path.as_ref())?;
        let records = Self::sales_from_table(&table)?;
        info!(path = %path.as_ref().display(), rows = records.len(), "loaded sales data");
        Ok(LoadedData { table, records })
    }

    /// Load and validate the stock upload
    pub fn load_stock<P: AsRef<Path>>(path: P) -> Result<LoadedData<StockRecord>> {
        let table = Self::read_table(path.as_ref())?;
        let records = Self::stock_from_table(&table)?;
        info!(path = %path.as_ref().display(), rows = records.len(), "loaded stock data");
        Ok(LoadedData { table, records })
    }

    pub fn sales_from_table(table: &Table) -> Result<Vec<SalesRecord>> {
        let schema = SalesSchema::resolve(table.headers())?;
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| schema.parse_row(row, i + 2))
            .collect()
    }

    pub fn stock_from_table(table: &Table) -> Result<Vec<StockRecord>> {
        let schema = StockSchema::resolve(table.headers())?;
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| schema.parse_row(row, i + 2))
            .collect()
    }

    /// Parse sales records from CSV text
    pub fn sales_from_csv_reader<R: Read>(reader: R) -> Result<Vec<SalesRecord>> {
        Self::sales_from_table(&Table::from_csv_reader(reader)?)
    }

    /// Parse stock records from CSV text
    pub fn stock_from_csv_reader<R: Read>(reader: R) -> Result<Vec<StockRecord>> {
        Self::stock_from_table(&Table::from_csv_reader(reader)?)
    }
}

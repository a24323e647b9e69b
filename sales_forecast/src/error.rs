//! Error types for the sales_forecast crate

use series_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Unsupported file extension or unparsable content
    #[error("File format error: {0}")]
    FileFormatError(String),

    /// Required columns absent after parsing a table
    #[error("Missing columns in {dataset} data: {}", .columns.join(", "))]
    MissingColumnError {
        dataset: String,
        columns: Vec<String>,
    },

    /// Not enough rows to build a series
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),

    /// The seasonal model could not be fitted or could not forecast
    #[error("Model fit error: {0}")]
    ModelFitError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader or writer
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from numerical routines
    #[error("Math error: {0}")]
    MathError(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<calamine::Error> for ForecastError {
    fn from(err: calamine::Error) -> Self {
        ForecastError::FileFormatError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::InvalidParameter(err.to_string())
    }
}

//! User-facing wording for core errors

use sales_forecast::ForecastError;

pub const MISSING_UPLOADS: &str = "please upload both the sales and the stock files";

/// Turn a core error into the message shown to the user
pub fn user_message(err: &ForecastError) -> String {
    match err {
        ForecastError::FileFormatError(detail) => format!(
            "the file could not be read ({}); upload a CSV or Excel file",
            detail
        ),
        ForecastError::MissingColumnError { dataset, columns } => format!(
            "the {} file is missing required columns: {}",
            dataset,
            columns.join(", ")
        ),
        ForecastError::InsufficientDataError(detail) => {
            format!("not enough data: {}", detail)
        }
        ForecastError::ModelFitError(detail) => format!(
            "the forecast model could not be fitted ({}); the data may be insufficient or non-seasonal",
            detail
        ),
        ForecastError::InvalidParameter(detail) => format!("invalid setting: {}", detail),
        ForecastError::IoError(e) => format!("the file could not be opened: {}", e),
        ForecastError::CsvError(e) => format!("the CSV file could not be processed: {}", e),
        ForecastError::MathError(e) => format!("a calculation failed: {}", e),
    }
}

/// Message for any error reaching `main`. Context layers are kept and a
/// [`ForecastError`] in the chain is replaced by its user wording.
pub fn describe_error(err: &anyhow::Error) -> String {
    let mut parts = Vec::new();
    for cause in err.chain() {
        if let Some(core) = cause.downcast_ref::<ForecastError>() {
            parts.push(user_message(core));
            return parts.join(": ");
        }
        parts.push(cause.to_string());
    }
    format!("{:#}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_model_fit_hint() {
        let message = user_message(&ForecastError::ModelFitError("too short".to_string()));
        assert!(message.contains("too short"));
        assert!(message.contains("insufficient or non-seasonal"));
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let message = user_message(&ForecastError::MissingColumnError {
            dataset: "stock".to_string(),
            columns: vec!["stock_quantity".to_string()],
        });
        assert_eq!(
            message,
            "the stock file is missing required columns: stock_quantity"
        );
    }

    #[test]
    fn test_context_is_kept() {
        let result: Result<(), ForecastError> =
            Err(ForecastError::InsufficientDataError("no rows".to_string()));
        let err = result.context("loading sales.csv").unwrap_err();
        assert_eq!(describe_error(&err), "loading sales.csv: not enough data: no rows");

        let plain = anyhow::Error::new(ForecastError::InvalidParameter("x".to_string()));
        assert_eq!(describe_error(&plain), "invalid setting: x");

        let nested = err.context(MISSING_UPLOADS);
        assert_eq!(
            describe_error(&nested),
            "please upload both the sales and the stock files: loading sales.csv: not enough data: no rows"
        );

        let other = anyhow::anyhow!("disk full").context("writing ratios.csv");
        assert_eq!(describe_error(&other), "writing ratios.csv: disk full");
    }
}

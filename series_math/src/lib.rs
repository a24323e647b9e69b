//! # Series Math
//!
//! Numerical building blocks for seasonal time series models.
//! This crate provides seasonal differencing and its inverse, lag
//! polynomial arithmetic, a derivative-free minimiser and descriptive
//! statistics.

use thiserror::Error;

pub mod describe;
pub mod differencing;
pub mod optimize;
pub mod polynomial;

pub use describe::{describe, Summary};
pub use differencing::{difference, integrate, DifferencingPlan};
pub use optimize::{Minimum, NelderMead};
pub use polynomial::LagPolynomial;

/// Errors that can occur in series calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

//! Lag polynomial arithmetic
//!
//! A lag polynomial `c0 + c1*B + c2*B^2 + ...` is stored by its
//! coefficients, index `k` holding the coefficient of `B^k`.

use serde::{Deserialize, Serialize};

/// Polynomial in the backshift operator `B`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagPolynomial {
    coefficients: Vec<f64>,
}

impl LagPolynomial {
    /// The identity polynomial `1`
    pub fn one() -> Self {
        Self {
            coefficients: vec![1.0],
        }
    }

    /// Build a polynomial from raw coefficients, trailing zeros are dropped
    pub fn from_coefficients(mut coefficients: Vec<f64>) -> Self {
        while coefficients.len() > 1 && coefficients.last() == Some(&0.0) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            coefficients.push(0.0);
        }
        Self { coefficients }
    }

    /// Autoregressive factor `1 - phi_1*B^step - phi_2*B^(2*step) - ...`
    pub fn autoregressive(phi: &[f64], step: usize) -> Self {
        Self::spaced(phi, step, -1.0)
    }

    /// Moving-average factor `1 + theta_1*B^step + theta_2*B^(2*step) + ...`
    pub fn moving_average(theta: &[f64], step: usize) -> Self {
        Self::spaced(theta, step, 1.0)
    }

    /// Differencing factor `1 - B^lag`
    pub fn differencing(lag: usize) -> Self {
        Self::autoregressive(&[1.0], lag)
    }

    fn spaced(params: &[f64], step: usize, sign: f64) -> Self {
        if params.is_empty() || step == 0 {
            return Self::one();
        }
        let mut coefficients = vec![0.0; params.len() * step + 1];
        coefficients[0] = 1.0;
        for (i, &value) in params.iter().enumerate() {
            coefficients[(i + 1) * step] = sign * value;
        }
        Self::from_coefficients(coefficients)
    }

    /// Product of two polynomials
    pub fn multiply(&self, other: &LagPolynomial) -> LagPolynomial {
        let mut product = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] += a * b;
            }
        }
        LagPolynomial::from_coefficients(product)
    }

    /// `self` raised to a non-negative integer power
    pub fn pow(&self, exponent: usize) -> LagPolynomial {
        (0..exponent).fold(LagPolynomial::one(), |acc, _| acc.multiply(self))
    }

    /// Highest power of `B` with a non-zero coefficient
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient of `B^k`, zero beyond the degree
    pub fn coefficient(&self, k: usize) -> f64 {
        self.coefficients.get(k).copied().unwrap_or(0.0)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// First `count` weights of the expansion `numerator(B) / denominator(B)`.
    ///
    /// The denominator must have a leading coefficient of one.
    pub fn psi_weights(
        numerator: &LagPolynomial,
        denominator: &LagPolynomial,
        count: usize,
    ) -> Vec<f64> {
        let mut psi = Vec::with_capacity(count);
        for j in 0..count {
            let mut weight = numerator.coefficient(j);
            for k in 1..=j.min(denominator.degree()) {
                weight -= denominator.coefficient(k) * psi[j - k];
            }
            psi.push(weight);
        }
        psi
    }
}

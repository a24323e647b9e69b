//! Derivative-free minimisation
//!
//! Nelder-Mead simplex search, used to minimise the conditional sum of
//! squares of seasonal ARMA models. Non-finite objective values are
//! treated as `+inf` so the simplex walks away from explosive regions.

use crate::{MathError, Result};

/// Outcome of a minimisation
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerance was reached before the iteration limit
    pub converged: bool,
}

/// Nelder-Mead simplex minimiser
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    tolerance: f64,
    initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-8,
            initial_step: 0.1,
        }
    }
}

impl NelderMead {
    /// Create a new minimiser
    pub fn new(max_iterations: usize, tolerance: f64, initial_step: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(MathError::InvalidInput(
                "Iteration limit must be greater than zero".to_string(),
            ));
        }
        if tolerance <= 0.0 || !tolerance.is_finite() {
            return Err(MathError::InvalidInput(
                "Tolerance must be a positive finite number".to_string(),
            ));
        }
        if initial_step == 0.0 || !initial_step.is_finite() {
            return Err(MathError::InvalidInput(
                "Initial step must be a non-zero finite number".to_string(),
            ));
        }

        Ok(Self {
            max_iterations,
            tolerance,
            initial_step,
        })
    }

    /// Minimise `objective` starting from `start`
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let eval = |x: &[f64]| {
            let value = objective(x);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        let n = start.len();
        if n == 0 {
            let value = eval(start);
            return Ok(Minimum {
                point: Vec::new(),
                value,
                iterations: 0,
                converged: true,
            });
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.to_vec());
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            sort_simplex(&mut simplex, &mut values);

            let best = values[0];
            let worst = values[n];
            if best.is_finite() && (worst - best).abs() <= self.tolerance * (best.abs() + self.tolerance)
            {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
                .collect();
            let towards = |coefficient: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&simplex[n])
                    .map(|(c, w)| c + coefficient * (w - c))
                    .collect()
            };

            let reflected = towards(-1.0);
            let reflected_value = eval(&reflected);

            if reflected_value < values[0] {
                let expanded = towards(-2.0);
                let expanded_value = eval(&expanded);
                if expanded_value < reflected_value {
                    simplex[n] = expanded;
                    values[n] = expanded_value;
                } else {
                    simplex[n] = reflected;
                    values[n] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[n - 1] {
                simplex[n] = reflected;
                values[n] = reflected_value;
                continue;
            }

            let (contracted, contracted_value) = if reflected_value < values[n] {
                let outside = towards(-0.5);
                let value = eval(&outside);
                (outside, value)
            } else {
                let inside = towards(0.5);
                let value = eval(&inside);
                (inside, value)
            };

            if contracted_value < values[n].min(reflected_value) {
                simplex[n] = contracted;
                values[n] = contracted_value;
                continue;
            }

            // shrink towards the best vertex
            let best_vertex = simplex[0].clone();
            for i in 1..=n {
                for j in 0..n {
                    simplex[i][j] = best_vertex[j] + 0.5 * (simplex[i][j] - best_vertex[j]);
                }
                values[i] = eval(&simplex[i]);
            }
        }

        sort_simplex(&mut simplex, &mut values);
        Ok(Minimum {
            point: simplex.swap_remove(0),
            value: values[0],
            iterations,
            converged,
        })
    }
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

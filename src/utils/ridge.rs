//! Penalised least-squares regression.
//!
//! Solves `min ||y - X b||² + Σ λ_j b_j²` through the normal equations and a
//! Cholesky decomposition. Each column carries its own penalty `λ_j`, which
//! lets the decomposable model shrink changepoint and seasonal coefficients
//! according to their prior scales while leaving the intercept and slope
//! essentially free.

use crate::error::{ForecastError, Result};

/// Diagonal jitter added to every column for numerical stability.
const JITTER: f64 = 1e-8;

/// Fitted coefficients of a penalised regression.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeResult {
    /// One coefficient per design column.
    pub coefficients: Vec<f64>,
}

impl RidgeResult {
    /// Predict values for the given design columns.
    pub fn predict(&self, columns: &[Vec<f64>]) -> Result<Vec<f64>> {
        if columns.len() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: columns.len(),
            });
        }
        let n = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut predictions = vec![0.0; n];
        for (column, &beta) in columns.iter().zip(&self.coefficients) {
            if column.len() != n {
                return Err(ForecastError::DimensionMismatch {
                    expected: n,
                    got: column.len(),
                });
            }
            for (pred, x) in predictions.iter_mut().zip(column) {
                *pred += beta * x;
            }
        }
        Ok(predictions)
    }
}

/// Fit `y ≈ Σ b_j · columns[j]` with a per-column L2 penalty.
///
/// # Arguments
/// * `columns` - Design matrix in column-major form, each of length `n`
/// * `y` - Target values (length `n`)
/// * `penalties` - One non-negative penalty per column
pub fn ridge_fit(columns: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<RidgeResult> {
    let n = y.len();
    let k = columns.len();

    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if k == 0 {
        return Err(ForecastError::InvalidParameter(
            "design matrix has no columns".into(),
        ));
    }
    if penalties.len() != k {
        return Err(ForecastError::DimensionMismatch {
            expected: k,
            got: penalties.len(),
        });
    }
    for column in columns {
        if column.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: column.len(),
            });
        }
    }
    if penalties.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(ForecastError::InvalidParameter(
            "penalties must be finite and non-negative".into(),
        ));
    }

    // X'X + diag(λ) and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for i in 0..k {
        for j in 0..=i {
            let dot: f64 = columns[i]
                .iter()
                .zip(&columns[j])
                .map(|(a, b)| a * b)
                .sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    for i in 0..k {
        xtx[i][i] += penalties[i] + JITTER;
    }

    let coefficients = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::ComputationError(
            "regression failed: matrix not positive definite".into(),
        )
    })?;

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ForecastError::ComputationError(
            "regression produced non-finite coefficients".into(),
        ));
    }

    Ok(RidgeResult { coefficients })
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

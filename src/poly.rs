//! Polynomial least-squares fitting on standardized coordinates.
//!
//! Local detrending fits a polynomial per box over whatever coordinates that
//! box happens to contain. Raw coordinates can be arbitrarily large (epoch
//! seconds, for example), so the fit standardizes them first: subtract the
//! mean and divide by the standard deviation. The Vandermonde system is then
//! well conditioned and solved by Householder economy QR.

use crate::errors::{DfaError, DfaResult};

/// Column spread below which the design matrix is treated as rank deficient.
const RANK_TOLERANCE: f64 = 1e-12;

/// Solve the least-squares problem min ‖A·x − b‖₂ via Householder QR.
///
/// `a` is a row-major m×n matrix with m ≥ n. Both `a` and `b` are consumed as
/// scratch space.
///
/// # Errors
/// Fails on dimension mismatch, underdetermined systems, or rank deficiency.
pub fn qr_least_squares(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> DfaResult<Vec<f64>> {
    let m = a.len();
    if m == 0 {
        return Err(DfaError::NumericalError {
            reason: "Empty design matrix in QR solve".to_string(),
        });
    }
    let n = a[0].len();
    if n == 0 || a.iter().any(|row| row.len() != n) {
        return Err(DfaError::NumericalError {
            reason: "Ragged or zero-width design matrix in QR solve".to_string(),
        });
    }
    if b.len() != m {
        return Err(DfaError::NumericalError {
            reason: "Matrix-vector dimension mismatch in QR solve".to_string(),
        });
    }
    if n > m {
        return Err(DfaError::NumericalError {
            reason: format!("Underdetermined system in QR solve ({} rows, {} columns)", m, n),
        });
    }

    let mut v = vec![0.0; m];

    for k in 0..n {
        // Householder reflector annihilating column k below the diagonal.
        let mut norm_sq = 0.0;
        for (i, row) in a.iter().enumerate().take(m).skip(k) {
            norm_sq += row[k] * row[k];
            v[i] = row[k];
        }
        let norm = norm_sq.sqrt();
        if norm < RANK_TOLERANCE {
            return Err(DfaError::NumericalError {
                reason: format!("Rank-deficient design matrix at column {}", k),
            });
        }

        let alpha = if a[k][k] >= 0.0 { -norm } else { norm };
        v[k] -= alpha;
        let vtv: f64 = v[k..m].iter().map(|x| x * x).sum();

        a[k][k] = alpha;
        for row in a.iter_mut().take(m).skip(k + 1) {
            row[k] = 0.0;
        }

        if vtv > 0.0 {
            for j in (k + 1)..n {
                let dot: f64 = (k..m).map(|i| v[i] * a[i][j]).sum();
                let c = 2.0 * dot / vtv;
                for (i, row) in a.iter_mut().enumerate().take(m).skip(k) {
                    row[j] -= c * v[i];
                }
            }
            let dot: f64 = (k..m).map(|i| v[i] * b[i]).sum();
            let c = 2.0 * dot / vtv;
            for i in k..m {
                b[i] -= c * v[i];
            }
        }
    }

    // Back substitution on the upper-triangular factor.
    let mut x = vec![0.0; n];
    for j in (0..n).rev() {
        let mut sum = b[j];
        for l in (j + 1)..n {
            sum -= a[j][l] * x[l];
        }
        if a[j][j].abs() < RANK_TOLERANCE {
            return Err(DfaError::NumericalError {
                reason: format!("Singular triangular factor at row {}", j),
            });
        }
        x[j] = sum / a[j][j];
    }

    for &coeff in &x {
        if !coeff.is_finite() {
            return Err(DfaError::NumericalError {
                reason: "Non-finite coefficients from QR solve".to_string(),
            });
        }
    }

    Ok(x)
}

/// A polynomial fit over standardized coordinates.
///
/// Coefficients are in ascending powers of the standardized coordinate
/// `(x − mean) / scale`. Evaluation maps raw coordinates through the same
/// transform, so fitted values land back at the original sample positions.
#[derive(Debug, Clone)]
pub struct PolynomialFit {
    coefficients: Vec<f64>,
    x_mean: f64,
    x_scale: f64,
}

impl PolynomialFit {
    /// Fit a polynomial of degree `order` to (x, y) by least squares.
    ///
    /// # Errors
    /// Fails when fewer than `order + 1` points are given or the design
    /// matrix is rank deficient (coordinates with zero spread at degree ≥ 1).
    pub fn fit(x: &[f64], y: &[f64], order: usize) -> DfaResult<Self> {
        let n = x.len();
        if n != y.len() || n < order + 1 {
            return Err(DfaError::NumericalError {
                reason: format!(
                    "Polynomial fit of order {} needs at least {} paired points, got {}",
                    order,
                    order + 1,
                    n.min(y.len())
                ),
            });
        }

        let x_mean = x.iter().sum::<f64>() / n as f64;
        let variance = x.iter().map(|v| (v - x_mean).powi(2)).sum::<f64>() / n as f64;
        let std = variance.sqrt();
        let x_scale = if std > RANK_TOLERANCE { std } else { 1.0 };

        let mut design = Vec::with_capacity(n);
        for &xi in x {
            let t = (xi - x_mean) / x_scale;
            let mut row = Vec::with_capacity(order + 1);
            let mut power = 1.0;
            for _ in 0..=order {
                row.push(power);
                power *= t;
            }
            design.push(row);
        }

        let coefficients = qr_least_squares(design, y.to_vec())?;

        Ok(Self {
            coefficients,
            x_mean,
            x_scale,
        })
    }

    /// Evaluate the fitted polynomial at a raw coordinate.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.x_mean) / self.x_scale;
        // Horner evaluation over ascending-power coefficients.
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }

    /// Fitted coefficients in ascending powers of the standardized coordinate.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_qr_exact_square_system() {
        // [2 0; 0 3] x = [4, 9] -> x = [2, 3]
        let a = vec![vec![2.0, 0.0], vec![0.0, 3.0]];
        let b = vec![4.0, 9.0];
        let x = qr_least_squares(a, b).unwrap();
        assert_approx_eq!(x[0], 2.0, 1e-12);
        assert_approx_eq!(x[1], 3.0, 1e-12);
    }

    #[test]
    fn test_qr_overdetermined_consistent() {
        // y = 1 + 2x sampled at four points, two columns [1, x].
        let xs = [0.0, 1.0, 2.0, 3.0];
        let a: Vec<Vec<f64>> = xs.iter().map(|&x| vec![1.0, x]).collect();
        let b: Vec<f64> = xs.iter().map(|&x| 1.0 + 2.0 * x).collect();
        let coeffs = qr_least_squares(a, b).unwrap();
        assert_approx_eq!(coeffs[0], 1.0, 1e-10);
        assert_approx_eq!(coeffs[1], 2.0, 1e-10);
    }

    #[test]
    fn test_qr_rejects_rank_deficient() {
        let a = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]];
        let b = vec![1.0, 2.0, 3.0];
        assert!(qr_least_squares(a, b).is_err());
    }

    #[test]
    fn test_fit_recovers_quadratic_at_large_offset() {
        // Quadratic around x = 1e6; an unstandardized Vandermonde would be
        // catastrophically ill conditioned here.
        let x: Vec<f64> = (0..20).map(|i| 1_000_000.0 + i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| {
                let t = xi - 1_000_000.0;
                0.25 * t * t - 3.0 * t + 7.0
            })
            .collect();

        let fit = PolynomialFit::fit(&x, &y, 2).unwrap();
        for (&xi, &yi) in x.iter().zip(&y) {
            assert_approx_eq!(fit.evaluate(xi), yi, 1e-4);
        }
    }

    #[test]
    fn test_fit_order_zero_is_mean() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 4.0, 6.0, 8.0];
        let fit = PolynomialFit::fit(&x, &y, 0).unwrap();
        assert_approx_eq!(fit.evaluate(2.5), 5.0, 1e-10);
    }

    #[test]
    fn test_fit_irregular_coordinates() {
        let x = vec![0.1, 0.7, 1.9, 3.4, 5.2, 8.8];
        let y: Vec<f64> = x.iter().map(|&xi| -1.5 * xi + 0.5).collect();
        let fit = PolynomialFit::fit(&x, &y, 1).unwrap();
        for (&xi, &yi) in x.iter().zip(&y) {
            assert_approx_eq!(fit.evaluate(xi), yi, 1e-9);
        }
    }

    #[test]
    fn test_fit_too_few_points() {
        assert!(PolynomialFit::fit(&[1.0, 2.0], &[1.0, 2.0], 2).is_err());
    }
}

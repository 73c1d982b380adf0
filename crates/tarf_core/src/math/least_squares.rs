//! Polynomial least-squares fitting.
//!
//! Fits low-degree polynomials to scattered (x, y) data by solving the
//! normal equations with a Cholesky decomposition. The pricer uses this
//! to regress simulated payout values against spot levels, so the
//! systems are tiny (3x3 for a quadratic) while the observation count
//! can reach millions.

use thiserror::Error;

/// Errors from polynomial least-squares fitting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeastSquaresError {
    /// Fewer observations than coefficients to determine.
    #[error("Insufficient data for fit: got {got} points, need {need}")]
    InsufficientData {
        /// Number of observations provided
        got: usize,
        /// Minimum number of observations required
        need: usize,
    },

    /// The x and y slices have different lengths.
    #[error("Length mismatch: {xs} x-values vs {ys} y-values")]
    LengthMismatch {
        /// Number of x-values
        xs: usize,
        /// Number of y-values
        ys: usize,
    },

    /// The normal equations are singular (e.g., all x-values coincide).
    #[error("Singular normal equations: observations do not determine the coefficients")]
    SingularSystem,
}

/// Fits a polynomial of the given degree to the data.
///
/// Returns coefficients in ascending power order, so the fitted value at
/// `x` is `c[0] + c[1]*x + ... + c[degree]*x^degree`.
///
/// The normal equations are assembled from power moments rather than an
/// explicit design matrix, keeping the work per observation at
/// `2*degree + 2` multiply-adds.
///
/// # Errors
///
/// * `LeastSquaresError::LengthMismatch` - `xs` and `ys` differ in length
/// * `LeastSquaresError::InsufficientData` - Fewer than `degree + 1` points
/// * `LeastSquaresError::SingularSystem` - Degenerate abscissae (e.g., all equal)
///
/// # Examples
///
/// ```
/// use tarf_core::math::least_squares::fit_polynomial;
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [1.0, 3.0, 5.0, 7.0]; // y = 1 + 2x
///
/// let coeffs = fit_polynomial(&xs, &ys, 1).unwrap();
/// assert!((coeffs[0] - 1.0).abs() < 1e-10);
/// assert!((coeffs[1] - 2.0).abs() < 1e-10);
/// ```
pub fn fit_polynomial(
    xs: &[f64],
    ys: &[f64],
    degree: usize,
) -> Result<Vec<f64>, LeastSquaresError> {
    if xs.len() != ys.len() {
        return Err(LeastSquaresError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    let n_coeffs = degree + 1;
    if xs.len() < n_coeffs {
        return Err(LeastSquaresError::InsufficientData {
            got: xs.len(),
            need: n_coeffs,
        });
    }

    // Power moments: moments[k] = sum(x^k) for k = 0..=2*degree,
    // rhs[i] = sum(x^i * y) for i = 0..=degree.
    let mut moments = vec![0.0; 2 * degree + 1];
    let mut rhs = vec![0.0; n_coeffs];
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let mut xp = 1.0;
        for (k, m) in moments.iter_mut().enumerate() {
            *m += xp;
            if k < n_coeffs {
                rhs[k] += xp * y;
            }
            xp *= x;
        }
    }

    let mut normal = vec![vec![0.0; n_coeffs]; n_coeffs];
    for (i, row) in normal.iter_mut().enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            *entry = moments[i + j];
        }
    }

    solve_cholesky(&normal, &rhs).ok_or(LeastSquaresError::SingularSystem)
}

/// Fits a quadratic `c[0] + c[1]*x + c[2]*x^2` to the data.
///
/// Convenience wrapper around [`fit_polynomial`] with `degree = 2`.
///
/// # Examples
///
/// ```
/// use tarf_core::math::least_squares::fit_quadratic;
///
/// let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let ys: Vec<f64> = xs.iter().map(|&x| 2.0 * x * x - 3.0 * x + 1.0).collect();
///
/// let [c0, c1, c2] = fit_quadratic(&xs, &ys).unwrap();
/// assert!((c0 - 1.0).abs() < 1e-9);
/// assert!((c1 + 3.0).abs() < 1e-9);
/// assert!((c2 - 2.0).abs() < 1e-9);
/// ```
pub fn fit_quadratic(xs: &[f64], ys: &[f64]) -> Result<[f64; 3], LeastSquaresError> {
    let coeffs = fit_polynomial(xs, ys, 2)?;
    Ok([coeffs[0], coeffs[1], coeffs[2]])
}

/// Solve Ax = b for symmetric positive definite A via Cholesky
/// decomposition. Returns None when A is not positive definite.
fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Decomposition: A = L L^T
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None; // Not positive definite
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < 1e-30 {
                    return None;
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Solve L y = b (forward substitution)
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        if l[i][i].abs() < 1e-30 {
            return None;
        }
        y[i] = sum / l[i][i];
    }

    // Solve L^T x = y (backward substitution)
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        if l[i][i].abs() < 1e-30 {
            return None;
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

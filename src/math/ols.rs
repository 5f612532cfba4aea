//! Ordinary least squares solver with coefficient diagnostics.
//!
//! The segmented fitter solves many small regression problems (2–3 columns,
//! tens of rows) and needs more than the coefficient vector: the SegmentFit
//! row records standard errors, R², and the sample count.
//!
//! Implementation choices:
//! - SVD solve, robust even when the design matrix is tall. We try
//!   progressively looser tolerances so nearly-collinear designs (e.g. an
//!   almost-constant dark fraction) still produce a usable solution.
//! - Standard errors come from `s² · (XᵀX)⁻¹` with the pseudo-inverse, so a
//!   rank-deficient normal matrix yields finite (zeroed) errors instead of a
//!   panic.

use nalgebra::{DMatrix, DVector};

/// A solved least-squares problem with per-coefficient diagnostics.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: Vec<f64>,
    pub stderr: Vec<f64>,
    pub r_squared: f64,
    pub n: usize,
}

/// Solve `min ‖y − Xβ‖²` and compute standard errors and R².
///
/// Returns `None` if the system is too ill-conditioned to solve robustly;
/// the caller maps that to a `DegenerateFit` error before any fallback logic
/// inspects coefficients.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let n = x.nrows();
    let p = x.ncols();
    if n == 0 || p == 0 || y.len() != n {
        return None;
    }

    let svd = x.clone().svd(true, true);

    let mut beta = None;
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(b) = svd.solve(y, tol) {
            if b.iter().all(|v| v.is_finite()) {
                beta = Some(b);
                break;
            }
        }
    }
    let beta = beta?;

    let residuals = y - x * &beta;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    if !sse.is_finite() {
        return None;
    }

    // Residual variance; zero when the fit is saturated.
    let dof = n.saturating_sub(p);
    let s2 = if dof > 0 { sse / dof as f64 } else { 0.0 };

    let xtx = x.transpose() * x;
    let stderr = match xtx.pseudo_inverse(1e-12) {
        Ok(inv) => (0..p)
            .map(|j| {
                let v = s2 * inv[(j, j)];
                if v.is_finite() && v > 0.0 { v.sqrt() } else { 0.0 }
            })
            .collect(),
        Err(_) => vec![0.0; p],
    };

    let mean_y = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|v| (v - mean_y) * (v - mean_y)).sum();
    let r_squared = if sst > 0.0 {
        (1.0 - sse / sst).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(OlsFit {
        beta: beta.iter().copied().collect(),
        stderr,
        r_squared,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_simple_line() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[0.0, 1.0, 1.0, 1.0, 2.0, 1.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.beta[0] - 3.0).abs() < 1e-10);
        assert!((fit.beta[1] - 2.0).abs() < 1e-10);
        assert!(fit.r_squared > 0.999999);
        assert_eq!(fit.n, 3);
    }

    #[test]
    fn exact_fit_has_zero_stderr() {
        let x = DMatrix::from_row_slice(4, 2, &[0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 3.0, 5.0, 7.0]);
        let fit = fit_ols(&x, &y).unwrap();
        assert!(fit.stderr[0].abs() < 1e-9);
        assert!(fit.stderr[1].abs() < 1e-9);
    }

    #[test]
    fn noisy_fit_has_positive_stderr() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.1, 1.9, 4.2, 5.8, 8.1, 9.9];
        let rows: Vec<f64> = xs.iter().flat_map(|&x| [x, 1.0]).collect();
        let x = DMatrix::from_row_slice(6, 2, &rows);
        let y = DVector::from_row_slice(&ys);
        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.beta[0] - 2.0).abs() < 0.1);
        assert!(fit.stderr[0] > 0.0);
        assert!(fit.r_squared > 0.99);
    }

    #[test]
    fn intercept_only_model_returns_mean() {
        let x = DMatrix::from_element(5, 1, 1.0);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.beta[0] - 3.0).abs() < 1e-12);
        // Intercept-only explains none of the variance.
        assert!(fit.r_squared.abs() < 1e-12);
    }

    #[test]
    fn rejects_empty_input() {
        let x = DMatrix::<f64>::zeros(0, 2);
        let y = DVector::<f64>::zeros(0);
        assert!(fit_ols(&x, &y).is_none());
    }
}

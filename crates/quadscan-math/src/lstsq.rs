// ─────────────────────────────────────────────────────────────────────
// Quadscan — Weighted Least Squares
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Weighted polynomial least squares with parameter covariance.
//!
//! Residuals are `(y_i - p(x_i)) / sigma_i`. The covariance is relative:
//! `(AᵀA)⁻¹` scaled by χ²/dof, so only the relative size of the sigmas
//! matters. A fit with as many points as parameters has no residual
//! information and reports an infinite covariance.

use ndarray::{Array1, Array2};
use quadscan_types::error::{QuadscanError, QuadscanResult};

use crate::linalg::{
    back_substitute, householder_qr_in_place, is_rank_deficient, upper_triangular_inverse,
};

/// Polynomial fit result.
#[derive(Debug, Clone)]
pub struct PolyFit {
    /// Coefficients, highest power first.
    pub coefficients: Array1<f64>,
    /// Parameter covariance, same ordering as `coefficients`.
    pub covariance: Array2<f64>,
    /// Weighted residual sum of squares.
    pub chi2: f64,
    /// Degrees of freedom, n - (degree + 1).
    pub dof: usize,
}

impl PolyFit {
    /// Standard errors: sqrt of the covariance diagonal.
    pub fn std_errors(&self) -> Array1<f64> {
        self.covariance.diag().mapv(|v| v.max(0.0).sqrt())
    }

    /// χ²/dof, infinite when dof is zero.
    pub fn reduced_chi2(&self) -> f64 {
        if self.dof == 0 {
            f64::INFINITY
        } else {
            self.chi2 / self.dof as f64
        }
    }

    /// Evaluate the polynomial at `x` (Horner).
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Fit `y ≈ Σ c_j x^(degree-j)` with per-point standard deviations `sigma`.
pub fn weighted_polyfit(
    x: &[f64],
    y: &[f64],
    sigma: &[f64],
    degree: usize,
) -> QuadscanResult<PolyFit> {
    let n = x.len();
    let p = degree + 1;

    if y.len() != n || sigma.len() != n {
        return Err(QuadscanError::InvalidFitData(format!(
            "length mismatch: x={}, y={}, sigma={}",
            n,
            y.len(),
            sigma.len()
        )));
    }
    if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return Err(QuadscanError::InvalidFitData(
            "fit received non-finite x or y values".to_string(),
        ));
    }
    if let Some(bad) = sigma.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        return Err(QuadscanError::InvalidFitData(format!(
            "sigma must be finite and > 0, got {bad}"
        )));
    }
    let distinct = count_distinct(x);
    if distinct < p {
        return Err(QuadscanError::InvalidFitData(format!(
            "degree-{degree} fit needs at least {p} distinct abscissae, got {distinct}"
        )));
    }

    // Weighted Vandermonde rows, constant column last.
    let mut a = Array2::zeros((n, p));
    let mut b = Array1::zeros(n);
    for i in 0..n {
        let mut power = 1.0;
        for j in (0..p).rev() {
            a[[i, j]] = power / sigma[i];
            power *= x[i];
        }
        b[i] = y[i] / sigma[i];
    }

    householder_qr_in_place(&mut a, &mut b)?;
    if is_rank_deficient(&a) {
        return Err(QuadscanError::LinAlg(
            "polynomial design matrix is rank deficient".to_string(),
        ));
    }
    let coefficients = back_substitute(&a, &b)?;

    let r_inv = upper_triangular_inverse(&a)?;
    let mut covariance = r_inv.dot(&r_inv.t());

    let chi2 = (0..n)
        .map(|i| {
            let fitted = coefficients.iter().fold(0.0, |acc, c| acc * x[i] + c);
            let r = (y[i] - fitted) / sigma[i];
            r * r
        })
        .sum::<f64>();
    let dof = n - p;
    if dof > 0 {
        covariance *= chi2 / dof as f64;
    } else {
        covariance.fill(f64::INFINITY);
    }

    if !coefficients.iter().all(|v| v.is_finite()) {
        return Err(QuadscanError::LinAlg(
            "polynomial coefficients contain non-finite values".to_string(),
        ));
    }

    Ok(PolyFit {
        coefficients,
        covariance,
        chi2,
        dof,
    })
}

fn count_distinct(x: &[f64]) -> usize {
    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();
    sorted.len()
}

//! Parabola coefficients to beam second moments.
//!
//! Inverts the thin-lens response
//! `σ²(k) = a·k² + b·k + c` with `a = d²l²·x0`,
//! `b = 2dl·x0 + 2d²l·x0p0`, `c = x0 + 2d·x0p0 + d²·p0`.
//! Uncertainties combine the partial derivatives with respect to
//! (a, b, c, d) in quadrature; the magnet length is taken as exact.

use quadscan_types::config::BeamlineConfig;
use quadscan_types::scan::{ParabolaFit, SecondMoments};

/// Second moments and their uncertainties from a parabola fit.
pub fn second_moments(fit: &ParabolaFit, config: &BeamlineConfig) -> SecondMoments {
    let (a, b, c) = (fit.a, fit.b, fit.c);
    let (da, db, dc) = (fit.da, fit.db, fit.dc);
    let d = config.drift_length;
    let l = config.magnet_length;
    let dd = config.drift_uncertainty;

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let l2 = l * l;

    let x0 = a / (d2 * l2);
    let x0p0 = b / (2.0 * d2 * l) - a / (d3 * l2);
    let p0 = c / d2 - b / (d3 * l) + a / (d4 * l2);

    // ∂x0/∂a, ∂x0/∂d
    let d_x0 = quadrature(&[term(1.0 / (d2 * l2), da), term(-2.0 * a / (d3 * l2), dd)]);

    // ∂x0p0/∂a, ∂x0p0/∂b, ∂x0p0/∂d
    let d_x0p0 = quadrature(&[
        term(-1.0 / (d3 * l2), da),
        term(1.0 / (2.0 * d2 * l), db),
        term(-b / (d3 * l) + 3.0 * a / (d4 * l2), dd),
    ]);

    // ∂p0/∂a, ∂p0/∂b, ∂p0/∂c, ∂p0/∂d
    let d_p0 = quadrature(&[
        term(1.0 / (d4 * l2), da),
        term(-1.0 / (d3 * l), db),
        term(1.0 / d2, dc),
        term(-2.0 * c / d3 + 3.0 * b / (d4 * l) - 4.0 * a / (d5 * l2), dd),
    ]);

    SecondMoments {
        x0,
        p0,
        x0p0,
        d_x0,
        d_p0,
        d_x0p0,
    }
}

/// One propagated contribution `∂f/∂q · σq`; a vanishing partial
/// contributes nothing even when `σq` is infinite.
pub(crate) fn term(partial: f64, sigma: f64) -> f64 {
    if partial == 0.0 {
        0.0
    } else {
        partial * sigma
    }
}

/// `sqrt(Σ termᵢ²)`. Infinite terms give an infinite total, never NaN.
pub(crate) fn quadrature(terms: &[f64]) -> f64 {
    if terms.iter().any(|t| t.is_infinite()) {
        return f64::INFINITY;
    }
    terms.iter().map(|t| t * t).sum::<f64>().sqrt()
}

// ─────────────────────────────────────────────────────────────────────
// Quadscan — Emittance
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! RMS emittance from second moments, its uncertainty, and normalization.
//!
//! A beam matrix with `x0·p0 <= x0p0²` is not positive definite; the
//! emittance is then reported as exactly zero together with a zero error.

use quadscan_types::constants::ELECTRON_REST_ENERGY_MEV;
use quadscan_types::error::QuadscanResult;

use crate::kinematics::{beta_vc, gamma_factor, momentum_mev};
use crate::moments::{quadrature, term};

/// `sqrt(x0·p0 - x0p0²)`, clamped to 0 when the radicand is not positive.
pub fn emittance(x0: f64, p0: f64, x0p0: f64) -> f64 {
    let radicand = x0 * p0 - x0p0 * x0p0;
    if radicand > 0.0 {
        radicand.sqrt()
    } else {
        0.0
    }
}

/// Uncertainty of [`emittance`] from moment uncertainties.
///
/// Partials `p0/2ε`, `x0/2ε`, `x0p0/ε`, combined in quadrature. Zero
/// whenever the emittance clamps to zero.
pub fn emit_error(x0: f64, p0: f64, x0p0: f64, d_x0: f64, d_p0: f64, d_x0p0: f64) -> f64 {
    let e = emittance(x0, p0, x0p0);
    if e == 0.0 {
        return 0.0;
    }
    let dx = p0 / 2.0 / e;
    let dp = x0 / 2.0 / e;
    let dxp = x0p0 / e;
    quadrature(&[term(dx, d_x0), term(dp, d_p0), term(dxp, d_x0p0)])
}

/// Uncertainty of ε² = x0·p0 - x0p0².
pub fn emit2_error(x0: f64, p0: f64, x0p0: f64, d_x0: f64, d_p0: f64, d_x0p0: f64) -> f64 {
    quadrature(&[term(p0, d_x0), term(x0, d_p0), term(2.0 * x0p0, d_x0p0)])
}

/// Normalized emittance `ε·Pc/E0`.
pub fn norm_floet(emit: f64, energy_mev: f64) -> QuadscanResult<f64> {
    Ok(emit * momentum_mev(energy_mev)? / ELECTRON_REST_ENERGY_MEV)
}

/// Normalized emittance `ε·β·γ`.
pub fn norm_emit(emit: f64, energy_mev: f64) -> QuadscanResult<f64> {
    let gamma = gamma_factor(energy_mev)?;
    let beta = beta_vc(gamma)?;
    Ok(emit * beta * gamma)
}

// ─────────────────────────────────────────────────────────────────────
// Quadscan — Beam Transport Response
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Beam size² at the screen behind a quadrupole and a drift.
//!
//! Both models propagate the beam matrix
//! `Σ = [[x0, x0p0], [x0p0, p0]]` through `M = Drift(d)·Quad(k, l)` and
//! return `(M Σ Mᵀ)₁₁ = A²·x0 + 2AB·x0p0 + B²·p0`.
//!
//! - Thick lens: `A = cos(Kl) - K·d·sin(Kl)`, `B = sin(Kl)/K + d·cos(Kl)`,
//!   `K = sqrt(|k|)`.
//! - Thin lens: `A = 1 + d·k·l`, `B = d`. This is the model the parabola
//!   inversion assumes.

use quadscan_types::config::BeamlineConfig;
use quadscan_types::error::{QuadscanError, QuadscanResult};
use quadscan_types::scan::{EmittanceResult, ScanData, SecondMoments};
use serde::Serialize;

use crate::magnet::magnet_strength;

/// Transfer matrix first row (A, B) for a thick quadrupole then a drift.
/// `None` at zero strength, where `B` is undefined.
pub fn thick_lens_row(strength: f64, config: &BeamlineConfig) -> Option<(f64, f64)> {
    let k = strength.abs().sqrt();
    if k == 0.0 {
        return None;
    }
    let l = config.magnet_length;
    let d = config.drift_length;
    let c = (k * l).cos();
    let s = (k * l).sin();
    Some((c - k * d * s, s / k + d * c))
}

/// Transfer matrix first row (A, B) in the thin-lens approximation.
pub fn thin_lens_row(strength: f64, config: &BeamlineConfig) -> (f64, f64) {
    let d = config.drift_length;
    (1.0 + d * strength * config.magnet_length, d)
}

fn propagate(row: (f64, f64), moments: &SecondMoments) -> f64 {
    let (a, b) = row;
    a * a * moments.x0 + 2.0 * a * b * moments.x0p0 + b * b * moments.p0
}

/// Thick-lens beam size² at quadrupole current `current`.
pub fn full_function(
    current: f64,
    energy_mev: f64,
    moments: &SecondMoments,
    config: &BeamlineConfig,
) -> QuadscanResult<f64> {
    let strength = magnet_strength(current, energy_mev, &config.calibration)?;
    let row = thick_lens_row(strength, config).ok_or(QuadscanError::ZeroStrength { current })?;
    Ok(propagate(row, moments))
}

/// Thin-lens beam size² at focusing strength `strength`.
pub fn thin_lens_function(strength: f64, moments: &SecondMoments, config: &BeamlineConfig) -> f64 {
    propagate(thin_lens_row(strength, config), moments)
}

/// One row of the measured-vs-model comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub current: f64,
    pub strength: f64,
    /// Measured width² [mm²].
    pub measured: f64,
    /// Uncertainty of width², 2·w·σw [mm²].
    pub measured_error: f64,
    /// Fitted parabola at `strength`.
    pub fitted: f64,
    pub thin_lens: f64,
    pub thick_lens: f64,
}

/// Measured points next to the fitted parabola and both transport models
/// evaluated with the derived second moments.
pub fn overlay(
    scan: &ScanData,
    result: &EmittanceResult,
    config: &BeamlineConfig,
) -> QuadscanResult<Vec<OverlayPoint>> {
    scan.currents
        .iter()
        .zip(scan.widths.iter())
        .zip(scan.width_stds.iter())
        .map(|((&current, &width), &std)| {
            let strength = magnet_strength(current, result.energy_mev, &config.calibration)?;
            Ok(OverlayPoint {
                current,
                strength,
                measured: width * width,
                measured_error: 2.0 * width * std,
                fitted: result.fit.eval(strength),
                thin_lens: thin_lens_function(strength, &result.moments, config),
                thick_lens: full_function(current, result.energy_mev, &result.moments, config)?,
            })
        })
        .collect()
}

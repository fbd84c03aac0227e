// ─────────────────────────────────────────────────────────────────────
// Quadscan — Quadrupole Calibration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Excitation current to focusing strength.

use quadscan_types::config::MagnetCalibration;
use quadscan_types::constants::{Q_ELECTRON, SPEED_OF_LIGHT};
use quadscan_types::error::QuadscanResult;

use crate::kinematics::{momentum_mev, validate_energy};

/// Focusing strength k [1/m²] at current `current` [A].
///
/// `k = e·g / p` with `g = slope·I + intercept` [T/m] and `p` the SI beam
/// momentum at `energy_mev`.
pub fn magnet_strength(
    current: f64,
    energy_mev: f64,
    calibration: &MagnetCalibration,
) -> QuadscanResult<f64> {
    validate_energy(energy_mev)?;
    let momentum_si = momentum_mev(energy_mev)? * 1.0e6 * Q_ELECTRON / SPEED_OF_LIGHT;
    let gradient = calibration.gradient(current);
    Ok(Q_ELECTRON * gradient / momentum_si)
}

/// Strengths for a whole scan, in scan order.
pub fn magnet_strengths(
    currents: &[f64],
    energy_mev: f64,
    calibration: &MagnetCalibration,
) -> QuadscanResult<Vec<f64>> {
    currents
        .iter()
        .map(|&i| magnet_strength(i, energy_mev, calibration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_matches_rigidity_formula() {
        // k = g / (Bρ), Bρ [T·m] = Pc [GeV] / 0.299792458
        let cal = MagnetCalibration::default();
        let pc_gev = momentum_mev(5.81).unwrap() / 1000.0;
        let b_rho = pc_gev / 0.299_792_458;
        let expected = cal.gradient(1.0) / b_rho;
        let k = magnet_strength(1.0, 5.81, &cal).unwrap();
        assert!((k - expected).abs() < 1e-9 * expected.abs());
    }

    #[test]
    fn test_demo_strength_value() {
        let k = magnet_strength(1.0, 5.81, &MagnetCalibration::default()).unwrap();
        assert!((k + 5.348_219_272).abs() < 1e-8, "k = {k}");
    }

    #[test]
    fn test_strength_scales_inversely_with_momentum() {
        let cal = MagnetCalibration::default();
        let k_low = magnet_strength(2.0, 5.0, &cal).unwrap();
        let k_high = magnet_strength(2.0, 50.0, &cal).unwrap();
        assert!(k_low.abs() > k_high.abs());
        let ratio = k_low / k_high;
        let expected = momentum_mev(50.0).unwrap() / momentum_mev(5.0).unwrap();
        assert!((ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_energy_rejected() {
        let cal = MagnetCalibration::default();
        assert!(magnet_strength(1.0, 0.2, &cal).is_err());
        assert!(magnet_strengths(&[1.0, 2.0], f64::INFINITY, &cal).is_err());
    }
}

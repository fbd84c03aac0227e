// ─────────────────────────────────────────────────────────────────────
// Quadscan — Relativistic Kinematics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electron energy/momentum conversions in MeV.
//!
//! `momentum_mev` and `energy_mev` are exact inverses on their domains:
//! `momentum_mev(E) = sqrt(E² + E0²)`, `energy_mev(Pc) = sqrt(Pc² - E0²)`.

use quadscan_types::constants::ELECTRON_REST_ENERGY_MEV as E0;
use quadscan_types::error::{QuadscanError, QuadscanResult};

/// Reject non-finite or sub-rest-mass beam energies.
pub fn validate_energy(energy_mev: f64) -> QuadscanResult<()> {
    if !energy_mev.is_finite() || energy_mev <= E0 {
        return Err(QuadscanError::InvalidEnergy(format!(
            "beam energy must be finite and above the electron rest energy {E0} MeV, got {energy_mev}"
        )));
    }
    Ok(())
}

/// Pc [MeV] for beam energy `energy_mev`.
pub fn momentum_mev(energy_mev: f64) -> QuadscanResult<f64> {
    if !energy_mev.is_finite() {
        return Err(QuadscanError::InvalidEnergy(format!(
            "energy must be finite, got {energy_mev}"
        )));
    }
    Ok((energy_mev * energy_mev + E0 * E0).sqrt())
}

/// Beam energy [MeV] for momentum `pc_mev`; fails below the rest energy.
pub fn energy_mev(pc_mev: f64) -> QuadscanResult<f64> {
    let radicand = pc_mev * pc_mev - E0 * E0;
    if !radicand.is_finite() || radicand < 0.0 {
        return Err(QuadscanError::InvalidEnergy(format!(
            "|Pc| = {pc_mev} MeV is below the electron rest energy {E0} MeV"
        )));
    }
    Ok(radicand.sqrt())
}

/// Lorentz factor γ = E / E0.
pub fn gamma_factor(energy_mev: f64) -> QuadscanResult<f64> {
    validate_energy(energy_mev)?;
    Ok(energy_mev / E0)
}

/// Velocity ratio β = v/c = sqrt(1 - 1/γ²).
pub fn beta_vc(gamma: f64) -> QuadscanResult<f64> {
    if !gamma.is_finite() || gamma < 1.0 {
        return Err(QuadscanError::InvalidEnergy(format!(
            "gamma must be finite and >= 1, got {gamma}"
        )));
    }
    let ga = gamma * gamma;
    Ok(((ga - 1.0) / ga).sqrt())
}

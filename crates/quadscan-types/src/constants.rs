// ─────────────────────────────────────────────────────────────────────
// Quadscan — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants (CODATA 2018, exact SI where defined).
//!
//! This is the only place the electron rest energy lives. Normalization and
//! kinematics both read [`ELECTRON_REST_ENERGY_MEV`].

/// Elementary charge (C), exact.
pub const Q_ELECTRON: f64 = 1.602176634e-19;

/// Speed of light in vacuum (m/s), exact.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Electron mass (kg).
pub const M_ELECTRON: f64 = 9.1093837015e-31;

/// Electron rest energy E0 = m_e c² / e, in MeV.
///
/// Evaluates to 0.51099894999616 MeV. The hand-written 0.510998950 MeV
/// differs by 7.5e-15 relative, below anything a quadrupole scan resolves.
pub const ELECTRON_REST_ENERGY_MEV: f64 =
    M_ELECTRON * SPEED_OF_LIGHT * SPEED_OF_LIGHT / Q_ELECTRON / 1.0e6;

// ─────────────────────────────────────────────────────────────────────
// Quadscan — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{QuadscanError, QuadscanResult};

/// Beamline geometry and quadrupole calibration for one scan station.
///
/// Every field has a default, so `{}` is a valid config file and a partial
/// file overrides only what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamlineConfig {
    /// Quadrupole-to-screen drift length d [m] (default: 1.4095)
    #[serde(default = "default_drift_length")]
    pub drift_length: f64,
    /// Effective quadrupole length l [m] (default: 0.08)
    #[serde(default = "default_magnet_length")]
    pub magnet_length: f64,
    /// Assumed uncertainty on d [m] (default: 0.001)
    #[serde(default = "default_drift_uncertainty")]
    pub drift_uncertainty: f64,
    /// Beam energy used when none is given [MeV] (default: 5.81)
    #[serde(default = "default_energy")]
    pub default_energy_mev: f64,
    #[serde(default)]
    pub calibration: MagnetCalibration,
}

/// Linear excitation curve g = slope·I + intercept of the scanned quadrupole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnetCalibration {
    /// Gradient per ampere [T/(m·A)] (default: -0.101392)
    #[serde(default = "default_slope")]
    pub slope: f64,
    /// Gradient at zero current [T/m] (default: -0.002657)
    #[serde(default = "default_intercept")]
    pub intercept: f64,
}

fn default_drift_length() -> f64 {
    1.4095
}
fn default_magnet_length() -> f64 {
    0.08
}
fn default_drift_uncertainty() -> f64 {
    0.001
}
fn default_energy() -> f64 {
    5.81
}
fn default_slope() -> f64 {
    -0.101392
}
fn default_intercept() -> f64 {
    -0.002657
}

impl Default for MagnetCalibration {
    fn default() -> Self {
        MagnetCalibration {
            slope: default_slope(),
            intercept: default_intercept(),
        }
    }
}

impl Default for BeamlineConfig {
    fn default() -> Self {
        BeamlineConfig {
            drift_length: default_drift_length(),
            magnet_length: default_magnet_length(),
            drift_uncertainty: default_drift_uncertainty(),
            default_energy_mev: default_energy(),
            calibration: MagnetCalibration::default(),
        }
    }
}

impl MagnetCalibration {
    /// Field gradient [T/m] at excitation current `current` [A].
    pub fn gradient(&self, current: f64) -> f64 {
        self.slope * current + self.intercept
    }
}

impl BeamlineConfig {
    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> QuadscanResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON string and validate.
    pub fn from_json(json: &str) -> QuadscanResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate geometry and calibration parameters.
    pub fn validate(&self) -> QuadscanResult<()> {
        if !(self.drift_length.is_finite() && self.drift_length > 0.0) {
            return Err(QuadscanError::ConfigError(format!(
                "drift_length must be finite and > 0, got {}",
                self.drift_length
            )));
        }
        if !(self.magnet_length.is_finite() && self.magnet_length > 0.0) {
            return Err(QuadscanError::ConfigError(format!(
                "magnet_length must be finite and > 0, got {}",
                self.magnet_length
            )));
        }
        if !(self.drift_uncertainty.is_finite() && self.drift_uncertainty >= 0.0) {
            return Err(QuadscanError::ConfigError(format!(
                "drift_uncertainty must be finite and >= 0, got {}",
                self.drift_uncertainty
            )));
        }
        if !self.default_energy_mev.is_finite() {
            return Err(QuadscanError::ConfigError(format!(
                "default_energy_mev must be finite, got {}",
                self.default_energy_mev
            )));
        }
        if !(self.calibration.slope.is_finite() && self.calibration.intercept.is_finite()) {
            return Err(QuadscanError::ConfigError(
                "calibration slope and intercept must be finite".to_string(),
            ));
        }
        if self.calibration.slope == 0.0 {
            return Err(QuadscanError::ConfigError(
                "calibration slope must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

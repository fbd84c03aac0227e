// ─────────────────────────────────────────────────────────────────────
// Quadscan — Scan Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array1;
use serde::Serialize;

use crate::error::{QuadscanError, QuadscanResult};

/// Demo scan used when the caller supplies too little data.
pub const DEMO_ENERGY_MEV: f64 = 5.81;
pub const DEMO_CURRENTS: [f64; 3] = [0.9, 1.0, 1.1];
pub const DEMO_WIDTHS: [f64; 3] = [0.51, 0.52, 0.53];
pub const DEMO_WIDTH_STDS: [f64; 3] = [0.12, 0.13, 0.14];

/// One quadrupole scan: current [A], beam width [mm] and width std [mm]
/// per setting, in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanData {
    pub currents: Array1<f64>,
    pub widths: Array1<f64>,
    pub width_stds: Array1<f64>,
}

impl ScanData {
    /// Build a scan from three equal-length columns.
    pub fn new(currents: Vec<f64>, widths: Vec<f64>, width_stds: Vec<f64>) -> QuadscanResult<Self> {
        if currents.len() != widths.len() || currents.len() != width_stds.len() {
            return Err(QuadscanError::InvalidFitData(format!(
                "scan columns differ in length: currents={}, widths={}, stds={}",
                currents.len(),
                widths.len(),
                width_stds.len()
            )));
        }
        let all_finite = currents
            .iter()
            .chain(widths.iter())
            .chain(width_stds.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(QuadscanError::InvalidFitData(
                "scan contains non-finite values".to_string(),
            ));
        }
        Ok(ScanData {
            currents: Array1::from_vec(currents),
            widths: Array1::from_vec(widths),
            width_stds: Array1::from_vec(width_stds),
        })
    }

    /// The built-in three-point demo scan.
    pub fn demo() -> Self {
        ScanData {
            currents: Array1::from_vec(DEMO_CURRENTS.to_vec()),
            widths: Array1::from_vec(DEMO_WIDTHS.to_vec()),
            width_stds: Array1::from_vec(DEMO_WIDTH_STDS.to_vec()),
        }
    }

    pub fn len(&self) -> usize {
        self.currents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currents.is_empty()
    }

    /// Parse a measurement listing: one `current width std` triple per line,
    /// optionally wrapped in `[` `]`. Lines without exactly three fields are
    /// skipped; a three-field line that fails to parse is an error.
    pub fn from_measurement_str(text: &str) -> QuadscanResult<Self> {
        let mut currents = Vec::new();
        let mut widths = Vec::new();
        let mut stds = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let cleaned = raw.replace(['[', ']'], " ");
            let fields: Vec<&str> = cleaned.split_whitespace().collect();
            if fields.len() != 3 {
                continue;
            }
            let mut parsed = [0.0; 3];
            for (slot, field) in parsed.iter_mut().zip(&fields) {
                *slot = field.parse::<f64>().map_err(|e| QuadscanError::Parse {
                    line: idx + 1,
                    message: format!("'{field}': {e}"),
                })?;
            }
            currents.push(parsed[0]);
            widths.push(parsed[1]);
            stds.push(parsed[2]);
        }

        Self::new(currents, widths, stds)
    }

    /// Read a measurement listing from disk.
    pub fn from_measurement_file(path: &str) -> QuadscanResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_measurement_str(&contents)
    }

    /// Pack as positional arguments: energy, then all currents, all widths,
    /// all stds.
    pub fn to_positional(&self, energy_mev: f64) -> Vec<f64> {
        let mut out = Vec::with_capacity(1 + 3 * self.len());
        out.push(energy_mev);
        out.extend(self.currents.iter());
        out.extend(self.widths.iter());
        out.extend(self.width_stds.iter());
        out
    }
}

/// Weighted parabola fit y = a·k² + b·k + c with standard errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParabolaFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub da: f64,
    pub db: f64,
    pub dc: f64,
    /// χ² / dof; infinite when the fit has no degrees of freedom.
    pub reduced_chi2: f64,
    pub dof: usize,
}

impl ParabolaFit {
    pub fn eval(&self, k: f64) -> f64 {
        self.a * k * k + self.b * k + self.c
    }
}

/// Beam second moments at the quadrupole and their uncertainties.
/// Units follow the fit: mm² for x0, mm²/m² for p0, mm²/m for x0p0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SecondMoments {
    pub x0: f64,
    pub p0: f64,
    pub x0p0: f64,
    pub d_x0: f64,
    pub d_p0: f64,
    pub d_x0p0: f64,
}

/// Final scan result. Emittances are in mm·mrad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittanceResult {
    pub energy_mev: f64,
    pub emittance: f64,
    pub emittance_error: f64,
    /// Uncertainty of emittance², finite even when the emittance clamps.
    pub emittance_squared_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<NormalizedEmittance>,
    pub moments: SecondMoments,
    pub fit: ParabolaFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedEmittance {
    pub emittance: f64,
    pub error: f64,
}

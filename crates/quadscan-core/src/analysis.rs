// ─────────────────────────────────────────────────────────────────────
// Quadscan — Scan Analysis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Quadrupole scan to emittance.
//!
//! currents → strengths → weighted fit of width² vs. k → second moments →
//! emittance. Widths in mm and lengths in m give moments whose determinant
//! root is directly in mm·mrad.

use quadscan_math::lstsq::weighted_polyfit;
use quadscan_types::config::BeamlineConfig;
use quadscan_types::error::{QuadscanError, QuadscanResult};
use quadscan_types::scan::{EmittanceResult, NormalizedEmittance, ParabolaFit, ScanData};
use tracing::{debug, warn};

use crate::emittance::{emit2_error, emit_error, emittance, norm_floet};
use crate::magnet::magnet_strengths;
use crate::moments::second_moments;

/// Minimum number of scan points for a parabola fit.
pub const MIN_SCAN_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitOptions {
    /// Also report the normalized emittance.
    pub normalize: bool,
}

/// Weighted parabola fit of width² against focusing strength.
///
/// Each point is weighted by `1 / (2·w·σw)`, the uncertainty of w².
pub fn fit_parabola(strengths: &[f64], scan: &ScanData) -> QuadscanResult<ParabolaFit> {
    if strengths.len() != scan.len() {
        return Err(QuadscanError::InvalidFitData(format!(
            "{} strengths for {} scan points",
            strengths.len(),
            scan.len()
        )));
    }
    let y: Vec<f64> = scan.widths.iter().map(|w| w * w).collect();
    let sigma: Vec<f64> = scan
        .widths
        .iter()
        .zip(scan.width_stds.iter())
        .map(|(w, s)| 2.0 * w * s)
        .collect();

    let poly = weighted_polyfit(strengths, &y, &sigma, 2)?;
    let err = poly.std_errors();
    Ok(ParabolaFit {
        a: poly.coefficients[0],
        b: poly.coefficients[1],
        c: poly.coefficients[2],
        da: err[0],
        db: err[1],
        dc: err[2],
        reduced_chi2: poly.reduced_chi2(),
        dof: poly.dof,
    })
}

/// Emittance and uncertainty [mm·mrad] of one quadrupole scan at
/// `energy_mev`.
pub fn fit_emittance(
    scan: &ScanData,
    energy_mev: f64,
    config: &BeamlineConfig,
    options: FitOptions,
) -> QuadscanResult<EmittanceResult> {
    if scan.len() < MIN_SCAN_POINTS {
        return Err(QuadscanError::InvalidFitData(format!(
            "need at least {MIN_SCAN_POINTS} scan points, got {}",
            scan.len()
        )));
    }

    let currents = scan.currents.to_vec();
    let strengths = magnet_strengths(&currents, energy_mev, &config.calibration)?;
    debug!(?strengths, energy_mev, "quadrupole strengths");

    let fit = fit_parabola(&strengths, scan)?;
    debug!(
        a = fit.a,
        b = fit.b,
        c = fit.c,
        da = fit.da,
        db = fit.db,
        dc = fit.dc,
        reduced_chi2 = fit.reduced_chi2,
        "parabola fit"
    );
    if fit.dof == 0 {
        warn!(
            points = scan.len(),
            "fit has no degrees of freedom; coefficient uncertainties are infinite"
        );
    }

    let m = second_moments(&fit, config);
    debug!(
        x0 = m.x0,
        p0 = m.p0,
        x0p0 = m.x0p0,
        d_x0 = m.d_x0,
        d_p0 = m.d_p0,
        d_x0p0 = m.d_x0p0,
        "second moments"
    );

    let em = emittance(m.x0, m.p0, m.x0p0);
    let em_err = emit_error(m.x0, m.p0, m.x0p0, m.d_x0, m.d_p0, m.d_x0p0);
    let em2_err = emit2_error(m.x0, m.p0, m.x0p0, m.d_x0, m.d_p0, m.d_x0p0);
    if em == 0.0 {
        warn!(
            determinant = m.x0 * m.p0 - m.x0p0 * m.x0p0,
            "beam matrix is not positive definite; emittance clamped to zero"
        );
    }

    let normalized = if options.normalize {
        Some(NormalizedEmittance {
            emittance: norm_floet(em, energy_mev)?,
            error: norm_floet(em_err, energy_mev)?,
        })
    } else {
        None
    };

    Ok(EmittanceResult {
        energy_mev,
        emittance: em,
        emittance_error: em_err,
        emittance_squared_error: em2_err,
        normalized,
        moments: m,
        fit,
    })
}

// ─────────────────────────────────────────────────────────────────────
// Quadscan — Result Reporting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Stdout protocol.
//!
//! Everything except the result line starts with `#`, so a caller can take
//! the first non-`#` line holding a parenthesised pair as the result.
//! Floats use Rust's shortest round-trip form (`0.0`, `inf`, `NaN`).

use std::io::{self, Write};

use clap::ValueEnum;
use quadscan_core::transport::OverlayPoint;
use quadscan_types::scan::EmittanceResult;
use serde::Serialize;

use crate::input::ScanInput;

/// Transverse plane the scan was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    X,
    Y,
}

impl Plane {
    pub fn label(self) -> &'static str {
        match self {
            Plane::X => "x",
            Plane::Y => "y",
        }
    }
}

/// Full machine-readable report for `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub plane: Plane,
    pub notes: &'a [String],
    pub result: &'a EmittanceResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<&'a [OverlayPoint]>,
}

fn fmt_array<'a>(values: impl IntoIterator<Item = &'a f64>) -> String {
    let parts: Vec<String> = values.into_iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", parts.join(", "))
}

/// `Emittance,error: (<em>, <err>)`
///
/// The error includes the magnet length in every partial derivative, so it
/// is larger than what length-free propagation reports for the same scan.
pub fn result_line(emittance: f64, error: f64) -> String {
    format!("Emittance,error: ({emittance:?}, {error:?})")
}

pub fn write_echo<W: Write>(out: &mut W, input: &ScanInput) -> io::Result<()> {
    for note in &input.notes {
        writeln!(out, "# {note}")?;
    }
    writeln!(out, "# Inputs (data array size {})", input.scan.len())?;
    writeln!(out, "# Energy: {:?}", input.energy_mev)?;
    writeln!(out, "# Q_curr: {}", fmt_array(input.scan.currents.iter()))?;
    writeln!(out, "# Beam_w: {}", fmt_array(input.scan.widths.iter()))?;
    writeln!(out, "# Beam_s: {}", fmt_array(input.scan.width_stds.iter()))
}

pub fn write_overlay<W: Write>(
    out: &mut W,
    points: &[OverlayPoint],
    plane: Plane,
) -> io::Result<()> {
    let p = plane.label();
    writeln!(out, "# Overlay: sigma_{p}^2 [mm^2] vs. quadrupole strength [1/m^2]")?;
    writeln!(
        out,
        "# {:>10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "I[A]", "k", "measured", "error", "fit", "thin", "thick"
    )?;
    for pt in points {
        writeln!(
            out,
            "# {:>10.4} {:>12.5} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            pt.current,
            pt.strength,
            pt.measured,
            pt.measured_error,
            pt.fitted,
            pt.thin_lens,
            pt.thick_lens
        )?;
    }
    Ok(())
}

/// Result line, then the optional normalized pair and overlay. Written
/// after [`write_echo`].
pub fn write_result<W: Write>(
    out: &mut W,
    result: &EmittanceResult,
    overlay: Option<&[OverlayPoint]>,
    plane: Plane,
) -> io::Result<()> {
    writeln!(out, "{}", result_line(result.emittance, result.emittance_error))?;
    if let Some(n) = &result.normalized {
        writeln!(
            out,
            "# Normalized emittance,error ({}): ({:?}, {:?})",
            plane.label(),
            n.emittance,
            n.error
        )?;
    }
    if let Some(points) = overlay {
        write_overlay(out, points, plane)?;
    }
    Ok(())
}

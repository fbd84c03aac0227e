// ─────────────────────────────────────────────────────────────────────
// Quadscan — Command Line
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Beam emittance from a quadrupole scan.
//!
//! `quadscan <Energy> <I_1..I_n> <w_1..w_n> <s_1..s_n>`; logs go to stderr,
//! stdout carries only the result protocol.

mod input;
mod report;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use quadscan_core::analysis::{fit_emittance, FitOptions};
use quadscan_core::transport::overlay;
use quadscan_types::config::BeamlineConfig;
use quadscan_types::scan::ScanData;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::input::ScanInput;
use crate::report::{JsonReport, Plane};

#[derive(Parser, Debug)]
#[command(author, version, about = "Beam emittance from a quadrupole scan")]
struct Args {
    /// Energy [MeV], then n currents [A], n widths [mm], n width stds [mm].
    /// Options go before the values: `-1.0E-4` is a number, not a flag.
    #[arg(allow_hyphen_values = true)]
    values: Vec<f64>,

    /// Beamline configuration (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<String>,

    /// Transverse plane of the scan, used for labels
    #[arg(long, value_enum, default_value_t = Plane::X)]
    plane: Plane,

    /// Read `current width std` triples from a file instead; a single
    /// positional value is then taken as the energy
    #[arg(long)]
    file: Option<String>,

    /// Also report the normalized emittance
    #[arg(long, default_value_t = false)]
    normalize: bool,

    /// Print the full result as JSON instead of the text protocol
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print measured points next to the fitted and modelled beam size
    #[arg(long, default_value_t = false)]
    overlay: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_input(args: &Args, config: &BeamlineConfig) -> Result<ScanInput> {
    let Some(path) = &args.file else {
        return input::from_positional(&args.values).context("invalid positional scan data");
    };

    let scan = ScanData::from_measurement_file(path)
        .with_context(|| format!("failed to read measurement file {path}"))?;
    if args.values.len() > 1 {
        warn!(
            ignored = args.values.len() - 1,
            "positional values after the energy are ignored with --file"
        );
    }
    let energy_mev = args
        .values
        .first()
        .copied()
        .unwrap_or(config.default_energy_mev);
    Ok(ScanInput {
        energy_mev,
        scan,
        notes: Vec::new(),
    })
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BeamlineConfig::from_file(path)
            .with_context(|| format!("failed to load beamline config {path}"))?,
        None => BeamlineConfig::default(),
    };

    let input = load_input(&args, &config)?;
    info!(
        points = input.scan.len(),
        energy_mev = input.energy_mev,
        plane = args.plane.label(),
        "scan loaded"
    );

    // Echo before fitting so notes reach stdout even when the fit fails.
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.json {
        report::write_echo(&mut out, &input)?;
        out.flush()?;
    }

    let options = FitOptions {
        normalize: args.normalize,
    };
    let result = fit_emittance(&input.scan, input.energy_mev, &config, options)
        .context("emittance evaluation failed")?;
    let points = if args.overlay {
        Some(overlay(&input.scan, &result, &config).context("overlay evaluation failed")?)
    } else {
        None
    };

    if args.json {
        let doc = JsonReport {
            plane: args.plane,
            notes: &input.notes,
            result: &result,
            overlay: points.as_deref(),
        };
        serde_json::to_writer_pretty(&mut out, &doc)?;
        writeln!(out)?;
    } else {
        report::write_result(&mut out, &result, points.as_deref(), args.plane)?;
    }
    out.flush()?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────
// Quadscan — Property-Based Tests (proptest) for quadscan-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for quadscan-core using proptest.
//!
//! Covers: kinematic inverses, β range, emittance clamping and its error,
//! normalization monotonicity, and beam recovery through the full scan
//! analysis.

use proptest::prelude::*;
use quadscan_core::analysis::{fit_emittance, FitOptions};
use quadscan_core::emittance::{emit_error, emittance, norm_floet};
use quadscan_core::kinematics::{beta_vc, energy_mev, gamma_factor, momentum_mev};
use quadscan_core::magnet::magnet_strength;
use quadscan_core::transport::thin_lens_function;
use quadscan_types::config::BeamlineConfig;
use quadscan_types::constants::ELECTRON_REST_ENERGY_MEV as E0;
use quadscan_types::scan::{ScanData, SecondMoments};

// ── Kinematics ───────────────────────────────────────────────────────

proptest! {
    /// energy(momentum(E)) = E for any physical beam energy.
    #[test]
    fn energy_of_momentum_is_identity(e in 0.52f64..1.0e4) {
        let back = energy_mev(momentum_mev(e).unwrap()).unwrap();
        prop_assert!((back - e).abs() < 1e-12 * e, "{} -> {}", e, back);
    }

    /// momentum(energy(Pc)) = Pc above the rest energy.
    #[test]
    fn momentum_of_energy_is_identity(pc in 0.52f64..1.0e4) {
        let back = momentum_mev(energy_mev(pc).unwrap()).unwrap();
        prop_assert!((back - pc).abs() < 1e-12 * pc);
    }

    /// β = v/c stays in [0, 1) above the rest energy.
    #[test]
    fn beta_in_unit_interval(e in (E0 * 1.0001)..1.0e4) {
        let beta = beta_vc(gamma_factor(e).unwrap()).unwrap();
        prop_assert!((0.0..1.0).contains(&beta), "beta = {}", beta);
    }
}

// ── Emittance ────────────────────────────────────────────────────────

proptest! {
    /// Zero exactly when the beam matrix is not positive definite,
    /// the determinant root otherwise; never NaN.
    #[test]
    fn emittance_clamp(x0 in -10.0f64..10.0, p0 in -10.0f64..10.0, xp in -10.0f64..10.0) {
        let e = emittance(x0, p0, xp);
        prop_assert!(!e.is_nan());
        let det = x0 * p0 - xp * xp;
        if det > 0.0 {
            prop_assert!((e - det.sqrt()).abs() < 1e-12 * det.sqrt().max(1.0));
        } else {
            prop_assert_eq!(e, 0.0);
        }
    }

    /// The error vanishes whenever the emittance does.
    #[test]
    fn error_zero_with_emittance(
        x0 in -10.0f64..10.0,
        p0 in -10.0f64..10.0,
        xp in -10.0f64..10.0,
        dx in 0.0f64..1.0,
        dp in 0.0f64..1.0,
        dxp in 0.0f64..1.0,
    ) {
        let err = emit_error(x0, p0, xp, dx, dp, dxp);
        prop_assert!(!err.is_nan());
        prop_assert!(err >= 0.0);
        if emittance(x0, p0, xp) == 0.0 {
            prop_assert_eq!(err, 0.0);
        }
    }

    /// norm_floet increases with the emittance at fixed energy.
    #[test]
    fn norm_floet_monotone(e1 in 0.0f64..100.0, de in 1e-6f64..10.0, energy in 0.6f64..1.0e3) {
        let lo = norm_floet(e1, energy).unwrap();
        let hi = norm_floet(e1 + de, energy).unwrap();
        prop_assert!(hi > lo);
    }
}

// ── Scan Analysis ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A noise-free thin-lens scan gives back the beam it was made from.
    #[test]
    fn analysis_recovers_beam(
        x0 in 0.01f64..0.1,
        p0 in 0.05f64..0.5,
        corr in -0.9f64..0.9,
        energy in 4.0f64..12.0,
        n in 5usize..15,
    ) {
        let cfg = BeamlineConfig::default();
        let truth = SecondMoments {
            x0,
            p0,
            x0p0: corr * (x0 * p0).sqrt(),
            d_x0: 0.0,
            d_p0: 0.0,
            d_x0p0: 0.0,
        };
        let currents: Vec<f64> = (0..n).map(|i| 0.4 + 0.1 * i as f64).collect();
        let widths: Vec<f64> = currents
            .iter()
            .map(|&i| {
                let k = magnet_strength(i, energy, &cfg.calibration).unwrap();
                thin_lens_function(k, &truth, &cfg).sqrt()
            })
            .collect();
        let scan = ScanData::new(currents, widths, vec![0.01; n]).unwrap();

        let result = fit_emittance(&scan, energy, &cfg, FitOptions::default()).unwrap();
        let expected = (truth.x0 * truth.p0 - truth.x0p0 * truth.x0p0).sqrt();
        prop_assert!(
            (result.emittance - expected).abs() < 1e-6 * expected,
            "emittance {} vs {}", result.emittance, expected
        );
        prop_assert!((result.moments.x0 - x0).abs() < 1e-6 * x0);
    }
}

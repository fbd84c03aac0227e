//! Positional argument layout: `<energy> <I_1..I_n> <w_1..w_n> <s_1..s_n>`.

use quadscan_types::error::QuadscanResult;
use quadscan_types::scan::{ScanData, DEMO_ENERGY_MEV};

/// Program name + energy + two points of (current, width, std).
pub const MIN_ARGUMENTS: usize = 1 + 1 + 2 + 2 + 2;

/// A scan ready for analysis plus the notes to echo before the result.
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub energy_mev: f64,
    pub scan: ScanData,
    pub notes: Vec<String>,
}

/// Split the positional values into energy and the three scan columns.
///
/// Too few values select the demo scan; a column block that is not a
/// multiple of three is truncated to the largest one that is.
pub fn from_positional(values: &[f64]) -> QuadscanResult<ScanInput> {
    let argc = values.len() + 1;
    if argc < MIN_ARGUMENTS {
        return Ok(ScanInput {
            energy_mev: DEMO_ENERGY_MEV,
            scan: ScanData::demo(),
            notes: vec![
                format!("Number of parameters '{argc}' is less then '{MIN_ARGUMENTS}'"),
                "Dummy demo data will be used instead".to_string(),
            ],
        });
    }

    let energy_mev = values[0];
    let data = &values[1..];
    let nn = data.len();
    let n = nn / 3;

    let mut notes = Vec::new();
    if nn % 3 != 0 {
        notes.push(format!(
            "WARNING: Expected 3 x {n} long array, but it is {nn} long array. Truncating to {} elements.",
            3 * n
        ));
    }

    let scan = ScanData::new(
        data[..n].to_vec(),
        data[n..2 * n].to_vec(),
        data[2 * n..3 * n].to_vec(),
    )?;
    Ok(ScanInput {
        energy_mev,
        scan,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_selects_demo() {
        let input = from_positional(&[]).unwrap();
        assert_eq!(input.energy_mev, 5.81);
        assert_eq!(input.scan, ScanData::demo());
        assert_eq!(
            input.notes,
            vec![
                "Number of parameters '1' is less then '8'".to_string(),
                "Dummy demo data will be used instead".to_string(),
            ]
        );
    }

    #[test]
    fn test_six_values_still_demo() {
        let input = from_positional(&[5.0, 1.0, 2.0, 0.5, 0.6, 0.1]).unwrap();
        assert_eq!(input.scan, ScanData::demo());
        assert!(input.notes[0].contains("'7'"));
    }

    #[test]
    fn test_column_blocks() {
        let values = [6.0, 0.9, 1.0, 1.1, 0.51, 0.52, 0.53, 0.12, 0.13, 0.14];
        let input = from_positional(&values).unwrap();
        assert!(input.notes.is_empty());
        assert_eq!(input.energy_mev, 6.0);
        assert_eq!(input.scan.currents.to_vec(), vec![0.9, 1.0, 1.1]);
        assert_eq!(input.scan.widths.to_vec(), vec![0.51, 0.52, 0.53]);
        assert_eq!(input.scan.width_stds.to_vec(), vec![0.12, 0.13, 0.14]);
    }

    #[test]
    fn test_truncates_ragged_tail() {
        // 11 data values: n = 3, the last two are dropped
        let values = [
            6.0, 0.9, 1.0, 1.1, 0.51, 0.52, 0.53, 0.12, 0.13, 0.14, 7.0, 8.0,
        ];
        let input = from_positional(&values).unwrap();
        assert_eq!(
            input.notes,
            vec![
                "WARNING: Expected 3 x 3 long array, but it is 11 long array. Truncating to 9 elements."
                    .to_string()
            ]
        );
        assert_eq!(input.scan.len(), 3);
        assert_eq!(input.scan.width_stds.to_vec(), vec![0.12, 0.13, 0.14]);
    }

    #[test]
    fn test_positional_round_trip_of_scan() {
        let scan = ScanData::new(
            vec![-0.5, 0.0, 0.5, 1.0],
            vec![0.4, 0.3, 0.35, 0.5],
            vec![0.01, 0.02, 0.03, 0.04],
        )
        .unwrap();
        let input = from_positional(&scan.to_positional(12.5)).unwrap();
        assert_eq!(input.energy_mev, 12.5);
        assert_eq!(input.scan, scan);
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let values = [6.0, 0.9, 1.0, f64::NAN, 0.51, 0.52, 0.53];
        assert!(from_positional(&values).is_err());
    }
}

//! Small dense linear algebra.
//!
//! Householder QR, triangular solves and the triangular inverse needed to
//! turn a least-squares R factor into a parameter covariance.

use ndarray::{Array1, Array2};
use quadscan_types::error::{QuadscanError, QuadscanResult};

/// Householder QR of `a` (m x n, m >= n), applied in place to `a` and `b`.
///
/// On return the upper n x n block of `a` holds R and `b` holds Qᵀb.
/// Below-diagonal entries of `a` are left zeroed.
pub fn householder_qr_in_place(a: &mut Array2<f64>, b: &mut Array1<f64>) -> QuadscanResult<()> {
    let (m, n) = a.dim();
    if m < n {
        return Err(QuadscanError::LinAlg(format!(
            "QR needs at least as many rows as columns, got {m}x{n}"
        )));
    }
    if b.len() != m {
        return Err(QuadscanError::LinAlg(format!(
            "right-hand side length {} does not match {m} rows",
            b.len()
        )));
    }

    for k in 0..n {
        let norm = (k..m).map(|i| a[[i, k]] * a[[i, k]]).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(QuadscanError::LinAlg(format!(
                "design matrix column {k} is zero below the diagonal"
            )));
        }
        let alpha = if a[[k, k]] > 0.0 { -norm } else { norm };

        let mut v: Vec<f64> = (k..m).map(|i| a[[i, k]]).collect();
        v[0] -= alpha;
        let v_norm2 = v.iter().map(|x| x * x).sum::<f64>();

        for j in k..n {
            let dot = v
                .iter()
                .enumerate()
                .map(|(i, vi)| vi * a[[k + i, j]])
                .sum::<f64>();
            let f = 2.0 * dot / v_norm2;
            for (i, vi) in v.iter().enumerate() {
                a[[k + i, j]] -= f * vi;
            }
        }
        let dot = v.iter().enumerate().map(|(i, vi)| vi * b[k + i]).sum::<f64>();
        let f = 2.0 * dot / v_norm2;
        for (i, vi) in v.iter().enumerate() {
            b[k + i] -= f * vi;
        }

        a[[k, k]] = alpha;
        for i in (k + 1)..m {
            a[[i, k]] = 0.0;
        }
    }
    Ok(())
}

/// Solve R x = y for upper-triangular R (n x n, taken from the top of `r`).
pub fn back_substitute(r: &Array2<f64>, y: &Array1<f64>) -> QuadscanResult<Array1<f64>> {
    let n = r.ncols();
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut acc = y[i];
        for j in (i + 1)..n {
            acc -= r[[i, j]] * x[j];
        }
        if r[[i, i]] == 0.0 {
            return Err(QuadscanError::LinAlg(format!(
                "zero pivot at row {i} in back substitution"
            )));
        }
        x[i] = acc / r[[i, i]];
    }
    Ok(x)
}

/// Inverse of the upper-triangular n x n block at the top of `r`.
pub fn upper_triangular_inverse(r: &Array2<f64>) -> QuadscanResult<Array2<f64>> {
    let n = r.ncols();
    let mut inv = Array2::zeros((n, n));
    for col in 0..n {
        let mut e = Array1::zeros(n);
        e[col] = 1.0;
        let x = back_substitute(r, &e)?;
        for row in 0..n {
            inv[[row, col]] = x[row];
        }
    }
    Ok(inv)
}

/// Numerical rank test on the diagonal of R.
///
/// A pivot below `n·ε·max|r_ii|` means the columns are dependent to
/// working precision.
pub fn is_rank_deficient(r: &Array2<f64>) -> bool {
    let n = r.ncols();
    let max_diag = (0..n).map(|i| r[[i, i]].abs()).fold(0.0_f64, f64::max);
    let tol = (r.nrows().max(n) as f64) * f64::EPSILON * max_diag;
    max_diag == 0.0 || (0..n).any(|i| r[[i, i]].abs() <= tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_preserves_column_norms() {
        let mut a =
            Array2::from_shape_vec((4, 2), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        let col0 = (1.0f64 + 9.0 + 25.0 + 49.0).sqrt();
        let mut b = Array1::from_vec(vec![1.0, 0.0, 0.0, 0.0]);
        householder_qr_in_place(&mut a, &mut b).unwrap();
        assert!((a[[0, 0]].abs() - col0).abs() < 1e-12);
        assert!(a[[1, 0]] == 0.0 && a[[2, 0]] == 0.0 && a[[3, 0]] == 0.0);
        // Qᵀ is orthogonal, so |Qᵀb| = |b|
        let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm_b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_qr_solves_square_system() {
        // [2 1; 1 3] x = [3; 5] → x = [0.8, 1.4]
        let mut a = Array2::from_shape_vec((2, 2), vec![2.0, 1.0, 1.0, 3.0]).unwrap();
        let mut b = Array1::from_vec(vec![3.0, 5.0]);
        householder_qr_in_place(&mut a, &mut b).unwrap();
        let x = back_substitute(&a, &b).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_qr_rejects_zero_column() {
        let mut a = Array2::from_shape_vec((3, 2), vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0]).unwrap();
        let mut b = Array1::zeros(3);
        assert!(householder_qr_in_place(&mut a, &mut b).is_err());
    }

    #[test]
    fn test_upper_triangular_inverse() {
        let r = Array2::from_shape_vec((2, 2), vec![2.0, 1.0, 0.0, 4.0]).unwrap();
        let inv = upper_triangular_inverse(&r).unwrap();
        let prod = r.dot(&inv);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[[i, j]] - expected).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_rank_deficiency_detected() {
        let r = Array2::from_shape_vec((2, 2), vec![1.0, 1.0, 0.0, 1e-20]).unwrap();
        assert!(is_rank_deficient(&r));
        let r = Array2::from_shape_vec((2, 2), vec![1.0, 1.0, 0.0, 0.5]).unwrap();
        assert!(!is_rank_deficient(&r));
    }
}

use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// QR decomposition in place using Householder reflections.
///
/// On return, `a` holds the packed factorization:
/// - upper triangle (including diagonal): R
/// - strict lower triangle: Householder vectors, scaled so the implicit
///   leading entry is one
///
/// `tau` receives the Householder scalars (length `ncols`). The caller
/// guarantees `nrows >= ncols`. A numerically zero column is reported as
/// `Singular`.
pub(crate) fn qr_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>, tau: &mut [T]) -> Result<(), LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    debug_assert!(m >= n);
    debug_assert_eq!(tau.len(), n);

    for col in 0..n {
        let mut norm_sq = T::zero();
        for i in col..m {
            let v = a.at(i, col);
            norm_sq = norm_sq + v * v;
        }
        if norm_sq.is_nan() || norm_sq < T::epsilon() {
            return Err(LinalgError::Singular);
        }

        let norm = norm_sq.sqrt();
        let a_cc = a.at(col, col);
        // sign(a_cc) * ||x|| keeps v0 = a_cc + sigma away from cancellation
        let sigma = if a_cc < T::zero() { -norm } else { norm };

        let v0 = a_cc + sigma;
        let tau_val = v0 / sigma;
        tau[col] = tau_val;

        let inv_v0 = T::one() / v0;
        for i in (col + 1)..m {
            let x = a.at_mut(i, col);
            *x = *x * inv_v0;
        }

        // A[col.., j] -= tau * v * (vᵀ A[col.., j]) with v = [1, a[col+1.., col]]
        for j in (col + 1)..n {
            let mut dot = a.at(col, j);
            for i in (col + 1)..m {
                dot = dot + a.at(i, col) * a.at(i, j);
            }
            dot = dot * tau_val;

            *a.at_mut(col, j) = a.at(col, j) - dot;
            for i in (col + 1)..m {
                let vi = a.at(i, col);
                let x = a.at_mut(i, j);
                *x = *x - dot * vi;
            }
        }

        *a.at_mut(col, col) = -sigma;
    }

    Ok(())
}

/// Least-squares solve `min ||A x - b||` from the packed factors of
/// [`qr_in_place`]. `qtb` is scratch of length `nrows`, `x` has length
/// `ncols`.
pub(crate) fn qr_solve<T: FloatScalar>(qr: &impl MatrixRef<T>, tau: &[T], b: &[T], qtb: &mut [T], x: &mut [T]) {
    let m = qr.nrows();
    let n = qr.ncols();
    qtb.copy_from_slice(b);

    // Apply Qᵀ one reflection at a time
    for col in 0..n {
        let mut dot = qtb[col];
        for i in (col + 1)..m {
            dot = dot + qr.at(i, col) * qtb[i];
        }
        dot = dot * tau[col];

        qtb[col] = qtb[col] - dot;
        for i in (col + 1)..m {
            qtb[i] = qtb[i] - dot * qr.at(i, col);
        }
    }

    // Back substitution with R
    for i in (0..n).rev() {
        let mut sum = qtb[i];
        for (j, &r) in qr.row_as_slice(i, i + 1).iter().enumerate() {
            sum = sum - r * x[i + 1 + j];
        }
        x[i] = sum / qr.at(i, i);
    }
}

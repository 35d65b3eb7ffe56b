use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Cholesky decomposition in place: `A = L * Lᵀ`.
///
/// On return, the lower triangle of `a` (including diagonal) contains L.
/// The strict upper triangle is left unchanged.
///
/// Returns an error if the matrix is not positive definite.
pub(crate) fn cholesky_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols());

    for j in 0..n {
        // Row j of L is final up to column j once rows < j are done.
        let mut diag = a.at(j, j);
        for k in 0..j {
            let ljk = a.at(j, k);
            diag = diag - ljk * ljk;
        }
        if diag.is_nan() || diag <= T::zero() {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = diag.sqrt();
        *a.at_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for i in (j + 1)..n {
            let mut sum = a.at(i, j);
            for k in 0..j {
                sum = sum - a.at(i, k) * a.at(j, k);
            }
            *a.at_mut(i, j) = sum * inv_ljj;
        }
    }

    Ok(())
}

/// Solve `L * x = b` by forward substitution, `L` lower triangular.
pub(crate) fn forward_substitute<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for (j, &lij) in l.row_as_slice(i, 0)[..i].iter().enumerate() {
            sum = sum - lij * x[j];
        }
        x[i] = sum / l.at(i, i);
    }
}

/// Solve `Lᵀ * x = b` by back substitution, `L` lower triangular.
pub(crate) fn back_substitute_lt<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - l.at(j, i) * x[j];
        }
        x[i] = sum / l.at(i, i);
    }
}

use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// LU decomposition with partial pivoting, in place.
///
/// On return, `a` holds L and U packed together:
/// - upper triangle (including diagonal): U
/// - strict lower triangle: L (unit diagonal implied)
///
/// `perm` receives the row permutation. Returns `true` if the number of row
/// swaps was even. The caller guarantees `a` is square and `perm.len()`
/// matches.
pub(crate) fn lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
) -> Result<bool, LinalgError> {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols());
    debug_assert_eq!(n, perm.len());

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut even = true;

    for col in 0..n {
        // Partial pivoting: largest magnitude in this column
        let mut max_row = col;
        let mut max_val = a.at(col, col).abs();
        for row in (col + 1)..n {
            let val = a.at(row, col).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val.is_nan() || max_val < T::epsilon() {
            return Err(LinalgError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            for j in 0..n {
                let tmp = a.at(col, j);
                *a.at_mut(col, j) = a.at(max_row, j);
                *a.at_mut(max_row, j) = tmp;
            }
            even = !even;
        }

        // Row-major elimination: each row below the pivot is updated with a
        // contiguous AXPY against the pivot row.
        let inv_pivot = T::one() / a.at(col, col);
        for row in (col + 1)..n {
            let factor = a.at(row, col) * inv_pivot;
            *a.at_mut(row, col) = factor;
            if factor == T::zero() {
                continue;
            }
            for j in (col + 1)..n {
                let u = a.at(col, j);
                let x = a.at_mut(row, j);
                *x = *x - factor * u;
            }
        }
    }

    Ok(even)
}

/// Solve `Ax = b` given the packed LU factors and permutation from
/// [`lu_in_place`]. `b` and `x` are separate slices of length n.
pub(crate) fn lu_solve<T: FloatScalar>(lu: &impl MatrixRef<T>, perm: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // Forward substitution: Ly = Pb
    for i in 0..n {
        let mut sum = b[perm[i]];
        for (j, &l) in lu.row_as_slice(i, 0)[..i].iter().enumerate() {
            sum = sum - l * x[j];
        }
        x[i] = sum;
    }

    // Back substitution: Ux = y
    for i in (0..n).rev() {
        let mut sum = x[i];
        for (j, &u) in lu.row_as_slice(i, i + 1).iter().enumerate() {
            sum = sum - u * x[i + 1 + j];
        }
        x[i] = sum / lu.at(i, i);
    }
}

//! Diagonal-aware products.
//!
//! A diagonal operator can be stored as a full (possibly rectangular)
//! matrix whose off-diagonal entries are zero, as a compact column vector of
//! its diagonal, or as a single uniform scalar. Every kernel here reads the
//! operator through one accessor, so the three representations give
//! identical results, including the zero padding of rectangular shapes.
//!
//! ```
//! use structmat::{diagonal, Diagonal, Matrix};
//!
//! let d = Matrix::column(&[2.0_f64, 3.0, 4.0]);
//! let b = Matrix::from_rows(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
//! let mut c = Matrix::zeros(3, 2);
//! diagonal::pre_mult(&Diagonal::Compact(&d), &b, &mut c).unwrap();
//! assert_eq!(c.as_slice(), &[2.0, 2.0, 6.0, 6.0, 12.0, 12.0]);
//! ```

mod symmetric;

pub use symmetric::*;

use crate::error::{check_region, check_shape, MatrixError, Result};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

/// A diagonal operator in one of its three storage forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagonal<'a, T> {
    /// `n x m` matrix; `d_i = M[i][i]` for `i < min(n, m)`. Off-diagonal
    /// entries are never read.
    Full(&'a Matrix<T>),
    /// `n x 1` column holding `d_i`. The column count of the operator is
    /// implied by the other operand.
    Compact(&'a Matrix<T>),
    /// `s * I` of whatever size the operation requires.
    Uniform(T),
}

impl<T: Scalar> Diagonal<'_, T> {
    /// `d_i`. The caller has validated `i` against the operator's extent.
    #[inline]
    pub(crate) fn value(&self, i: usize) -> T {
        match self {
            Diagonal::Full(m) => m.at(i, i),
            Diagonal::Compact(v) => v.at(i, 0),
            Diagonal::Uniform(s) => *s,
        }
    }

    fn check_compact(op: &'static str, v: &Matrix<T>) -> Result<()> {
        check_shape(op, v.shape(), (v.nrows(), 1))
    }

    /// Require the operator to act as an `n x n` diagonal.
    pub(crate) fn check_square(&self, op: &'static str, n: usize) -> Result<()> {
        match self {
            Diagonal::Full(m) => check_shape(op, m.shape(), (n, n)),
            Diagonal::Compact(v) => check_shape(op, v.shape(), (n, 1)),
            Diagonal::Uniform(_) => Ok(()),
        }
    }
}

/// Output extent of a one-sided product: `(n, k)` where `n` is the number of
/// output rows (pre) or columns (post) and `k = min(n, m)` is how many of
/// them receive a nonzero diagonal.
struct Extent {
    n: usize,
    k: usize,
}

// ── One-sided products ──────────────────────────────────────────────

/// `c = D * b`.
///
/// Full `n x m` requires `b.nrows() == m` and `c` to be `n x b.ncols()`.
/// Compact (`n` values) requires `c` to be `n x b.ncols()`. Uniform requires
/// `c` to match `b`. Row `i < min(n, m)` of `c` is `d_i * b[i]`; any
/// remaining rows are zero.
pub fn pre_mult<T: Scalar>(d: &Diagonal<'_, T>, b: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
    const OP: &str = "pre_mult";
    let ext = pre_extent(OP, d, b)?;
    check_shape(OP, c.shape(), (ext.n, b.ncols()))?;
    for i in 0..ext.k {
        let di = d.value(i);
        let brow = b.row_as_slice(i, 0);
        for (cv, &bv) in c.row_as_mut_slice(i, 0).iter_mut().zip(brow) {
            *cv = di * bv;
        }
    }
    for i in ext.k..ext.n {
        for cv in c.row_as_mut_slice(i, 0) {
            *cv = T::zero();
        }
    }
    Ok(())
}

fn pre_extent<T: Scalar>(op: &'static str, d: &Diagonal<'_, T>, b: &Matrix<T>) -> Result<Extent> {
    let m = b.nrows();
    let n = match d {
        Diagonal::Full(f) => {
            if f.ncols() != m {
                return Err(MatrixError::DimensionMismatch {
                    op,
                    expected: (f.ncols(), b.ncols()),
                    got: b.shape(),
                });
            }
            f.nrows()
        }
        Diagonal::Compact(v) => {
            Diagonal::check_compact(op, v)?;
            v.nrows()
        }
        Diagonal::Uniform(_) => m,
    };
    Ok(Extent { n, k: n.min(m) })
}

/// `c = b * D`.
///
/// Full `m x n` requires `b.ncols() == m` and `c` to be `b.nrows() x n`.
/// Compact (`m` values) requires `b.ncols() == m` and `c.nrows() ==
/// b.nrows()`; the output width `n = c.ncols()` is free. Column `j < min(m,
/// n)` of `c` is `b[:, j] * d_j`; any remaining columns are zero.
pub fn post_mult<T: Scalar>(b: &Matrix<T>, d: &Diagonal<'_, T>, c: &mut Matrix<T>) -> Result<()> {
    const OP: &str = "post_mult";
    let ext = post_extent(OP, b.ncols(), d, c.ncols())?;
    check_shape(OP, c.shape(), (b.nrows(), ext.n))?;
    for i in 0..b.nrows() {
        let brow = b.row_as_slice(i, 0);
        let crow = c.row_as_mut_slice(i, 0);
        for j in 0..ext.k {
            crow[j] = brow[j] * d.value(j);
        }
        for cv in crow[ext.k..].iter_mut() {
            *cv = T::zero();
        }
    }
    Ok(())
}

/// `c = aᵀ * D` for `a` of shape `m x p`.
///
/// The operator sizing follows [`post_mult`] with `aᵀ` in place of `b`.
pub fn post_mult_trans_a<T: Scalar>(
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    c: &mut Matrix<T>,
) -> Result<()> {
    const OP: &str = "post_mult_trans_a";
    let ext = post_extent(OP, a.nrows(), d, c.ncols())?;
    check_shape(OP, c.shape(), (a.ncols(), ext.n))?;
    for i in 0..a.ncols() {
        let crow = c.row_as_mut_slice(i, 0);
        for (j, cv) in crow.iter_mut().enumerate().take(ext.k) {
            *cv = a.at(j, i) * d.value(j);
        }
        for cv in crow[ext.k..].iter_mut() {
            *cv = T::zero();
        }
    }
    Ok(())
}

/// `m` is the operand's inner dimension, `out_cols` the output's width.
fn post_extent<T: Scalar>(
    op: &'static str,
    m: usize,
    d: &Diagonal<'_, T>,
    out_cols: usize,
) -> Result<Extent> {
    let (rows, n) = match d {
        Diagonal::Full(f) => (f.nrows(), f.ncols()),
        Diagonal::Compact(v) => {
            Diagonal::check_compact(op, v)?;
            (v.nrows(), out_cols)
        }
        Diagonal::Uniform(_) => (m, m),
    };
    if rows != m {
        return Err(MatrixError::DimensionMismatch {
            op,
            expected: (m, n),
            got: (rows, n),
        });
    }
    Ok(Extent { n, k: n.min(m) })
}

/// `dest[row.., col..] += D * b`, written straight into the block.
///
/// The block is `n x b.ncols()` with `n` the operator's row count (or
/// `b.nrows()` for a uniform operator).
///
/// ```
/// use structmat::{diagonal, Diagonal, Matrix};
///
/// let d = Matrix::column(&[2.0_f64, 3.0]);
/// let b = Matrix::from_rows(2, 2, &[1.0, 1.0, 1.0, 1.0]);
/// let mut dest = Matrix::filled(3, 3, 1.0);
/// diagonal::pre_mult_add_block(&Diagonal::Compact(&d), &b, &mut dest, 1, 1).unwrap();
/// assert_eq!(dest.as_slice(), &[1.0, 1.0, 1.0, 1.0, 3.0, 3.0, 1.0, 4.0, 4.0]);
/// ```
pub fn pre_mult_add_block<T: Scalar>(
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    pre_mult_add_block_impl("pre_mult_add_block", T::one(), d, b, dest, row, col)
}

/// `dest[row.., col..] += s * D * b`.
pub fn pre_mult_add_block_scaled<T: Scalar>(
    s: T,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    pre_mult_add_block_impl("pre_mult_add_block_scaled", s, d, b, dest, row, col)
}

fn pre_mult_add_block_impl<T: Scalar>(
    op: &'static str,
    s: T,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    let ext = pre_extent(op, d, b)?;
    if ext.n == 0 || b.ncols() == 0 {
        return Ok(());
    }
    check_region(op, dest.shape(), row, col, ext.n, b.ncols())?;
    if s == T::zero() {
        return Ok(());
    }
    // Rows past min(n, m) receive zero and are skipped.
    for i in 0..ext.k {
        let w = s * d.value(i);
        let brow = b.row_as_slice(i, 0);
        let drow = &mut dest.row_as_mut_slice(row + i, col)[..brow.len()];
        for (dv, &bv) in drow.iter_mut().zip(brow) {
            *dv = *dv + w * bv;
        }
    }
    Ok(())
}

// ── Two-sided products ──────────────────────────────────────────────

/// `c = a * D * b` for an `n x n` diagonal, `a` of shape `p x n` and `b` of
/// shape `n x q`.
pub fn inner_diagonal_mult<T: Scalar>(
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
) -> Result<()> {
    const OP: &str = "inner_diagonal_mult";
    let n = a.ncols();
    check_shape(OP, b.shape(), (n, b.ncols()))?;
    d.check_square(OP, n)?;
    check_shape(OP, c.shape(), (a.nrows(), b.ncols()))?;
    c.zero();
    for i in 0..a.nrows() {
        for k in 0..n {
            let w = a.at(i, k) * d.value(k);
            let brow = b.row_as_slice(k, 0);
            for (cv, &bv) in c.row_as_mut_slice(i, 0).iter_mut().zip(brow) {
                *cv = *cv + w * bv;
            }
        }
    }
    Ok(())
}

/// `c = aᵀ * D * b` for an `n x n` diagonal, `a` of shape `n x p` and `b` of
/// shape `n x q`.
///
/// ```
/// use structmat::{diagonal, Diagonal, Matrix};
///
/// let a = Matrix::from_rows(2, 1, &[1.0_f64, 2.0]);
/// let b = Matrix::from_rows(2, 1, &[3.0, 4.0]);
/// let mut c = Matrix::zeros(1, 1);
/// diagonal::inner_diagonal_mult_trans_a(&a, &Diagonal::Uniform(2.0), &b, &mut c).unwrap();
/// assert_eq!(c[(0, 0)], 22.0);
/// ```
pub fn inner_diagonal_mult_trans_a<T: Scalar>(
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
) -> Result<()> {
    inner_trans_a_block("inner_diagonal_mult_trans_a", T::one(), a, d, b, c, (0, 0), false)
}

/// `c += aᵀ * D * b`.
pub fn inner_diagonal_mult_add_trans_a<T: Scalar>(
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
) -> Result<()> {
    const OP: &str = "inner_diagonal_mult_add_trans_a";
    check_shape(OP, c.shape(), (a.ncols(), b.ncols()))?;
    inner_trans_a_block(OP, T::one(), a, d, b, c, (0, 0), true)
}

/// `dest[row.., col..] += aᵀ * D * b` over the `a.ncols() x b.ncols()` block.
pub fn inner_diagonal_mult_add_block_trans_a<T: Scalar>(
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    inner_trans_a_block(
        "inner_diagonal_mult_add_block_trans_a",
        T::one(),
        a,
        d,
        b,
        dest,
        (row, col),
        true,
    )
}

/// `dest[row.., col..] += s * aᵀ * D * b`.
pub fn inner_diagonal_mult_add_block_trans_a_scaled<T: Scalar>(
    s: T,
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    inner_trans_a_block(
        "inner_diagonal_mult_add_block_trans_a_scaled",
        s,
        a,
        d,
        b,
        dest,
        (row, col),
        true,
    )
}

#[allow(clippy::too_many_arguments)]
fn inner_trans_a_block<T: Scalar>(
    op: &'static str,
    s: T,
    a: &Matrix<T>,
    d: &Diagonal<'_, T>,
    b: &Matrix<T>,
    dest: &mut Matrix<T>,
    (row, col): (usize, usize),
    accumulate: bool,
) -> Result<()> {
    let n = a.nrows();
    let (p, q) = (a.ncols(), b.ncols());
    check_shape(op, b.shape(), (n, q))?;
    d.check_square(op, n)?;
    if accumulate {
        if p == 0 || q == 0 {
            return Ok(());
        }
        check_region(op, dest.shape(), row, col, p, q)?;
    } else {
        check_shape(op, dest.shape(), (p, q))?;
        dest.zero();
    }
    if s == T::zero() {
        return Ok(());
    }
    for k in 0..n {
        let w = s * d.value(k);
        let arow = a.row_as_slice(k, 0);
        let brow = b.row_as_slice(k, 0);
        for (i, &av) in arow.iter().enumerate() {
            let aw = av * w;
            let drow = &mut dest.row_as_mut_slice(row + i, col)[..q];
            for (dv, &bv) in drow.iter_mut().zip(brow) {
                *dv = *dv + aw * bv;
            }
        }
    }
    Ok(())
}

// ── Inversion ───────────────────────────────────────────────────────

/// Reshape `out` to `d`'s shape and write the reciprocal of `d`'s main
/// diagonal, with zeros elsewhere.
///
/// ```
/// use structmat::{diagonal, Matrix};
///
/// let d = Matrix::from_rows(2, 2, &[2.0_f64, 0.0, 0.0, 4.0]);
/// let mut inv = Matrix::zeros(0, 0);
/// diagonal::invert_diagonal(&d, &mut inv);
/// assert_eq!(inv.as_slice(), &[0.5, 0.0, 0.0, 0.25]);
/// ```
pub fn invert_diagonal<T: FloatScalar>(d: &Matrix<T>, out: &mut Matrix<T>) {
    out.reshape_zeroed(d.nrows(), d.ncols());
    for i in 0..d.nrows().min(d.ncols()) {
        *out.at_mut(i, i) = T::one() / d.at(i, i);
    }
}

/// Replace `d`'s main diagonal with its reciprocal and zero everything else.
pub fn invert_diagonal_in_place<T: FloatScalar>(d: &mut Matrix<T>) {
    let (rows, cols) = d.shape();
    for i in 0..rows {
        for j in 0..cols {
            let x = d.at_mut(i, j);
            *x = if i == j { T::one() / *x } else { T::zero() };
        }
    }
}

#[cfg(test)]
mod tests;

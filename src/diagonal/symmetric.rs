//! Symmetric weighted products `Bᵀ W B` and `B W Bᵀ`.
//!
//! Only entries `(i, j)` with `i <= j` are computed; `(j, i)` receives the
//! same value. The weight `W` is any [`Diagonal`] form, and
//! `Diagonal::Uniform(1)` gives the unweighted product.

use crate::error::{check_region, check_shape, Result};
use crate::matrix::Matrix;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::Diagonal;

#[derive(Debug, Clone, Copy)]
enum Target {
    Overwrite,
    Accumulate,
    Block(usize, usize),
}

impl Target {
    fn check<T>(self, op: &'static str, dest: &Matrix<T>, n: usize) -> Result<(usize, usize)> {
        match self {
            Target::Overwrite | Target::Accumulate => {
                check_shape(op, dest.shape(), (n, n))?;
                Ok((0, 0))
            }
            Target::Block(row, col) => {
                // An empty block is a no-op wherever it sits.
                if n == 0 {
                    return Ok((row, col));
                }
                check_region(op, dest.shape(), row, col, n, n)?;
                Ok((row, col))
            }
        }
    }

    #[inline]
    fn write<T: Scalar>(self, dest: &mut Matrix<T>, i: usize, j: usize, v: T) {
        let x = dest.at_mut(i, j);
        *x = match self {
            Target::Overwrite => v,
            _ => *x + v,
        };
    }
}

/// Write `v` at `(i, j)` and `(j, i)` of the block at `origin`.
#[inline]
fn write_sym<T: Scalar>(target: Target, dest: &mut Matrix<T>, origin: (usize, usize), i: usize, j: usize, v: T) {
    let (r, c) = origin;
    target.write(dest, r + i, c + j, v);
    if i != j {
        target.write(dest, r + j, c + i, v);
    }
}

fn inner<T: Scalar>(
    op: &'static str,
    s: T,
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    dest: &mut Matrix<T>,
    target: Target,
) -> Result<()> {
    let (m, n) = b.shape();
    w.check_square(op, m)?;
    let origin = target.check(op, dest, n)?;
    if !matches!(target, Target::Overwrite) && (n == 0 || s == T::zero()) {
        return Ok(());
    }
    for i in 0..n {
        for j in i..n {
            let mut sum = T::zero();
            for k in 0..m {
                sum = sum + b.at(k, i) * w.value(k) * b.at(k, j);
            }
            write_sym(target, dest, origin, i, j, s * sum);
        }
    }
    Ok(())
}

fn outer<T: Scalar>(
    op: &'static str,
    s: T,
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    dest: &mut Matrix<T>,
    target: Target,
) -> Result<()> {
    let (m, n) = b.shape();
    w.check_square(op, n)?;
    let origin = target.check(op, dest, m)?;
    if !matches!(target, Target::Overwrite) && (m == 0 || s == T::zero()) {
        return Ok(());
    }
    for i in 0..m {
        let bi = b.row_as_slice(i, 0);
        for j in i..m {
            let bj = b.row_as_slice(j, 0);
            let mut sum = T::zero();
            for (k, (&x, &y)) in bi.iter().zip(bj).enumerate() {
                sum = sum + x * w.value(k) * y;
            }
            write_sym(target, dest, origin, i, j, s * sum);
        }
    }
    Ok(())
}

// ── Inner: Bᵀ W B ───────────────────────────────────────────────────

/// `c = bᵀ * W * b` for `b` of shape `m x n`; `c` is `n x n`.
///
/// ```
/// use structmat::{diagonal, Diagonal, Matrix};
///
/// let b = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let w = Matrix::column(&[1.0, 2.0]);
/// let mut c = Matrix::zeros(2, 2);
/// diagonal::mult_inner(&b, &Diagonal::Compact(&w), &mut c).unwrap();
/// assert_eq!(c.as_slice(), &[19.0, 26.0, 26.0, 36.0]);
/// ```
pub fn mult_inner<T: Scalar>(b: &Matrix<T>, w: &Diagonal<'_, T>, c: &mut Matrix<T>) -> Result<()> {
    inner("mult_inner", T::one(), b, w, c, Target::Overwrite)
}

/// `c += bᵀ * W * b`.
pub fn mult_add_inner<T: Scalar>(b: &Matrix<T>, w: &Diagonal<'_, T>, c: &mut Matrix<T>) -> Result<()> {
    inner("mult_add_inner", T::one(), b, w, c, Target::Accumulate)
}

/// `c += s * bᵀ * W * b`.
pub fn mult_add_inner_scaled<T: Scalar>(
    s: T,
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    c: &mut Matrix<T>,
) -> Result<()> {
    inner("mult_add_inner_scaled", s, b, w, c, Target::Accumulate)
}

/// `dest[row.., col..] += bᵀ * W * b` over an `n x n` block.
pub fn mult_add_block_inner<T: Scalar>(
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    inner("mult_add_block_inner", T::one(), b, w, dest, Target::Block(row, col))
}

/// `dest[row.., col..] += s * bᵀ * W * b`.
pub fn mult_add_block_inner_scaled<T: Scalar>(
    s: T,
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    inner("mult_add_block_inner_scaled", s, b, w, dest, Target::Block(row, col))
}

// ── Outer: B W Bᵀ ───────────────────────────────────────────────────

/// `c = b * W * bᵀ` for `b` of shape `m x n`; `c` is `m x m`.
///
/// ```
/// use structmat::{diagonal, Diagonal, Matrix};
///
/// let b = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let mut c = Matrix::zeros(2, 2);
/// diagonal::mult_outer(&b, &Diagonal::Uniform(1.0), &mut c).unwrap();
/// assert_eq!(c.as_slice(), &[5.0, 11.0, 11.0, 25.0]);
/// ```
pub fn mult_outer<T: Scalar>(b: &Matrix<T>, w: &Diagonal<'_, T>, c: &mut Matrix<T>) -> Result<()> {
    outer("mult_outer", T::one(), b, w, c, Target::Overwrite)
}

/// `c += b * W * bᵀ`.
pub fn mult_add_outer<T: Scalar>(b: &Matrix<T>, w: &Diagonal<'_, T>, c: &mut Matrix<T>) -> Result<()> {
    outer("mult_add_outer", T::one(), b, w, c, Target::Accumulate)
}

/// `c += s * b * W * bᵀ`.
pub fn mult_add_outer_scaled<T: Scalar>(
    s: T,
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    c: &mut Matrix<T>,
) -> Result<()> {
    outer("mult_add_outer_scaled", s, b, w, c, Target::Accumulate)
}

/// `dest[row.., col..] += b * W * bᵀ` over an `m x m` block.
pub fn mult_add_block_outer<T: Scalar>(
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    outer("mult_add_block_outer", T::one(), b, w, dest, Target::Block(row, col))
}

/// `dest[row.., col..] += s * b * W * bᵀ`.
pub fn mult_add_block_outer_scaled<T: Scalar>(
    s: T,
    b: &Matrix<T>,
    w: &Diagonal<'_, T>,
    dest: &mut Matrix<T>,
    row: usize,
    col: usize,
) -> Result<()> {
    outer("mult_add_block_outer_scaled", s, b, w, dest, Target::Block(row, col))
}

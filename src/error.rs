//! Error taxonomy shared by every checked entry point.

use thiserror::Error;

/// Errors from the structural matrix kernels.
///
/// Every operation validates its shape, index and aliasing preconditions
/// before the first write, so an `Err` always means the destination is
/// untouched.
///
/// ```
/// use structmat::{Matrix, MatrixError};
///
/// let m = Matrix::<f64>::zeros(2, 3);
/// assert_eq!(
///     m.get(2, 0).unwrap_err(),
///     MatrixError::IndexOutOfRange { op: "get", index: 2, bound: 2 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("{op}: dimension mismatch, expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        op: &'static str,
        /// Required `(rows, cols)`, or the minimum size for block operations.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },
    /// Row, column or diagonal index outside `[0, bound)`.
    #[error("{op}: index {index} out of range [0, {bound})")]
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        bound: usize,
    },
    /// Two index lists that must pair up element-wise differ in length.
    #[error("{op}: length mismatch, expected {expected}, got {got}")]
    LengthMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },
    /// An output region overlaps an input region the algorithm still reads.
    #[error("{op}: output aliases an input")]
    AliasingViolation { op: &'static str },
}

/// Result alias used throughout the crate.
pub type Result<T, E = MatrixError> = core::result::Result<T, E>;

#[inline]
pub(crate) fn check_index(op: &'static str, index: usize, bound: usize) -> Result<()> {
    if index >= bound {
        return Err(MatrixError::IndexOutOfRange { op, index, bound });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_shape(
    op: &'static str,
    got: (usize, usize),
    expected: (usize, usize),
) -> Result<()> {
    if got != expected {
        return Err(MatrixError::DimensionMismatch { op, expected, got });
    }
    Ok(())
}

/// Check that a `rows x cols` region at `(row, col)` fits inside `shape`.
#[inline]
pub(crate) fn check_region(
    op: &'static str,
    shape: (usize, usize),
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> Result<()> {
    let need = (row + rows, col + cols);
    if need.0 > shape.0 || need.1 > shape.1 {
        return Err(MatrixError::DimensionMismatch {
            op,
            expected: need,
            got: shape,
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_len(op: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(MatrixError::LengthMismatch { op, expected, got });
    }
    Ok(())
}

use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by operations that need `abs`, `sqrt` or NaN handling
/// (row pruning, NaN queries, decompositions).
pub trait FloatScalar: Scalar + Float {}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only, logically unchecked access to a matrix-like type.
///
/// Implementors index straight into their buffer; callers validate the
/// whole loop range once before entering the loop. Crate-private so the
/// unchecked layer can never be reached from outside.
pub(crate) trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn at(&self, row: usize, col: usize) -> T;

    /// Contiguous slice `row[col_start..ncols]`.
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T];
}

/// Mutable counterpart of [`MatrixRef`], used by in-place algorithms
/// (LU, Cholesky, QR, row editing).
pub(crate) trait MatrixMut<T>: MatrixRef<T> {
    fn at_mut(&mut self, row: usize, col: usize) -> &mut T;

    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T];
}

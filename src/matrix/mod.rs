pub mod aliases;
mod block;
mod mult;
mod rows;
mod util;

pub use aliases::*;
pub use block::BlockRegion;
pub use util::find_max_index;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::error::{check_index, Result};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Dense row-major matrix with a reusable backing buffer.
///
/// The logical shape `nrows x ncols` may be smaller than the buffer: the
/// buffer length is the capacity, and entry `(i, j)` lives at
/// `i * ncols + j`. Reshaping reuses the buffer and only grows it when
/// `nrows * ncols` exceeds the current capacity, so a matrix sized once at
/// start-up can be reshaped every control tick without allocating.
///
/// # Examples
///
/// ```
/// use structmat::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let mut b = Matrix::<f64>::with_capacity(0, 0, 64);
/// b.reshape(4, 4);
/// assert_eq!(b.capacity(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Create an `nrows x ncols` matrix of zeros.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, T::zero())
    }

    /// Create an `nrows x ncols` matrix of zeros whose buffer holds at least
    /// `capacity` elements.
    pub fn with_capacity(nrows: usize, ncols: usize, capacity: usize) -> Self {
        Self {
            data: vec![T::zero(); capacity.max(nrows * ncols)],
            nrows,
            ncols,
        }
    }

    /// Create a matrix filled with `value`.
    pub fn filled(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an `n x n` identity matrix.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let id = Matrix::<f64>::identity(3);
    /// assert_eq!(id[(0, 0)], 1.0);
    /// assert_eq!(id[(0, 1)], 0.0);
    /// ```
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self {
            data: row_major.to_vec(),
            nrows,
            ncols,
        }
    }

    /// Create an `n x 1` column vector.
    ///
    /// This is also the compact representation of a diagonal operator.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let v = Matrix::column(&[2.0, 3.0, 4.0]);
    /// assert_eq!((v.nrows(), v.ncols()), (3, 1));
    /// ```
    pub fn column(values: &[T]) -> Self {
        Self::from_rows(values.len(), 1, values)
    }

    /// Create a matrix from an owned `Vec<T>` in row-major order.
    ///
    /// The vector may be longer than `nrows * ncols`; the excess becomes
    /// spare capacity. Panics if it is shorter.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert!(
            data.len() >= nrows * ncols,
            "vec length {} too short for {}x{} matrix",
            data.len(),
            nrows,
            ncols,
        );
        Self { data, nrows, ncols }
    }

    /// Set the logical shape, growing the buffer only when needed.
    ///
    /// Contents after a reshape are unspecified: existing buffer entries are
    /// reinterpreted under the new shape and any grown tail is zero. Use
    /// [`reshape_zeroed`](Self::reshape_zeroed) when the caller needs zeros,
    /// or [`remove_row`](Self::remove_row) /
    /// [`remove_column`](Self::remove_column) to shrink while preserving
    /// content.
    pub fn reshape(&mut self, nrows: usize, ncols: usize) {
        let len = nrows * ncols;
        if len > self.data.len() {
            self.data.resize(len, T::zero());
        }
        self.nrows = nrows;
        self.ncols = ncols;
    }

    /// Reshape and zero the logical region.
    pub fn reshape_zeroed(&mut self, nrows: usize, ncols: usize) {
        self.reshape(nrows, ncols);
        self.zero();
    }

    /// Reshape to `other`'s shape and copy its contents.
    pub fn copy_from(&mut self, other: &Matrix<T>) {
        self.reshape(other.nrows, other.ncols);
        let len = other.len();
        self.data[..len].copy_from_slice(&other.data[..len]);
    }

    /// Set every logical entry to zero.
    pub fn zero(&mut self) {
        self.fill(T::zero());
    }

    /// Set every logical entry to `value`.
    pub fn fill(&mut self, value: T) {
        let len = self.len();
        for x in self.data[..len].iter_mut() {
            *x = value;
        }
    }

    /// Checked read of `(row, col)`.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let m = Matrix::from_rows(1, 2, &[1.0, 2.0]);
    /// assert_eq!(m.get(0, 1), Ok(2.0));
    /// assert!(m.get(1, 0).is_err());
    /// ```
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        check_index("get", row, self.nrows)?;
        check_index("get", col, self.ncols)?;
        Ok(self.data[row * self.ncols + col])
    }

    /// Checked write of `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index("set", row, self.nrows)?;
        check_index("set", col, self.ncols)?;
        self.data[row * self.ncols + col] = value;
        Ok(())
    }

    /// Checked `self[(row, col)] += value`.
    pub fn add_at(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index("add_at", row, self.nrows)?;
        check_index("add_at", col, self.ncols)?;
        let idx = row * self.ncols + col;
        self.data[idx] = self.data[idx] + value;
        Ok(())
    }
}

impl<T> Matrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of logical elements, `nrows * ncols`.
    #[inline]
    pub fn len(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Whether the matrix has no logical elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the backing buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Whether the matrix is a single column.
    #[inline]
    pub fn is_column(&self) -> bool {
        self.ncols == 1
    }

    /// Logical entries in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.nrows * self.ncols]
    }

    /// Mutable logical entries in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.nrows * self.ncols;
        &mut self.data[..len]
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// assert_eq!(m[(1, 1)], 4.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Set the logical shape without touching the buffer. The caller
    /// guarantees `nrows * ncols <= capacity`.
    #[inline]
    pub(crate) fn set_shape(&mut self, nrows: usize, ncols: usize) {
        debug_assert!(nrows * ncols <= self.data.len());
        self.nrows = nrows;
        self.ncols = ncols;
    }

    #[inline]
    pub(crate) fn raw_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

// ── Equality on the logical region ──────────────────────────────────

impl<T: PartialEq> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self.as_slice() == other.as_slice()
    }
}

// ── Unchecked layer ─────────────────────────────────────────────────

impl<T: Copy> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self.data[row * self.ncols + col]
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        let start = row * self.ncols;
        &self.data[start + col_start..start + self.ncols]
    }
}

impl<T: Copy> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        let start = row * self.ncols;
        let end = start + self.ncols;
        &mut self.data[start + col_start..end]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols,
        );
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols,
        );
        &mut self.data[row * self.ncols + col]
    }
}

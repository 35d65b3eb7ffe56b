use crate::error::{check_index, check_region, check_shape, MatrixError, Result};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::Matrix;

/// A `rows x cols` rectangle copied from `(src_row, src_col)` of a source
/// into `(dest_row, dest_col)` of a destination.
///
/// An empty region (`rows == 0` or `cols == 0`) is a no-op for every block
/// operation: nothing is validated and nothing is written.
///
/// ```
/// use structmat::{BlockRegion, Matrix};
///
/// let src = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let mut dest = Matrix::<f64>::zeros(3, 3);
/// dest.set_block(BlockRegion::new(1, 1, 0, 0, 2, 2), &src, 2.0).unwrap();
/// assert_eq!(dest[(1, 1)], 2.0);
/// assert_eq!(dest[(2, 2)], 8.0);
/// assert_eq!(dest[(0, 0)], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockRegion {
    pub dest_row: usize,
    pub dest_col: usize,
    pub src_row: usize,
    pub src_col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl BlockRegion {
    pub fn new(
        dest_row: usize,
        dest_col: usize,
        src_row: usize,
        src_col: usize,
        rows: usize,
        cols: usize,
    ) -> Self {
        Self {
            dest_row,
            dest_col,
            src_row,
            src_col,
            rows,
            cols,
        }
    }

    /// The whole of `src`, placed at `(dest_row, dest_col)`.
    pub fn whole<T>(src: &Matrix<T>, dest_row: usize, dest_col: usize) -> Self {
        Self::new(dest_row, dest_col, 0, 0, src.nrows(), src.ncols())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether the source and destination rectangles intersect when both
    /// live in the same matrix.
    pub fn overlaps(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let rows_meet = self.dest_row < self.src_row + self.rows
            && self.src_row < self.dest_row + self.rows;
        let cols_meet = self.dest_col < self.src_col + self.cols
            && self.src_col < self.dest_col + self.cols;
        rows_meet && cols_meet
    }

    fn check(
        &self,
        op: &'static str,
        dest: (usize, usize),
        src: (usize, usize),
    ) -> Result<()> {
        check_region(op, dest, self.dest_row, self.dest_col, self.rows, self.cols)?;
        check_region(op, src, self.src_row, self.src_col, self.rows, self.cols)
    }
}

// ── Block copy / accumulate ─────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// `self[region.dest] = scale * src[region.src]`.
    ///
    /// Both matrices must contain the whole region.
    pub fn set_block(&mut self, region: BlockRegion, src: &Matrix<T>, scale: T) -> Result<()> {
        if region.is_empty() {
            return Ok(());
        }
        region.check("set_block", self.shape(), src.shape())?;
        for r in 0..region.rows {
            let s = &src.row_as_slice(region.src_row + r, region.src_col)[..region.cols];
            let d = &mut self.row_as_mut_slice(region.dest_row + r, region.dest_col)
                [..region.cols];
            if scale == T::one() {
                d.copy_from_slice(s);
            } else {
                for (dv, &sv) in d.iter_mut().zip(s) {
                    *dv = scale * sv;
                }
            }
        }
        Ok(())
    }

    /// `self[region.dest] += scale * src[region.src]`.
    ///
    /// A zero `scale` validates the region and returns without writing.
    ///
    /// ```
    /// use structmat::{BlockRegion, Matrix};
    ///
    /// let src = Matrix::from_rows(1, 2, &[1.0_f64, 1.0]);
    /// let mut dest = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// dest.add_block(BlockRegion::new(1, 0, 0, 0, 1, 2), &src, 0.5).unwrap();
    /// assert_eq!(dest.as_slice(), &[1.0, 2.0, 3.5, 4.5]);
    /// ```
    pub fn add_block(&mut self, region: BlockRegion, src: &Matrix<T>, scale: T) -> Result<()> {
        if region.is_empty() {
            return Ok(());
        }
        region.check("add_block", self.shape(), src.shape())?;
        if scale == T::zero() {
            return Ok(());
        }
        for r in 0..region.rows {
            let s = &src.row_as_slice(region.src_row + r, region.src_col)[..region.cols];
            let d = &mut self.row_as_mut_slice(region.dest_row + r, region.dest_col)
                [..region.cols];
            for (dv, &sv) in d.iter_mut().zip(s) {
                *dv = *dv + scale * sv;
            }
        }
        Ok(())
    }

    /// `self[region.dest] -= scale * src[region.src]`.
    pub fn subtract_block(
        &mut self,
        region: BlockRegion,
        src: &Matrix<T>,
        scale: T,
    ) -> Result<()> {
        if region.is_empty() {
            return Ok(());
        }
        region.check("subtract_block", self.shape(), src.shape())?;
        if scale == T::zero() {
            return Ok(());
        }
        for r in 0..region.rows {
            let s = &src.row_as_slice(region.src_row + r, region.src_col)[..region.cols];
            let d = &mut self.row_as_mut_slice(region.dest_row + r, region.dest_col)
                [..region.cols];
            for (dv, &sv) in d.iter_mut().zip(s) {
                *dv = *dv - scale * sv;
            }
        }
        Ok(())
    }

    /// Copy one block of `self` onto another block of `self`.
    ///
    /// Overlapping source and destination rectangles are rejected with
    /// [`MatrixError::AliasingViolation`].
    ///
    /// ```
    /// use structmat::{BlockRegion, Matrix, MatrixError};
    ///
    /// let mut m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// m.set_block_within(BlockRegion::new(0, 2, 0, 0, 3, 1), 1.0).unwrap();
    /// assert_eq!(m[(2, 2)], 6.0);
    ///
    /// let err = m.set_block_within(BlockRegion::new(0, 0, 1, 1, 2, 2), 1.0);
    /// assert_eq!(err, Err(MatrixError::AliasingViolation { op: "set_block_within" }));
    /// ```
    pub fn set_block_within(&mut self, region: BlockRegion, scale: T) -> Result<()> {
        self.block_within("set_block_within", region, scale, false)
    }

    /// Accumulate one block of `self` into another, non-overlapping block.
    pub fn add_block_within(&mut self, region: BlockRegion, scale: T) -> Result<()> {
        self.block_within("add_block_within", region, scale, true)
    }

    fn block_within(
        &mut self,
        op: &'static str,
        region: BlockRegion,
        scale: T,
        accumulate: bool,
    ) -> Result<()> {
        if region.is_empty() {
            return Ok(());
        }
        region.check(op, self.shape(), self.shape())?;
        if region.overlaps() {
            return Err(MatrixError::AliasingViolation { op });
        }
        if accumulate && scale == T::zero() {
            return Ok(());
        }
        let n = self.ncols();
        let data = self.raw_mut();
        for r in 0..region.rows {
            let s0 = (region.src_row + r) * n + region.src_col;
            let d0 = (region.dest_row + r) * n + region.dest_col;
            for c in 0..region.cols {
                let v = scale * data[s0 + c];
                data[d0 + c] = if accumulate { data[d0 + c] + v } else { v };
            }
        }
        Ok(())
    }

    /// Copy all of `src` into `self` at `(row, col)`.
    pub fn insert(&mut self, src: &Matrix<T>, row: usize, col: usize) -> Result<()> {
        self.set_block(BlockRegion::whole(src, row, col), src, T::one())
    }

    /// Copy `scale * src` into `self` at `(row, col)`.
    pub fn insert_scaled(
        &mut self,
        scale: T,
        src: &Matrix<T>,
        row: usize,
        col: usize,
    ) -> Result<()> {
        self.set_block(BlockRegion::whole(src, row, col), src, scale)
    }

    /// Reshape `self` to `rows x cols` and fill it with the block of `src`
    /// starting at `(src_row, src_col)`.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let src = Matrix::from_fn(4, 4, |i, j| (i * 4 + j) as f64);
    /// let mut out = Matrix::<f64>::with_capacity(0, 0, 16);
    /// out.extract_block(&src, 1, 2, 2, 2).unwrap();
    /// assert_eq!(out.as_slice(), &[6.0, 7.0, 10.0, 11.0]);
    /// ```
    pub fn extract_block(
        &mut self,
        src: &Matrix<T>,
        src_row: usize,
        src_col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        check_region("extract_block", src.shape(), src_row, src_col, rows, cols)?;
        self.reshape(rows, cols);
        self.set_block(BlockRegion::new(0, 0, src_row, src_col, rows, cols), src, T::one())
    }
}

// ── Permuted extraction ─────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Copy rows `indices[k]` of `src` into consecutive rows of `self`
    /// starting at `dest_row`, keeping the order of `indices`.
    ///
    /// Duplicate indices are allowed. `self` and `src` must have the same
    /// column count.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let src = Matrix::from_fn(3, 2, |i, j| (i * 2 + j) as f64);
    /// let mut dest = Matrix::<f64>::zeros(3, 2);
    /// dest.extract_rows(&src, &[2, 0, 2], 0).unwrap();
    /// assert_eq!(dest.as_slice(), &[4.0, 5.0, 0.0, 1.0, 4.0, 5.0]);
    /// ```
    pub fn extract_rows(&mut self, src: &Matrix<T>, indices: &[usize], dest_row: usize) -> Result<()> {
        const OP: &str = "extract_rows";
        check_shape(OP, src.shape(), (src.nrows(), self.ncols()))?;
        check_region(OP, self.shape(), dest_row, 0, indices.len(), self.ncols())?;
        for &i in indices {
            check_index(OP, i, src.nrows())?;
        }
        for (k, &i) in indices.iter().enumerate() {
            self.row_as_mut_slice(dest_row + k, 0)
                .copy_from_slice(src.row_as_slice(i, 0));
        }
        Ok(())
    }

    /// Copy columns `indices[k]` of `src` into consecutive columns of `self`
    /// starting at `dest_col`, keeping the order of `indices`.
    pub fn extract_columns(
        &mut self,
        src: &Matrix<T>,
        indices: &[usize],
        dest_col: usize,
    ) -> Result<()> {
        const OP: &str = "extract_columns";
        check_shape(OP, src.shape(), (self.nrows(), src.ncols()))?;
        check_region(OP, self.shape(), 0, dest_col, self.nrows(), indices.len())?;
        for &j in indices {
            check_index(OP, j, src.ncols())?;
        }
        for r in 0..self.nrows() {
            for (k, &j) in indices.iter().enumerate() {
                *self.at_mut(r, dest_col + k) = src.at(r, j);
            }
        }
        Ok(())
    }

    /// `self[a][b] = src[rows[a]][cols[b]]`.
    ///
    /// `self` must already be `rows.len() x cols.len()`.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let src = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let mut out = Matrix::<f64>::zeros(2, 2);
    /// out.gather(&src, &[2, 0], &[1, 2]).unwrap();
    /// assert_eq!(out.as_slice(), &[7.0, 8.0, 1.0, 2.0]);
    /// ```
    pub fn gather(&mut self, src: &Matrix<T>, rows: &[usize], cols: &[usize]) -> Result<()> {
        const OP: &str = "gather";
        check_shape(OP, self.shape(), (rows.len(), cols.len()))?;
        for &i in rows {
            check_index(OP, i, src.nrows())?;
        }
        for &j in cols {
            check_index(OP, j, src.ncols())?;
        }
        for (a, &i) in rows.iter().enumerate() {
            for (b, &j) in cols.iter().enumerate() {
                *self.at_mut(a, b) = src.at(i, j);
            }
        }
        Ok(())
    }
}

// ── Region fill / scale / diagonal ──────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Set every entry of the `rows x cols` block at `(row, col)` to `value`.
    pub fn fill_block(
        &mut self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
        value: T,
    ) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        check_region("fill_block", self.shape(), row, col, rows, cols)?;
        for r in row..row + rows {
            for x in self.row_as_mut_slice(r, col)[..cols].iter_mut() {
                *x = value;
            }
        }
        Ok(())
    }

    /// Zero the `rows x cols` block at `(row, col)`.
    pub fn zero_block(&mut self, row: usize, col: usize, rows: usize, cols: usize) -> Result<()> {
        self.fill_block(row, col, rows, cols, T::zero())
    }

    /// Multiply the `rows x cols` block at `(row, col)` by `scale`.
    pub fn scale_block(
        &mut self,
        scale: T,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        check_region("scale_block", self.shape(), row, col, rows, cols)?;
        for r in row..row + rows {
            for x in self.row_as_mut_slice(r, col)[..cols].iter_mut() {
                *x = scale * *x;
            }
        }
        Ok(())
    }

    /// Set the diagonal of the `size x size` block at `(row, col)` to
    /// `value`. Off-diagonal entries of the block are left alone.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let mut m = Matrix::<f64>::zeros(3, 4);
    /// m.fill_diagonal(0, 1, 2, 5.0).unwrap();
    /// assert_eq!(m[(0, 1)], 5.0);
    /// assert_eq!(m[(1, 2)], 5.0);
    /// assert_eq!(m[(2, 3)], 0.0);
    /// ```
    pub fn fill_diagonal(&mut self, row: usize, col: usize, size: usize, value: T) -> Result<()> {
        if size == 0 {
            return Ok(());
        }
        check_region("fill_diagonal", self.shape(), row, col, size, size)?;
        for k in 0..size {
            *self.at_mut(row + k, col + k) = value;
        }
        Ok(())
    }

    /// Add `value` to every main-diagonal entry (`min(nrows, ncols)` of them).
    pub fn add_diagonal(&mut self, value: T) {
        for k in 0..self.nrows().min(self.ncols()) {
            let x = self.at_mut(k, k);
            *x = *x + value;
        }
    }

    /// Set every main-diagonal entry to `value`.
    pub fn set_diagonal(&mut self, value: T) {
        for k in 0..self.nrows().min(self.ncols()) {
            *self.at_mut(k, k) = value;
        }
    }
}

use log::trace;

use crate::error::{check_index, check_len, check_region, check_shape, MatrixError, Result};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

use super::Matrix;

// ── Remove ──────────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Remove row `i`, shifting later rows up. The buffer is reused.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let mut m = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    /// m.remove_row(1).unwrap();
    /// assert_eq!(m, Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 7.0, 8.0, 9.0]));
    /// ```
    pub fn remove_row(&mut self, i: usize) -> Result<()> {
        check_index("remove_row", i, self.nrows())?;
        self.remove_row_unchecked(i);
        Ok(())
    }

    fn remove_row_unchecked(&mut self, i: usize) {
        let (rows, cols) = self.shape();
        self.raw_mut()
            .copy_within((i + 1) * cols..rows * cols, i * cols);
        self.set_shape(rows - 1, cols);
    }

    /// Remove column `j`, compacting the remaining entries in place.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let mut m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// m.remove_column(0).unwrap();
    /// assert_eq!(m, Matrix::from_rows(2, 2, &[2.0, 3.0, 5.0, 6.0]));
    /// ```
    pub fn remove_column(&mut self, j: usize) -> Result<()> {
        check_index("remove_column", j, self.ncols())?;
        let (rows, cols) = self.shape();
        let new_cols = cols - 1;
        let data = self.raw_mut();
        // Destinations never run ahead of sources, so a forward pass is safe.
        for r in 0..rows {
            let src = r * cols;
            let dst = r * new_cols;
            data.copy_within(src..src + j, dst);
            data.copy_within(src + j + 1..src + cols, dst + j);
        }
        self.set_shape(rows, new_cols);
        Ok(())
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Remove every row in `start..=end` whose L1 norm is at most `epsilon`.
    ///
    /// Rows are scanned from `end` down to `start` so earlier indices stay
    /// valid while removing. Returns the number of rows removed.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let mut m = Matrix::from_rows(3, 3, &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
    /// assert_eq!(m.remove_zero_rows(0, 2, 1e-12), Ok(2));
    /// assert_eq!(m, Matrix::from_rows(1, 3, &[1.0, 2.0, 3.0]));
    /// ```
    pub fn remove_zero_rows(&mut self, start: usize, end: usize, epsilon: T) -> Result<usize> {
        const OP: &str = "remove_zero_rows";
        check_index(OP, end, self.nrows())?;
        if start > end {
            return Err(MatrixError::IndexOutOfRange {
                op: OP,
                index: start,
                bound: end + 1,
            });
        }
        Ok(self.prune_rows(start, end, epsilon))
    }

    /// [`remove_zero_rows`](Self::remove_zero_rows) over every row.
    pub fn remove_all_zero_rows(&mut self, epsilon: T) -> usize {
        if self.nrows() == 0 {
            return 0;
        }
        self.prune_rows(0, self.nrows() - 1, epsilon)
    }

    fn prune_rows(&mut self, start: usize, end: usize, epsilon: T) -> usize {
        let mut removed = 0;
        for i in (start..=end).rev() {
            let l1 = self
                .row_as_slice(i, 0)
                .iter()
                .fold(T::zero(), |acc, &x| acc + x.abs());
            if l1 <= epsilon {
                self.remove_row_unchecked(i);
                removed += 1;
            }
        }
        trace!("pruned {} zero rows from [{}, {}]", removed, start, end);
        removed
    }
}

// ── Swap / zero / scale / fill ──────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Exchange rows `i` and `j`. `i == j` is a no-op.
    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        check_index("swap_rows", i, self.nrows())?;
        check_index("swap_rows", j, self.nrows())?;
        if i == j {
            return Ok(());
        }
        let cols = self.ncols();
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (head, tail) = self.raw_mut().split_at_mut(hi * cols);
        head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
        Ok(())
    }

    /// Exchange columns `i` and `j`. `i == j` is a no-op.
    pub fn swap_columns(&mut self, i: usize, j: usize) -> Result<()> {
        check_index("swap_columns", i, self.ncols())?;
        check_index("swap_columns", j, self.ncols())?;
        if i == j {
            return Ok(());
        }
        for r in 0..self.nrows() {
            self.row_as_mut_slice(r, 0).swap(i, j);
        }
        Ok(())
    }

    pub fn zero_row(&mut self, i: usize) -> Result<()> {
        check_index("zero_row", i, self.nrows())?;
        for x in self.row_as_mut_slice(i, 0) {
            *x = T::zero();
        }
        Ok(())
    }

    pub fn zero_column(&mut self, j: usize) -> Result<()> {
        self.fill_column(j, T::zero())
    }

    /// Set every entry of column `j` to `value`.
    pub fn fill_column(&mut self, j: usize, value: T) -> Result<()> {
        check_index("fill_column", j, self.ncols())?;
        for r in 0..self.nrows() {
            *self.at_mut(r, j) = value;
        }
        Ok(())
    }

    /// Multiply row `i` by `s`.
    pub fn scale_row(&mut self, s: T, i: usize) -> Result<()> {
        check_index("scale_row", i, self.nrows())?;
        for x in self.row_as_mut_slice(i, 0) {
            *x = s * *x;
        }
        Ok(())
    }

    /// Multiply column `j` by `s`.
    pub fn scale_column(&mut self, s: T, j: usize) -> Result<()> {
        check_index("scale_column", j, self.ncols())?;
        for r in 0..self.nrows() {
            let x = self.at_mut(r, j);
            *x = s * *x;
        }
        Ok(())
    }
}

// ── Row copy / accumulate ───────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    fn check_row_pair(
        &self,
        op: &'static str,
        src: &Matrix<T>,
        src_row: usize,
        dest_row: usize,
    ) -> Result<()> {
        check_shape(op, src.shape(), (src.nrows(), self.ncols()))?;
        check_index(op, src_row, src.nrows())?;
        check_index(op, dest_row, self.nrows())
    }

    fn write_row(&mut self, s: T, src: &Matrix<T>, src_row: usize, dest_row: usize, accumulate: bool) {
        let from = src.row_as_slice(src_row, 0);
        let to = self.row_as_mut_slice(dest_row, 0);
        for (d, &v) in to.iter_mut().zip(from) {
            *d = if accumulate { *d + s * v } else { s * v };
        }
    }

    /// Copy row `src_row` of `src` into row `dest_row` of `self`.
    ///
    /// Both matrices must have the same column count.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let src = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let mut m = Matrix::<f64>::zeros(3, 2);
    /// m.set_row(&src, 1, 2).unwrap();
    /// assert_eq!(m.as_slice(), &[0.0, 0.0, 0.0, 0.0, 3.0, 4.0]);
    /// ```
    pub fn set_row(&mut self, src: &Matrix<T>, src_row: usize, dest_row: usize) -> Result<()> {
        self.check_row_pair("set_row", src, src_row, dest_row)?;
        self.write_row(T::one(), src, src_row, dest_row, false);
        Ok(())
    }

    /// `self[dest_row] = s * src[src_row]`.
    pub fn set_row_scaled(
        &mut self,
        s: T,
        src: &Matrix<T>,
        src_row: usize,
        dest_row: usize,
    ) -> Result<()> {
        self.check_row_pair("set_row_scaled", src, src_row, dest_row)?;
        self.write_row(s, src, src_row, dest_row, false);
        Ok(())
    }

    /// `self[dest_row] += src[src_row]`.
    pub fn add_row(&mut self, src: &Matrix<T>, src_row: usize, dest_row: usize) -> Result<()> {
        self.check_row_pair("add_row", src, src_row, dest_row)?;
        self.write_row(T::one(), src, src_row, dest_row, true);
        Ok(())
    }

    /// `self[dest_row] += s * src[src_row]`.
    pub fn add_row_scaled(
        &mut self,
        s: T,
        src: &Matrix<T>,
        src_row: usize,
        dest_row: usize,
    ) -> Result<()> {
        self.check_row_pair("add_row_scaled", src, src_row, dest_row)?;
        self.write_row(s, src, src_row, dest_row, true);
        Ok(())
    }

    fn check_row_batch(
        &self,
        op: &'static str,
        src_rows: &[usize],
        src: &Matrix<T>,
        dest_rows: &[usize],
    ) -> Result<()> {
        check_len(op, dest_rows.len(), src_rows.len())?;
        check_shape(op, src.shape(), (src.nrows(), self.ncols()))?;
        for (&s, &d) in src_rows.iter().zip(dest_rows) {
            check_index(op, s, src.nrows())?;
            check_index(op, d, self.nrows())?;
        }
        Ok(())
    }

    /// `self[dest_rows[k]] = src[src_rows[k]]` for every `k`.
    ///
    /// Every pair is validated before the first write.
    pub fn set_rows(&mut self, src_rows: &[usize], src: &Matrix<T>, dest_rows: &[usize]) -> Result<()> {
        self.check_row_batch("set_rows", src_rows, src, dest_rows)?;
        for (&s, &d) in src_rows.iter().zip(dest_rows) {
            self.write_row(T::one(), src, s, d, false);
        }
        Ok(())
    }

    /// `self[dest_rows[k]] += src[src_rows[k]]` for every `k`.
    pub fn add_rows(&mut self, src_rows: &[usize], src: &Matrix<T>, dest_rows: &[usize]) -> Result<()> {
        self.check_row_batch("add_rows", src_rows, src, dest_rows)?;
        for (&s, &d) in src_rows.iter().zip(dest_rows) {
            self.write_row(T::one(), src, s, d, true);
        }
        Ok(())
    }

    /// Write `values` down column `col`, starting at `start_row`.
    pub fn set_column_from_slice(&mut self, col: usize, values: &[T], start_row: usize) -> Result<()> {
        const OP: &str = "set_column_from_slice";
        check_index(OP, col, self.ncols())?;
        check_region(OP, self.shape(), start_row, col, values.len(), 1)?;
        for (k, &v) in values.iter().enumerate() {
            *self.at_mut(start_row + k, col) = v;
        }
        Ok(())
    }
}

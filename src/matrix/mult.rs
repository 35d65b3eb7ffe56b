use crate::error::{check_index, check_region, check_shape, MatrixError, Result};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::Matrix;

/// Which operands of a product are read transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Nn,
    Tn,
    Nt,
    Tt,
}

impl Layout {
    /// `(trans_a, trans_b)`.
    fn flags(self) -> (bool, bool) {
        match self {
            Layout::Nn => (false, false),
            Layout::Tn => (true, false),
            Layout::Nt => (false, true),
            Layout::Tt => (true, true),
        }
    }

    #[inline]
    fn op_shape<T>(trans: bool, m: &Matrix<T>) -> (usize, usize) {
        if trans {
            (m.ncols(), m.nrows())
        } else {
            m.shape()
        }
    }
}

// ── General product kernel ──────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Write or accumulate `s * op(a) * op(b)` into the block of `self` at
    /// `(row, col)`. All validation happens before the first write.
    #[allow(clippy::too_many_arguments)]
    fn gemm_block(
        &mut self,
        op: &'static str,
        s: T,
        a: &Matrix<T>,
        b: &Matrix<T>,
        layout: Layout,
        accumulate: bool,
        row: usize,
        col: usize,
    ) -> Result<()> {
        let (ta, tb) = layout.flags();
        let (m, k) = Layout::op_shape(ta, a);
        let (kb, n) = Layout::op_shape(tb, b);
        if k != kb {
            return Err(MatrixError::DimensionMismatch {
                op,
                expected: (k, n),
                got: (kb, n),
            });
        }
        if m == 0 || n == 0 {
            return Ok(());
        }
        check_region(op, self.shape(), row, col, m, n)?;

        if !accumulate {
            for r in row..row + m {
                for x in self.row_as_mut_slice(r, col)[..n].iter_mut() {
                    *x = T::zero();
                }
            }
        }
        if k == 0 || s == T::zero() {
            return Ok(());
        }

        match layout {
            Layout::Nn => {
                for i in 0..m {
                    for p in 0..k {
                        let aip = s * a.at(i, p);
                        let brow = &b.row_as_slice(p, 0)[..n];
                        let crow = &mut self.row_as_mut_slice(row + i, col)[..n];
                        for (c, &bv) in crow.iter_mut().zip(brow) {
                            *c = *c + aip * bv;
                        }
                    }
                }
            }
            Layout::Tn => {
                for p in 0..k {
                    let arow = a.row_as_slice(p, 0);
                    let brow = &b.row_as_slice(p, 0)[..n];
                    for (i, &av) in arow.iter().enumerate() {
                        let aip = s * av;
                        let crow = &mut self.row_as_mut_slice(row + i, col)[..n];
                        for (c, &bv) in crow.iter_mut().zip(brow) {
                            *c = *c + aip * bv;
                        }
                    }
                }
            }
            Layout::Nt => {
                for i in 0..m {
                    let arow = a.row_as_slice(i, 0);
                    for j in 0..n {
                        let brow = b.row_as_slice(j, 0);
                        let mut sum = T::zero();
                        for (&av, &bv) in arow.iter().zip(brow) {
                            sum = sum + av * bv;
                        }
                        let c = self.at_mut(row + i, col + j);
                        *c = *c + s * sum;
                    }
                }
            }
            Layout::Tt => {
                for i in 0..m {
                    for j in 0..n {
                        let mut sum = T::zero();
                        for p in 0..k {
                            sum = sum + a.at(p, i) * b.at(j, p);
                        }
                        let c = self.at_mut(row + i, col + j);
                        *c = *c + s * sum;
                    }
                }
            }
        }
        Ok(())
    }

    /// Whole-matrix product: `self` must be exactly the product's shape.
    fn gemm(
        &mut self,
        op: &'static str,
        s: T,
        a: &Matrix<T>,
        b: &Matrix<T>,
        layout: Layout,
        accumulate: bool,
    ) -> Result<()> {
        let (ta, tb) = layout.flags();
        let m = Layout::op_shape(ta, a).0;
        let n = Layout::op_shape(tb, b).1;
        check_shape(op, self.shape(), (m, n))?;
        self.gemm_block(op, s, a, b, layout, accumulate, 0, 0)
    }
}

// ── Overwrite / accumulate products ─────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// `self = a * b`.
    ///
    /// `self` must already be `a.nrows() x b.ncols()`. A zero inner
    /// dimension leaves `self` all zeros.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let a = Matrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let b = Matrix::from_rows(3, 1, &[1.0, 0.0, -1.0]);
    /// let mut c = Matrix::zeros(2, 1);
    /// c.mult(&a, &b).unwrap();
    /// assert_eq!(c.as_slice(), &[-2.0, -2.0]);
    /// ```
    pub fn mult(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult", T::one(), a, b, Layout::Nn, false)
    }

    /// `self = s * a * b`.
    pub fn mult_scaled(&mut self, s: T, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_scaled", s, a, b, Layout::Nn, false)
    }

    /// `self += a * b`. A zero inner dimension leaves `self` unchanged.
    pub fn mult_add(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_add", T::one(), a, b, Layout::Nn, true)
    }

    /// `self += s * a * b`.
    pub fn mult_add_scaled(&mut self, s: T, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_add_scaled", s, a, b, Layout::Nn, true)
    }

    /// `self = aᵀ * b`.
    pub fn mult_trans_a(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_trans_a", T::one(), a, b, Layout::Tn, false)
    }

    /// `self = s * aᵀ * b`.
    pub fn mult_trans_a_scaled(&mut self, s: T, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_trans_a_scaled", s, a, b, Layout::Tn, false)
    }

    /// `self += aᵀ * b`.
    pub fn mult_add_trans_a(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_add_trans_a", T::one(), a, b, Layout::Tn, true)
    }

    /// `self += s * aᵀ * b`.
    pub fn mult_add_trans_a_scaled(&mut self, s: T, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_add_trans_a_scaled", s, a, b, Layout::Tn, true)
    }

    /// `self = a * bᵀ`.
    pub fn mult_trans_b(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_trans_b", T::one(), a, b, Layout::Nt, false)
    }

    /// `self = s * a * bᵀ`.
    pub fn mult_trans_b_scaled(&mut self, s: T, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_trans_b_scaled", s, a, b, Layout::Nt, false)
    }

    /// `self += a * bᵀ`.
    pub fn mult_add_trans_b(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_add_trans_b", T::one(), a, b, Layout::Nt, true)
    }

    /// `self += s * a * bᵀ`.
    pub fn mult_add_trans_b_scaled(&mut self, s: T, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_add_trans_b_scaled", s, a, b, Layout::Nt, true)
    }

    /// `self = aᵀ * bᵀ`.
    pub fn mult_trans_ab(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        self.gemm("mult_trans_ab", T::one(), a, b, Layout::Tt, false)
    }
}

// ── Block-accumulating products ─────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// `self[row.., col..] += a * b` over the `a.nrows() x b.ncols()` block.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let a = Matrix::from_rows(1, 2, &[1.0_f64, 2.0]);
    /// let b = Matrix::from_rows(2, 1, &[3.0, 4.0]);
    /// let mut c = Matrix::filled(3, 3, 1.0);
    /// c.mult_add_block(&a, &b, 2, 1).unwrap();
    /// assert_eq!(c[(2, 1)], 12.0);
    /// assert_eq!(c[(1, 1)], 1.0);
    /// ```
    pub fn mult_add_block(&mut self, a: &Matrix<T>, b: &Matrix<T>, row: usize, col: usize) -> Result<()> {
        self.gemm_block("mult_add_block", T::one(), a, b, Layout::Nn, true, row, col)
    }

    /// `self[row.., col..] += s * a * b`.
    pub fn mult_add_block_scaled(
        &mut self,
        s: T,
        a: &Matrix<T>,
        b: &Matrix<T>,
        row: usize,
        col: usize,
    ) -> Result<()> {
        self.gemm_block("mult_add_block_scaled", s, a, b, Layout::Nn, true, row, col)
    }

    /// `self[row.., col..] = a * b` over the `a.nrows() x b.ncols()` block.
    pub fn mult_block(&mut self, a: &Matrix<T>, b: &Matrix<T>, row: usize, col: usize) -> Result<()> {
        self.gemm_block("mult_block", T::one(), a, b, Layout::Nn, false, row, col)
    }

    /// `self[row.., col..] += aᵀ * b` over the `a.ncols() x b.ncols()` block.
    pub fn mult_add_block_trans_a(
        &mut self,
        a: &Matrix<T>,
        b: &Matrix<T>,
        row: usize,
        col: usize,
    ) -> Result<()> {
        self.gemm_block("mult_add_block_trans_a", T::one(), a, b, Layout::Tn, true, row, col)
    }

    /// `self[row.., col..] += s * aᵀ * b`.
    pub fn mult_add_block_trans_a_scaled(
        &mut self,
        s: T,
        a: &Matrix<T>,
        b: &Matrix<T>,
        row: usize,
        col: usize,
    ) -> Result<()> {
        self.gemm_block("mult_add_block_trans_a_scaled", s, a, b, Layout::Tn, true, row, col)
    }
}

// ── Quadratic form ──────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    fn check_quad(op: &'static str, a: &Matrix<T>, w: &Matrix<T>) -> Result<()> {
        check_shape(op, w.shape(), (a.nrows(), a.nrows()))
    }

    /// `self = aᵀ * w * a` for a dense `w`.
    ///
    /// `tmp` is scratch space; it is reshaped to `a.nrows() x a.ncols()` and
    /// only grows its buffer when it is too small.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let a = Matrix::from_rows(2, 1, &[1.0_f64, 2.0]);
    /// let w = Matrix::from_rows(2, 2, &[2.0, 0.0, 0.0, 3.0]);
    /// let mut tmp = Matrix::zeros(0, 0);
    /// let mut c = Matrix::zeros(1, 1);
    /// c.mult_quad(&a, &w, &mut tmp).unwrap();
    /// assert_eq!(c[(0, 0)], 14.0);
    /// ```
    pub fn mult_quad(&mut self, a: &Matrix<T>, w: &Matrix<T>, tmp: &mut Matrix<T>) -> Result<()> {
        Self::check_quad("mult_quad", a, w)?;
        check_shape("mult_quad", self.shape(), (a.ncols(), a.ncols()))?;
        tmp.reshape(a.nrows(), a.ncols());
        tmp.mult(w, a)?;
        self.mult_trans_a(a, tmp)
    }

    /// `self += aᵀ * w * a`.
    pub fn mult_add_quad(&mut self, a: &Matrix<T>, w: &Matrix<T>, tmp: &mut Matrix<T>) -> Result<()> {
        Self::check_quad("mult_add_quad", a, w)?;
        check_shape("mult_add_quad", self.shape(), (a.ncols(), a.ncols()))?;
        tmp.reshape(a.nrows(), a.ncols());
        tmp.mult(w, a)?;
        self.mult_add_trans_a(a, tmp)
    }

    /// `self[row.., col..] = aᵀ * w * a`.
    pub fn mult_quad_block(
        &mut self,
        a: &Matrix<T>,
        w: &Matrix<T>,
        tmp: &mut Matrix<T>,
        row: usize,
        col: usize,
    ) -> Result<()> {
        const OP: &str = "mult_quad_block";
        Self::check_quad(OP, a, w)?;
        if a.ncols() == 0 {
            return Ok(());
        }
        check_region(OP, self.shape(), row, col, a.ncols(), a.ncols())?;
        tmp.reshape(a.nrows(), a.ncols());
        tmp.mult(w, a)?;
        self.gemm_block(OP, T::one(), a, tmp, Layout::Tn, false, row, col)
    }

    /// `self[row.., col..] += aᵀ * w * a`.
    pub fn mult_add_quad_block(
        &mut self,
        a: &Matrix<T>,
        w: &Matrix<T>,
        tmp: &mut Matrix<T>,
        row: usize,
        col: usize,
    ) -> Result<()> {
        const OP: &str = "mult_add_quad_block";
        Self::check_quad(OP, a, w)?;
        if a.ncols() == 0 {
            return Ok(());
        }
        check_region(OP, self.shape(), row, col, a.ncols(), a.ncols())?;
        tmp.reshape(a.nrows(), a.ncols());
        tmp.mult(w, a)?;
        self.gemm_block(OP, T::one(), a, tmp, Layout::Tn, true, row, col)
    }
}

// ── Transpose / row-vector product ──────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Reshape `self` to `a.ncols() x a.nrows()` and write `aᵀ`.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let a = Matrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let mut t = Matrix::zeros(0, 0);
    /// t.transpose(&a);
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn transpose(&mut self, a: &Matrix<T>) {
        self.scale_transpose(T::one(), a);
    }

    /// Reshape `self` to `a.ncols() x a.nrows()` and write `s * aᵀ`.
    pub fn scale_transpose(&mut self, s: T, a: &Matrix<T>) {
        self.reshape(a.ncols(), a.nrows());
        for i in 0..a.nrows() {
            for (j, &v) in a.row_as_slice(i, 0).iter().enumerate() {
                *self.at_mut(j, i) = s * v;
            }
        }
    }

    /// Dot product of row `row` of `self` with the column vector `v`.
    ///
    /// ```
    /// use structmat::Matrix;
    ///
    /// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// let v = Matrix::column(&[1.0, 1.0]);
    /// assert_eq!(a.mult_row_vector(1, &v), Ok(7.0));
    /// ```
    pub fn mult_row_vector(&self, row: usize, v: &Matrix<T>) -> Result<T> {
        check_index("mult_row_vector", row, self.nrows())?;
        check_shape("mult_row_vector", v.shape(), (self.ncols(), 1))?;
        let mut sum = T::zero();
        for (&a, &b) in self.row_as_slice(row, 0).iter().zip(v.as_slice()) {
            sum = sum + a * b;
        }
        Ok(sum)
    }
}

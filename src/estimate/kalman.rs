use crate::diagonal::Diagonal;
use crate::error::{check_shape, MatrixError};
use crate::linalg::{DenseSolver, LuSolver};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

use super::EstimateError;

/// Linear Kalman filter steps with a reusable workspace.
///
/// Outputs must already have their final shape; nothing is resized on the
/// caller's side. Scratch matrices grow to the largest state and
/// measurement sizes seen.
#[derive(Debug, Clone)]
pub struct KalmanKernels<T> {
    p_sym: Matrix<T>,
    tmp: Matrix<T>,
    pht: Matrix<T>,
    s: Matrix<T>,
    s_inv: Matrix<T>,
    solver: LuSolver<T>,
}

impl<T: FloatScalar> Default for KalmanKernels<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `dst` with the symmetric matrix whose upper triangle is `src`'s.
fn symmetrize_upper<T: FloatScalar>(src: &Matrix<T>, dst: &mut Matrix<T>) {
    let n = src.nrows();
    dst.reshape(n, n);
    for i in 0..n {
        for j in i..n {
            let v = src.at(i, j);
            *dst.at_mut(i, j) = v;
            *dst.at_mut(j, i) = v;
        }
    }
}

/// `m[i][i] += d_i`.
fn add_diagonal_operator<T: FloatScalar>(m: &mut Matrix<T>, d: &Diagonal<'_, T>) {
    for i in 0..m.nrows() {
        let x = m.at_mut(i, i);
        *x = *x + d.value(i);
    }
}

fn check_covariance<T>(op: &'static str, p: &Matrix<T>, n: usize) -> Result<(), MatrixError> {
    check_shape(op, p.shape(), (n, n))
}

impl<T: FloatScalar> KalmanKernels<T> {
    pub fn new() -> Self {
        Self {
            p_sym: Matrix::zeros(0, 0),
            tmp: Matrix::zeros(0, 0),
            pht: Matrix::zeros(0, 0),
            s: Matrix::zeros(0, 0),
            s_inv: Matrix::zeros(0, 0),
            solver: LuSolver::new(),
        }
    }

    /// `out = F P Fᵀ + diag(Q)`.
    ///
    /// `f` and `p` are `n x n`, `q` is an `n x n` diagonal operator and
    /// `out` must be `n x n`.
    pub fn predict_error_covariance(
        &mut self,
        f: &Matrix<T>,
        p: &Matrix<T>,
        q: &Diagonal<'_, T>,
        out: &mut Matrix<T>,
    ) -> Result<(), EstimateError> {
        const OP: &str = "predict_error_covariance";
        let n = f.nrows();
        check_covariance(OP, f, n)?;
        check_covariance(OP, p, n)?;
        q.check_square(OP, n)?;
        check_covariance(OP, out, n)?;

        symmetrize_upper(p, &mut self.p_sym);
        self.tmp.reshape(n, n);
        self.tmp.mult(f, &self.p_sym)?;
        out.mult_trans_b(&self.tmp, f)?;
        add_diagonal_operator(out, q);
        Ok(())
    }

    /// `gain = P Hᵀ (H P Hᵀ + diag(R))⁻¹`.
    ///
    /// `p` is `n x n`, `h` is `m x n`, `r` is an `m x m` diagonal operator
    /// and `gain` must be `n x m`.
    pub fn compute_kalman_gain(
        &mut self,
        p: &Matrix<T>,
        h: &Matrix<T>,
        r: &Diagonal<'_, T>,
        gain: &mut Matrix<T>,
    ) -> Result<(), EstimateError> {
        const OP: &str = "compute_kalman_gain";
        let (m, n) = h.shape();
        check_covariance(OP, p, n)?;
        r.check_square(OP, m)?;
        check_shape(OP, gain.shape(), (n, m))?;

        symmetrize_upper(p, &mut self.p_sym);
        self.pht.reshape(n, m);
        self.pht.mult_trans_b(&self.p_sym, h)?;
        self.s.reshape(m, m);
        self.s.mult(h, &self.pht)?;
        add_diagonal_operator(&mut self.s, r);

        self.solver.invert(&self.s, &mut self.s_inv)?;
        gain.mult(&self.pht, &self.s_inv)?;
        Ok(())
    }

    /// `out = x + K r` for state `x` (`n x 1`), gain `k` (`n x m`) and
    /// residual `r` (`m x 1`).
    pub fn update_state(
        &mut self,
        x: &Matrix<T>,
        k: &Matrix<T>,
        residual: &Matrix<T>,
        out: &mut Matrix<T>,
    ) -> Result<(), EstimateError> {
        const OP: &str = "update_state";
        let (n, m) = k.shape();
        check_shape(OP, x.shape(), (n, 1))?;
        check_shape(OP, residual.shape(), (m, 1))?;
        check_shape(OP, out.shape(), (n, 1))?;

        out.as_mut_slice().copy_from_slice(x.as_slice());
        out.mult_add(k, residual)?;
        Ok(())
    }

    /// `out = (I - K H) P` for gain `k` (`n x m`), `h` (`m x n`) and
    /// covariance `p` (`n x n`).
    pub fn update_error_covariance(
        &mut self,
        k: &Matrix<T>,
        h: &Matrix<T>,
        p: &Matrix<T>,
        out: &mut Matrix<T>,
    ) -> Result<(), EstimateError> {
        const OP: &str = "update_error_covariance";
        let (n, m) = k.shape();
        check_shape(OP, h.shape(), (m, n))?;
        check_covariance(OP, p, n)?;
        check_covariance(OP, out, n)?;

        symmetrize_upper(p, &mut self.p_sym);
        self.tmp.reshape(n, n);
        self.tmp.mult(k, h)?;
        self.tmp.scale_in_place(-T::one());
        self.tmp.add_diagonal(T::one());
        out.mult(&self.tmp, &self.p_sym)?;
        Ok(())
    }
}

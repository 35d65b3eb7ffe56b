//! Dense linear solves behind the [`DenseSolver`] trait.
//!
//! The structural kernels never factor anything themselves. Callers that
//! need an inverse, a square solve, a least-squares fit or a damped
//! least-squares step go through a `DenseSolver`. [`LuSolver`] is the
//! reference implementation built on in-place LU (partial pivoting),
//! Cholesky and Householder QR over the crate's own row-major buffer.

pub(crate) mod cholesky;
pub(crate) mod lu;
pub mod nullspace;
pub(crate) mod qr;

pub use nullspace::NullspaceProjector;

use alloc::vec::Vec;

use log::debug;
use thiserror::Error;

use crate::diagonal::{self, Diagonal};
use crate::error::{check_shape, MatrixError};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixMut};

use cholesky::{back_substitute_lt, cholesky_in_place, forward_substitute};
use lu::{lu_in_place, lu_solve};
use qr::{qr_in_place, qr_solve};

/// Errors from linear algebra operations.
///
/// ```
/// use structmat::{DenseSolver, LinalgError, LuSolver, Matrix};
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// let mut inv = Matrix::zeros(2, 2);
/// let mut solver = LuSolver::new();
/// assert_eq!(solver.invert(&singular, &mut inv), Err(LinalgError::Singular));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// Matrix is singular or nearly singular.
    #[error("matrix is singular")]
    Singular,
    /// Matrix is not positive definite (required for Cholesky).
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
    /// Operand shapes were rejected before any work was done.
    #[error(transparent)]
    Dimension(#[from] MatrixError),
}

/// A dense solver the structural kernels can delegate to.
///
/// Every method validates its operand shapes first and sizes the output
/// through [`Matrix::reshape`]. Implementations own whatever scratch they
/// need, hence `&mut self`.
pub trait DenseSolver<T: FloatScalar> {
    /// `inv = a⁻¹` for square `a`.
    fn invert(&mut self, a: &Matrix<T>, inv: &mut Matrix<T>) -> Result<(), LinalgError>;

    /// `a * x = b` for square `a` (`n x n`) and column `b` (`n x 1`).
    fn solve(&mut self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<(), LinalgError>;

    /// Like [`solve`](Self::solve), but a singular `a` is reported as
    /// `Ok(false)` with `x` filled with NaN. Shape errors stay errors.
    fn solve_check(&mut self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<bool, LinalgError> {
        match self.solve(a, b, x) {
            Ok(()) => Ok(true),
            Err(LinalgError::Singular) => {
                debug!("solve_check: singular {}x{} system", a.nrows(), a.ncols());
                x.reshape(a.ncols(), 1);
                x.set_to_nan();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// `x = argmin ||a * x - b||` for `a` of shape `m x n` with `m >= n`.
    fn solve_least_squares(&mut self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<(), LinalgError>;

    /// Damped least squares: `x = aᵀ (a aᵀ + alpha² I)⁻¹ b`.
    fn solve_damped(&mut self, a: &Matrix<T>, b: &Matrix<T>, alpha: T, x: &mut Matrix<T>) -> Result<(), LinalgError>;
}

/// Reference [`DenseSolver`] with a reusable workspace.
///
/// The factor buffer, permutation and column scratch grow to the largest
/// problem seen and are then reused, so repeated solves of the same size
/// do not allocate.
///
/// ```
/// use structmat::{DenseSolver, LuSolver, Matrix};
///
/// let a = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let b = Matrix::column(&[4.0, 11.0]);
/// let mut x = Matrix::zeros(0, 0);
/// let mut solver = LuSolver::new();
/// solver.solve(&a, &b, &mut x).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuSolver<T> {
    factor: Matrix<T>,
    perm: Vec<usize>,
    tau: Vec<T>,
    rhs: Vec<T>,
    sol: Vec<T>,
    y: Matrix<T>,
}

impl<T: FloatScalar> Default for LuSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatScalar> LuSolver<T> {
    pub fn new() -> Self {
        Self {
            factor: Matrix::zeros(0, 0),
            perm: Vec::new(),
            tau: Vec::new(),
            rhs: Vec::new(),
            sol: Vec::new(),
            y: Matrix::zeros(0, 0),
        }
    }

    /// Copy `a` into the factor buffer and LU-factor it.
    fn factor_lu(&mut self, a: &Matrix<T>) -> Result<(), LinalgError> {
        self.factor.copy_from(a);
        self.perm.resize(a.nrows(), 0);
        lu_in_place(&mut self.factor, &mut self.perm)?;
        Ok(())
    }

    /// Build `a aᵀ + alpha² I` in the factor buffer.
    fn damped_gram(&mut self, a: &Matrix<T>, alpha: T) -> Result<(), LinalgError> {
        let m = a.nrows();
        self.factor.reshape(m, m);
        diagonal::mult_outer(a, &Diagonal::Uniform(T::one()), &mut self.factor)?;
        self.factor.add_diagonal(alpha * alpha);
        Ok(())
    }
}

fn check_square<T>(op: &'static str, a: &Matrix<T>) -> Result<(), MatrixError> {
    check_shape(op, a.shape(), (a.nrows(), a.nrows()))
}

impl<T: FloatScalar> DenseSolver<T> for LuSolver<T> {
    fn invert(&mut self, a: &Matrix<T>, inv: &mut Matrix<T>) -> Result<(), LinalgError> {
        check_square("invert", a)?;
        let n = a.nrows();
        self.factor_lu(a)?;

        inv.reshape(n, n);
        self.rhs.resize(n, T::zero());
        self.sol.resize(n, T::zero());
        for j in 0..n {
            for (i, r) in self.rhs.iter_mut().enumerate() {
                *r = if i == j { T::one() } else { T::zero() };
            }
            lu_solve(&self.factor, &self.perm, &self.rhs, &mut self.sol);
            for (i, &v) in self.sol.iter().enumerate() {
                *inv.at_mut(i, j) = v;
            }
        }
        Ok(())
    }

    fn solve(&mut self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<(), LinalgError> {
        check_square("solve", a)?;
        check_shape("solve", b.shape(), (a.nrows(), 1))?;
        self.factor_lu(a)?;
        x.reshape(a.nrows(), 1);
        lu_solve(&self.factor, &self.perm, b.as_slice(), x.as_mut_slice());
        Ok(())
    }

    fn solve_least_squares(&mut self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<(), LinalgError> {
        let (m, n) = a.shape();
        if m < n {
            return Err(MatrixError::DimensionMismatch {
                op: "solve_least_squares",
                expected: (n, n),
                got: (m, n),
            }
            .into());
        }
        check_shape("solve_least_squares", b.shape(), (m, 1))?;

        self.factor.copy_from(a);
        self.tau.resize(n, T::zero());
        qr_in_place(&mut self.factor, &mut self.tau)?;

        self.rhs.resize(m, T::zero());
        x.reshape(n, 1);
        qr_solve(&self.factor, &self.tau, b.as_slice(), &mut self.rhs, x.as_mut_slice());
        Ok(())
    }

    fn solve_damped(&mut self, a: &Matrix<T>, b: &Matrix<T>, alpha: T, x: &mut Matrix<T>) -> Result<(), LinalgError> {
        let (m, n) = a.shape();
        check_shape("solve_damped", b.shape(), (m, 1))?;

        self.damped_gram(a, alpha)?;
        self.y.reshape(m, 1);
        match cholesky_in_place(&mut self.factor) {
            Ok(()) => {
                self.rhs.resize(m, T::zero());
                forward_substitute(&self.factor, b.as_slice(), &mut self.rhs);
                back_substitute_lt(&self.factor, &self.rhs, self.y.as_mut_slice());
            }
            Err(LinalgError::NotPositiveDefinite) => {
                // alpha == 0 with rank-deficient rows; LU still handles an
                // indefinite but nonsingular Gram matrix.
                debug!("solve_damped: Gram matrix not positive definite, falling back to LU");
                self.damped_gram(a, alpha)?;
                self.perm.resize(m, 0);
                lu_in_place(&mut self.factor, &mut self.perm)?;
                lu_solve(&self.factor, &self.perm, b.as_slice(), self.y.as_mut_slice());
            }
            Err(e) => return Err(e),
        }

        x.reshape(n, 1);
        x.mult_trans_a(a, &self.y)?;
        Ok(())
    }
}

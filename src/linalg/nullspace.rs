//! Damped projection onto the null space of a task Jacobian.

use alloc::vec::Vec;

use crate::diagonal::{self, Diagonal};
use crate::error::{check_shape, MatrixError};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

use super::cholesky::{back_substitute_lt, cholesky_in_place, forward_substitute};
use super::LinalgError;

/// Projects a matrix onto the (damped) null space of another.
///
/// For `b` of shape `k x dof` the projector is
/// `N = I - (bᵀ b + alpha² I)⁻¹ bᵀ b`, and [`project`](Self::project)
/// writes `x = a * N`. `N` equals `alpha² (bᵀ b + alpha² I)⁻¹` and tends
/// to the exact null-space projector of `b` as `alpha` goes to zero.
/// `alpha` must be positive unless `bᵀ b` is itself invertible.
///
/// ```
/// use structmat::{Matrix, NullspaceProjector};
///
/// // Null space of [1, 0, 0] is the y-z plane.
/// let b = Matrix::from_rows(1, 3, &[1.0_f64, 0.0, 0.0]);
/// let a = Matrix::from_rows(1, 3, &[1.0, 2.0, 3.0]);
/// let mut x = Matrix::zeros(0, 0);
/// let mut projector = NullspaceProjector::new(3);
/// projector.project(&a, &b, 1e-3, &mut x).unwrap();
/// assert!(x.is_approx(&Matrix::from_rows(1, 3, &[0.0, 2.0, 3.0]), 1e-5));
/// ```
#[derive(Debug, Clone)]
pub struct NullspaceProjector<T> {
    dof: usize,
    btb: Matrix<T>,
    factor: Matrix<T>,
    projector: Matrix<T>,
    column: Vec<T>,
    tmp: Vec<T>,
}

impl<T: FloatScalar> NullspaceProjector<T> {
    /// Projector for `dof` degrees of freedom. All scratch is sized here.
    pub fn new(dof: usize) -> Self {
        Self {
            dof,
            btb: Matrix::zeros(dof, dof),
            factor: Matrix::zeros(dof, dof),
            projector: Matrix::zeros(dof, dof),
            column: alloc::vec![T::zero(); dof],
            tmp: alloc::vec![T::zero(); dof],
        }
    }

    pub fn dof(&self) -> usize {
        self.dof
    }

    /// `x = a * (I - (bᵀ b + alpha² I)⁻¹ bᵀ b)`.
    ///
    /// Both `a` and `b` must have `dof` columns; `x` is reshaped to
    /// `a.nrows() x dof`. Fails with `NotPositiveDefinite` when
    /// `bᵀ b + alpha² I` cannot be factored (rank-deficient `b` and
    /// `alpha = 0`).
    pub fn project(&mut self, a: &Matrix<T>, b: &Matrix<T>, alpha: T, x: &mut Matrix<T>) -> Result<(), LinalgError> {
        let dof = self.dof;
        check_shape("project", b.shape(), (b.nrows(), dof))?;
        if a.ncols() != dof {
            return Err(MatrixError::DimensionMismatch {
                op: "project",
                expected: (a.nrows(), dof),
                got: a.shape(),
            }
            .into());
        }

        diagonal::mult_inner(b, &Diagonal::Uniform(T::one()), &mut self.btb)?;
        self.factor.copy_from(&self.btb);
        self.factor.add_diagonal(alpha * alpha);
        cholesky_in_place(&mut self.factor)?;

        // projector = I - factor⁻¹ btb, one column at a time
        for j in 0..dof {
            for (i, c) in self.column.iter_mut().enumerate() {
                *c = self.btb.at(i, j);
            }
            forward_substitute(&self.factor, &self.column, &mut self.tmp);
            back_substitute_lt(&self.factor, &self.tmp, &mut self.column);
            for (i, &z) in self.column.iter().enumerate() {
                let delta = if i == j { T::one() } else { T::zero() };
                *self.projector.at_mut(i, j) = delta - z;
            }
        }

        x.reshape(a.nrows(), dof);
        x.mult(a, &self.projector)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{DenseSolver, LuSolver};

    fn constraint() -> Matrix<f64> {
        Matrix::from_rows(2, 4, &[1.0, 2.0, 0.0, -1.0, 0.0, 1.0, 1.0, 3.0])
    }

    #[test]
    fn matches_damped_inverse_form() {
        let b = constraint();
        let a = Matrix::from_fn(3, 4, |i, j| (i * 4 + j) as f64 - 5.0);
        let alpha = 0.5;
        let mut x = Matrix::zeros(0, 0);
        let mut projector = NullspaceProjector::new(4);
        projector.project(&a, &b, alpha, &mut x).unwrap();
        assert_eq!(x.shape(), (3, 4));

        // N = alpha² (bᵀ b + alpha² I)⁻¹
        let mut m = Matrix::zeros(4, 4);
        m.mult_trans_a(&b, &b).unwrap();
        m.add_diagonal(alpha * alpha);
        let mut n = Matrix::zeros(0, 0);
        LuSolver::new().invert(&m, &mut n).unwrap();
        n.scale_in_place(alpha * alpha);
        let mut expected = Matrix::zeros(3, 4);
        expected.mult(&a, &n).unwrap();
        assert!(x.is_approx(&expected, 1e-10));
    }

    #[test]
    fn small_damping_annihilates_constraint_rows() {
        let b = constraint();
        let a = Matrix::from_fn(3, 4, |i, j| (i * 4 + j) as f64 - 5.0);
        let mut x = Matrix::zeros(0, 0);
        let mut projector = NullspaceProjector::new(4);
        projector.project(&a, &b, 1e-3, &mut x).unwrap();

        let mut xbt = Matrix::zeros(3, 2);
        xbt.mult_trans_b(&x, &b).unwrap();
        assert!(xbt.is_approx(&Matrix::zeros(3, 2), 1e-3));
        // Null-space components of a survive
        assert!(!x.is_approx(&Matrix::zeros(3, 4), 1e-1));
    }

    #[test]
    fn large_damping_approaches_identity() {
        let b = Matrix::from_rows(1, 2, &[1.0, 1.0]);
        let a = Matrix::identity(2);
        let mut x = Matrix::zeros(0, 0);
        let mut projector = NullspaceProjector::new(2);
        projector.project(&a, &b, 1e4, &mut x).unwrap();
        assert!(x.is_approx(&Matrix::identity(2), 1e-6));
    }

    #[test]
    fn column_count_checked() {
        let mut projector = NullspaceProjector::<f64>::new(3);
        let mut x = Matrix::zeros(0, 0);
        let ok = Matrix::zeros(1, 3);
        let bad = Matrix::zeros(1, 2);
        assert!(matches!(
            projector.project(&bad, &ok, 0.1, &mut x),
            Err(LinalgError::Dimension(_))
        ));
        assert!(matches!(
            projector.project(&ok, &bad, 0.1, &mut x),
            Err(LinalgError::Dimension(_))
        ));
    }

    #[test]
    fn rank_deficient_needs_damping() {
        let b = Matrix::from_rows(1, 2, &[1.0, 0.0]);
        let a = Matrix::identity(2);
        let mut x = Matrix::zeros(0, 0);
        let mut projector = NullspaceProjector::new(2);
        assert_eq!(
            projector.project(&a, &b, 0.0, &mut x),
            Err(LinalgError::NotPositiveDefinite)
        );
    }
}

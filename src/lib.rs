//! # structmat
//!
//! Structure-aware dense matrix kernels for robot control: whole-body
//! controllers, Jacobian-based task weighting and Kalman filtering.
//! Every kernel writes into a caller-owned [`Matrix`] in place, exploits
//! diagonal and symmetric structure where the caller knows it is present,
//! and validates all shape, index and aliasing preconditions before the
//! first write.
//!
//! ## Quick start
//!
//! ```
//! use structmat::{diagonal, BlockRegion, Diagonal, Matrix};
//!
//! // Weighted normal equations Jᵀ W J, accumulated into a block of a
//! // larger QP Hessian.
//! let j = Matrix::from_rows(2, 3, &[1.0_f64, 0.0, 2.0, 0.0, 1.0, 1.0]);
//! let w = Matrix::column(&[2.0, 3.0]);
//! let mut hessian = Matrix::zeros(5, 5);
//! diagonal::mult_add_block_inner(&j, &Diagonal::Compact(&w), &mut hessian, 1, 1).unwrap();
//! assert_eq!(hessian[(3, 3)], 2.0 * 4.0 + 3.0 * 1.0);
//! assert_eq!(hessian[(1, 3)], hessian[(3, 1)]);
//!
//! // Copy the task block out again.
//! let mut task = Matrix::zeros(3, 3);
//! task.set_block(BlockRegion::new(0, 0, 1, 1, 3, 3), &hessian, 1.0).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T>`, a heap-backed, row-major, reshapeable buffer
//!   whose capacity survives shrinking. Block products (`mult*`), block
//!   copies ([`BlockRegion`]), the row/column editor and element-wise
//!   utilities are methods on it.
//!
//! - [`diagonal`]: one-sided and inner diagonal products plus symmetric
//!   inner (`Bᵀ W B`) and outer (`B W Bᵀ`) products, over a [`Diagonal`]
//!   operator stored full, compact or uniform.
//!
//! - [`linalg`]: the [`DenseSolver`] trait with the reference
//!   [`LuSolver`] (LU, Cholesky, Householder QR), and the damped
//!   [`NullspaceProjector`].
//!
//! - [`estimate`]: [`KalmanKernels`] for covariance prediction, gain, state
//!   and covariance update.
//!
//! - [`binding`]: narrows rich errors to a success flag for embedding
//!   layers that need one.
//!
//! - [`traits`]: element bounds [`Scalar`] and [`FloatScalar`].
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `libm`  | baseline | Pure-Rust software float fallback for `no_std` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod binding;
pub mod diagonal;
mod error;
pub mod estimate;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use diagonal::Diagonal;
pub use error::{MatrixError, Result};
pub use estimate::{EstimateError, KalmanKernels};
pub use linalg::{DenseSolver, LinalgError, LuSolver, NullspaceProjector};
pub use matrix::{find_max_index, BlockRegion, Matrix, Matrixf32, Matrixf64, Matrixi32, Matrixi64};
pub use traits::{FloatScalar, Scalar};

//! Kalman filter covariance kernels over dynamically sized buffers.
//!
//! [`KalmanKernels`] provides the four linear-algebra steps of a discrete
//! Kalman filter: covariance prediction, gain, state update and covariance
//! update. Process and measurement noise are diagonal operators, so either
//! a full matrix (only its diagonal is read) or a compact column works.
//! Covariances are symmetric and only their upper triangle is read.
//!
//! ```
//! use structmat::{Diagonal, KalmanKernels, Matrix};
//!
//! // Constant velocity, position measured
//! let dt = 0.1;
//! let f = Matrix::from_rows(2, 2, &[1.0_f64, dt, 0.0, 1.0]);
//! let h = Matrix::from_rows(1, 2, &[1.0, 0.0]);
//! let q = Matrix::column(&[0.01, 0.01]);
//! let r = Matrix::column(&[0.5]);
//!
//! let mut kalman = KalmanKernels::new();
//! let x = Matrix::column(&[0.0, 1.0]);
//! let p = Matrix::identity(2);
//!
//! let mut p_pred = Matrix::zeros(2, 2);
//! kalman.predict_error_covariance(&f, &p, &Diagonal::Compact(&q), &mut p_pred).unwrap();
//!
//! let mut gain = Matrix::zeros(2, 1);
//! kalman.compute_kalman_gain(&p_pred, &h, &Diagonal::Compact(&r), &mut gain).unwrap();
//!
//! let residual = Matrix::column(&[0.12]);
//! let mut x_next = Matrix::zeros(2, 1);
//! kalman.update_state(&x, &gain, &residual, &mut x_next).unwrap();
//!
//! let mut p_next = Matrix::zeros(2, 2);
//! kalman.update_error_covariance(&gain, &h, &p_pred, &mut p_next).unwrap();
//! assert!(p_next[(0, 0)] < p_pred[(0, 0)]);
//! ```

mod kalman;


pub use kalman::KalmanKernels;

use thiserror::Error;

use crate::error::MatrixError;
use crate::linalg::LinalgError;

/// Errors from state estimation kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// Innovation covariance is singular (cannot compute Kalman gain).
    #[error("innovation covariance is singular")]
    SingularInnovation,
    /// Operand shapes were rejected before any work was done.
    #[error(transparent)]
    Dimension(#[from] MatrixError),
}

impl From<LinalgError> for EstimateError {
    fn from(e: LinalgError) -> Self {
        match e {
            LinalgError::Dimension(e) => EstimateError::Dimension(e),
            LinalgError::Singular | LinalgError::NotPositiveDefinite => EstimateError::SingularInnovation,
        }
    }
}

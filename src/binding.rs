//! Boolean-success adapters for embedding layers.
//!
//! The kernels report failures through [`MatrixError`](crate::MatrixError),
//! [`LinalgError`](crate::LinalgError) and
//! [`EstimateError`](crate::EstimateError). A binding layer that can only
//! pass a success flag across its boundary narrows those results here; the
//! discarded error is logged at `debug` level so it is not lost entirely.
//!
//! ```
//! use structmat::binding::BoolAdapter;
//! use structmat::Matrix;
//!
//! let mut m = Matrix::<f64>::zeros(2, 2);
//! assert!(m.swap_rows(0, 1).succeeded());
//! assert!(!m.swap_rows(0, 2).succeeded());
//! ```

use core::fmt::Display;

use log::debug;

/// Narrow a result to `true` on success, logging the error otherwise.
pub fn succeeded<T, E: Display>(result: Result<T, E>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            debug!("binding: {e}");
            false
        }
    }
}

/// Narrow a checked solve (`Ok(false)` for a singular system) to one flag.
///
/// ```
/// use structmat::binding::solved;
/// use structmat::{DenseSolver, LuSolver, Matrix};
///
/// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// let b = Matrix::column(&[1.0, 1.0]);
/// let mut x = Matrix::zeros(0, 0);
/// assert!(!solved(LuSolver::new().solve_check(&a, &b, &mut x)));
/// ```
pub fn solved<E: Display>(result: Result<bool, E>) -> bool {
    match result {
        Ok(ok) => ok,
        Err(e) => {
            debug!("binding: {e}");
            false
        }
    }
}

/// Method form of [`succeeded`].
pub trait BoolAdapter {
    fn succeeded(self) -> bool;
}

impl<T, E: Display> BoolAdapter for Result<T, E> {
    #[inline]
    fn succeeded(self) -> bool {
        succeeded(self)
    }
}

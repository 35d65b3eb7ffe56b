use crate::error::{check_region, check_shape, Result};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

use super::Matrix;

// ── Aggregation ─────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Sum of all logical elements.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.sum(), 10.0);
    /// ```
    pub fn sum(&self) -> T {
        self.as_slice().iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Product of all logical elements (one for an empty matrix).
    pub fn prod(&self) -> T {
        self.as_slice().iter().fold(T::one(), |acc, &x| acc * x)
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Smallest element, or `None` for an empty matrix. NaN entries are
    /// skipped.
    pub fn min(&self) -> Option<T> {
        let mut it = self.as_slice().iter().copied().filter(|x| !x.is_nan());
        let first = it.next()?;
        Some(it.fold(first, |acc, x| acc.min(x)))
    }

    /// Largest element, or `None` for an empty matrix. NaN entries are
    /// skipped.
    pub fn max(&self) -> Option<T> {
        let mut it = self.as_slice().iter().copied().filter(|x| !x.is_nan());
        let first = it.next()?;
        Some(it.fold(first, |acc, x| acc.max(x)))
    }
}

// ── NaN handling ────────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Whether any logical entry is NaN.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let mut m = Matrix::<f64>::zeros(2, 2);
    /// assert!(!m.contains_nan());
    /// m[(1, 0)] = f64::NAN;
    /// assert!(m.contains_nan());
    /// ```
    pub fn contains_nan(&self) -> bool {
        self.as_slice().iter().any(|x| x.is_nan())
    }

    /// Fill every logical entry with NaN.
    pub fn set_to_nan(&mut self) {
        self.fill(T::nan());
    }

    /// Shape-aware comparison within an absolute tolerance.
    pub fn is_approx(&self, other: &Matrix<T>, precision: T) -> bool {
        self.shape() == other.shape()
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(&a, &b)| (a - b).abs() <= precision)
    }

    /// Total-order equality: NaN equals NaN, and `0.0` differs from `-0.0`.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let a = Matrix::from_rows(1, 2, &[f64::NAN, 0.0]);
    /// let b = Matrix::from_rows(1, 2, &[f64::NAN, -0.0]);
    /// assert!(a.exact_eq(&a));
    /// assert!(!a.exact_eq(&b));
    /// ```
    pub fn exact_eq(&self, other: &Matrix<T>) -> bool {
        self.shape() == other.shape()
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(&a, &b)| {
                    if a.is_nan() || b.is_nan() {
                        a.is_nan() && b.is_nan()
                    } else {
                        a == b && a.is_sign_negative() == b.is_sign_negative()
                    }
                })
    }
}

// ── Element-wise arithmetic ─────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Multiply every logical entry by `s`.
    pub fn scale_in_place(&mut self, s: T) {
        for x in self.as_mut_slice() {
            *x = s * *x;
        }
    }

    /// Reshape `self` to `src`'s shape and write `s * src`.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let src = Matrix::from_rows(1, 2, &[1.0, -2.0]);
    /// let mut m = Matrix::zeros(3, 3);
    /// m.scale_from(2.0, &src);
    /// assert_eq!(m.shape(), (1, 2));
    /// assert_eq!(m.as_slice(), &[2.0, -4.0]);
    /// ```
    pub fn scale_from(&mut self, s: T, src: &Matrix<T>) {
        self.reshape(src.nrows(), src.ncols());
        for (x, &v) in self.as_mut_slice().iter_mut().zip(src.as_slice()) {
            *x = s * v;
        }
    }

    /// `self = a + b`. All three must share a shape.
    ///
    /// ```
    /// use structmat::Matrix;
    /// let a = Matrix::from_rows(1, 2, &[1.0, 2.0]);
    /// let b = Matrix::from_rows(1, 2, &[10.0, 20.0]);
    /// let mut c = Matrix::zeros(1, 2);
    /// c.add(&a, &b).unwrap();
    /// assert_eq!(c.as_slice(), &[11.0, 22.0]);
    /// ```
    pub fn add(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        check_shape("add", b.shape(), a.shape())?;
        check_shape("add", self.shape(), a.shape())?;
        for ((c, &x), &y) in self.as_mut_slice().iter_mut().zip(a.as_slice()).zip(b.as_slice()) {
            *c = x + y;
        }
        Ok(())
    }

    /// `self = a - b`.
    pub fn subtract(&mut self, a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
        check_shape("subtract", b.shape(), a.shape())?;
        check_shape("subtract", self.shape(), a.shape())?;
        for ((c, &x), &y) in self.as_mut_slice().iter_mut().zip(a.as_slice()).zip(b.as_slice()) {
            *c = x - y;
        }
        Ok(())
    }

    /// `self += a`.
    pub fn add_assign(&mut self, a: &Matrix<T>) -> Result<()> {
        check_shape("add_assign", self.shape(), a.shape())?;
        for (c, &x) in self.as_mut_slice().iter_mut().zip(a.as_slice()) {
            *c = *c + x;
        }
        Ok(())
    }

    /// `self -= a`.
    pub fn subtract_assign(&mut self, a: &Matrix<T>) -> Result<()> {
        check_shape("subtract_assign", self.shape(), a.shape())?;
        for (c, &x) in self.as_mut_slice().iter_mut().zip(a.as_slice()) {
            *c = *c - x;
        }
        Ok(())
    }

    /// Reshape `out` to `min(nrows, ncols) x 1` and write the main diagonal.
    pub fn extract_diagonal(&self, out: &mut Matrix<T>) {
        let n = self.nrows().min(self.ncols());
        out.reshape(n, 1);
        for i in 0..n {
            *out.at_mut(i, 0) = self.at(i, i);
        }
    }

    /// First differences of rows `start..start + count` of the column
    /// vector `v`: `self[i] = v[start + i + 1] - v[start + i]`.
    ///
    /// `self` is reshaped to `(count - 1) x 1` (empty when `count < 2`).
    ///
    /// ```
    /// use structmat::Matrix;
    /// let v = Matrix::column(&[1.0, 4.0, 9.0, 16.0]);
    /// let mut d = Matrix::zeros(0, 0);
    /// d.diff(&v, 1, 3).unwrap();
    /// assert_eq!(d.as_slice(), &[5.0, 7.0]);
    /// ```
    pub fn diff(&mut self, v: &Matrix<T>, start: usize, count: usize) -> Result<()> {
        check_shape("diff", (v.nrows(), v.ncols()), (v.nrows(), 1))?;
        check_region("diff", v.shape(), start, 0, count, 1)?;
        let n = count.saturating_sub(1);
        self.reshape(n, 1);
        for i in 0..n {
            *self.at_mut(i, 0) = v.at(start + i + 1, 0) - v.at(start + i, 0);
        }
        Ok(())
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Finite-difference derivative: `self = (new - previous) / dt`, then
    /// `previous = new`.
    pub fn numerically_differentiate(
        &mut self,
        previous: &mut Matrix<T>,
        new: &Matrix<T>,
        dt: T,
    ) -> Result<()> {
        check_shape("numerically_differentiate", previous.shape(), new.shape())?;
        self.reshape(new.nrows(), new.ncols());
        self.subtract(new, previous)?;
        self.scale_in_place(T::one() / dt);
        previous.as_mut_slice().copy_from_slice(new.as_slice());
        Ok(())
    }
}

/// Index of the largest element of `values[start..end]`, or `None` when the
/// range is empty or holds only NaN and `-inf`.
///
/// The first occurrence wins on ties.
///
/// ```
/// use structmat::find_max_index;
/// assert_eq!(find_max_index(&[1.0, 5.0, 3.0, 5.0], 0, 4), Some(1));
/// assert_eq!(find_max_index(&[1.0, 5.0, 3.0], 2, 3), Some(2));
/// assert_eq!(find_max_index::<f64>(&[], 0, 0), None);
/// ```
pub fn find_max_index<T: FloatScalar>(values: &[T], start: usize, end: usize) -> Option<usize> {
    let end = end.min(values.len());
    let mut best = T::neg_infinity();
    let mut index = None;
    for (i, &v) in values.iter().enumerate().take(end).skip(start) {
        if v > best {
            best = v;
            index = Some(i);
        }
    }
    index
}

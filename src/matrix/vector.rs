use core::ops::{Index, IndexMut};

use crate::traits::Scalar;
use crate::Matrix;

/// A row vector (1×N matrix).
///
/// Diattenuation and polarizance vectors are carried as `Vector3<f64>`.
///
/// ```
/// use mueller::Vector3;
///
/// let d = Vector3::from_array([0.3_f64, 0.4, 0.0]);
/// assert_eq!(d[1], 0.4);
/// assert!((d.norm() - 0.5).abs() < 1e-12);
/// ```
pub type Vector<T, const N: usize> = Matrix<T, 1, N>;

/// A 2-element row vector.
pub type Vector2<T> = Vector<T, 2>;
/// A 3-element row vector.
pub type Vector3<T> = Vector<T, 3>;
/// A 4-element row vector.
pub type Vector4<T> = Vector<T, 4>;

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Create a vector from a 1D array.
    #[inline]
    pub fn from_array(data: [T; N]) -> Self {
        Self::new([data])
    }

    /// Copy the elements out into an array.
    #[inline]
    pub fn to_array(&self) -> [T; N] {
        self.data.map(|col| col[0])
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self[i] * rhs[i];
        }
        sum
    }

    /// Outer product: `result[(i, j)] = self[i] * rhs[j]`.
    ///
    /// ```
    /// use mueller::Vector3;
    /// let d = Vector3::from_array([1.0, 2.0, 3.0]);
    /// let dd = d.outer(&d);
    /// assert_eq!(dd[(1, 2)], 6.0);
    /// ```
    pub fn outer<const P: usize>(&self, rhs: &Vector<T, P>) -> Matrix<T, N, P> {
        let mut out = Matrix::<T, N, P>::zeros();
        for i in 0..N {
            for j in 0..P {
                out[(i, j)] = self[i] * rhs[j];
            }
        }
        out
    }
}

impl<T: Scalar> Vector3<T> {
    /// Cross product of two 3-vectors.
    ///
    /// ```
    /// use mueller::Vector3;
    /// let x = Vector3::from_array([1.0, 0.0, 0.0]);
    /// let y = Vector3::from_array([0.0, 1.0, 0.0]);
    /// assert_eq!(x.cross(&y)[2], 1.0);
    /// ```
    #[inline]
    pub fn cross(&self, rhs: &Self) -> Self {
        Self::from_array([
            self[1] * rhs[2] - self[2] * rhs[1],
            self[2] * rhs[0] - self[0] * rhs[2],
            self[0] * rhs[1] - self[1] * rhs[0],
        ])
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self[(0, i)]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self[(0, i)]
    }
}

// ── Column vector ───────────────────────────────────────────────────

/// A column vector (N×1 matrix), used for Stokes vectors and eigenvectors.
///
/// Single-element access uses `cv[(i, 0)]`.
pub type ColumnVector<T, const N: usize> = Matrix<T, N, 1>;

/// A 2-element column vector.
pub type ColumnVector2<T> = ColumnVector<T, 2>;
/// A 3-element column vector.
pub type ColumnVector3<T> = ColumnVector<T, 3>;
/// A 4-element column vector.
pub type ColumnVector4<T> = ColumnVector<T, 4>;

impl<T: Scalar, const N: usize> ColumnVector<T, N> {
    /// Create a column vector from a 1D array.
    #[inline]
    pub fn from_column(data: [T; N]) -> Self {
        Self::new(data.map(|x| [x]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_array_round_trip() {
        let v = Vector3::from_array([1.0, -2.0, 3.5]);
        assert_eq!(v.to_array(), [1.0, -2.0, 3.5]);
        assert_eq!(v[2], 3.5);
    }

    #[test]
    fn dot_and_outer() {
        let a = Vector3::from_array([1.0, 2.0, 3.0]);
        let b = Vector3::from_array([4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
        let m = a.outer(&b);
        assert_eq!(m[(0, 0)], 4.0);
        assert_eq!(m[(2, 1)], 15.0);
    }

    #[test]
    fn cross_is_antisymmetric() {
        let a = Vector3::from_array([1.0, 2.0, 3.0]);
        let b = Vector3::from_array([-1.0, 0.5, 2.0]);
        let ab = a.cross(&b);
        let ba = b.cross(&a);
        for i in 0..3 {
            assert_eq!(ab[i], -ba[i]);
        }
        assert_eq!(ab.dot(&a), 0.0);
    }

    #[test]
    fn column_vector_layout() {
        let s = ColumnVector4::from_column([1.0, 0.5, 0.0, -0.5]);
        assert_eq!(s.nrows(), 4);
        assert_eq!(s[(3, 0)], -0.5);
    }
}

use crate::matrix::vector::Vector;
use crate::traits::{LinalgScalar, Scalar};
use crate::Matrix;

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Sum of diagonal elements.
    pub fn trace(&self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self[(i, i)];
        }
        sum
    }

    /// Extract the diagonal as a vector.
    pub fn diag(&self) -> Vector<T, N> {
        let mut v = Vector::zeros();
        for i in 0..N {
            v[i] = self[(i, i)];
        }
        v
    }

    /// Create a diagonal matrix from an array of diagonal entries.
    ///
    /// ```
    /// use mueller::Matrix4;
    /// let half_wave = Matrix4::from_diag([1.0, 1.0, -1.0, -1.0]);
    /// assert_eq!(half_wave.trace(), 0.0);
    /// ```
    pub fn from_diag(values: [T; N]) -> Self {
        let mut m = Self::zeros();
        for (i, v) in values.into_iter().enumerate() {
            m[(i, i)] = v;
        }
        m
    }
}

impl<T: LinalgScalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Conjugate transpose `A^H` (plain transpose for real elements).
    pub fn adjoint(&self) -> Matrix<T, N, M> {
        let mut out = Matrix::<T, N, M>::zeros();
        for i in 0..M {
            for j in 0..N {
                out[(j, i)] = self[(i, j)].conj();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{Matrix, Matrix3};
    use num_complex::Complex;

    #[test]
    fn trace_and_diag() {
        let m = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.trace(), 15.0);
        assert_eq!(m.diag().to_array(), [1.0, 5.0, 9.0]);
        assert_eq!(Matrix3::from_diag([1.0, 5.0, 9.0]).trace(), 15.0);
    }

    #[test]
    fn adjoint_conjugates() {
        let m = Matrix::new([
            [Complex::new(1.0, 1.0), Complex::new(0.0, 2.0)],
            [Complex::new(3.0, 0.0), Complex::new(0.0, -1.0)],
        ]);
        let h = m.adjoint();
        assert_eq!(h[(0, 1)], Complex::new(3.0, 0.0));
        assert_eq!(h[(1, 0)], Complex::new(0.0, -2.0));
        assert_eq!(h[(1, 1)], Complex::new(0.0, 1.0));
    }
}

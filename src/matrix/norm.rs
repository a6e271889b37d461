use num_traits::Float;

use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, LinalgScalar, Scalar};
use crate::Matrix;

// ── Vector norms ────────────────────────────────────────────────────

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Squared L2 norm.
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }
}

impl<T: FloatScalar, const N: usize> Vector<T, N> {
    /// L2 (Euclidean) norm.
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    ///
    /// ```
    /// use mueller::Vector3;
    /// let u = Vector3::from_array([0.0_f64, 3.0, 4.0]).normalize().unwrap();
    /// assert!((u[2] - 0.8).abs() < 1e-12);
    /// assert!(Vector3::<f64>::zeros().normalize().is_none());
    /// ```
    pub fn normalize(&self) -> Option<Self> {
        let n = self.norm();
        if n > T::zero() {
            Some(*self * (T::one() / n))
        } else {
            None
        }
    }
}

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: LinalgScalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Frobenius norm: square root of the sum of squared moduli.
    pub fn frobenius_norm(&self) -> T::Real {
        let mut sum = <T::Real as num_traits::Zero>::zero();
        for j in 0..N {
            for i in 0..M {
                let a = self.data[j][i].modulus();
                sum = sum + a * a;
            }
        }
        sum.sqrt()
    }

    /// Largest element modulus.
    pub fn max_abs(&self) -> T::Real {
        let mut best = <T::Real as num_traits::Zero>::zero();
        for j in 0..N {
            for i in 0..M {
                let a = self.data[j][i].modulus();
                if a > best {
                    best = a;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use crate::{Matrix, Vector3};
    use num_complex::Complex;

    #[test]
    fn vector_norm() {
        let v = Vector3::from_array([2.0_f64, 3.0, 6.0]);
        assert_eq!(v.norm_squared(), 49.0);
        assert!((v.norm() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn frobenius_and_max() {
        let m = Matrix::new([[1.0_f64, -2.0], [2.0, -4.0]]);
        assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
        assert_eq!(m.max_abs(), 4.0);
    }

    #[test]
    fn complex_frobenius() {
        let m = Matrix::new([[Complex::new(3.0_f64, 4.0), Complex::new(0.0, 0.0)]]);
        assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
        assert!((m.max_abs() - 5.0).abs() < 1e-12);
    }
}

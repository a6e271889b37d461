use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;
use crate::Matrix;

// ── Element-wise addition / subtraction ─────────────────────────────

macro_rules! impl_elementwise {
    ($Op:ident, $method:ident, $OpAssign:ident, $method_assign:ident, $op:tt) => {
        impl<T: Scalar, const M: usize, const N: usize> $Op for Matrix<T, M, N> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                let mut out = self;
                out.$method_assign(rhs);
                out
            }
        }

        impl<T: Scalar, const M: usize, const N: usize> $OpAssign for Matrix<T, M, N> {
            fn $method_assign(&mut self, rhs: Self) {
                for j in 0..N {
                    for i in 0..M {
                        self.data[j][i] = self.data[j][i] $op rhs.data[j][i];
                    }
                }
            }
        }

        impl<T: Scalar, const M: usize, const N: usize> $Op<&Matrix<T, M, N>> for &Matrix<T, M, N> {
            type Output = Matrix<T, M, N>;

            fn $method(self, rhs: &Matrix<T, M, N>) -> Matrix<T, M, N> {
                (*self).$method(*rhs)
            }
        }
    };
}

impl_elementwise!(Add, add, AddAssign, add_assign, +);
impl_elementwise!(Sub, sub, SubAssign, sub_assign, -);

impl<T: Scalar, const M: usize, const N: usize> Neg for Matrix<T, M, N> {
    type Output = Self;

    fn neg(self) -> Self {
        let mut out = self;
        for j in 0..N {
            for i in 0..M {
                out.data[j][i] = T::zero() - self.data[j][i];
            }
        }
        out
    }
}

// ── Matrix multiplication ───────────────────────────────────────────

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>>
    for Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Matrix<T, M, P> {
        let mut out = Matrix::<T, M, P>::zeros();
        for j in 0..P {
            for k in 0..N {
                let r = rhs.data[j][k];
                for i in 0..M {
                    out.data[j][i] = out.data[j][i] + self.data[k][i] * r;
                }
            }
        }
        out
    }
}

impl<T: Scalar, const M: usize, const N: usize, const P: usize> Mul<&Matrix<T, N, P>>
    for &Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: &Matrix<T, N, P>) -> Matrix<T, M, P> {
        (*self).mul(*rhs)
    }
}

// ── Scalar multiplication / division ────────────────────────────────

impl<T: Scalar, const M: usize, const N: usize> Mul<T> for Matrix<T, M, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        let mut out = self;
        out *= rhs;
        out
    }
}

impl<T: Scalar, const M: usize, const N: usize> MulAssign<T> for Matrix<T, M, N> {
    fn mul_assign(&mut self, rhs: T) {
        for j in 0..N {
            for i in 0..M {
                self.data[j][i] = self.data[j][i] * rhs;
            }
        }
    }
}

impl<T: Scalar, const M: usize, const N: usize> Div<T> for Matrix<T, M, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        let mut out = self;
        out /= rhs;
        out
    }
}

impl<T: Scalar, const M: usize, const N: usize> DivAssign<T> for Matrix<T, M, N> {
    fn div_assign(&mut self, rhs: T) {
        for j in 0..N {
            for i in 0..M {
                self.data[j][i] = self.data[j][i] / rhs;
            }
        }
    }
}

// scalar * matrix, concrete to satisfy the orphan rules
macro_rules! impl_scalar_mul {
    ($($t:ty),*) => {
        $(
            impl<const M: usize, const N: usize> Mul<Matrix<$t, M, N>> for $t {
                type Output = Matrix<$t, M, N>;

                fn mul(self, rhs: Matrix<$t, M, N>) -> Matrix<$t, M, N> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul!(f32, f64);

use crate::linalg::LinalgError;
use crate::matrix::vector::ColumnVector;
use crate::traits::LinalgScalar;
use crate::Matrix;

/// Pivoted elimination on a copy of `a`.
///
/// On return `lu` holds U in the upper triangle (diagonal included) and the
/// unit-lower L multipliers below it; `perm[i]` is the source row of row `i`.
/// Returns the permutation parity, or `Err(Singular)` when a pivot column is
/// numerically zero.
fn factor<T: LinalgScalar, const N: usize>(
    lu: &mut Matrix<T, N, N>,
    perm: &mut [usize; N],
) -> Result<bool, LinalgError> {
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    let mut even = true;

    for col in 0..N {
        let mut max_row = col;
        let mut max_val = lu[(col, col)].modulus();
        for row in (col + 1)..N {
            let val = lu[(row, col)].modulus();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val < T::lepsilon() {
            return Err(LinalgError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            for j in 0..N {
                let tmp = lu[(col, j)];
                lu[(col, j)] = lu[(max_row, j)];
                lu[(max_row, j)] = tmp;
            }
            even = !even;
        }

        let inv_pivot = T::one() / lu[(col, col)];
        for row in (col + 1)..N {
            lu[(row, col)] = lu[(row, col)] * inv_pivot;
        }
        for j in (col + 1)..N {
            let a_col_j = lu[(col, j)];
            for row in (col + 1)..N {
                lu[(row, j)] = lu[(row, j)] - lu[(row, col)] * a_col_j;
            }
        }
    }

    Ok(even)
}

/// LU decomposition with partial pivoting: `PA = LU`.
///
/// ```
/// use mueller::Matrix;
/// use mueller::linalg::LuDecomposition;
///
/// let a = Matrix::new([[2.0_f64, 1.0], [1.0, 3.0]]);
/// let lu = LuDecomposition::new(&a).unwrap();
/// assert!((lu.det() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T, const N: usize> {
    lu: Matrix<T, N, N>,
    perm: [usize; N],
    even: bool,
}

impl<T: LinalgScalar, const N: usize> LuDecomposition<T, N> {
    /// Factor `a`. Returns `Err(Singular)` if a pivot is below machine epsilon.
    pub fn new(a: &Matrix<T, N, N>) -> Result<Self, LinalgError> {
        let mut lu = *a;
        let mut perm = [0usize; N];
        let even = factor(&mut lu, &mut perm)?;
        Ok(Self { lu, perm, even })
    }

    /// Solve `Ax = b`.
    pub fn solve(&self, b: &ColumnVector<T, N>) -> ColumnVector<T, N> {
        let mut x = ColumnVector::<T, N>::zeros();
        for i in 0..N {
            x[(i, 0)] = b[(self.perm[i], 0)];
        }
        for i in 0..N {
            for k in 0..i {
                x[(i, 0)] = x[(i, 0)] - self.lu[(i, k)] * x[(k, 0)];
            }
        }
        for i in (0..N).rev() {
            for k in (i + 1)..N {
                x[(i, 0)] = x[(i, 0)] - self.lu[(i, k)] * x[(k, 0)];
            }
            x[(i, 0)] = x[(i, 0)] / self.lu[(i, i)];
        }
        x
    }

    /// Inverse, solving one column of the identity at a time.
    pub fn inverse(&self) -> Matrix<T, N, N> {
        let mut inv = Matrix::<T, N, N>::zeros();
        for j in 0..N {
            let mut e = ColumnVector::<T, N>::zeros();
            e[(j, 0)] = T::one();
            let col = self.solve(&e);
            for i in 0..N {
                inv[(i, j)] = col[(i, 0)];
            }
        }
        inv
    }

    /// Determinant: product of the U diagonal times the permutation sign.
    pub fn det(&self) -> T {
        let mut d = T::one();
        for i in 0..N {
            d = d * self.lu[(i, i)];
        }
        if self.even {
            d
        } else {
            T::zero() - d
        }
    }
}

impl<T: LinalgScalar, const N: usize> Matrix<T, N, N> {
    /// LU decomposition with partial pivoting.
    pub fn lu(&self) -> Result<LuDecomposition<T, N>, LinalgError> {
        LuDecomposition::new(self)
    }

    /// Matrix inverse.
    ///
    /// ```
    /// use mueller::Matrix;
    /// let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
    /// let inv = a.inverse().unwrap();
    /// assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
    /// assert!((inv[(1, 0)] + 0.2).abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        Ok(self.lu()?.inverse())
    }

    /// Determinant. Numerically singular matrices yield zero.
    pub fn det(&self) -> T {
        match self.lu() {
            Ok(lu) => lu.det(),
            Err(_) => T::zero(),
        }
    }
}

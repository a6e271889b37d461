use crate::traits::Scalar;
use crate::Matrix;

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Extract a P×Q sub-matrix starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use mueller::{Matrix3, Matrix4};
    /// let m = Matrix4::<f64>::from_fn(|i, j| (4 * i + j) as f64);
    /// let small: Matrix3<f64> = m.block(1, 1);
    /// assert_eq!(small[(0, 0)], 5.0);
    /// assert_eq!(small[(2, 2)], 15.0);
    /// ```
    pub fn block<const P: usize, const Q: usize>(&self, i: usize, j: usize) -> Matrix<T, P, Q> {
        assert!(
            i + P <= M && j + Q <= N,
            "block ({i},{j}) size {P}x{Q} out of bounds for {M}x{N} matrix"
        );
        Matrix::from_fn(|r, c| self[(i + r, j + c)])
    }

    /// Write a P×Q sub-matrix into self starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block<const P: usize, const Q: usize>(
        &mut self,
        i: usize,
        j: usize,
        src: &Matrix<T, P, Q>,
    ) {
        assert!(
            i + P <= M && j + Q <= N,
            "set_block ({i},{j}) size {P}x{Q} out of bounds for {M}x{N} matrix"
        );
        for c in 0..Q {
            for r in 0..P {
                self[(i + r, j + c)] = src[(r, c)];
            }
        }
    }
}

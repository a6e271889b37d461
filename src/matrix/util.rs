use core::fmt::{self, Write as _};

use crate::traits::Scalar;
use crate::Matrix;

impl<T: Scalar, const M: usize, const N: usize> Matrix<T, M, N> {
    /// Create a matrix by calling `f(row, col)` for each element.
    pub fn from_fn(f: impl Fn(usize, usize) -> T) -> Self {
        let mut out = Self::zeros();
        for j in 0..N {
            for i in 0..M {
                out.data[j][i] = f(i, j);
            }
        }
        out
    }

    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use mueller::Matrix;
    /// use num_complex::Complex;
    /// let m = Matrix::new([[Complex::new(1.0_f64, 2.0), Complex::new(0.5, -1.0)]]);
    /// let re = m.map(|z| z.re);
    /// assert_eq!(re[(0, 1)], 0.5);
    /// ```
    pub fn map<U: Scalar>(&self, f: impl Fn(T) -> U) -> Matrix<U, M, N> {
        let mut out = Matrix::<U, M, N>::zeros();
        for j in 0..N {
            for i in 0..M {
                out.data[j][i] = f(self.data[j][i]);
            }
        }
        out
    }

    /// Transpose.
    pub fn transpose(&self) -> Matrix<T, N, M> {
        Matrix::from_fn(|i, j| self[(j, i)])
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T {
        let mut s = T::zero();
        for j in 0..N {
            for i in 0..M {
                s = s + self.data[j][i];
            }
        }
        s
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display, const M: usize, const N: usize> fmt::Display for Matrix<T, M, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision();
        let mut widths = [0usize; N];
        for (j, width) in widths.iter_mut().enumerate() {
            for i in 0..M {
                let w = WriteCounting::count(|wc| write_cell(wc, &self[(i, j)], precision));
                *width = (*width).max(w);
            }
        }

        for i in 0..M {
            write!(f, "[")?;
            for (j, width) in widths.iter().enumerate() {
                if j > 0 {
                    write!(f, "  ")?;
                }
                let w = WriteCounting::count(|wc| write_cell(wc, &self[(i, j)], precision));
                for _ in w..*width {
                    f.write_char(' ')?;
                }
                write_cell(f, &self[(i, j)], precision)?;
            }
            write!(f, "]")?;
            if i + 1 < M {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn write_cell<T: fmt::Display>(w: &mut impl fmt::Write, value: &T, precision: Option<usize>) -> fmt::Result {
    match precision {
        Some(p) => write!(w, "{:.*}", p, value),
        None => write!(w, "{}", value),
    }
}

/// Counts characters written, without allocating.
struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Matrix, Matrix2};

    #[test]
    fn from_fn_and_transpose() {
        let m = Matrix::<f64, 2, 3>::from_fn(|i, j| (i * 3 + j) as f64);
        let t = m.transpose();
        assert_eq!(t.nrows(), 3);
        assert_eq!(t[(2, 1)], 5.0);
        assert_eq!(m.sum(), 15.0);
    }

    #[test]
    fn display_with_precision() {
        let m = Matrix2::new([[1.0, -0.5], [0.25, 1.0]]);
        let s = format!("{:.2}", m);
        assert_eq!(s, "[1.00  -0.50]\n[0.25   1.00]");
    }
}

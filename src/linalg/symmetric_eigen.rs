use crate::linalg::LinalgError;
use crate::traits::LinalgScalar;
use crate::Matrix;
use num_traits::{Float, One, Zero};

/// Sweeps allowed before reporting `ConvergenceFailure`.
const MAX_SWEEPS: usize = 64;

/// Squared Frobenius norm of the strictly off-diagonal part.
fn off_diagonal_norm_sq<T: LinalgScalar, const N: usize>(a: &Matrix<T, N, N>) -> T::Real {
    let mut sum = <T::Real as Zero>::zero();
    for j in 0..N {
        for i in 0..N {
            if i != j {
                let m = a[(i, j)].modulus();
                sum = sum + m * m;
            }
        }
    }
    sum
}

/// One two-sided Jacobi rotation annihilating `a[(p, q)]`.
///
/// The `(p, q)` entry is first made real and non-negative by a phase change
/// of row/column `q`, then a real plane rotation zeroes it. Both steps are
/// accumulated into `v` so that `A = V diag(λ) V^H` on convergence.
fn rotate<T: LinalgScalar, const N: usize>(
    a: &mut Matrix<T, N, N>,
    v: &mut Matrix<T, N, N>,
    p: usize,
    q: usize,
) {
    let apq = a[(p, q)];
    let r = apq.modulus();
    if r <= <T::Real as Float>::min_positive_value() {
        a[(p, q)] = T::zero();
        a[(q, p)] = T::zero();
        return;
    }

    // Phase step: column q times w, row q times conj(w), with w = conj(apq)/|apq|.
    let w = apq.conj() * T::from_real(<T::Real as One>::one() / r);
    for k in 0..N {
        a[(k, q)] = a[(k, q)] * w;
    }
    for k in 0..N {
        a[(q, k)] = a[(q, k)] * w.conj();
    }
    for k in 0..N {
        v[(k, q)] = v[(k, q)] * w;
    }

    // Real rotation on the now real-symmetric (p, q) plane.
    let app = a[(p, p)].re();
    let aqq = a[(q, q)].re();
    let two = <T::Real as One>::one() + <T::Real as One>::one();
    let theta = (aqq - app) / (two * r);
    let t = if theta.abs() > <T::Real as Float>::max_value().sqrt() {
        <T::Real as One>::one() / (two * theta)
    } else {
        let sign = if theta < <T::Real as Zero>::zero() {
            -<T::Real as One>::one()
        } else {
            <T::Real as One>::one()
        };
        sign / (theta.abs() + (theta * theta + <T::Real as One>::one()).sqrt())
    };
    let c = <T::Real as One>::one() / (t * t + <T::Real as One>::one()).sqrt();
    let s = t * c;
    let (c, s) = (T::from_real(c), T::from_real(s));

    for k in 0..N {
        let akp = a[(k, p)];
        let akq = a[(k, q)];
        a[(k, p)] = c * akp - s * akq;
        a[(k, q)] = s * akp + c * akq;
    }
    for k in 0..N {
        let apk = a[(p, k)];
        let aqk = a[(q, k)];
        a[(p, k)] = c * apk - s * aqk;
        a[(q, k)] = s * apk + c * aqk;
    }
    for k in 0..N {
        let vkp = v[(k, p)];
        let vkq = v[(k, q)];
        v[(k, p)] = c * vkp - s * vkq;
        v[(k, q)] = s * vkp + c * vkq;
    }

    a[(p, q)] = T::zero();
    a[(q, p)] = T::zero();
}

/// Order eigenpairs by ascending eigenvalue, permuting eigenvector columns.
fn sort_ascending<T: LinalgScalar, const N: usize>(
    values: &mut [T::Real; N],
    vectors: &mut Matrix<T, N, N>,
) {
    for i in 1..N {
        let mut j = i;
        while j > 0 && values[j - 1] > values[j] {
            values.swap(j - 1, j);
            for k in 0..N {
                let tmp = vectors[(k, j - 1)];
                vectors[(k, j - 1)] = vectors[(k, j)];
                vectors[(k, j)] = tmp;
            }
            j -= 1;
        }
    }
}

/// Symmetric/Hermitian eigendecomposition of a fixed-size square matrix.
///
/// Cyclic two-sided Jacobi: each sweep visits every upper-triangular pair
/// once, until the off-diagonal mass drops below machine precision relative
/// to the matrix norm. Works for real symmetric and complex Hermitian input
/// alike, which covers both the 3x3 `m·mᵗ` products of the polar
/// decomposition and the 4x4 covariance matrix.
///
/// Eigenvalues are sorted ascending; eigenvectors are the columns of the
/// orthogonal/unitary matrix V with `A = V diag(λ) V^H`.
///
/// ```
/// use mueller::Matrix;
/// use mueller::linalg::SymmetricEigen;
///
/// let a = Matrix::new([[2.0_f64, -1.0], [-1.0, 2.0]]);
/// let eig = SymmetricEigen::new(&a).unwrap();
/// assert!((eig.eigenvalues()[0] - 1.0).abs() < 1e-12);
/// assert!((eig.eigenvalues()[1] - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SymmetricEigen<T: LinalgScalar, const N: usize> {
    eigenvalues: [T::Real; N],
    eigenvectors: Matrix<T, N, N>,
}

impl<T: LinalgScalar, const N: usize> SymmetricEigen<T, N> {
    /// Decompose a symmetric (Hermitian) matrix. Only the Hermitian part of
    /// `a` is meaningful; the caller is responsible for symmetry.
    ///
    /// Returns `Err(ConvergenceFailure)` if the sweeps do not converge, which
    /// in practice only happens for non-finite input.
    pub fn new(a: &Matrix<T, N, N>) -> Result<Self, LinalgError> {
        let mut work = *a;
        let mut v = Matrix::<T, N, N>::eye();

        let scale = a.frobenius_norm();
        let threshold = {
            let eps = T::lepsilon();
            eps * eps * scale * scale
        };

        let mut converged = false;
        for _ in 0..MAX_SWEEPS {
            let off = off_diagonal_norm_sq(&work);
            if !(off > threshold) {
                // NaN lands here too; rejected below.
                converged = off == off;
                break;
            }
            for p in 0..N {
                for q in (p + 1)..N {
                    rotate(&mut work, &mut v, p, q);
                }
            }
        }

        if !converged {
            return Err(LinalgError::ConvergenceFailure);
        }

        let mut eigenvalues = [<T::Real as Zero>::zero(); N];
        for (i, lambda) in eigenvalues.iter_mut().enumerate() {
            *lambda = work[(i, i)].re();
        }
        sort_ascending(&mut eigenvalues, &mut v);

        Ok(Self {
            eigenvalues,
            eigenvectors: v,
        })
    }

    /// The eigenvalues, sorted ascending.
    #[inline]
    pub fn eigenvalues(&self) -> &[T::Real; N] {
        &self.eigenvalues
    }

    /// The eigenvector matrix V (columns are eigenvectors).
    #[inline]
    pub fn eigenvectors(&self) -> &Matrix<T, N, N> {
        &self.eigenvectors
    }

    /// Rebuild `V diag(λ) V^H` from replacement eigenvalues.
    ///
    /// Used to project a Hermitian matrix onto a constrained spectrum while
    /// keeping its eigenbasis.
    pub fn reconstruct(&self, eigenvalues: &[T::Real; N]) -> Matrix<T, N, N> {
        let mut out = Matrix::<T, N, N>::zeros();
        for k in 0..N {
            let lambda = T::from_real(eigenvalues[k]);
            for j in 0..N {
                let vjk = self.eigenvectors[(j, k)].conj();
                for i in 0..N {
                    out[(i, j)] = out[(i, j)] + self.eigenvectors[(i, k)] * lambda * vjk;
                }
            }
        }
        out
    }
}

impl<T: LinalgScalar, const N: usize> Matrix<T, N, N> {
    /// Symmetric/Hermitian eigendecomposition.
    pub fn eig_symmetric(&self) -> Result<SymmetricEigen<T, N>, LinalgError> {
        SymmetricEigen::new(self)
    }

    /// Eigenvalues of a symmetric/Hermitian matrix, ascending.
    ///
    /// ```
    /// use mueller::Matrix;
    /// let a = Matrix::new([[3.0_f64, 1.0], [1.0, 3.0]]);
    /// let vals = a.eigenvalues_symmetric().unwrap();
    /// assert!((vals[0] - 2.0).abs() < 1e-12);
    /// assert!((vals[1] - 4.0).abs() < 1e-12);
    /// ```
    pub fn eigenvalues_symmetric(&self) -> Result<[T::Real; N], LinalgError> {
        Ok(*SymmetricEigen::new(self)?.eigenvalues())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix3, Matrix4};
    use num_complex::Complex;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!(
            (a - b).abs() < tol,
            "{}: {} vs {} (diff {})",
            msg,
            a,
            b,
            (a - b).abs()
        );
    }

    #[test]
    fn diagonal_matrix_is_sorted() {
        let a = Matrix3::from_diag([3.0_f64, -1.0, 2.0]);
        let eig = a.eig_symmetric().unwrap();
        assert_eq!(*eig.eigenvalues(), [-1.0, 2.0, 3.0]);
        assert_eq!(eig.eigenvectors()[(1, 0)], 1.0);
    }

    #[test]
    fn real_reconstruction_and_orthogonality() {
        let a = Matrix4::new([
            [4.0, 1.0, -2.0, 2.0],
            [1.0, 2.0, 0.0, 1.0],
            [-2.0, 0.0, 3.0, -2.0],
            [2.0, 1.0, -2.0, -1.0],
        ]);
        let eig = a.eig_symmetric().unwrap();
        let back = eig.reconstruct(eig.eigenvalues());
        for i in 0..4 {
            for j in 0..4 {
                assert_near(back[(i, j)], a[(i, j)], TOL, &format!("A[({},{})]", i, j));
            }
        }
        let v = eig.eigenvectors();
        let vtv = v.transpose() * *v;
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(vtv[(i, j)], expected, TOL, &format!("VtV[({},{})]", i, j));
            }
        }
        let sum: f64 = eig.eigenvalues().iter().sum();
        assert_near(sum, a.trace(), TOL, "trace");
    }

    #[test]
    fn repeated_eigenvalues() {
        let a = Matrix3::new([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 5.0]]);
        let vals = a.eigenvalues_symmetric().unwrap();
        assert_near(vals[0], 2.0, TOL, "λ0");
        assert_near(vals[1], 2.0, TOL, "λ1");
        assert_near(vals[2], 5.0, TOL, "λ2");
    }

    #[test]
    fn hermitian_real_eigenvalues() {
        let a = Matrix::new([
            [Complex::new(3.0_f64, 0.0), Complex::new(1.0, -1.0)],
            [Complex::new(1.0, 1.0), Complex::new(2.0, 0.0)],
        ]);
        let eig = a.eig_symmetric().unwrap();

        let expected_0 = (5.0 - 9.0_f64.sqrt()) / 2.0;
        let expected_1 = (5.0 + 9.0_f64.sqrt()) / 2.0;
        assert_near(eig.eigenvalues()[0], expected_0, TOL, "λ[0]");
        assert_near(eig.eigenvalues()[1], expected_1, TOL, "λ[1]");

        let q = eig.eigenvectors();
        let qhq = q.adjoint() * *q;
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(qhq[(i, j)].re, expected, TOL, &format!("QHQ[({},{})] re", i, j));
                assert_near(qhq[(i, j)].im, 0.0, TOL, &format!("QHQ[({},{})] im", i, j));
            }
        }
    }

    #[test]
    fn hermitian_4x4_reconstruction() {
        let c = |re: f64, im: f64| Complex::new(re, im);
        let a = Matrix4::new([
            [c(1.0, 0.0), c(0.2, 0.1), c(0.0, -0.3), c(0.1, 0.0)],
            [c(0.2, -0.1), c(0.5, 0.0), c(0.05, 0.05), c(0.0, 0.2)],
            [c(0.0, 0.3), c(0.05, -0.05), c(0.3, 0.0), c(-0.1, 0.0)],
            [c(0.1, 0.0), c(0.0, -0.2), c(-0.1, 0.0), c(0.2, 0.0)],
        ]);
        let eig = a.eig_symmetric().unwrap();
        let back = eig.reconstruct(eig.eigenvalues());
        for i in 0..4 {
            for j in 0..4 {
                assert_near(back[(i, j)].re, a[(i, j)].re, TOL, &format!("re[({},{})]", i, j));
                assert_near(back[(i, j)].im, a[(i, j)].im, TOL, &format!("im[({},{})]", i, j));
            }
        }
    }

    #[test]
    fn non_finite_input_fails() {
        let a = Matrix3::from_diag([1.0, f64::NAN, 0.0]);
        let mut b = a;
        b[(0, 1)] = f64::NAN;
        b[(1, 0)] = f64::NAN;
        assert_eq!(b.eig_symmetric().unwrap_err(), LinalgError::ConvergenceFailure);
    }
}

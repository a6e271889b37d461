//! Mueller-matrix engine.
//!
//! [`MuellerMatrix`] wraps a 4x4 real matrix and is split into the block
//! quadruple `(m00, D, P, m)` on demand, never cached:
//!
//! ```text
//! M = m00 · | 1  D |
//!           | P  m |
//! ```
//!
//! Around it sit the canonical element constructors, the polarization
//! parameters, the physical-realizability checks, the repair filter and the
//! polar decompositions.
//!
//! # Build, check, repair, decompose
//!
//! ```
//! use mueller::mueller::{DecomposeSettings, FilterSettings, PolarOrder};
//! use mueller::MuellerMatrix;
//!
//! let m = MuellerMatrix::depolarizer_from_factors([0.7, 0.6, 0.5], 1.0)
//!     * MuellerMatrix::retarder_linear(0.8, 0.3)
//!     * MuellerMatrix::diattenuator_linear(0.9, 0.4, 0.1);
//! assert!(m.is_physical(1e-6).unwrap());
//!
//! let repaired = m.filter_physical_conditions(&FilterSettings::default()).unwrap();
//! assert_eq!(repaired.iterations, 0);
//!
//! let polar = m.decompose_polar(PolarOrder::Drp, &DecomposeSettings::default()).unwrap();
//! assert!(polar.parameters.max_error < 1e-6);
//! ```

mod analysis;
mod blocks;
mod checks;
mod decompose;
mod elements;
mod filter;
mod parameters;


pub use analysis::{DiattenuatorParameters, RetarderParameters};
pub use blocks::MuellerBlocks;
pub use checks::{Condition, ConditionResult, HomogeneityMethod, PhysicalConditions};
pub use decompose::{
    Ambiguity, DecomposeSettings, DecompositionParameters, PolarDecomposition, PolarOrder,
    PureDecomposition, PureOrder,
};
pub use elements::RetardanceVectorKind;
pub use filter::{FilterOutcome, FilterSettings};
pub use parameters::{DepolarizationFactors, ParameterSummary, PurityIndices};

#[cfg(not(feature = "std"))]
use num_traits::Float;

use core::fmt;
use core::ops::{Div, Mul};

use num_complex::Complex;

use crate::jones::{Jones, JonesMatrix};
use crate::linalg::LinalgError;
use crate::stokes::Stokes;
use crate::{Matrix2, Matrix3, Matrix4, Vector3};

/// Numeric tolerance for degenerate-case detection.
pub const EPS: f64 = 1e-6;

/// Default tolerance for checks, filters and decompositions.
pub const DEFAULT_TOL: f64 = EPS;

/// Default iteration cap of [`MuellerMatrix::filter_physical_conditions`].
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// `det(m)` below this value disqualifies a matrix as a retarder.
pub const RETARDER_DET_MIN: f64 = 1e-8;

/// Errors from the Mueller engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MuellerError {
    /// A diattenuation, polarizance or retardance vector is longer than 1.
    InvalidVector,
    /// Retarder requested at a multiple of π with a nonzero axis.
    DegenerateFormalism,
    /// Polarimetric purity above 1: the matrix is not physical.
    NonPhysicalMatrix,
    /// Unknown decomposition order code.
    InvalidOrder,
    /// Failure in the linear-algebra core.
    Linalg(LinalgError),
}

impl fmt::Display for MuellerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuellerError::InvalidVector => write!(f, "vector magnitude exceeds 1"),
            MuellerError::DegenerateFormalism => {
                write!(f, "retarder axis undefined at a multiple of pi")
            }
            MuellerError::NonPhysicalMatrix => {
                write!(f, "polarimetric purity exceeds 1: matrix is not physical")
            }
            MuellerError::InvalidOrder => write!(f, "unknown decomposition order"),
            MuellerError::Linalg(e) => write!(f, "linear algebra: {}", e),
        }
    }
}

impl From<LinalgError> for MuellerError {
    fn from(e: LinalgError) -> Self {
        MuellerError::Linalg(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MuellerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MuellerError::Linalg(e) => Some(e),
            _ => None,
        }
    }
}

/// The four basis matrices of the covariance mapping:
/// `I`, `diag(1, -1)`, `[[0, 1], [1, 0]]` and `[[0, -i], [i, 0]]`.
pub fn pauli_basis() -> [Matrix2<Complex<f64>>; 4] {
    let o = Complex::new(0.0, 0.0);
    let l = Complex::new(1.0, 0.0);
    let i = Complex::new(0.0, 1.0);
    [
        Matrix2::new([[l, o], [o, l]]),
        Matrix2::new([[l, o], [o, -l]]),
        Matrix2::new([[o, l], [l, o]]),
        Matrix2::new([[o, -i], [i, o]]),
    ]
}

/// `kron(a, b)[(2r1 + s1, 2r2 + s2)] = a[(r1, r2)] · b[(s1, s2)]`.
fn kron(a: &Matrix2<Complex<f64>>, b: &Matrix2<Complex<f64>>) -> Matrix4<Complex<f64>> {
    Matrix4::from_fn(|r, c| a[(r / 2, c / 2)] * b[(r % 2, c % 2)])
}

/// Jones-to-Mueller basis change `U` and its inverse.
fn jones_basis() -> (Matrix4<Complex<f64>>, Matrix4<Complex<f64>>) {
    let o = Complex::new(0.0, 0.0);
    let l = Complex::new(1.0, 0.0);
    let i = Complex::new(0.0, 1.0);
    let h = Complex::new(0.5, 0.0);
    let hi = Complex::new(0.0, 0.5);
    let u = Matrix4::new([
        [l, o, o, l],
        [l, o, o, -l],
        [o, l, l, o],
        [o, i, -i, o],
    ]);
    let u_inv = Matrix4::new([
        [h, h, o, o],
        [o, o, h, -hi],
        [o, o, h, hi],
        [h, -h, o, o],
    ]);
    (u, u_inv)
}

/// A 4x4 real Mueller matrix.
///
/// ```
/// use mueller::MuellerMatrix;
///
/// let pol = MuellerMatrix::diattenuator_perfect(0.0);
/// assert!((pol.m00() - 0.5).abs() < 1e-12);
/// assert!((pol.diattenuation() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuellerMatrix {
    m: Matrix4<f64>,
}

impl MuellerMatrix {
    /// Wrap a raw 4x4 matrix. No realizability check is made.
    pub fn from_matrix(m: Matrix4<f64>) -> Self {
        Self { m }
    }

    /// Build from sixteen elements in row-major order.
    pub fn from_elements(elements: [f64; 16]) -> Self {
        Self::from_matrix(Matrix4::from_fn(|r, c| elements[4 * r + c]))
    }

    /// Build from a normalized matrix (`Mnorm[0,0] = 1`) and a mean
    /// transmission. Without `m00`, the largest transmission compatible with
    /// the diattenuation and polarizance is used: `1 / (1 + max(|D|, |P|))`.
    pub fn from_normalized(mnorm: Matrix4<f64>, m00: Option<f64>) -> Self {
        let m00 = m00.unwrap_or_else(|| {
            let b = MuellerBlocks::divide(&mnorm);
            1.0 / (1.0 + b.d.norm().max(b.p.norm()))
        });
        Self::from_matrix(mnorm * m00)
    }

    /// Mueller matrix of a non-depolarizing element given by a Jones matrix:
    /// `M = Re(U · (J ⊗ J*) · U⁻¹)`.
    pub fn from_jones(jones: &impl Jones) -> Self {
        let j = jones.jones_matrix();
        let jc = j.map(|z| z.conj());
        let (u, u_inv) = jones_basis();
        let mc = u * kron(&j, &jc) * u_inv;
        Self::from_matrix(mc.map(|z| z.re))
    }

    /// Inverse of [`covariance_matrix`](Self::covariance_matrix):
    /// `M[i,j] = Re tr(kron(S_i, S_j*) · H)`.
    pub fn from_covariance(h: &Matrix4<Complex<f64>>) -> Self {
        let s = pauli_basis();
        let mut m = Matrix4::zeros();
        for i in 0..4 {
            for j in 0..4 {
                let k = kron(&s[i], &s[j].map(|z| z.conj()));
                let mut tr = Complex::new(0.0, 0.0);
                for a in 0..4 {
                    for b in 0..4 {
                        tr += k[(a, b)] * h[(b, a)];
                    }
                }
                m[(i, j)] = tr.re;
            }
        }
        Self::from_matrix(m)
    }

    /// Matrix of the inverse element.
    pub fn from_inverse(other: &MuellerMatrix) -> Result<Self, MuellerError> {
        other.inverse()
    }

    /// Underlying 4x4 matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.m
    }

    /// Mean transmission for unpolarized light, `M[0,0]`.
    pub fn m00(&self) -> f64 {
        self.m[(0, 0)]
    }

    /// `M / m00` when `m00 > 0`, else `M`.
    pub fn normalized(&self) -> Matrix4<f64> {
        let m00 = self.m00();
        if m00 > 0.0 {
            self.m / m00
        } else {
            self.m
        }
    }

    /// Split into `(m00, D, P, m)`.
    pub fn blocks(&self) -> MuellerBlocks {
        MuellerBlocks::divide(&self.m)
    }

    /// Assemble from diattenuation, polarizance, small matrix and `m00`.
    pub fn from_blocks(d: Vector3<f64>, p: Vector3<f64>, m: Matrix3<f64>, m00: f64) -> Self {
        Self::from_matrix(MuellerBlocks { m00, d, p, m }.compose())
    }

    /// Transposed matrix.
    pub fn transpose(&self) -> Self {
        Self::from_matrix(self.m.transpose())
    }

    /// Matrix inverse. Fails with [`LinalgError::Singular`] for singular elements.
    pub fn inverse(&self) -> Result<Self, MuellerError> {
        Ok(Self::from_matrix(self.m.inverse()?))
    }

    /// Determinant.
    pub fn det(&self) -> f64 {
        self.m.det()
    }

    /// Element traversed in the opposite direction: `X · Mᵗ · X` with
    /// `X = diag(1, 1, -1, 1)`.
    pub fn reciprocal(&self) -> Self {
        let x = Matrix4::from_diag([1.0, 1.0, -1.0, 1.0]);
        Self::from_matrix(x * self.m.transpose() * x)
    }

    /// Covariance matrix `H = ¼ Σ M[i,j] · kron(S_i, S_j*)`.
    pub fn covariance_matrix(&self) -> Matrix4<Complex<f64>> {
        let s = pauli_basis();
        let mut h = Matrix4::zeros();
        for i in 0..4 {
            for j in 0..4 {
                let weight = 0.25 * self.m[(i, j)];
                if weight != 0.0 {
                    h += kron(&s[i], &s[j].map(|z| z.conj())) * Complex::new(weight, 0.0);
                }
            }
        }
        h
    }

    /// Jones matrix of a non-depolarizing Mueller matrix, with `J[0,0]`
    /// real and non-negative.
    ///
    /// Meaningless for depolarizing matrices. When `J[0,0]` vanishes the
    /// phases of the other elements are only known relative to each other.
    pub fn to_jones(&self) -> JonesMatrix {
        let m = &self.m;
        let amp = |x: f64| (0.5 * x).max(0.0).sqrt();
        let pxx = amp(m[(0, 0)] + m[(0, 1)] + m[(1, 0)] + m[(1, 1)]);
        let pxy = amp(m[(0, 0)] - m[(0, 1)] + m[(1, 0)] - m[(1, 1)]);
        let pyx = amp(m[(0, 0)] + m[(0, 1)] - m[(1, 0)] - m[(1, 1)]);
        let pyy = amp(m[(0, 0)] - m[(0, 1)] - m[(1, 0)] + m[(1, 1)]);

        let fxy = (-m[(0, 3)] - m[(1, 3)]).atan2(m[(0, 2)] + m[(1, 2)]);
        let fyx = (m[(3, 0)] + m[(3, 1)]).atan2(m[(2, 0)] + m[(2, 1)]);
        let fyy = (m[(3, 2)] - m[(2, 3)]).atan2(m[(2, 2)] + m[(3, 3)]);

        JonesMatrix::new(Matrix2::new([
            [Complex::new(pxx, 0.0), Complex::from_polar(pxy, fxy)],
            [Complex::from_polar(pyx, fyx), Complex::from_polar(pyy, fyy)],
        ]))
    }

    /// Mueller rotation matrix `R(θ)`; only acts on `S1` and `S2`.
    pub fn rotation_matrix(angle: f64) -> Matrix4<f64> {
        let (s2, c2) = (2.0 * angle).sin_cos();
        Matrix4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c2, s2, 0.0],
            [0.0, -s2, c2, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotate the element in place: `M' = R(-θ) · M · R(θ)`.
    /// A zero or NaN angle leaves the matrix untouched.
    pub fn rotate(&mut self, angle: f64) {
        if angle.is_nan() || angle == 0.0 {
            return;
        }
        self.m = Self::rotation_matrix(-angle) * self.m * Self::rotation_matrix(angle);
    }

    /// Rotated copy, see [`rotate`](Self::rotate).
    pub fn rotated(&self, angle: f64) -> Self {
        let mut out = *self;
        out.rotate(angle);
        out
    }
}

impl From<Matrix4<f64>> for MuellerMatrix {
    fn from(m: Matrix4<f64>) -> Self {
        Self::from_matrix(m)
    }
}

impl Mul for MuellerMatrix {
    type Output = MuellerMatrix;

    fn mul(self, rhs: MuellerMatrix) -> MuellerMatrix {
        MuellerMatrix::from_matrix(self.m * rhs.m)
    }
}

impl Mul<&MuellerMatrix> for &MuellerMatrix {
    type Output = MuellerMatrix;

    fn mul(self, rhs: &MuellerMatrix) -> MuellerMatrix {
        MuellerMatrix::from_matrix(self.m * rhs.m)
    }
}

impl Mul<Stokes> for MuellerMatrix {
    type Output = Stokes;

    fn mul(self, rhs: Stokes) -> Stokes {
        Stokes::from_column(self.m * *rhs.column())
    }
}

impl Mul<f64> for MuellerMatrix {
    type Output = MuellerMatrix;

    fn mul(self, rhs: f64) -> MuellerMatrix {
        MuellerMatrix::from_matrix(self.m * rhs)
    }
}

impl Div<f64> for MuellerMatrix {
    type Output = MuellerMatrix;

    fn div(self, rhs: f64) -> MuellerMatrix {
        MuellerMatrix::from_matrix(self.m / rhs)
    }
}

impl fmt::Display for MuellerMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.m, f)
    }
}

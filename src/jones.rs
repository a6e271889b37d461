//! Jones-matrix collaborator.
//!
//! The Mueller engine only needs three things from the Jones side: a way to
//! read a 2x2 complex matrix ([`Jones`]), the two canonical elements defined
//! by characteristic angles, and an eigendecomposition (for the homogeneity
//! test). [`JonesMatrix`] provides exactly that and nothing more.

#[cfg(not(feature = "std"))]
use num_traits::Float;

use num_complex::Complex;

use crate::angles::Eigenstate;
use crate::matrix::vector::ColumnVector2;
use crate::Matrix2;

/// Anything that can present itself as a 2x2 complex Jones matrix.
pub trait Jones {
    fn jones_matrix(&self) -> Matrix2<Complex<f64>>;
}

impl Jones for Matrix2<Complex<f64>> {
    fn jones_matrix(&self) -> Matrix2<Complex<f64>> {
        *self
    }
}

/// A 2x2 complex Jones matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JonesMatrix {
    j: Matrix2<Complex<f64>>,
}

/// Eigenvalues and unit eigenvectors of a Jones matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JonesEigen {
    pub values: [Complex<f64>; 2],
    pub vectors: [ColumnVector2<Complex<f64>>; 2],
}

impl JonesEigen {
    /// `|v0^H v1|`: zero for orthogonal eigenstates (homogeneous element).
    pub fn overlap(&self) -> f64 {
        let [v0, v1] = &self.vectors;
        (v0[(0, 0)].conj() * v1[(0, 0)] + v0[(1, 0)].conj() * v1[(1, 0)]).norm()
    }
}

impl JonesMatrix {
    pub fn new(j: Matrix2<Complex<f64>>) -> Self {
        Self { j }
    }

    pub fn matrix(&self) -> &Matrix2<Complex<f64>> {
        &self.j
    }

    /// Diattenuator with field transmissions `p1` (along the eigenstate given
    /// by `(alpha, delta)`) and `p2` (along the orthogonal one).
    pub fn diattenuator_carac_angles(p1: f64, p2: f64, alpha: f64, delta: f64) -> Self {
        let (sa, ca) = alpha.sin_cos();
        let off = sa * ca * (p1 - p2);
        let phase = Complex::from_polar(1.0, delta);
        Self::new(Matrix2::new([
            [
                Complex::from(p1 * ca * ca + p2 * sa * sa),
                phase.conj() * off,
            ],
            [phase * off, Complex::from(p2 * ca * ca + p1 * sa * sa)],
        ]))
    }

    /// Diattenuator whose main eigenstate is given by azimuth and ellipticity.
    pub fn diattenuator_azimuth_ellipticity(p1: f64, p2: f64, azimuth: f64, ellipticity: f64) -> Self {
        let e = Eigenstate::from_azimuth_ellipticity(azimuth, ellipticity);
        Self::diattenuator_carac_angles(p1, p2, e.alpha, e.delta)
    }

    /// Retarder of retardance `delay` whose fast eigenstate is given by the
    /// characteristic angles.
    pub fn retarder_carac_angles(delay: f64, alpha: f64, delta: f64) -> Self {
        let (sa, ca) = alpha.sin_cos();
        let half = Complex::from_polar(1.0, 0.5 * delay);
        let off = Complex::new(0.0, (2.0 * alpha).sin() * (0.5 * delay).sin());
        let phase = Complex::from_polar(1.0, delta);
        Self::new(Matrix2::new([
            [half * (ca * ca) + half.conj() * (sa * sa), off * phase.conj()],
            [off * phase, half.conj() * (ca * ca) + half * (sa * sa)],
        ]))
    }

    /// Retarder whose fast eigenstate is given by azimuth and ellipticity.
    pub fn retarder_azimuth_ellipticity(delay: f64, azimuth: f64, ellipticity: f64) -> Self {
        let e = Eigenstate::from_azimuth_ellipticity(azimuth, ellipticity);
        Self::retarder_carac_angles(delay, e.alpha, e.delta)
    }

    pub fn trace(&self) -> Complex<f64> {
        self.j.trace()
    }

    pub fn det(&self) -> Complex<f64> {
        self.j[(0, 0)] * self.j[(1, 1)] - self.j[(0, 1)] * self.j[(1, 0)]
    }

    /// Closed-form eigendecomposition of the 2x2 matrix.
    ///
    /// Each eigenvector is taken from the row with the larger off-diagonal
    /// entry. A diagonal matrix returns the canonical basis, and a defective
    /// one returns the same eigenvector twice.
    pub fn eigen(&self) -> JonesEigen {
        let (a, b, c, d) = (self.j[(0, 0)], self.j[(0, 1)], self.j[(1, 0)], self.j[(1, 1)]);
        let half_trace = (a + d) * 0.5;
        let disc = (half_trace * half_trace - (a * d - b * c)).sqrt();
        let values = [half_trace + disc, half_trace - disc];

        let one = Complex::new(1.0, 0.0);
        let zero = Complex::new(0.0, 0.0);
        let scale = a.norm().max(b.norm()).max(c.norm()).max(d.norm());
        let tiny = 1e-14 * scale.max(f64::MIN_POSITIVE);

        if b.norm() <= tiny && c.norm() <= tiny {
            return JonesEigen {
                values: [a, d],
                vectors: [
                    ColumnVector2::from_column([one, zero]),
                    ColumnVector2::from_column([zero, one]),
                ],
            };
        }

        let vector = |lambda: Complex<f64>| {
            let (x, y) = if b.norm() >= c.norm() {
                (b, lambda - a)
            } else {
                (lambda - d, c)
            };
            let n = (x.norm_sqr() + y.norm_sqr()).sqrt();
            ColumnVector2::from_column([x / n, y / n])
        };

        JonesEigen {
            values,
            vectors: [vector(values[0]), vector(values[1])],
        }
    }
}

impl Jones for JonesMatrix {
    fn jones_matrix(&self) -> Matrix2<Complex<f64>> {
        self.j
    }
}

//! Canonical element constructors.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

#[cfg(not(feature = "std"))]
use num_traits::Float;

use super::{MuellerError, MuellerMatrix, EPS};
use crate::angles::{azimuth_ellipticity_to_vector, characteristic_to_vector, Eigenstate};
use crate::jones::JonesMatrix;
use crate::{Matrix3, Matrix4, Vector3};

/// How a retardance vector is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetardanceVectorKind {
    /// Unit axis.
    #[default]
    Normalized,
    /// Axis scaled by `delay / π`.
    Straight,
    /// Axis scaled by `delay`.
    Retardance,
}

/// Small-m block of a retarder of retardance `delay` around the unit axis `u`:
/// `m[i,j] = δ_ij cos δ + (1 - cos δ) u_i u_j + sin δ Σ_k ε_ijk u_k`.
pub(super) fn retarder_block(delay: f64, u: &Vector3<f64>) -> Matrix3<f64> {
    let (s, c) = delay.sin_cos();
    let mut m = Matrix3::eye() * c + u.outer(u) * (1.0 - c);
    m[(0, 1)] += s * u[2];
    m[(1, 0)] -= s * u[2];
    m[(1, 2)] += s * u[0];
    m[(2, 1)] -= s * u[0];
    m[(2, 0)] += s * u[1];
    m[(0, 2)] -= s * u[1];
    m
}

/// Diattenuator with vector `d` (`|d| ≤ 1`) and mean transmission `m00`.
fn diattenuator_with(d: &Vector3<f64>, m00: f64) -> MuellerMatrix {
    let n2 = d.norm_squared();
    let m = if n2 > 0.0 {
        let s = (1.0 - n2).max(0.0).sqrt();
        Matrix3::eye() * s + d.outer(d) * ((1.0 - s) / n2)
    } else {
        Matrix3::eye()
    };
    MuellerMatrix::from_blocks(*d, *d, m, m00)
}

impl MuellerMatrix {
    /// Identity: no change of intensity or polarization.
    pub fn vacuum() -> Self {
        Self::from_matrix(Matrix4::eye())
    }

    /// Ideal mirror of the given reflectivity: `diag(1, r, -r, -r)`.
    pub fn mirror(reflectivity: f64) -> Self {
        Self::from_matrix(Matrix4::from_diag([1.0, reflectivity, -reflectivity, -reflectivity]))
    }

    /// Neutral filter (`d < 1`) or amplifier (`d > 1`): `d · I`.
    pub fn filter_amplifier(d: f64) -> Self {
        Self::from_matrix(Matrix4::eye() * d)
    }

    /// Diagonal depolarizer with the same factor on all three axes.
    pub fn depolarizer(d: f64, m00: f64) -> Self {
        Self::depolarizer_from_factors([d, d, d], m00)
    }

    /// Diagonal depolarizer `m00 · diag(1, d0, d1, d2)`.
    pub fn depolarizer_from_factors(d: [f64; 3], m00: f64) -> Self {
        Self::from_matrix(Matrix4::from_diag([m00, m00 * d[0], m00 * d[1], m00 * d[2]]))
    }

    /// Linear diattenuator with field transmissions `p1 ≥ p2` along its
    /// axes, the `p1` axis at `angle` from the horizontal.
    pub fn diattenuator_linear(p1: f64, p2: f64, angle: f64) -> Self {
        let a = p1 * p1 + p2 * p2;
        let b = p1 * p1 - p2 * p2;
        let c = 2.0 * p1 * p2;
        let mut out = Self::from_matrix(Matrix4::new([
            [a, b, 0.0, 0.0],
            [b, a, 0.0, 0.0],
            [0.0, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, c],
        ]) * 0.5);
        out.rotate(angle);
        out
    }

    /// Perfect linear polarizer at `angle`.
    pub fn diattenuator_perfect(angle: f64) -> Self {
        Self::diattenuator_linear(1.0, 0.0, angle)
    }

    fn degenerate_diattenuator(p1: f64, p2: f64) -> Option<Self> {
        if p1 == 0.0 && p2 == 0.0 {
            Some(Self::from_matrix(Matrix4::zeros()))
        } else if p1 == 1.0 && p2 == 1.0 {
            Some(Self::vacuum())
        } else {
            None
        }
    }

    /// General diattenuator through the Jones representation.
    pub fn diattenuator_carac_angles_from_jones(p1: f64, p2: f64, alpha: f64, delta: f64) -> Self {
        Self::degenerate_diattenuator(p1, p2).unwrap_or_else(|| {
            Self::from_jones(&JonesMatrix::diattenuator_carac_angles(p1, p2, alpha, delta))
        })
    }

    /// General diattenuator built from its diattenuation vector
    /// `D = (p1² - p2²) / (p1² + p2²) · u(α, δ)`.
    pub fn diattenuator_carac_angles_from_vector(p1: f64, p2: f64, alpha: f64, delta: f64) -> Self {
        Self::degenerate_diattenuator(p1, p2)
            .unwrap_or_else(|| Self::diattenuator_along(p1, p2, &characteristic_to_vector(alpha, delta)))
    }

    /// Diattenuator with field transmissions `p1`, `p2` and an eigenstate given by
    /// azimuth and ellipticity, built through its Jones matrix.
    pub fn diattenuator_azimuth_ellipticity_from_jones(
        p1: f64,
        p2: f64,
        azimuth: f64,
        ellipticity: f64,
    ) -> Self {
        let e = Eigenstate::from_azimuth_ellipticity(azimuth, ellipticity);
        Self::diattenuator_carac_angles_from_jones(p1, p2, e.alpha, e.delta)
    }

    /// Diattenuator with field transmissions `p1`, `p2` and an eigenstate given by
    /// azimuth and ellipticity.
    pub fn diattenuator_azimuth_ellipticity_from_vector(
        p1: f64,
        p2: f64,
        azimuth: f64,
        ellipticity: f64,
    ) -> Self {
        Self::degenerate_diattenuator(p1, p2).unwrap_or_else(|| {
            Self::diattenuator_along(p1, p2, &azimuth_ellipticity_to_vector(azimuth, ellipticity))
        })
    }

    fn diattenuator_along(p1: f64, p2: f64, u: &Vector3<f64>) -> Self {
        let (t1, t2) = (p1 * p1, p2 * p2);
        diattenuator_with(&(*u * ((t1 - t2) / (t1 + t2))), 0.5 * (t1 + t2))
    }

    /// Diattenuator from its diattenuation vector.
    ///
    /// Without `m00` the largest physical transmission `1 / (1 + |D|)` is
    /// used. `|D|` in `(1, 1 + EPS]` is clamped to 1.
    ///
    /// # Errors
    ///
    /// [`MuellerError::InvalidVector`] if `|D| > 1 + EPS`.
    pub fn diattenuator_from_vector(d: &Vector3<f64>, m00: Option<f64>) -> Result<Self, MuellerError> {
        let n = d.norm();
        if n > 1.0 + EPS {
            return Err(MuellerError::InvalidVector);
        }
        let d = if n > 1.0 { *d / n } else { *d };
        let m00 = m00.unwrap_or(1.0 / (1.0 + n.min(1.0)));
        Ok(diattenuator_with(&d, m00))
    }

    /// Linear retarder of retardance `delay` with its fast axis at `angle`.
    pub fn retarder_linear(delay: f64, angle: f64) -> Self {
        let (s, c) = delay.sin_cos();
        let mut out = Self::from_matrix(Matrix4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, c, s],
            [0.0, 0.0, -s, c],
        ]));
        out.rotate(angle);
        out
    }

    /// Linear retarder of delay π/2 with fast axis at `angle`.
    pub fn quarter_waveplate(angle: f64) -> Self {
        Self::retarder_linear(FRAC_PI_2, angle)
    }

    /// Linear retarder of delay π with fast axis at `angle`.
    pub fn half_waveplate(angle: f64) -> Self {
        Self::retarder_linear(PI, angle)
    }

    /// Retarder whose fast eigenstate has characteristic angles `(α, δ)`.
    pub fn retarder_carac_angles_from_vector(delay: f64, alpha: f64, delta: f64) -> Self {
        Self::retarder_around(delay, &characteristic_to_vector(alpha, delta))
    }

    /// Same element as [`retarder_carac_angles_from_vector`](Self::retarder_carac_angles_from_vector),
    /// built through its Jones matrix.
    pub fn retarder_carac_angles_from_jones(delay: f64, alpha: f64, delta: f64) -> Self {
        Self::from_jones(&JonesMatrix::retarder_carac_angles(delay, alpha, delta))
    }

    /// Retarder whose fast eigenstate has the given azimuth and ellipticity.
    pub fn retarder_azimuth_ellipticity_from_vector(delay: f64, azimuth: f64, ellipticity: f64) -> Self {
        Self::retarder_around(delay, &azimuth_ellipticity_to_vector(azimuth, ellipticity))
    }

    pub fn retarder_azimuth_ellipticity_from_jones(delay: f64, azimuth: f64, ellipticity: f64) -> Self {
        Self::from_jones(&JonesMatrix::retarder_azimuth_ellipticity(delay, azimuth, ellipticity))
    }

    fn retarder_around(delay: f64, u: &Vector3<f64>) -> Self {
        Self::from_blocks(Vector3::zeros(), Vector3::zeros(), retarder_block(delay, u), 1.0)
    }

    /// Retarder from its retardance vector, scaled as `kind` says.
    ///
    /// A retardance that is a multiple of 2π gives `m00 · I` whatever the
    /// axis.
    ///
    /// # Errors
    ///
    /// - [`MuellerError::InvalidVector`] if the scaled axis is longer than
    ///   `1 + EPS`, or zero while the retardance is not trivial.
    /// - [`MuellerError::DegenerateFormalism`] if `delay` is an odd multiple
    ///   of π and the axis is nonzero.
    pub fn retarder_from_vector(
        delay: f64,
        ur: &Vector3<f64>,
        m00: f64,
        kind: RetardanceVectorKind,
    ) -> Result<Self, MuellerError> {
        let turns = (delay % TAU).abs();
        if turns < EPS || TAU - turns < EPS {
            return Ok(Self::filter_amplifier(m00));
        }

        let u = match kind {
            RetardanceVectorKind::Normalized => *ur,
            RetardanceVectorKind::Retardance => *ur / delay,
            RetardanceVectorKind::Straight => *ur * (PI / delay),
        };
        let n = u.norm();
        if n > 1.0 + EPS {
            return Err(MuellerError::InvalidVector);
        }
        if n < EPS {
            return Err(MuellerError::InvalidVector);
        }
        if delay.sin().abs() < EPS {
            return Err(MuellerError::DegenerateFormalism);
        }

        Ok(Self::from_blocks(
            Vector3::zeros(),
            Vector3::zeros(),
            retarder_block(delay, &(u / n)),
            m00,
        ))
    }

    /// Linear diattenuator and linear retarder sharing their axes, the
    /// `p1`/fast axis at `angle`.
    pub fn diattenuator_retarder_linear(p1: f64, p2: f64, delay: f64, angle: f64) -> Self {
        let a = p1 * p1 + p2 * p2;
        let b = p1 * p1 - p2 * p2;
        let (s, c) = delay.sin_cos();
        let c = 2.0 * p1 * p2 * c;
        let s = 2.0 * p1 * p2 * s;
        let mut out = Self::from_matrix(Matrix4::new([
            [a, b, 0.0, 0.0],
            [b, a, 0.0, 0.0],
            [0.0, 0.0, c, s],
            [0.0, 0.0, -s, c],
        ]) * 0.5);
        out.rotate(angle);
        out
    }
}

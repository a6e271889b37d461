//! Stokes-vector operand.

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::angles::azimuth_ellipticity_to_vector;
use crate::matrix::vector::ColumnVector4;

/// Stokes vector `(S0, S1, S2, S3)` of a light beam.
///
/// ```
/// use mueller::{MuellerMatrix, Stokes};
///
/// let unpolarized = Stokes::unpolarized(1.0);
/// let out = MuellerMatrix::diattenuator_perfect(0.0) * unpolarized;
/// assert!((out.intensity() - 0.5).abs() < 1e-12);
/// assert!((out.degree_of_polarization() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stokes {
    s: ColumnVector4<f64>,
}

impl Stokes {
    pub fn new(s0: f64, s1: f64, s2: f64, s3: f64) -> Self {
        Self {
            s: ColumnVector4::from_column([s0, s1, s2, s3]),
        }
    }

    pub fn from_column(s: ColumnVector4<f64>) -> Self {
        Self { s }
    }

    /// Natural light: `(I, 0, 0, 0)`.
    pub fn unpolarized(intensity: f64) -> Self {
        Self::new(intensity, 0.0, 0.0, 0.0)
    }

    /// Fully polarized light with the given azimuth and ellipticity.
    pub fn fully_polarized(intensity: f64, azimuth: f64, ellipticity: f64) -> Self {
        let u = azimuth_ellipticity_to_vector(azimuth, ellipticity);
        Self::new(intensity, intensity * u[0], intensity * u[1], intensity * u[2])
    }

    pub fn column(&self) -> &ColumnVector4<f64> {
        &self.s
    }

    pub fn components(&self) -> [f64; 4] {
        [self.s[(0, 0)], self.s[(1, 0)], self.s[(2, 0)], self.s[(3, 0)]]
    }

    /// Total intensity `S0`.
    pub fn intensity(&self) -> f64 {
        self.s[(0, 0)]
    }

    /// `sqrt(S1² + S2² + S3²) / S0`, zero for a dark beam.
    pub fn degree_of_polarization(&self) -> f64 {
        let [s0, s1, s2, s3] = self.components();
        if s0 > 0.0 {
            (s1 * s1 + s2 * s2 + s3 * s3).sqrt() / s0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_4;

    #[test]
    fn fully_polarized_has_unit_degree() {
        let s = Stokes::fully_polarized(2.0, 0.3, -0.2);
        assert!((s.degree_of_polarization() - 1.0).abs() < 1e-12);
        assert_eq!(s.intensity(), 2.0);
    }

    #[test]
    fn circular_light() {
        let s = Stokes::fully_polarized(1.0, 0.0, FRAC_PI_4);
        let [_, s1, s2, s3] = s.components();
        assert!(s1.abs() < 1e-12);
        assert!(s2.abs() < 1e-12);
        assert!((s3 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dark_beam() {
        assert_eq!(Stokes::unpolarized(0.0).degree_of_polarization(), 0.0);
    }
}

//! Eigenstate angle conventions.
//!
//! A fully polarized eigenstate is a point `u` on the unit Poincaré sphere.
//! Two angle pairs describe it:
//!
//! - characteristic angles `(α, δ)`: `u = (cos 2α, sin 2α·cos δ, sin 2α·sin δ)`,
//!   with `α ∈ [0, π/2]` and `δ ∈ [0, 2π)`;
//! - azimuth / ellipticity `(az, el)`: `u = (cos 2az·cos 2el, sin 2az·cos 2el, sin 2el)`,
//!   with `az ∈ [0, π)` and `el ∈ [-π/4, π/4]`.
//!
//! Conversions between the pairs go through `u`, which keeps the quadrant
//! handling in `atan2`.

use core::f64::consts::{PI, TAU};

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::Vector3;

/// Below this norm a vector is treated as having no direction.
const DIRECTION_EPS: f64 = 1e-12;

/// Unit Poincaré vector from characteristic angles.
pub fn characteristic_to_vector(alpha: f64, delta: f64) -> Vector3<f64> {
    let (s2a, c2a) = (2.0 * alpha).sin_cos();
    Vector3::from_array([c2a, s2a * delta.cos(), s2a * delta.sin()])
}

/// Unit Poincaré vector from azimuth and ellipticity.
pub fn azimuth_ellipticity_to_vector(azimuth: f64, ellipticity: f64) -> Vector3<f64> {
    let (s2az, c2az) = (2.0 * azimuth).sin_cos();
    let (s2el, c2el) = (2.0 * ellipticity).sin_cos();
    Vector3::from_array([c2az * c2el, s2az * c2el, s2el])
}

/// All four angles of the eigenstate pointed to by a (not necessarily unit)
/// vector. A zero vector maps to all-zero angles.
///
/// ```
/// use mueller::angles::Eigenstate;
/// use mueller::Vector3;
///
/// let right_circular = Eigenstate::from_vector(&Vector3::from_array([0.0, 0.0, 0.7]));
/// assert!((right_circular.ellipticity - core::f64::consts::FRAC_PI_4).abs() < 1e-12);
/// assert!((right_circular.alpha - core::f64::consts::FRAC_PI_4).abs() < 1e-12);
/// assert!((right_circular.delta - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Eigenstate {
    /// Characteristic angle α.
    pub alpha: f64,
    /// Characteristic angle δ.
    pub delta: f64,
    /// Azimuth.
    pub azimuth: f64,
    /// Ellipticity angle.
    pub ellipticity: f64,
}

impl Eigenstate {
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        let n = v.norm();
        if !(n > DIRECTION_EPS) {
            return Self::default();
        }
        let u = [v[0] / n, v[1] / n, v[2] / n];

        let alpha = 0.5 * u[0].clamp(-1.0, 1.0).acos();
        let transverse = (u[1] * u[1] + u[2] * u[2]).sqrt();
        let delta = if transverse > DIRECTION_EPS {
            wrap(u[2].atan2(u[1]), TAU)
        } else {
            0.0
        };

        let ellipticity = 0.5 * u[2].clamp(-1.0, 1.0).asin();
        let planar = (u[0] * u[0] + u[1] * u[1]).sqrt();
        let azimuth = if planar > DIRECTION_EPS {
            wrap(0.5 * u[1].atan2(u[0]), PI)
        } else {
            0.0
        };

        Self {
            alpha,
            delta,
            azimuth,
            ellipticity,
        }
    }

    pub fn from_characteristic(alpha: f64, delta: f64) -> Self {
        Self::from_vector(&characteristic_to_vector(alpha, delta))
    }

    pub fn from_azimuth_ellipticity(azimuth: f64, ellipticity: f64) -> Self {
        Self::from_vector(&azimuth_ellipticity_to_vector(azimuth, ellipticity))
    }

    /// Unit Poincaré vector of this eigenstate.
    pub fn vector(&self) -> Vector3<f64> {
        characteristic_to_vector(self.alpha, self.delta)
    }
}

/// Bring an angle into `[0, period)`.
fn wrap(angle: f64, period: f64) -> f64 {
    let w = angle - period * (angle / period).floor();
    if w >= period || w < 0.0 {
        0.0
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

    const TOL: f64 = 1e-12;

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
    fn horizontal_linear() {
        let e = Eigenstate::from_vector(&Vector3::from_array([1.0, 0.0, 0.0]));
        assert_eq!(e, Eigenstate::default());
    }

    #[test]
    fn linear_at_45_degrees() {
        let e = Eigenstate::from_azimuth_ellipticity(FRAC_PI_4, 0.0);
        assert_near(e.alpha, FRAC_PI_4, TOL, "alpha");
        assert_near(e.delta, 0.0, TOL, "delta");
        assert_near(e.azimuth, FRAC_PI_4, TOL, "azimuth");
        assert_near(e.ellipticity, 0.0, TOL, "ellipticity");
    }

    #[test]
    fn vertical_linear_azimuth_in_range() {
        let e = Eigenstate::from_vector(&Vector3::from_array([-1.0, 0.0, 0.0]));
        assert_near(e.alpha, FRAC_PI_2, TOL, "alpha");
        assert_near(e.azimuth, FRAC_PI_2, TOL, "azimuth");
    }

    #[test]
    fn negative_azimuth_wraps() {
        let e = Eigenstate::from_azimuth_ellipticity(-FRAC_PI_8, 0.1);
        assert_near(e.azimuth, PI - FRAC_PI_8, TOL, "azimuth");
        assert_near(e.ellipticity, 0.1, TOL, "ellipticity");
    }

    #[test]
    fn characteristic_round_trip() {
        for &(alpha, delta) in &[(0.3, 0.2), (1.2, 4.0), (FRAC_PI_4, 5.9), (0.05, 3.0)] {
            let e = Eigenstate::from_characteristic(alpha, delta);
            assert_near(e.alpha, alpha, 1e-10, "alpha");
            assert_near(e.delta, delta, 1e-10, "delta");
            let u = e.vector();
            let back = azimuth_ellipticity_to_vector(e.azimuth, e.ellipticity);
            for i in 0..3 {
                assert_near(u[i], back[i], 1e-10, "poincare vector");
            }
        }
    }

    #[test]
    fn scale_does_not_matter() {
        let a = Eigenstate::from_vector(&Vector3::from_array([0.1, -0.2, 0.3]));
        let b = Eigenstate::from_vector(&Vector3::from_array([0.5, -1.0, 1.5]));
        assert_near(a.alpha, b.alpha, TOL, "alpha");
        assert_near(a.delta, b.delta, TOL, "delta");
    }
}

//! Characteristic parameters of pure diattenuators, polarizers and retarders.

#[cfg(not(feature = "std"))]
use num_traits::Float;

use super::{MuellerMatrix, RetardanceVectorKind};
use crate::angles::Eigenstate;
use crate::Vector3;

/// Field transmissions and main eigenstate of a diattenuator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiattenuatorParameters {
    /// Field transmission of the main eigenstate.
    pub p1: f64,
    /// Field transmission of the orthogonal eigenstate.
    pub p2: f64,
    pub alpha: f64,
    pub delta: f64,
    pub azimuth: f64,
    pub ellipticity: f64,
}

impl DiattenuatorParameters {
    /// Parameters of the diattenuator with vector `v` (normalized) and mean
    /// transmission `m00`.
    pub(crate) fn from_vector(v: &Vector3<f64>, m00: f64) -> Self {
        let d = v.norm().min(1.0);
        let e = Eigenstate::from_vector(v);
        Self {
            p1: (m00 * (1.0 + d)).max(0.0).sqrt(),
            p2: (m00 * (1.0 - d)).max(0.0).sqrt(),
            alpha: e.alpha,
            delta: e.delta,
            azimuth: e.azimuth,
            ellipticity: e.ellipticity,
        }
    }

    /// The diattenuator these parameters describe.
    pub fn element(&self) -> MuellerMatrix {
        MuellerMatrix::diattenuator_carac_angles_from_vector(self.p1, self.p2, self.alpha, self.delta)
    }
}

/// Retardance and fast eigenstate of a retarder.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RetarderParameters {
    pub delay: f64,
    pub alpha: f64,
    pub delta: f64,
    pub azimuth: f64,
    pub ellipticity: f64,
}

impl MuellerMatrix {
    /// Diattenuator parameters read from the diattenuation vector.
    pub fn diattenuator_parameters(&self) -> DiattenuatorParameters {
        DiattenuatorParameters::from_vector(&self.blocks().d, self.m00())
    }

    /// Diattenuator parameters read from the polarizance vector.
    pub fn polarizer_parameters(&self) -> DiattenuatorParameters {
        DiattenuatorParameters::from_vector(&self.blocks().p, self.m00())
    }

    pub fn retarder_parameters(&self) -> RetarderParameters {
        let e = Eigenstate::from_vector(&self.retardance_vector(RetardanceVectorKind::Normalized));
        RetarderParameters {
            delay: self.retardance(),
            alpha: e.alpha,
            delta: e.delta,
            azimuth: e.azimuth,
            ellipticity: e.ellipticity,
        }
    }
}

//! Polarization parameters derived from the blocks and the covariance matrix.

use core::f64::consts::PI;
use core::fmt;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use log::warn;

use super::{MuellerError, MuellerMatrix, RetardanceVectorKind, EPS};
use crate::Vector3;

/// Euclidean distance to the ideal depolarizer and the derived factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepolarizationFactors {
    /// `sqrt(Σ M_ij² - m00²) / m00`.
    pub euclidean_distance: f64,
    /// `1 - distance / sqrt(3)`.
    pub depolarization_factor: f64,
}

/// Indices of polarimetric purity, each in `[0, 1]` for physical matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurityIndices {
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
}

/// All scalar parameters of a matrix at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSummary {
    pub mean_transmission: f64,
    pub max_transmission: f64,
    pub min_transmission: f64,
    pub diattenuation: f64,
    pub diattenuation_linear: f64,
    pub diattenuation_circular: f64,
    pub polarizance: f64,
    pub polarizance_linear: f64,
    pub polarizance_circular: f64,
    pub polarizance_degree: f64,
    pub spheric_purity: f64,
    pub retardance: f64,
    pub polarimetric_purity: f64,
    pub depolarization_index: f64,
    pub depolarization_factors: DepolarizationFactors,
    pub purity_indices: PurityIndices,
}

impl fmt::Display for ParameterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "transmission: mean {:.6}, max {:.6}, min {:.6}",
            self.mean_transmission, self.max_transmission, self.min_transmission
        )?;
        writeln!(
            f,
            "diattenuation: {:.6} (linear {:.6}, circular {:.6})",
            self.diattenuation, self.diattenuation_linear, self.diattenuation_circular
        )?;
        writeln!(
            f,
            "polarizance: {:.6} (linear {:.6}, circular {:.6})",
            self.polarizance, self.polarizance_linear, self.polarizance_circular
        )?;
        writeln!(f, "polarizance degree: {:.6}", self.polarizance_degree)?;
        writeln!(f, "spheric purity: {:.6}", self.spheric_purity)?;
        writeln!(f, "retardance: {:.6} rad", self.retardance)?;
        writeln!(f, "polarimetric purity: {:.6}", self.polarimetric_purity)?;
        writeln!(f, "depolarization index: {:.6}", self.depolarization_index)?;
        writeln!(
            f,
            "euclidean distance: {:.6}, depolarization factor: {:.6}",
            self.depolarization_factors.euclidean_distance,
            self.depolarization_factors.depolarization_factor
        )?;
        write!(
            f,
            "purity indices: P1 {:.6}, P2 {:.6}, P3 {:.6}",
            self.purity_indices.p1, self.purity_indices.p2, self.purity_indices.p3
        )
    }
}

fn linear_part(v: &Vector3<f64>) -> f64 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

impl MuellerMatrix {
    pub fn mean_transmission(&self) -> f64 {
        self.m00()
    }

    /// `|D|`.
    pub fn diattenuation(&self) -> f64 {
        self.blocks().d.norm()
    }

    /// Linear part `√(D[0]² + D[1]²)`.
    pub fn diattenuation_linear(&self) -> f64 {
        linear_part(&self.blocks().d)
    }

    /// Signed circular component `D[2]`.
    pub fn diattenuation_circular(&self) -> f64 {
        self.blocks().d[2]
    }

    /// `|P|`.
    pub fn polarizance(&self) -> f64 {
        self.blocks().p.norm()
    }

    /// Linear part `√(P[0]² + P[1]²)`.
    pub fn polarizance_linear(&self) -> f64 {
        linear_part(&self.blocks().p)
    }

    pub fn polarizance_circular(&self) -> f64 {
        self.blocks().p[2]
    }

    /// `sqrt((|P|² + |D|²) / 2)`.
    pub fn polarizance_degree(&self) -> f64 {
        let b = self.blocks();
        (0.5 * (b.p.norm_squared() + b.d.norm_squared())).sqrt()
    }

    /// `|m|_F / sqrt(3)`.
    pub fn spheric_purity(&self) -> f64 {
        self.blocks().m.frobenius_norm() / 3.0_f64.sqrt()
    }

    /// `acos(tr(Mnorm) / 2 - 1)`. Only meaningful for pure retarders.
    pub fn retardance(&self) -> f64 {
        let t = self.normalized().trace();
        (0.5 * t - 1.0).clamp(-1.0, 1.0).acos()
    }

    /// `sqrt(2/3 · polarizance_degree² + spheric_purity²)`: 1 for
    /// non-depolarizing matrices, 0 for the ideal depolarizer.
    pub fn polarimetric_purity(&self) -> f64 {
        let pd = self.polarizance_degree();
        let ps = self.spheric_purity();
        (2.0 / 3.0 * pd * pd + ps * ps).sqrt()
    }

    /// `sqrt(1 - PΔ²)` where `PΔ` is the polarimetric purity.
    ///
    /// # Errors
    ///
    /// [`MuellerError::NonPhysicalMatrix`] if the purity exceeds `1 + tol`.
    pub fn depolarization_index(&self, tol: f64) -> Result<f64, MuellerError> {
        let purity = self.polarimetric_purity();
        if purity > 1.0 + tol {
            return Err(MuellerError::NonPhysicalMatrix);
        }
        Ok(index_from_purity(purity))
    }

    /// Lenient [`depolarization_index`](Self::depolarization_index): a
    /// purity above `1 + tol` is logged and reported as index 0.
    pub fn depolarization_index_or_warn(&self, tol: f64) -> f64 {
        let purity = self.polarimetric_purity();
        if purity > 1.0 + tol {
            warn!("polarimetric purity {} exceeds 1: matrix is not physical", purity);
        }
        index_from_purity(purity)
    }

    pub fn depolarization_factors(&self) -> DepolarizationFactors {
        let n = self.normalized();
        let n00 = n[(0, 0)];
        let norm = n.frobenius_norm();
        let mut distance = (norm * norm - n00 * n00).max(0.0).sqrt();
        if n00 != 0.0 {
            distance /= n00.abs();
        }
        DepolarizationFactors {
            euclidean_distance: distance,
            depolarization_factor: 1.0 - distance / 3.0_f64.sqrt(),
        }
    }

    /// Indices of polarimetric purity from the covariance eigenvalues
    /// `λ0 ≤ λ1 ≤ λ2 ≤ λ3`.
    pub fn polarimetric_purity_indices(&self) -> Result<PurityIndices, MuellerError> {
        let h = self.covariance_matrix();
        let [l0, l1, l2, l3] = h.eigenvalues_symmetric()?;
        let trace = h.trace().norm();
        if trace == 0.0 {
            return Ok(PurityIndices { p1: 0.0, p2: 0.0, p3: 0.0 });
        }
        Ok(PurityIndices {
            p1: (l3 - l2) / trace,
            p2: (l3 + l2 - 2.0 * l1) / trace,
            p3: (l3 + l2 + l1 - 3.0 * l0) / trace,
        })
    }

    /// Maximum and minimum intensity transmission `m00 · (1 ± |D|)`.
    pub fn transmissions(&self) -> (f64, f64) {
        let m00 = self.m00();
        let d = self.diattenuation();
        (m00 * (1.0 + d), m00 * (1.0 - d))
    }

    /// Retardance vector of a retarder, scaled as `kind` says.
    ///
    /// The axis is read from the antisymmetric part of `m`; at zero
    /// retardance it is the zero vector, and at π it comes from the diagonal
    /// (sign chosen so the largest component is positive).
    pub fn retardance_vector(&self, kind: RetardanceVectorKind) -> Vector3<f64> {
        let delay = self.retardance();
        let m = self.blocks().m;
        let s = delay.sin();

        let axis = if s.abs() >= EPS {
            Vector3::from_array([
                m[(1, 2)] - m[(2, 1)],
                m[(2, 0)] - m[(0, 2)],
                m[(0, 1)] - m[(1, 0)],
            ]) / (2.0 * s)
        } else if delay < 0.5 * PI {
            Vector3::zeros()
        } else {
            half_turn_axis(&m)
        };
        let axis = match axis.norm() {
            n if n > 1.0 => axis / n,
            _ => axis,
        };

        match kind {
            RetardanceVectorKind::Normalized => axis,
            RetardanceVectorKind::Retardance => axis * delay,
            RetardanceVectorKind::Straight => axis * (delay / PI),
        }
    }

    /// Inhomogeneity parameter `η ∈ [0, 1]`: zero when the two eigenstates
    /// of the equivalent Jones matrix are orthogonal.
    ///
    /// With `T = tr J` and `Δ = det J`:
    /// `η² = (4 m00 - |T|² - |T² - 4Δ|) / (4 m00 - |T|² + |T² - 4Δ|)`.
    pub fn inhomogeneity(&self) -> f64 {
        let j = self.to_jones();
        let t = j.trace();
        let split = (t * t - j.det() * 4.0).norm();
        let base = 4.0 * self.m00() - t.norm_sqr();
        let den = base + split;
        if den.abs() < EPS {
            return 0.0;
        }
        ((base - split) / den).max(0.0).sqrt()
    }

    pub fn summary(&self, tol: f64) -> Result<ParameterSummary, MuellerError> {
        let (max_transmission, min_transmission) = self.transmissions();
        Ok(ParameterSummary {
            mean_transmission: self.mean_transmission(),
            max_transmission,
            min_transmission,
            diattenuation: self.diattenuation(),
            diattenuation_linear: self.diattenuation_linear(),
            diattenuation_circular: self.diattenuation_circular(),
            polarizance: self.polarizance(),
            polarizance_linear: self.polarizance_linear(),
            polarizance_circular: self.polarizance_circular(),
            polarizance_degree: self.polarizance_degree(),
            spheric_purity: self.spheric_purity(),
            retardance: self.retardance(),
            polarimetric_purity: self.polarimetric_purity(),
            depolarization_index: self.depolarization_index(tol)?,
            depolarization_factors: self.depolarization_factors(),
            purity_indices: self.polarimetric_purity_indices()?,
        })
    }
}

fn index_from_purity(purity: f64) -> f64 {
    (1.0 - purity * purity).max(0.0).sqrt()
}

/// Axis of a half-turn rotation `m = 2 u uᵗ - I`.
fn half_turn_axis(m: &crate::Matrix3<f64>) -> Vector3<f64> {
    let mut k = 0;
    for i in 1..3 {
        if m[(i, i)] > m[(k, k)] {
            k = i;
        }
    }
    let uk = (0.5 * (m[(k, k)] + 1.0)).max(0.0).sqrt();
    if uk == 0.0 {
        return Vector3::zeros();
    }
    let mut u = Vector3::zeros();
    for i in 0..3 {
        u[i] = if i == k {
            uk
        } else {
            0.25 * (m[(i, k)] + m[(k, i)]) / uk
        };
    }
    u
}

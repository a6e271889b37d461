//! Polar decompositions into retarder, diattenuator and depolarizer.
//!
//! The canonical order is `M = MΔ · MR · MD` ([`PolarOrder::Drp`]). The other
//! five orders are derived from it by transposition, by re-splitting the
//! non-depolarizing part, or by conjugating the depolarizer through the
//! retarder, so every order reconstructs the input exactly when the input is
//! well conditioned.

use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use log::{trace, warn};

use super::analysis::{DiattenuatorParameters, RetarderParameters};
use super::elements::retarder_block;
use super::{FilterSettings, MuellerError, MuellerMatrix, DEFAULT_TOL, EPS};
use crate::{Matrix3, Vector3};

/// Order of the two factors of a non-depolarizing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PureOrder {
    /// `M = MR · MD`.
    #[default]
    RetarderPolarizer,
    /// `M = MD · MR`.
    PolarizerRetarder,
}

impl PureOrder {
    pub fn code(&self) -> &'static str {
        match self {
            PureOrder::RetarderPolarizer => "RP",
            PureOrder::PolarizerRetarder => "PR",
        }
    }
}

impl fmt::Display for PureOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Factor order of a polar decomposition, read left to right as the matrix
/// product: `Drp` is `M = MΔ · MR · MD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolarOrder {
    #[default]
    Drp,
    Dpr,
    Prd,
    Rpd,
    Pdr,
    Rdp,
}

impl PolarOrder {
    pub const ALL: [PolarOrder; 6] = [
        PolarOrder::Drp,
        PolarOrder::Dpr,
        PolarOrder::Prd,
        PolarOrder::Rpd,
        PolarOrder::Pdr,
        PolarOrder::Rdp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PolarOrder::Drp => "DRP",
            PolarOrder::Dpr => "DPR",
            PolarOrder::Prd => "PRD",
            PolarOrder::Rpd => "RPD",
            PolarOrder::Pdr => "PDR",
            PolarOrder::Rdp => "RDP",
        }
    }
}

impl fmt::Display for PolarOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parse a three-letter order code, ignoring case.
///
/// ```
/// use mueller::mueller::PolarOrder;
///
/// assert_eq!("rdp".parse::<PolarOrder>().unwrap(), PolarOrder::Rdp);
/// assert!("DRR".parse::<PolarOrder>().is_err());
/// ```
impl FromStr for PolarOrder {
    type Err = MuellerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolarOrder::ALL
            .into_iter()
            .find(|order| order.code().eq_ignore_ascii_case(s))
            .ok_or(MuellerError::InvalidOrder)
    }
}

/// Branches where the factors are not unique. The returned factors are one
/// valid choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambiguity {
    /// Singular non-depolarizing matrix: the minimum-retardance retarder
    /// was chosen.
    SingularPure,
    /// Depolarizer of rank one: the retarder is fixed on one axis only.
    RankOneDepolarizer,
    /// Depolarizer with a zero small-m block: any retarder fits.
    NullDepolarizer,
    /// Singular diattenuator with a partially polarizing depolarizer: the
    /// retarder was set to the identity.
    SingularPolarizer,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ambiguity::SingularPure => write!(f, "singular pure matrix: retarder not unique"),
            Ambiguity::RankOneDepolarizer => write!(f, "rank-one depolarizer: retarder not unique"),
            Ambiguity::NullDepolarizer => write!(f, "null depolarizer: retarder not unique"),
            Ambiguity::SingularPolarizer => {
                write!(f, "singular polarizer: retarder and depolarizer not unique")
            }
        }
    }
}

/// Settings for [`MuellerMatrix::decompose_polar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposeSettings {
    /// Tolerance for singularity and purity tests (default: [`DEFAULT_TOL`]).
    pub tol: f64,
    /// Repair the matrix with the physical filter first (default: false).
    pub filter: bool,
    /// Settings of that repair (default: [`FilterSettings::default`]).
    pub filter_settings: FilterSettings,
}

impl Default for DecomposeSettings {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOL,
            filter: false,
            filter_settings: FilterSettings::default(),
        }
    }
}

/// Parameters of the factors and the reconstruction error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecompositionParameters {
    pub retarder: RetarderParameters,
    pub polarizer: DiattenuatorParameters,
    /// Polarizance of the depolarizer (0 for pure decompositions).
    pub depolarizer_polarizance: f64,
    /// Depolarization index of the depolarizer (0 for pure decompositions).
    pub depolarization_index: f64,
    /// `|M - product|²_F / 16`.
    pub mean_square_error: f64,
    /// `max |M - product|`.
    pub max_error: f64,
}

/// Retarder and diattenuator of a non-depolarizing matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PureDecomposition {
    pub retarder: MuellerMatrix,
    pub polarizer: MuellerMatrix,
    pub order: PureOrder,
    pub ambiguity: Option<Ambiguity>,
    pub parameters: DecompositionParameters,
}

impl PureDecomposition {
    pub fn product(&self) -> MuellerMatrix {
        match self.order {
            PureOrder::RetarderPolarizer => self.retarder * self.polarizer,
            PureOrder::PolarizerRetarder => self.polarizer * self.retarder,
        }
    }
}

/// Depolarizer, retarder and diattenuator of a general matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarDecomposition {
    pub depolarizer: MuellerMatrix,
    pub retarder: MuellerMatrix,
    pub polarizer: MuellerMatrix,
    pub order: PolarOrder,
    pub ambiguity: Option<Ambiguity>,
    pub parameters: DecompositionParameters,
}

impl PolarDecomposition {
    /// The three factors in product order.
    pub fn factors(&self) -> [MuellerMatrix; 3] {
        let (d, r, p) = (self.depolarizer, self.retarder, self.polarizer);
        match self.order {
            PolarOrder::Drp => [d, r, p],
            PolarOrder::Dpr => [d, p, r],
            PolarOrder::Prd => [p, r, d],
            PolarOrder::Rpd => [r, p, d],
            PolarOrder::Pdr => [p, d, r],
            PolarOrder::Rdp => [r, d, p],
        }
    }

    /// Factors multiplied back in the decomposition order.
    pub fn product(&self) -> MuellerMatrix {
        let [a, b, c] = self.factors();
        a * b * c
    }
}

/// Factors in the fixed roles, before the order is applied.
#[derive(Debug, Clone, Copy)]
struct Factors {
    depolarizer: MuellerMatrix,
    retarder: MuellerMatrix,
    polarizer: MuellerMatrix,
    ambiguity: Option<Ambiguity>,
}

impl Factors {
    fn transposed(self) -> Self {
        Self {
            depolarizer: self.depolarizer.transpose(),
            retarder: self.retarder.transpose(),
            polarizer: self.polarizer.transpose(),
            ambiguity: self.ambiguity,
        }
    }
}

fn reconstruction_errors(target: &MuellerMatrix, product: &MuellerMatrix) -> (f64, f64) {
    let diff = *target.matrix() - *product.matrix();
    let f = diff.frobenius_norm();
    (f * f / 16.0, diff.max_abs())
}

/// A unit vector perpendicular to `v`.
fn perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let mut k = 0;
    for i in 1..3 {
        if v[i].abs() < v[k].abs() {
            k = i;
        }
    }
    let mut e = Vector3::zeros();
    e[k] = 1.0;
    let p = v.cross(&e);
    p / p.norm()
}

impl MuellerMatrix {
    /// Retarder of least retardance mapping the direction of `from` onto
    /// the direction of `to` on the Poincaré sphere.
    pub fn minimum_delay_retarder(from: &Vector3<f64>, to: &Vector3<f64>) -> MuellerMatrix {
        let (Some(a), Some(b)) = (from.normalize(), to.normalize()) else {
            return MuellerMatrix::vacuum();
        };
        let cos = a.dot(&b).clamp(-1.0, 1.0);
        let axis = b.cross(&a);
        let n = axis.norm();
        let axis = if n > EPS {
            axis / n
        } else if cos > 0.0 {
            return MuellerMatrix::vacuum();
        } else {
            perpendicular(&a)
        };
        MuellerMatrix::from_blocks(
            Vector3::zeros(),
            Vector3::zeros(),
            retarder_block(cos.acos(), &axis),
            1.0,
        )
    }

    /// Split a non-depolarizing matrix into a retarder and a diattenuator.
    ///
    /// The diattenuator is read from `D` for [`PureOrder::RetarderPolarizer`]
    /// and from `P` for [`PureOrder::PolarizerRetarder`]. When `M` is
    /// singular and not a retarder, the retarder is the one of least
    /// retardance and the result carries [`Ambiguity::SingularPure`].
    pub fn decompose_pure(&self, order: PureOrder, tol: f64) -> Result<PureDecomposition, MuellerError> {
        let b = self.blocks();
        let vector = match order {
            PureOrder::RetarderPolarizer => b.d,
            PureOrder::PolarizerRetarder => b.p,
        };
        let mut params = DiattenuatorParameters::from_vector(&vector, self.m00());

        let (retarder, polarizer, ambiguity) = if self.is_singular(tol) {
            if b.d.norm() <= tol && b.p.norm() <= tol {
                trace!("singular pure matrix without diattenuation: retarder only");
                (*self, MuellerMatrix::vacuum(), None)
            } else {
                trace!("singular pure matrix: minimum retardance retarder");
                params.p2 = 0.0;
                let polarizer = params.element();
                let retarder = MuellerMatrix::minimum_delay_retarder(&b.d, &b.p);
                (retarder, polarizer, Some(Ambiguity::SingularPure))
            }
        } else {
            let polarizer = params.element();
            let inv = polarizer.inverse()?;
            let retarder = match order {
                PureOrder::RetarderPolarizer => *self * inv,
                PureOrder::PolarizerRetarder => inv * *self,
            };
            (retarder, polarizer, None)
        };

        if let Some(a) = ambiguity {
            warn!("pure decomposition ({}): {}", order, a);
        }

        let mut out = PureDecomposition {
            retarder,
            polarizer,
            order,
            ambiguity,
            parameters: DecompositionParameters {
                retarder: retarder.retarder_parameters(),
                polarizer: polarizer.diattenuator_parameters(),
                depolarizer_polarizance: 0.0,
                depolarization_index: 0.0,
                mean_square_error: 0.0,
                max_error: 0.0,
            },
        };
        let (mse, max) = reconstruction_errors(self, &out.product());
        out.parameters.mean_square_error = mse;
        out.parameters.max_error = max;
        Ok(out)
    }

    /// Polar decomposition in the requested factor order.
    ///
    /// Non-depolarizing matrices get an identity depolarizer. The
    /// reconstruction errors are measured against the filtered matrix when
    /// `settings.filter` is set.
    ///
    /// # Errors
    ///
    /// [`MuellerError::InvalidVector`] if the diattenuation exceeds
    /// `1 + EPS`; linear-algebra failures otherwise.
    pub fn decompose_polar(
        &self,
        order: PolarOrder,
        settings: &DecomposeSettings,
    ) -> Result<PolarDecomposition, MuellerError> {
        let source = if settings.filter {
            self.filter_physical_conditions(&settings.filter_settings)?.matrix
        } else {
            *self
        };
        let tol = settings.tol;

        let f = match order {
            PolarOrder::Drp => source.polar_drp(tol)?,
            PolarOrder::Dpr => {
                let f = source.polar_drp(tol)?;
                let pure = (f.retarder * f.polarizer).decompose_pure(PureOrder::PolarizerRetarder, tol)?;
                Factors {
                    retarder: pure.retarder,
                    polarizer: pure.polarizer,
                    ambiguity: f.ambiguity.or(pure.ambiguity),
                    ..f
                }
            }
            PolarOrder::Prd => source.transpose().polar_drp(tol)?.transposed(),
            PolarOrder::Rpd => {
                let f = source.transpose().polar_drp(tol)?.transposed();
                let pure = (f.polarizer * f.retarder).decompose_pure(PureOrder::RetarderPolarizer, tol)?;
                Factors {
                    retarder: pure.retarder,
                    polarizer: pure.polarizer,
                    ambiguity: f.ambiguity.or(pure.ambiguity),
                    ..f
                }
            }
            PolarOrder::Pdr => source.polar_pdr(tol)?,
            PolarOrder::Rdp => source.transpose().polar_pdr(tol)?.transposed(),
        };

        if let Some(a) = f.ambiguity {
            warn!("polar decomposition ({}): {}", order, a);
        }

        let mut out = PolarDecomposition {
            depolarizer: f.depolarizer,
            retarder: f.retarder,
            polarizer: f.polarizer,
            order,
            ambiguity: f.ambiguity,
            parameters: DecompositionParameters {
                retarder: f.retarder.retarder_parameters(),
                polarizer: f.polarizer.diattenuator_parameters(),
                depolarizer_polarizance: f.depolarizer.polarizance(),
                depolarization_index: f.depolarizer.depolarization_index_or_warn(tol),
                mean_square_error: 0.0,
                max_error: 0.0,
            },
        };
        let (mse, max) = reconstruction_errors(&source, &out.product());
        out.parameters.mean_square_error = mse;
        out.parameters.max_error = max;
        Ok(out)
    }

    /// `M = MΔ · MR · MD` with the depolarizer conjugated through the
    /// retarder of the `Prd` split.
    fn polar_pdr(&self, tol: f64) -> Result<Factors, MuellerError> {
        let f = self.transpose().polar_drp(tol)?.transposed();
        let depolarizer = f.retarder * f.depolarizer * f.retarder.inverse()?;
        Ok(Factors { depolarizer, ..f })
    }

    /// `M = MΔ · MR · MD`.
    fn polar_drp(&self, tol: f64) -> Result<Factors, MuellerError> {
        if self.is_non_depolarizing(tol) {
            trace!("non-depolarizing matrix: pure decomposition");
            let pure = self.decompose_pure(PureOrder::RetarderPolarizer, tol)?;
            return Ok(Factors {
                depolarizer: MuellerMatrix::vacuum(),
                retarder: pure.retarder,
                polarizer: pure.polarizer,
                ambiguity: pure.ambiguity,
            });
        }

        let b = self.blocks();
        if b.d.norm() > 1.0 + EPS {
            return Err(MuellerError::InvalidVector);
        }
        let polarizer = MuellerMatrix::diattenuator_from_vector(&b.d, Some(b.m00))?;

        if polarizer.is_singular(tol) {
            if (1.0 - self.polarizance()).abs() <= tol {
                trace!("singular diattenuator and fully polarizing output: pure decomposition");
                let pure = self.decompose_pure(PureOrder::RetarderPolarizer, tol)?;
                return Ok(Factors {
                    depolarizer: MuellerMatrix::vacuum(),
                    retarder: pure.retarder,
                    polarizer: pure.polarizer,
                    ambiguity: pure.ambiguity,
                });
            }
            trace!("singular diattenuator: depolarizer from the polarizance");
            return Ok(Factors {
                depolarizer: MuellerMatrix::from_blocks(Vector3::zeros(), b.p, Matrix3::zeros(), 1.0),
                retarder: MuellerMatrix::vacuum(),
                polarizer,
                ambiguity: Some(Ambiguity::SingularPolarizer),
            });
        }

        let mf = *self * polarizer.inverse()?;
        let bf = mf.blocks();
        let mmt = bf.m * bf.m.transpose();
        let eig = mmt.eig_symmetric()?;
        let v = *eig.eigenvectors();
        let q = (*eig.eigenvalues()).map(|l: f64| l.max(0.0).sqrt());
        let column = |k: usize| Vector3::from_array([v[(0, k)], v[(1, k)], v[(2, k)]]);
        // Image of eigenvector k through the retarder's inverse.
        let preimage = |k: usize| -> Vector3<f64> { (column(k) * bf.m) / q[k] };

        let singular = self.is_singular(tol);
        let zeros = q.iter().filter(|&&x| x <= tol).count();

        let (md, mr, ambiguity) = match (singular, zeros) {
            (true, 3) => {
                trace!("singular matrix, null depolarizer");
                (Matrix3::zeros(), Matrix3::eye(), Some(Ambiguity::NullDepolarizer))
            }
            (true, 2) => {
                trace!("singular matrix, rank-one depolarizer");
                let md = mmt / mmt.trace().sqrt();
                let mr = MuellerMatrix::minimum_delay_retarder(&preimage(2), &column(2)).blocks().m;
                (md, mr, Some(Ambiguity::RankOneDepolarizer))
            }
            (true, 1) => {
                trace!("singular matrix, rank-two depolarizer");
                let (q1, q2) = (q[1], q[2]);
                let md = (mmt + Matrix3::eye() * (q1 * q2)).inverse()? * mmt * (q1 + q2);
                let (v1, v2, w1, w2) = (column(1), column(2), preimage(1), preimage(2));
                let y1 = v1.cross(&v2);
                let y2 = w1.cross(&w2);
                let mr = v1.outer(&w1) + v2.outer(&w2) + y1.outer(&y2) / (y1.norm() * y2.norm());
                (md, mr, None)
            }
            _ => {
                trace!("general polar decomposition");
                let s = if self.det() < 0.0 { -1.0 } else { 1.0 };
                let diag = [q[0], q[1], s * q[2]];
                let md = Matrix3::from_fn(|r, c| {
                    (0..3).map(|k| v[(r, k)] * diag[k] * v[(c, k)]).sum::<f64>()
                });
                let md_inv = Matrix3::from_fn(|r, c| {
                    (0..3).map(|k| v[(r, k)] * v[(c, k)] / diag[k]).sum::<f64>()
                });
                (md, md_inv * bf.m, None)
            }
        };

        Ok(Factors {
            depolarizer: MuellerMatrix::from_blocks(Vector3::zeros(), bf.p, md, 1.0),
            retarder: MuellerMatrix::from_blocks(Vector3::zeros(), Vector3::zeros(), mr, 1.0),
            polarizer,
            ambiguity,
        })
    }
}

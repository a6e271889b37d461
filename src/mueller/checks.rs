//! Physical-realizability conditions and classification predicates.

use core::fmt;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use super::{MuellerError, MuellerMatrix, RETARDER_DET_MIN};
use crate::Matrix4;

/// The named realizability conditions. Each evaluates to a signed distance
/// that must not drop below `-tol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `m00 ≥ 0`.
    Cond0a,
    /// `m00 ≤ 1`.
    Cond0b,
    /// `4 m00² ≥ tr(M Mᵗ)`.
    Cond1,
    /// `m00 ≥ max |M_ij|`.
    Cond2,
    /// `m00² ≥ |D|²` (unnormalized D).
    Cond3a,
    /// `m00² ≥ |P|²` (unnormalized P).
    Cond3b,
    /// `m00 + |D| ≤ 1` (unnormalized D).
    Cond5a,
    /// `m00 + |P| ≤ 1` (unnormalized P).
    Cond5b,
    /// Covariance matrix positive semidefinite.
    Cond6,
}

impl Condition {
    /// All conditions, in naming order.
    pub const ALL: [Condition; 9] = [
        Condition::Cond0a,
        Condition::Cond0b,
        Condition::Cond1,
        Condition::Cond2,
        Condition::Cond3a,
        Condition::Cond3b,
        Condition::Cond5a,
        Condition::Cond5b,
        Condition::Cond6,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Condition::Cond0a => "cond0a",
            Condition::Cond0b => "cond0b",
            Condition::Cond1 => "cond1",
            Condition::Cond2 => "cond2",
            Condition::Cond3a => "cond3a",
            Condition::Cond3b => "cond3b",
            Condition::Cond5a => "cond5a",
            Condition::Cond5b => "cond5b",
            Condition::Cond6 => "cond6",
        }
    }

    fn index(&self) -> usize {
        match self {
            Condition::Cond0a => 0,
            Condition::Cond0b => 1,
            Condition::Cond1 => 2,
            Condition::Cond2 => 3,
            Condition::Cond3a => 4,
            Condition::Cond3b => 5,
            Condition::Cond5a => 6,
            Condition::Cond5b => 7,
            Condition::Cond6 => 8,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of one condition and whether it passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionResult {
    pub value: f64,
    pub passed: bool,
}

/// Outcome of every realizability condition for one matrix.
///
/// ```
/// use mueller::mueller::Condition;
/// use mueller::MuellerMatrix;
///
/// let m = MuellerMatrix::filter_amplifier(1.5);
/// let conditions = m.physical_conditions(1e-6).unwrap();
/// assert!(!conditions.is_physical());
/// assert!(!conditions.get(Condition::Cond0b).passed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConditions {
    results: [ConditionResult; 9],
}

impl PhysicalConditions {
    pub fn get(&self, condition: Condition) -> ConditionResult {
        self.results[condition.index()]
    }

    pub fn is_physical(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Failing conditions, in naming order.
    pub fn failing(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::ALL
            .into_iter()
            .filter(move |c| !self.get(*c).passed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Condition, ConditionResult)> + '_ {
        Condition::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl fmt::Display for PhysicalConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (c, r)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let verdict = if r.passed { "ok" } else { "FAIL" };
            write!(f, "{:<7}{:>14.6e}  {}", c.name(), r.value, verdict)?;
        }
        Ok(())
    }
}

/// Which test [`MuellerMatrix::is_homogeneous`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomogeneityMethod {
    /// Inhomogeneity parameter `η` below tolerance.
    #[default]
    Inhomogeneity,
    /// Orthogonal eigenstates of the equivalent Jones matrix.
    Eigenstates,
    /// Both of the above.
    Both,
}

fn row_norm(m: &Matrix4<f64>) -> f64 {
    (m[(0, 1)] * m[(0, 1)] + m[(0, 2)] * m[(0, 2)] + m[(0, 3)] * m[(0, 3)]).sqrt()
}

fn column_norm(m: &Matrix4<f64>) -> f64 {
    (m[(1, 0)] * m[(1, 0)] + m[(2, 0)] * m[(2, 0)] + m[(3, 0)] * m[(3, 0)]).sqrt()
}

impl MuellerMatrix {
    /// Evaluate all nine realizability conditions.
    pub fn physical_conditions(&self, tol: f64) -> Result<PhysicalConditions, MuellerError> {
        let m = &self.m;
        let m00 = m[(0, 0)];
        let d = row_norm(m);
        let p = column_norm(m);
        let mmt = (*m * m.transpose()).trace();
        let min_eigenvalue = self.covariance_matrix().eigenvalues_symmetric()?[0];

        let values = [
            m00,
            1.0 - m00,
            4.0 * m00 * m00 - mmt,
            m00 - m.max_abs(),
            m00 * m00 - d * d,
            m00 * m00 - p * p,
            1.0 - m00 - d,
            1.0 - m00 - p,
            min_eigenvalue,
        ];
        Ok(PhysicalConditions {
            results: values.map(|value| ConditionResult {
                value,
                passed: value >= -tol,
            }),
        })
    }

    /// All nine conditions pass within `tol`.
    pub fn is_physical(&self, tol: f64) -> Result<bool, MuellerError> {
        Ok(self.physical_conditions(tol)?.is_physical())
    }

    /// `1 - polarimetric_purity ≤ tol`.
    pub fn is_non_depolarizing(&self, tol: f64) -> bool {
        1.0 - self.polarimetric_purity() <= tol
    }

    /// Homogeneous elements have orthogonal eigenstates.
    pub fn is_homogeneous(&self, tol: f64, method: HomogeneityMethod) -> bool {
        let by_parameter = || self.inhomogeneity() <= tol;
        let by_eigenstates = || self.to_jones().eigen().overlap() <= tol;
        match method {
            HomogeneityMethod::Inhomogeneity => by_parameter(),
            HomogeneityMethod::Eigenstates => by_eigenstates(),
            HomogeneityMethod::Both => by_parameter() && by_eigenstates(),
        }
    }

    /// Pure retarder: no diattenuation or polarizance and an orthogonal
    /// small-m block. The identity counts as a retarder of zero retardance.
    pub fn is_retarder(&self, tol: f64) -> bool {
        if (self.m - Matrix4::eye()).max_abs() <= tol {
            return true;
        }
        let b = self.blocks();
        if b.p.norm() / 3.0 > tol || b.d.norm() / 3.0 > tol {
            return false;
        }
        if !(b.m.det() > RETARDER_DET_MIN) {
            return false;
        }
        match b.m.inverse() {
            Ok(inv) => (inv - b.m.transpose()).frobenius_norm() <= tol,
            Err(_) => false,
        }
    }

    /// Symmetric but not diagonal.
    pub fn is_diattenuator(&self, tol: f64) -> bool {
        let m = &self.m;
        if (*m - m.transpose()).frobenius_norm() / 16.0 >= tol {
            return false;
        }
        let mut off_diagonal = 0.0;
        for r in 0..4 {
            for c in 0..4 {
                if r != c {
                    off_diagonal += m[(r, c)].abs();
                }
            }
        }
        off_diagonal >= tol
    }

    /// `|det M| ≤ tol²`.
    pub fn is_singular(&self, tol: f64) -> bool {
        self.det().abs() <= tol * tol
    }
}

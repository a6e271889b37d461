//! Projection of measured matrices onto the physically realizable set.

#[cfg(not(feature = "std"))]
use num_traits::Float;

use log::{debug, warn};

use super::{
    Condition, MuellerError, MuellerMatrix, PhysicalConditions, DEFAULT_MAX_ITERATIONS, DEFAULT_TOL,
};
use crate::Matrix4;

/// Settings for [`MuellerMatrix::filter_physical_conditions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    /// Tolerance of every condition (default: [`DEFAULT_TOL`]).
    pub tol: f64,
    /// Corrections applied at most (default: [`DEFAULT_MAX_ITERATIONS`]).
    pub max_iterations: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOL,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Result of the repair loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutcome {
    pub matrix: MuellerMatrix,
    /// Corrections applied.
    pub iterations: usize,
    /// The loop stopped on the iteration cap with conditions still failing.
    pub cap_reached: bool,
    /// Conditions of the returned matrix.
    pub conditions: PhysicalConditions,
}

type Correction = fn(&mut Matrix4<f64>, f64) -> Result<(), MuellerError>;

/// Corrections in priority order: the first failing condition is repaired.
const REPAIRS: [(Condition, Correction); 9] = [
    (Condition::Cond0a, flip_m00),
    (Condition::Cond0b, normalize_m00),
    (Condition::Cond2, clamp_elements),
    (Condition::Cond3a, shrink_diattenuation),
    (Condition::Cond3b, shrink_polarizance),
    (Condition::Cond1, scale_off_m00),
    (Condition::Cond5a, limit_diattenuation),
    (Condition::Cond5b, limit_polarizance),
    (Condition::Cond6, clip_covariance),
];

fn flip_m00(m: &mut Matrix4<f64>, _tol: f64) -> Result<(), MuellerError> {
    m[(0, 0)] = -m[(0, 0)];
    Ok(())
}

fn normalize_m00(m: &mut Matrix4<f64>, _tol: f64) -> Result<(), MuellerError> {
    let m00 = m[(0, 0)];
    *m /= m00;
    Ok(())
}

fn clamp_elements(m: &mut Matrix4<f64>, _tol: f64) -> Result<(), MuellerError> {
    let limit = m[(0, 0)].max(0.0);
    for r in 0..4 {
        for c in 0..4 {
            let x = m[(r, c)];
            m[(r, c)] = x.signum() * x.abs().min(limit);
        }
    }
    Ok(())
}

/// Indices of the diattenuation row or the polarizance column.
fn vector_cells(column: bool) -> [(usize, usize); 3] {
    if column {
        [(1, 0), (2, 0), (3, 0)]
    } else {
        [(0, 1), (0, 2), (0, 3)]
    }
}

fn vector_norm(m: &Matrix4<f64>, column: bool) -> f64 {
    vector_cells(column)
        .iter()
        .map(|&idx| m[idx] * m[idx])
        .sum::<f64>()
        .sqrt()
}

fn scale_vector(m: &mut Matrix4<f64>, column: bool, factor: f64) {
    for idx in vector_cells(column) {
        m[idx] *= factor;
    }
}

/// Bring `|v| / m00` down to 1. Without positive `m00` the vector is zeroed.
fn shrink_vector(m: &mut Matrix4<f64>, column: bool) {
    let m00 = m[(0, 0)];
    let n = vector_norm(m, column);
    let factor = if m00 > 0.0 && n > 0.0 { m00 / n } else { 0.0 };
    scale_vector(m, column, factor);
}

fn shrink_diattenuation(m: &mut Matrix4<f64>, _tol: f64) -> Result<(), MuellerError> {
    shrink_vector(m, false);
    Ok(())
}

fn shrink_polarizance(m: &mut Matrix4<f64>, _tol: f64) -> Result<(), MuellerError> {
    shrink_vector(m, true);
    Ok(())
}

fn scale_off_m00(m: &mut Matrix4<f64>, _tol: f64) -> Result<(), MuellerError> {
    let m00 = m[(0, 0)];
    let mmt = (*m * m.transpose()).trace();
    if mmt > 0.0 {
        *m *= 4.0 * m00 * m00 / mmt;
        m[(0, 0)] = m00;
    }
    Ok(())
}

/// Bring `m00 + |v|` down to 1.
fn limit_vector(m: &mut Matrix4<f64>, column: bool, tol: f64) {
    let m00 = m[(0, 0)];
    let n = vector_norm(m, column);
    let factor = if (m00 - 1.0).abs() <= tol || n == 0.0 {
        0.0
    } else {
        (1.0 - m00).max(0.0) / n
    };
    scale_vector(m, column, factor);
}

fn limit_diattenuation(m: &mut Matrix4<f64>, tol: f64) -> Result<(), MuellerError> {
    limit_vector(m, false, tol);
    Ok(())
}

fn limit_polarizance(m: &mut Matrix4<f64>, tol: f64) -> Result<(), MuellerError> {
    limit_vector(m, true, tol);
    Ok(())
}

/// Clip covariance eigenvalues to `{0} ∪ [tol, 1]` and map back.
fn clip_covariance(m: &mut Matrix4<f64>, tol: f64) -> Result<(), MuellerError> {
    let h = MuellerMatrix::from_matrix(*m).covariance_matrix();
    let eig = h.eig_symmetric()?;
    let mut clipped = *eig.eigenvalues();
    for q in clipped.iter_mut() {
        *q = if *q < tol { 0.0 } else { q.min(1.0) };
    }
    *m = MuellerMatrix::from_covariance(&eig.reconstruct(&clipped)).m;
    Ok(())
}

impl MuellerMatrix {
    /// Repair a non-physical matrix.
    ///
    /// Each iteration evaluates every condition and applies exactly one
    /// correction, for the first failing condition in the order
    /// `cond0a, cond0b, cond2, cond3a, cond3b, cond1, cond5a, cond5b, cond6`.
    /// The loop ends when all conditions pass or after
    /// `settings.max_iterations` corrections; the latter is reported through
    /// [`FilterOutcome::cap_reached`].
    pub fn filter_physical_conditions(&self, settings: &FilterSettings) -> Result<FilterOutcome, MuellerError> {
        let mut m = self.m;
        let mut iterations = 0;
        loop {
            let conditions = MuellerMatrix::from_matrix(m).physical_conditions(settings.tol)?;
            let next = REPAIRS
                .iter()
                .find(|(condition, _)| !conditions.get(*condition).passed);

            let Some((condition, correct)) = next else {
                return Ok(FilterOutcome {
                    matrix: MuellerMatrix::from_matrix(m),
                    iterations,
                    cap_reached: false,
                    conditions,
                });
            };

            if iterations >= settings.max_iterations {
                warn!(
                    "physical filter stopped after {} iterations with {} = {} still failing",
                    iterations,
                    condition,
                    conditions.get(*condition).value
                );
                return Ok(FilterOutcome {
                    matrix: MuellerMatrix::from_matrix(m),
                    iterations,
                    cap_reached: true,
                    conditions,
                });
            }

            debug!(
                "physical filter iteration {}: correcting {} = {}",
                iterations,
                condition,
                conditions.get(*condition).value
            );
            correct(&mut m, settings.tol)?;
            iterations += 1;
        }
    }

    /// Keep only the `4 - n` largest covariance eigenvalues.
    pub fn filter_purify_number(&self, n: usize) -> Result<MuellerMatrix, MuellerError> {
        let eig = self.covariance_matrix().eig_symmetric()?;
        let mut values = *eig.eigenvalues();
        for q in values.iter_mut().take(n.min(4)) {
            *q = 0.0;
        }
        Ok(MuellerMatrix::from_covariance(&eig.reconstruct(&values)))
    }

    /// Zero every covariance eigenvalue below `threshold`. Returns the matrix
    /// unchanged when none is.
    pub fn filter_purify_threshold(&self, threshold: f64) -> Result<MuellerMatrix, MuellerError> {
        let eig = self.covariance_matrix().eig_symmetric()?;
        let mut values = *eig.eigenvalues();
        let mut zeroed = 0;
        for q in values.iter_mut().filter(|q| **q < threshold) {
            *q = 0.0;
            zeroed += 1;
        }
        if zeroed == 0 {
            return Ok(*self);
        }
        Ok(MuellerMatrix::from_covariance(&eig.reconstruct(&values)))
    }
}

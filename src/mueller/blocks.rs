use crate::{Matrix, Matrix3, Matrix4, Vector3};

/// Block quadruple of a Mueller matrix: `M = m00 · [[1, D], [P, m]]`.
///
/// `d`, `p` and `m` are normalized by `m00` when `m00 > 0` and hold the raw
/// entries otherwise, so [`divide`](Self::divide) and
/// [`compose`](Self::compose) are mutual inverses for any 4x4 real matrix.
///
/// ```
/// use mueller::mueller::MuellerBlocks;
/// use mueller::Matrix4;
///
/// let m = Matrix4::new([
///     [0.5, 0.25, 0.0, 0.0],
///     [0.25, 0.5, 0.0, 0.0],
///     [0.0, 0.0, 0.4, 0.0],
///     [0.0, 0.0, 0.0, 0.4],
/// ]);
/// let b = MuellerBlocks::divide(&m);
/// assert_eq!(b.d[0], 0.5);
/// assert_eq!(b.m[(1, 1)], 0.8);
/// assert_eq!(b.compose(), m);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuellerBlocks {
    pub m00: f64,
    /// Diattenuation vector, `M[0, 1..4]`.
    pub d: Vector3<f64>,
    /// Polarizance vector, `M[1..4, 0]`.
    pub p: Vector3<f64>,
    /// Small-m block, `M[1..4, 1..4]`.
    pub m: Matrix3<f64>,
}

impl MuellerBlocks {
    pub fn divide(mat: &Matrix4<f64>) -> Self {
        let m00 = mat[(0, 0)];
        let scale = if m00 > 0.0 { 1.0 / m00 } else { 1.0 };
        let d: Vector3<f64> = mat.block(0, 1);
        let p: Matrix<f64, 3, 1> = mat.block(1, 0);
        let m: Matrix3<f64> = mat.block(1, 1);
        Self {
            m00,
            d: d * scale,
            p: p.transpose() * scale,
            m: m * scale,
        }
    }

    /// Inverse of [`divide`](Self::divide).
    pub fn compose(&self) -> Matrix4<f64> {
        let scale = if self.m00 > 0.0 { self.m00 } else { 1.0 };
        let mut out = Matrix4::zeros();
        out[(0, 0)] = self.m00;
        out.set_block(0, 1, &(self.d * scale));
        out.set_block(1, 0, &(self.p.transpose() * scale));
        out.set_block(1, 1, &(self.m * scale));
        out
    }
}

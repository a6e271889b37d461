//! # mueller
//!
//! Mueller-matrix polarization optics, no-std compatible. Builds the
//! canonical optical elements, derives their polarimetric parameters, tests
//! and repairs physical realizability, and factors measured matrices into
//! depolarizer, retarder and diattenuator.
//!
//! ## Quick start
//!
//! ```
//! use mueller::{MuellerMatrix, Stokes};
//!
//! // Horizontal polarizer after a quarter-wave plate at 45°.
//! let m = MuellerMatrix::diattenuator_perfect(0.0)
//!     * MuellerMatrix::quarter_waveplate(core::f64::consts::FRAC_PI_4);
//! let out = m * Stokes::new(1.0, 1.0, 0.0, 0.0);
//! assert!((out.intensity() - 0.5).abs() < 1e-12);
//! assert!(m.is_physical(1e-6).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`mueller`]: [`MuellerMatrix`] and everything built on it: block
//!   split `(m00, D, P, m)`, element constructors, parameters, the nine
//!   realizability conditions, the iterative repair filter, covariance
//!   purification and the six polar decompositions.
//!
//! - [`jones`]: 2x2 complex Jones matrices behind the [`Jones`] trait, used
//!   to build non-depolarizing Mueller matrices and to analyse their
//!   eigenstates.
//!
//! - [`stokes`]: [`Stokes`] vectors, the states Mueller matrices act on.
//!
//! - [`angles`]: Conversions between characteristic angles `(α, δ)`,
//!   azimuth/ellipticity and unit Poincaré-sphere vectors.
//!
//! - [`matrix`]: Fixed-size `Matrix<T, M, N>` with const-generic
//!   dimensions, stack-allocated. Arithmetic, indexing, norms and block
//!   access. [`Vector<T, N>`] and [`ColumnVector<T, N>`] are 1-row and
//!   1-column aliases.
//!
//! - [`linalg`]: LU (inverse, determinant) and the Jacobi eigensolver for
//!   real symmetric and complex Hermitian matrices.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements
//!   - [`FloatScalar`]: real floats
//!   - [`LinalgScalar`]: real floats and complex numbers, used by
//!     decompositions and norms
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: `warn!`
//! for ambiguous decompositions, non-physical purities and an exhausted
//! repair budget, `debug!`/`trace!` for repair iterations and decomposition
//! branches. Install any logger in the application to see them.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm, `std::error::Error` impls |
//!
//! Without `std`, float math falls back to the pure-Rust `libm` that
//! `num-traits` and `num-complex` are always built with.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod angles;
pub mod jones;
pub mod linalg;
pub mod matrix;
pub mod mueller;
pub mod stokes;
pub mod traits;

pub use jones::{Jones, JonesMatrix};
pub use matrix::vector::{
    ColumnVector, ColumnVector2, ColumnVector3, ColumnVector4, Vector, Vector2, Vector3, Vector4,
};
pub use matrix::{Matrix, Matrix2, Matrix3, Matrix4};
pub use mueller::{MuellerError, MuellerMatrix};
pub use stokes::Stokes;
pub use traits::{FloatScalar, LinalgScalar, Scalar};

pub use num_complex::Complex;

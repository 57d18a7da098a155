//! Flat, row-major linear algebra used by the scene renderer.
//!
//! Vectors are `[f32; N]` and matrices are `[f32; N * N]` laid out row by row,
//! so element `(row, col)` of a 4×4 matrix lives at `row * 4 + col`. Every
//! function is pure and returns a fresh value. Transforms compose by
//! right-multiplication: `multiply(A, B)` applies `B` in the frame of `A`.
//!
//! Degenerate numeric input (zero-length axes, singular matrices, collapsed
//! frustums) is not guarded on the hot path and yields `NaN`/`inf` exactly as
//! the arithmetic dictates. Each such operation has a `try_*` sibling that
//! reports the problem as a [`MathError`] instead.

use thiserror::Error;

pub mod mat4;
pub mod matrix;
pub mod vector;

pub use matrix::{mat2, mat3, Mat2, Mat3};
pub use mat4::Mat4;
pub use vector::{Vec2, Vec3};

/// Threshold below which a determinant or magnitude is treated as zero by
/// the checked operations.
pub const EPSILON: f32 = 0.000_001;

/// Errors raised by the checked math entry points.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    /// Runtime data did not have the length the operation requires.
    #[error("dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A zero vector cannot be normalized.
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,

    /// The matrix has no inverse.
    #[error("matrix is singular (determinant {determinant})")]
    Singular { determinant: f32 },

    /// The projection parameters do not describe a frustum.
    #[error("degenerate frustum: fov={fov}, near={near}, far={far}")]
    DegenerateFrustum { fov: f32, near: f32, far: f32 },
}

#[cfg(test)]
pub(crate) fn assert_close<const N: usize>(actual: [f32; N], expected: [f32; N]) {
    for (index, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() < 1e-5,
            "component {index} differs: {a} vs {e}\nactual:   {actual:?}\nexpected: {expected:?}"
        );
    }
}

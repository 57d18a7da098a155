//! Element-wise operations shared by every square size, plus the 2×2 and
//! 3×3 specific ones. The 4×4 family lives in [`super::mat4`].

use super::MathError;

pub type Mat2 = [f32; 4];
pub type Mat3 = [f32; 9];

/// Copies runtime data into a flat matrix of `L` elements.
pub fn from_slice<const L: usize>(values: &[f32]) -> Result<[f32; L], MathError> {
    super::vector::from_slice(values)
}

pub fn add<const L: usize>(a: &[f32; L], b: &[f32; L]) -> [f32; L] {
    std::array::from_fn(|i| a[i] + b[i])
}

pub fn subtract<const L: usize>(a: &[f32; L], b: &[f32; L]) -> [f32; L] {
    std::array::from_fn(|i| a[i] - b[i])
}

pub fn scalar_multiply<const L: usize>(a: &[f32; L], s: f32) -> [f32; L] {
    a.map(|c| c * s)
}

pub mod mat2 {
    use super::{scalar_multiply, Mat2};
    use crate::math::{MathError, EPSILON};

    pub fn identity() -> Mat2 {
        [1.0, 0.0, 0.0, 1.0]
    }

    pub fn determinant(a: &Mat2) -> f32 {
        a[0] * a[3] - a[1] * a[2]
    }

    pub fn multiply(a: &Mat2, b: &Mat2) -> Mat2 {
        [
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ]
    }

    /// Adjugate over determinant. A singular `a` yields `inf`/`NaN` entries.
    pub fn invert(a: &Mat2) -> Mat2 {
        scalar_multiply(&[a[3], -a[1], -a[2], a[0]], 1.0 / determinant(a))
    }

    pub fn try_invert(a: &Mat2) -> Result<Mat2, MathError> {
        let determinant = determinant(a);
        if determinant.abs() < EPSILON {
            return Err(MathError::Singular { determinant });
        }
        Ok(invert(a))
    }
}

pub mod mat3 {
    use super::Mat3;

    pub fn identity() -> Mat3 {
        [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(a: &Mat3) -> f32 {
        a[0] * (a[4] * a[8] - a[5] * a[7])
            + a[1] * (a[5] * a[6] - a[3] * a[8])
            + a[2] * (a[3] * a[7] - a[4] * a[6])
    }

    pub fn multiply(a: &Mat3, b: &Mat3) -> Mat3 {
        std::array::from_fn(|index| {
            let (row, col) = (index / 3, index % 3);
            (0..3).map(|k| a[row * 3 + k] * b[k * 3 + col]).sum()
        })
    }
}

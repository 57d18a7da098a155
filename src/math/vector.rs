use super::{MathError, Mat3, EPSILON};

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];

/// Copies runtime data into a fixed-size vector, rejecting the wrong length.
pub fn from_slice<const N: usize>(values: &[f32]) -> Result<[f32; N], MathError> {
    <[f32; N]>::try_from(values).map_err(|_| MathError::DimensionMismatch {
        expected: N,
        actual: values.len(),
    })
}

/// Euclidean norm.
pub fn magnitude<const N: usize>(v: [f32; N]) -> f32 {
    v.iter().map(|c| c * c).sum::<f32>().sqrt()
}

/// Unit vector pointing along `v`.
///
/// `v` must be non-zero; a zero vector comes back as all `NaN`.
pub fn normalize<const N: usize>(v: [f32; N]) -> [f32; N] {
    let mag = magnitude(v);
    v.map(|c| c / mag)
}

/// Checked [`normalize`].
pub fn try_normalize<const N: usize>(v: [f32; N]) -> Result<[f32; N], MathError> {
    if magnitude(v) < EPSILON {
        return Err(MathError::ZeroLength);
    }
    Ok(normalize(v))
}

pub fn sum<const N: usize>(v: [f32; N]) -> f32 {
    v.iter().sum()
}

pub fn add<const N: usize>(a: [f32; N], b: [f32; N]) -> [f32; N] {
    std::array::from_fn(|i| a[i] + b[i])
}

pub fn subtract<const N: usize>(a: [f32; N], b: [f32; N]) -> [f32; N] {
    std::array::from_fn(|i| a[i] - b[i])
}

pub fn scalar_multiply<const N: usize>(v: [f32; N], s: f32) -> [f32; N] {
    v.map(|c| c * s)
}

pub fn dot<const N: usize>(a: [f32; N], b: [f32; N]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Z component of the 3D cross product of two planar vectors.
pub fn cross2(a: Vec2, b: Vec2) -> f32 {
    a[0] * b[1] - a[1] * b[0]
}

pub fn cross3(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Row vector `v` times the 3×3 matrix `m`.
pub fn mul_mat3(v: Vec3, m: &Mat3) -> Vec3 {
    [
        v[0] * m[0] + v[1] * m[3] + v[2] * m[6],
        v[0] * m[1] + v[1] * m[4] + v[2] * m[7],
        v[0] * m[2] + v[1] * m[5] + v[2] * m[8],
    ]
}

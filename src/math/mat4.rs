//! 4×4 matrices: products, camera construction and model transforms.

use super::matrix::mat3;
use super::vector::{self, Vec2, Vec3};
use super::{MathError, Mat3};

pub type Mat4 = [f32; 16];

pub fn identity() -> Mat4 {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    std::array::from_fn(|index| {
        let (row, col) = (index / 4, index % 4);
        (0..4).map(|k| a[row * 4 + k] * b[k * 4 + col]).sum()
    })
}

/// Cofactor expansion along the first row over four 3×3 minors.
pub fn determinant(a: &Mat4) -> f32 {
    let minor = |skip: usize| -> Mat3 {
        let mut out = [0.0; 9];
        let mut next = 0;
        for row in 1..4 {
            for col in (0..4).filter(|&col| col != skip) {
                out[next] = a[row * 4 + col];
                next += 1;
            }
        }
        out
    };
    a[0] * mat3::determinant(&minor(0)) - a[1] * mat3::determinant(&minor(1))
        + a[2] * mat3::determinant(&minor(2))
        - a[3] * mat3::determinant(&minor(3))
}

/// Right-handed view matrix looking from `eye` towards `center`.
///
/// Rows 0..3 hold the camera basis `x`, `y`, `z`; row 3 holds the
/// translation `-(eye · [x; y; z])`. `eye` must differ from `center` and
/// `up` must not be parallel to the view direction.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let z = vector::normalize(vector::subtract(eye, center));
    let x = vector::normalize(vector::cross3(up, z));
    let y = vector::normalize(vector::cross3(z, x));

    let basis = [x[0], x[1], x[2], y[0], y[1], y[2], z[0], z[1], z[2]];
    let t = vector::scalar_multiply(vector::mul_mat3(eye, &basis), -1.0);

    [
        x[0], x[1], x[2], 0.0, //
        y[0], y[1], y[2], 0.0, //
        z[0], z[1], z[2], 0.0, //
        t[0], t[1], t[2], 1.0,
    ]
}

/// Perspective frustum for a vertical `fov` in radians and a `[near, far]`
/// depth range.
///
/// `near == far` or a `fov` outside `(0, π)` produces `inf`/`NaN` entries;
/// see [`try_perspective`].
pub fn perspective(fov: f32, aspect: f32, range: Vec2) -> Mat4 {
    let f = 1.0 / (fov / 2.0).tan();
    let nf = range[0] - range[1];

    [
        f / aspect, 0.0, 0.0, 0.0, //
        0.0, f, 0.0, 0.0, //
        0.0, 0.0, vector::sum(range) / nf, -1.0, //
        0.0, 0.0, (2.0 * range[0] * range[1]) / nf, 0.0,
    ]
}

pub fn try_perspective(fov: f32, aspect: f32, range: Vec2) -> Result<Mat4, MathError> {
    let [near, far] = range;
    let fov_ok = fov > 0.0 && fov < std::f32::consts::PI;
    if !fov_ok || near == far || aspect == 0.0 {
        return Err(MathError::DegenerateFrustum { fov, near, far });
    }
    Ok(perspective(fov, aspect, range))
}

pub fn translate(a: &Mat4, v: Vec3) -> Mat4 {
    let t = [
        1.0, 0.0, 0.0, v[0], //
        0.0, 1.0, 0.0, v[1], //
        0.0, 0.0, 1.0, v[2], //
        0.0, 0.0, 0.0, 1.0,
    ];
    multiply(a, &t)
}

pub fn scale(a: &Mat4, v: Vec3) -> Mat4 {
    let s = [
        v[0], 0.0, 0.0, 0.0, //
        0.0, v[1], 0.0, 0.0, //
        0.0, 0.0, v[2], 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
    multiply(a, &s)
}

/// Rotates `a` by `angle` radians around `axis` (normalized here) using the
/// Rodrigues matrix, applied as `a · R`.
///
/// Successive calls nest: each rotation is taken relative to the frame
/// accumulated so far, so the call order matters.
pub fn rotate(a: &Mat4, axis: Vec3, angle: f32) -> Mat4 {
    let [x, y, z] = vector::normalize(axis);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    let r = [
        x * x + (1.0 - x * x) * c,
        x * y * t - z * s,
        x * z * t + y * s,
        0.0,
        //
        x * y * t + z * s,
        y * y + (1.0 - y * y) * c,
        y * z * t - x * s,
        0.0,
        //
        x * z * t - y * s,
        y * z * t + x * s,
        z * z + (1.0 - z * z) * c,
        0.0,
        //
        0.0,
        0.0,
        0.0,
        1.0,
    ];
    multiply(a, &r)
}

/// Row vector `[p, 1]` times `m`.
pub fn transform_point(p: Vec3, m: &Mat4) -> [f32; 4] {
    let v = [p[0], p[1], p[2], 1.0];
    std::array::from_fn(|col| (0..4).map(|row| v[row] * m[row * 4 + col]).sum())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::math::assert_close;

    fn sample() -> Mat4 {
        [
            2.0, 0.0, 1.0, 1.0, //
            1.0, -1.0, 0.0, 2.0, //
            0.0, 4.0, 1.0, -2.0, //
            1.0, 1.0, 1.0, 1.0,
        ]
    }

    #[test]
    fn identity_determinant_is_one() {
        assert_eq!(determinant(&identity()), 1.0);
    }

    #[test]
    fn determinant_matches_glam() {
        let m = sample();
        let expected = glam::Mat4::from_cols_array(&m).determinant();
        assert!((determinant(&m) - expected).abs() < 1e-4);
        assert!((determinant(&m) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn identity_is_neutral_for_multiply() {
        let m = sample();
        assert_eq!(multiply(&identity(), &m), m);
        assert_eq!(multiply(&m, &identity()), m);
    }

    #[test]
    fn multiply_matches_glam_in_reverse_column_order() {
        // Row-major A·B has the same memory layout as column-major Bᵀ·Aᵀ.
        let a = sample();
        let b = rotate(&identity(), [1.0, 2.0, 3.0], 0.7);
        let ga = glam::Mat4::from_cols_array(&a);
        let gb = glam::Mat4::from_cols_array(&b);
        assert_close(multiply(&a, &b), (gb * ga).to_cols_array());
    }

    #[test]
    fn look_at_down_negative_z() {
        let view = look_at([0.0, 0.0, 40.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_close([view[8], view[9], view[10]], [0.0, 0.0, 1.0]);
        assert_close([view[12], view[13], view[14], view[15]], [0.0, 0.0, -40.0, 1.0]);
        let expected =
            glam::Mat4::look_at_rh(glam::Vec3::new(0.0, 0.0, 40.0), glam::Vec3::ZERO, glam::Vec3::Y);
        assert_close(view, expected.to_cols_array());
    }

    #[test]
    fn look_at_basis_is_orthonormal() {
        let view = look_at([3.0, 5.0, -7.0], [1.0, 0.0, 2.0], [0.0, 1.0, 0.0]);
        let rows = [
            [view[0], view[1], view[2]],
            [view[4], view[5], view[6]],
            [view[8], view[9], view[10]],
        ];
        for (i, a) in rows.iter().enumerate() {
            assert!((vector::magnitude(*a) - 1.0).abs() < 1e-5);
            for b in rows.iter().skip(i + 1) {
                assert!(vector::dot(*a, *b).abs() < 1e-5);
            }
        }
        assert_eq!([view[3], view[7], view[11], view[15]], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn perspective_layout() {
        let proj = perspective(PI / 4.0, 1.0, [0.1, 1000.0]);
        let f = 1.0 / (PI / 8.0).tan();
        assert!((proj[0] - f).abs() < 1e-5);
        assert!((proj[5] - f).abs() < 1e-5);
        assert_eq!(proj[11], -1.0);
        assert_eq!(proj[15], 0.0);
        let expected = glam::Mat4::perspective_rh_gl(PI / 4.0, 1.0, 0.1, 1000.0);
        assert_close(proj, expected.to_cols_array());
    }

    #[test]
    fn perspective_divides_by_aspect() {
        let proj = perspective(PI / 2.0, 2.0, [1.0, 10.0]);
        assert!((proj[0] - 0.5).abs() < 1e-6);
        assert!((proj[5] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_perspective_is_reported_when_checked() {
        let collapsed = perspective(PI / 4.0, 1.0, [5.0, 5.0]);
        assert!(!collapsed[10].is_finite());
        assert!(try_perspective(PI / 4.0, 1.0, [5.0, 5.0]).is_err());
        assert!(try_perspective(0.0, 1.0, [0.1, 10.0]).is_err());
        assert!(try_perspective(PI, 1.0, [0.1, 10.0]).is_err());
        assert!(try_perspective(PI / 3.0, 1.5, [0.1, 10.0]).is_ok());
    }

    #[test]
    fn rotate_quarter_turn_about_y() {
        let r = rotate(&identity(), [0.0, 1.0, 0.0], PI / 2.0);
        let p = transform_point([1.0, 0.0, 0.0], &r);
        assert_close(p, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn rotate_normalizes_axis() {
        let unit = rotate(&identity(), [0.0, 0.0, 1.0], 0.3);
        let long = rotate(&identity(), [0.0, 0.0, 25.0], 0.3);
        assert_close(unit, long);
    }

    #[test]
    fn rotation_preserves_volume() {
        let r = rotate(&identity(), [0.2, 1.0, 0.2], 1.234);
        assert!((determinant(&r) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rotation_order_is_observable() {
        let theta = 0.9;
        let a = [0.2, 1.0, 0.2];
        let b = [0.8, 0.0, -0.8];
        let ab = rotate(&rotate(&identity(), a, theta), b, theta);
        let ba = rotate(&rotate(&identity(), b, theta), a, theta);
        let differs = ab.iter().zip(ba.iter()).any(|(x, y)| (x - y).abs() > 1e-3);
        assert!(differs);
    }

    #[test]
    fn translate_places_offset_in_last_column() {
        let m = translate(&identity(), [1.0, 2.0, 3.0]);
        assert_eq!([m[3], m[7], m[11]], [1.0, 2.0, 3.0]);
        let back = translate(&m, [-1.0, -2.0, -3.0]);
        assert_close(back, identity());
    }

    #[test]
    fn scale_multiplies_diagonal() {
        let m = scale(&scale(&identity(), [2.0, 3.0, 4.0]), [0.5, 2.0, 0.25]);
        assert_eq!([m[0], m[5], m[10], m[15]], [1.0, 6.0, 1.0, 1.0]);
        let p = transform_point([1.0, 1.0, 1.0], &m);
        assert_eq!(p, [1.0, 6.0, 1.0, 1.0]);
    }
}

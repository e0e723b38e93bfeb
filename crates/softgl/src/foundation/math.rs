//! Math utilities and types
//!
//! Provides the vector and matrix types used by every pipeline stage, plus the
//! classic fixed-function matrix builders (frustum, ortho, rotate about an
//! axis) in the column-vector convention the pipeline uses.

pub use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Extension helpers for building pipeline matrices
pub trait Mat4Ext {
    /// Build a matrix from 16 floats in column-major order
    fn from_gl(m: &[f32; 16]) -> Mat4;

    /// Flatten to 16 floats in column-major order
    fn to_gl(&self) -> [f32; 16];

    /// Rotation of `angle_degrees` about `axis`; a zero axis yields identity
    fn rotation_degrees(angle_degrees: f32, axis: Vec3) -> Mat4;

    /// Perspective frustum matrix
    fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Option<Mat4>;

    /// Orthographic projection matrix
    fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Option<Mat4>;

    /// Inverse-transpose of the upper 3x3, used to move normals into eye space
    fn normal_matrix(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn from_gl(m: &[f32; 16]) -> Mat4 {
        Mat4::from_column_slice(m)
    }

    fn to_gl(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.as_slice());
        out
    }

    fn rotation_degrees(angle_degrees: f32, axis: Vec3) -> Mat4 {
        let len = axis.norm();
        if len <= f32::EPSILON {
            return Mat4::identity();
        }
        let axis = Unit::new_unchecked(axis / len);
        Mat4::from_axis_angle(&axis, angle_degrees.to_radians())
    }

    fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Option<Mat4> {
        if near <= 0.0 || far <= 0.0 || left == right || bottom == top || near == far {
            return None;
        }
        let x = 2.0 * near / (right - left);
        let y = 2.0 * near / (top - bottom);
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -(2.0 * far * near) / (far - near);

        #[rustfmt::skip]
        let m = Mat4::new(
            x,   0.0, a,    0.0,
            0.0, y,   b,    0.0,
            0.0, 0.0, c,    d,
            0.0, 0.0, -1.0, 0.0,
        );
        Some(m)
    }

    fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Option<Mat4> {
        if left == right || bottom == top || near == far {
            return None;
        }
        let tx = -(right + left) / (right - left);
        let ty = -(top + bottom) / (top - bottom);
        let tz = -(far + near) / (far - near);

        #[rustfmt::skip]
        let m = Mat4::new(
            2.0 / (right - left), 0.0,                  0.0,                 tx,
            0.0,                  2.0 / (top - bottom), 0.0,                 ty,
            0.0,                  0.0,                  -2.0 / (far - near), tz,
            0.0,                  0.0,                  0.0,                 1.0,
        );
        Some(m)
    }

    fn normal_matrix(&self) -> Mat3 {
        let upper: Mat3 = self.fixed_view::<3, 3>(0, 0).into_owned();
        upper
            .try_inverse()
            .map_or_else(Mat3::identity, |inv| inv.transpose())
    }
}

/// Common math utilities
pub mod utils {
    use super::Vec3;

    /// Normalize a vector, leaving zero-length vectors untouched
    pub fn normalize_or_zero(v: Vec3) -> Vec3 {
        let len = v.norm();
        if len > 0.0 {
            v / len
        } else {
            v
        }
    }

    /// Linear interpolation between two values
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gl_round_trip_is_column_major() {
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let flat = m.to_gl();
        assert_eq!(&flat[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(Mat4::from_gl(&flat), m);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let r = Mat4::rotation_degrees(90.0, Vec3::new(0.0, 0.0, 1.0));
        let v = r * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(v, Vec4::new(0.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_rotation_is_identity() {
        assert_eq!(Mat4::rotation_degrees(45.0, Vec3::zeros()), Mat4::identity());
    }

    #[test]
    fn test_frustum_maps_near_plane_to_minus_one() {
        let p = Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0).unwrap();
        let v = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(v.z / v.w, -1.0, epsilon = 1e-5);
        let v = p * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert_relative_eq!(v.z / v.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_projections_rejected() {
        assert!(Mat4::frustum(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0).is_none());
        assert!(Mat4::ortho(1.0, 1.0, -1.0, 1.0, -1.0, 1.0).is_none());
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let m = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));
        let n = m.normal_matrix() * Vec3::new(1.0, 1.0, 0.0);
        assert_relative_eq!(n, Vec3::new(0.5, 1.0, 0.0), epsilon = 1e-6);
    }
}

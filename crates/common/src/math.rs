//! Extension traits over glam's vector, quaternion and matrix types.
//!
//! glam supplies storage, arithmetic and the affine/projection constructors.
//! The traits here add what the scene graph needs on top of it: tolerance
//! based equality, X-then-Y-then-Z Euler conversion, checked inversion and a
//! TRS decomposition that copes with mirrored matrices.

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use crate::MathError;

/// Tolerance that only absorbs floating-point representation artifacts.
///
/// Callers that need a real tolerance (tests, animation) pass their own,
/// typically `0.001`.
pub const DEFAULT_EPSILON: f32 = f32::EPSILON;

/// Beyond this |sin(pitch)| the Euler decomposition is treated as gimbal locked.
const GIMBAL_LOCK_THRESHOLD: f32 = 0.99999;

/// Component-wise comparison within an explicit tolerance.
pub trait ApproxEq {
    /// True when every component differs by strictly less than `delta`.
    fn approx_eq(&self, other: &Self, delta: f32) -> bool;
}

fn all_within(a: &[f32], b: &[f32], delta: f32) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < delta)
}

impl ApproxEq for f32 {
    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        (self - other).abs() < delta
    }
}

impl ApproxEq for Vec3 {
    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        all_within(&self.to_array(), &other.to_array(), delta)
    }
}

impl ApproxEq for Vec4 {
    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        all_within(&self.to_array(), &other.to_array(), delta)
    }
}

impl ApproxEq for Quat {
    /// `q` and `-q` encode the same rotation and compare equal.
    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        let lhs = self.to_array();
        all_within(&lhs, &other.to_array(), delta) || all_within(&lhs, &(-*other).to_array(), delta)
    }
}

impl ApproxEq for Mat4 {
    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        all_within(&self.to_cols_array(), &other.to_cols_array(), delta)
    }
}

/// Rotation helpers for [`Quat`].
pub trait QuatExt: Sized {
    /// Rotation applying X first, then Y, then Z (`Rz * Ry * Rx`).
    fn from_euler_xyz(angles: Vec3) -> Self;

    /// Inverse of [`QuatExt::from_euler_xyz`]. Near gimbal lock the X angle is
    /// pinned to zero and Z absorbs the remaining rotation, so the result is
    /// not guaranteed to reproduce the angles that built the quaternion.
    fn to_euler_xyz(self) -> Vec3;

    /// Conjugate over squared norm. The zero quaternion maps to itself.
    fn inverted(self) -> Self;

    /// Rotation part of an affine matrix, with scale and mirroring removed.
    fn from_rotation_matrix(matrix: &Mat4) -> Self;
}

impl QuatExt for Quat {
    fn from_euler_xyz(angles: Vec3) -> Self {
        Quat::from_rotation_z(angles.z) * Quat::from_rotation_y(angles.y) * Quat::from_rotation_x(angles.x)
    }

    fn to_euler_xyz(self) -> Vec3 {
        let m = Mat3::from_quat(self);
        let m20 = m.x_axis.z;
        let y = (-m20.clamp(-1.0, 1.0)).asin();

        if m20.abs() < GIMBAL_LOCK_THRESHOLD {
            let x = m.y_axis.z.atan2(m.z_axis.z);
            let z = m.x_axis.y.atan2(m.x_axis.x);
            Vec3::new(x, y, z)
        } else {
            let z = (-m.y_axis.x).atan2(m.y_axis.y);
            Vec3::new(0.0, y, z)
        }
    }

    fn inverted(self) -> Self {
        let norm_squared = self.length_squared();
        if norm_squared == 0.0 {
            tracing::warn!("inverting a zero-length quaternion");
            return Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);
        }
        let conjugate = self.conjugate();
        Quat::from_xyzw(
            conjugate.x / norm_squared,
            conjugate.y / norm_squared,
            conjugate.z / norm_squared,
            conjugate.w / norm_squared,
        )
    }

    fn from_rotation_matrix(matrix: &Mat4) -> Self {
        let (_, rotation, _) = matrix.decompose();
        rotation
    }
}

/// Affine helpers for [`Mat4`].
pub trait Mat4Ext: Sized {
    /// Rotation matrix applying X first, then Y, then Z (`Rz * Ry * Rx`).
    fn from_euler_xyz(angles: Vec3) -> Self;

    /// General inverse. A zero or non-finite determinant is reported instead
    /// of producing infinities.
    fn try_invert(&self) -> Result<Self, MathError>;

    fn extract_translation(&self) -> Vec3;

    /// Unsigned basis lengths. See [`Mat4Ext::decompose`] for the signed scale.
    fn extract_scale(&self) -> Vec3;

    fn extract_rotation(&self) -> Quat;

    /// Splits an affine matrix into `(translation, rotation, scale)` such that
    /// `T * R * S` reproduces it. A negative determinant flips the X scale.
    fn decompose(&self) -> (Vec3, Quat, Vec3);

    /// Copy with the translation column reset to the origin.
    fn without_translation(&self) -> Self;
}

impl Mat4Ext for Mat4 {
    fn from_euler_xyz(angles: Vec3) -> Self {
        Mat4::from_rotation_z(angles.z) * Mat4::from_rotation_y(angles.y) * Mat4::from_rotation_x(angles.x)
    }

    fn try_invert(&self) -> Result<Self, MathError> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            tracing::warn!(determinant, "refusing to invert a singular matrix");
            return Err(MathError::SingularMatrix { determinant });
        }
        Ok(self.inverse())
    }

    fn extract_translation(&self) -> Vec3 {
        self.w_axis.truncate()
    }

    fn extract_scale(&self) -> Vec3 {
        Vec3::new(
            self.x_axis.truncate().length(),
            self.y_axis.truncate().length(),
            self.z_axis.truncate().length(),
        )
    }

    fn extract_rotation(&self) -> Quat {
        Quat::from_rotation_matrix(self)
    }

    fn decompose(&self) -> (Vec3, Quat, Vec3) {
        let mut scale = self.extract_scale();
        // A mirrored basis is not a rotation; fold the reflection into X.
        if self.determinant() < 0.0 {
            scale.x = -scale.x;
        }

        let basis = Mat3::from_cols(
            self.x_axis.truncate() / scale.x,
            self.y_axis.truncate() / scale.y,
            self.z_axis.truncate() / scale.z,
        );
        let rotation = Quat::from_mat3(&basis).normalize();

        (self.extract_translation(), rotation, scale)
    }

    fn without_translation(&self) -> Self {
        let mut matrix = *self;
        matrix.w_axis = Vec4::W;
        matrix
    }
}

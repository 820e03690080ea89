use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::{ApproxEq, Mat4Ext, QuatExt};
use crate::MathError;

/// Identifier of an entity within one world. Allocated sequentially from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Position of the entity in its world's registry.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
///
/// The equivalent matrix is `T * R * S`: a vertex is scaled, then rotated,
/// then translated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Decomposes an affine matrix into position, rotation and scale.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (position, rotation, scale) = matrix.decompose();
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn set_matrix(&mut self, matrix: &Mat4) {
        *self = Self::from_matrix(matrix);
    }

    pub fn euler_angles(&self) -> Vec3 {
        self.rotation.to_euler_xyz()
    }

    pub fn set_euler_angles(&mut self, angles: Vec3) {
        self.rotation = Quat::from_euler_xyz(angles);
    }

    /// Transform equivalent to applying `child` first, then `self`.
    pub fn multiply(&self, child: &Transform) -> Transform {
        Self::from_matrix(&(self.matrix() * child.matrix()))
    }

    pub fn try_invert(&self) -> Result<Transform, MathError> {
        Ok(Self::from_matrix(&self.matrix().try_invert()?))
    }

    pub fn transform_vector(&self, vector: Vec4) -> Vec4 {
        self.matrix() * vector
    }
}

impl ApproxEq for Transform {
    fn approx_eq(&self, other: &Self, delta: f32) -> bool {
        self.position.approx_eq(&other.position, delta)
            && self.rotation.approx_eq(&other.rotation, delta)
            && self.scale.approx_eq(&other.scale, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transform {
        Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_xyzw(0.5, 0.5, 0.5, 0.5),
            Vec3::new(1.0, 2.0, 3.0),
        )
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn entity_id_display_and_index() {
        let id = EntityId(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.to_string(), "#7");
    }

    #[test]
    fn matrix_round_trip() {
        let t = sample();
        let mut t2 = Transform::default();
        t2.set_matrix(&t.matrix());
        assert!(t.approx_eq(&t2, 0.001));
    }

    #[test]
    fn transform_vector_applies_scale_rotate_translate() {
        let t = sample();
        let v = Vec4::new(1.0, 2.0, 3.0, 1.0);

        let m = Mat4::from_translation(t.position) * Mat4::from_quat(t.rotation) * Mat4::from_scale(t.scale);
        assert!(t.transform_vector(v).approx_eq(&(m * v), 0.001));
    }

    #[test]
    fn multiply_matches_matrix_product() {
        let parent = sample();
        let child = Transform::new(
            Vec3::new(4.0, 5.0, 6.0),
            Quat::from_xyzw(-0.5, 0.5, 0.5, 0.5),
            Vec3::new(4.0, 5.0, 6.0),
        );
        let expected = parent.matrix() * child.matrix();
        assert!(parent.multiply(&child).matrix().approx_eq(&expected, 0.001));
    }

    #[test]
    fn double_inversion_restores_transform() {
        let t = sample();
        let back = t.try_invert().and_then(|inv| inv.try_invert()).unwrap();
        assert!(t.approx_eq(&back, 0.001));
    }

    #[test]
    fn zero_scale_cannot_be_inverted() {
        let t = Transform {
            scale: Vec3::new(1.0, 0.0, 1.0),
            ..Transform::default()
        };
        assert!(t.try_invert().is_err());
    }

    #[test]
    fn euler_setter_round_trips_away_from_gimbal_lock() {
        let mut t = Transform::default();
        let angles = Vec3::new(0.3, -0.4, 1.0);
        t.set_euler_angles(angles);
        assert!(t.euler_angles().approx_eq(&angles, 1e-5));
    }
}

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use trellis_common::Transform;

/// Local placement of an entity relative to its parent (or the world, for a root).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformComponent {
    local: Transform,
}

impl TransformComponent {
    pub fn new(local: Transform) -> Self {
        Self { local }
    }

    pub fn local_position(&self) -> Vec3 {
        self.local.position
    }

    pub fn set_local_position(&mut self, position: Vec3) {
        self.local.position = position;
    }

    pub fn local_rotation(&self) -> Quat {
        self.local.rotation
    }

    pub fn set_local_rotation(&mut self, rotation: Quat) {
        self.local.rotation = rotation;
    }

    pub fn local_euler_angles(&self) -> Vec3 {
        self.local.euler_angles()
    }

    pub fn set_local_euler_angles(&mut self, angles: Vec3) {
        self.local.set_euler_angles(angles);
    }

    pub fn local_scale(&self) -> Vec3 {
        self.local.scale
    }

    pub fn set_local_scale(&mut self, scale: Vec3) {
        self.local.scale = scale;
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.local.matrix()
    }

    /// Replaces position, rotation and scale with the decomposition of `matrix`.
    pub fn set_local_matrix(&mut self, matrix: &Mat4) {
        self.local.set_matrix(matrix);
    }

    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    pub fn set_local_transform(&mut self, transform: Transform) {
        self.local = transform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_common::ApproxEq;

    #[test]
    fn starts_at_identity() {
        let t = TransformComponent::default();
        assert_eq!(t.local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn setters_feed_matrix() {
        let mut t = TransformComponent::default();
        t.set_local_position(Vec3::new(1.0, 2.0, 3.0));
        t.set_local_scale(Vec3::splat(2.0));
        t.set_local_rotation(Quat::from_rotation_z(0.5));

        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(0.5)
            * Mat4::from_scale(Vec3::splat(2.0));
        assert!(t.local_matrix().approx_eq(&expected, 1e-5));
    }

    #[test]
    fn set_local_matrix_decomposes() {
        let mut t = TransformComponent::default();
        let m = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_x(0.25),
            Vec3::new(-4.0, 0.0, 9.0),
        );
        t.set_local_matrix(&m);

        assert!(t.local_position().approx_eq(&Vec3::new(-4.0, 0.0, 9.0), 1e-5));
        assert!(t.local_scale().approx_eq(&Vec3::new(1.0, 2.0, 3.0), 1e-5));
        assert!(t.local_rotation().approx_eq(&Quat::from_rotation_x(0.25), 1e-5));
    }

    #[test]
    fn euler_angles_go_through_rotation() {
        let mut t = TransformComponent::default();
        t.set_local_euler_angles(Vec3::new(0.0, 0.5, 0.0));
        assert!(t.local_rotation().approx_eq(&Quat::from_rotation_y(0.5), 1e-6));
        assert!(t.local_euler_angles().approx_eq(&Vec3::new(0.0, 0.5, 0.0), 1e-5));
    }
}

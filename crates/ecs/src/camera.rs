use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};
use trellis_common::{Mat4Ext, MathError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraType {
    Perspective,
    Orthographic,
}

/// Projection parameters for an entity that can act as a viewpoint.
///
/// Projections target GL clip space (depth in -1..1). The camera looks down
/// its local -Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraComponent {
    pub camera_type: CameraType,
    pub near: f32,
    /// May be `f32::INFINITY` for a perspective camera.
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    /// Fixed aspect ratio; `None` follows the viewport.
    pub aspect: Option<f32>,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            camera_type: CameraType::Perspective,
            near: 0.1,
            far: 1000.0,
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            fovy: 45.0_f32.to_radians(),
            aspect: None,
        }
    }
}

impl CameraComponent {
    pub fn perspective() -> Self {
        Self::default()
    }

    pub fn orthographic() -> Self {
        Self {
            camera_type: CameraType::Orthographic,
            ..Self::default()
        }
    }

    /// Symmetric horizontal half-extent of an orthographic view.
    pub fn set_xmag(&mut self, xmag: f32) {
        self.left = -xmag;
        self.right = xmag;
    }

    /// Symmetric vertical half-extent of an orthographic view.
    pub fn set_ymag(&mut self, ymag: f32) {
        self.bottom = -ymag;
        self.top = ymag;
    }

    pub fn projection_matrix(&self, viewport_aspect: f32) -> Mat4 {
        match self.camera_type {
            CameraType::Perspective => {
                let aspect = self.aspect.unwrap_or(viewport_aspect);
                if self.far.is_infinite() {
                    infinite_perspective_gl(self.fovy, aspect, self.near)
                } else {
                    Mat4::perspective_rh_gl(self.fovy, aspect, self.near, self.far)
                }
            }
            CameraType::Orthographic => {
                Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, self.near, self.far)
            }
        }
    }

    /// View matrix for a camera placed by `world_matrix`.
    pub fn view_matrix(world_matrix: &Mat4) -> Result<Mat4, MathError> {
        world_matrix.try_invert()
    }
}

fn infinite_perspective_gl(fovy: f32, aspect: f32, near: f32) -> Mat4 {
    let f = 1.0 / (fovy / 2.0).tan();
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -1.0, -1.0),
        Vec4::new(0.0, 0.0, -2.0 * near, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use trellis_common::ApproxEq;

    #[test]
    fn default_camera_is_perspective() {
        let cam = CameraComponent::default();
        assert_eq!(cam.camera_type, CameraType::Perspective);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        assert!(cam.aspect.is_none());
    }

    #[test]
    fn perspective_matches_gl_layout() {
        let cam = CameraComponent::perspective();
        let p = cam.projection_matrix(2.0);
        let f = 1.0 / (cam.fovy / 2.0).tan();
        let nf = 1.0 / (cam.near - cam.far);

        assert!(p.x_axis.x.approx_eq(&(f / 2.0), 1e-5));
        assert!(p.y_axis.y.approx_eq(&f, 1e-5));
        assert!(p.z_axis.z.approx_eq(&((cam.far + cam.near) * nf), 1e-5));
        assert!(p.w_axis.z.approx_eq(&(2.0 * cam.far * cam.near * nf), 1e-5));
        assert_eq!(p.z_axis.w, -1.0);
        assert_eq!(p.w_axis.w, 0.0);
    }

    #[test]
    fn fixed_aspect_overrides_viewport() {
        let mut cam = CameraComponent::perspective();
        cam.aspect = Some(1.0);
        assert_eq!(cam.projection_matrix(3.0), cam.projection_matrix(1.0));
    }

    #[test]
    fn infinite_far_plane() {
        let mut cam = CameraComponent::perspective();
        cam.far = f32::INFINITY;
        let p = cam.projection_matrix(1.0);
        assert_eq!(p.z_axis.z, -1.0);
        assert!(p.w_axis.z.approx_eq(&(-2.0 * cam.near), 1e-6));
        assert!(p.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn orthographic_with_magnification() {
        let mut cam = CameraComponent::orthographic();
        cam.set_xmag(2.0);
        cam.set_ymag(4.0);
        let p = cam.projection_matrix(1.0);

        assert!(p.x_axis.x.approx_eq(&0.5, 1e-6));
        assert!(p.y_axis.y.approx_eq(&0.25, 1e-6));
        assert_eq!(p.w_axis.w, 1.0);
    }

    #[test]
    fn view_matrix_inverts_placement() {
        let world = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
        let view = CameraComponent::view_matrix(&world).unwrap();
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        assert!(origin_in_view.approx_eq(&Vec3::new(0.0, 0.0, -5.0), 1e-6));
    }
}

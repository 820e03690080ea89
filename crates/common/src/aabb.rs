use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// A fresh box is *vanilla*: min is +inf and max is -inf on every axis, so
/// the first [`Aabb::add_point`] populates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }
}

impl Aabb {
    /// An empty (vanilla) box.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::new();
        for point in points {
            aabb.add_point(point);
        }
        aabb
    }

    pub fn is_vanilla(&self) -> bool {
        self.min.x == f32::INFINITY
    }

    pub fn add_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows this box to enclose `other`. Merging a vanilla box is a no-op.
    pub fn merge(&mut self, other: &Aabb) {
        if other.is_vanilla() {
            return;
        }
        self.add_point(other.min);
        self.add_point(other.max);
    }

    /// Box around the transformed min and max corners.
    ///
    /// Only those two corners are transformed, which is exact for translation
    /// and axis-aligned scale but undercounts the true bounds once the matrix
    /// rotates. A vanilla box is returned unchanged.
    pub fn transform_by_matrix(&self, matrix: &Mat4) -> Aabb {
        if self.is_vanilla() {
            return *self;
        }
        let mut transformed = Aabb::new();
        transformed.add_point(matrix.transform_point3(self.min));
        transformed.add_point(matrix.transform_point3(self.max));
        transformed
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn size_x(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn size_y(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size_z(&self) -> f32 {
        self.max.z - self.min.z
    }

    /// Midpoint of min and max. Not finite for a vanilla box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Corner-to-corner length.
    pub fn diagonal_length(&self) -> f32 {
        self.max.distance(self.min)
    }

    /// Distance from the box centre at which a perspective camera with
    /// vertical field of view `fov_y` (radians) keeps the whole box in view.
    pub fn fit_distance(&self, fov_y: f32) -> f32 {
        self.diagonal_length() / (fov_y / 2.0).sin()
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};
use trellis_common::Aabb;

/// Topology of a primitive, numbered as in glTF and GL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn from_gltf(mode: u32) -> Option<Self> {
        Some(match mode {
            0 => Self::Points,
            1 => Self::Lines,
            2 => Self::LineLoop,
            3 => Self::LineStrip,
            4 => Self::Triangles,
            5 => Self::TriangleStrip,
            6 => Self::TriangleFan,
            _ => return None,
        })
    }

    pub fn as_gltf(self) -> u32 {
        self as u32
    }
}

/// One drawable piece of a mesh. Only counts and bounds are kept; vertex
/// data belongs to whichever backend uploads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub mode: PrimitiveMode,
    pub vertex_count: u32,
    /// Zero for non-indexed primitives.
    pub index_count: u32,
    pub local_aabb: Aabb,
}

impl Primitive {
    /// Primitive whose bounds are computed from its vertex positions.
    pub fn from_positions(mode: PrimitiveMode, positions: &[Vec3], index_count: u32) -> Self {
        Self {
            mode,
            vertex_count: positions.len() as u32,
            index_count,
            local_aabb: Aabb::from_points(positions.iter().copied()),
        }
    }

    /// Primitive with precomputed bounds (e.g. accessor min/max).
    pub fn with_bounds(mode: PrimitiveMode, vertex_count: u32, index_count: u32, local_aabb: Aabb) -> Self {
        Self {
            mode,
            vertex_count,
            index_count,
            local_aabb,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    primitives: Vec<Primitive>,
    local_aabb: Aabb,
}

impl Mesh {
    pub fn new(name: impl Into<String>, primitives: Vec<Primitive>) -> Self {
        let mut local_aabb = Aabb::new();
        for primitive in &primitives {
            local_aabb.merge(&primitive.local_aabb);
        }
        Self {
            name: name.into(),
            primitives,
            local_aabb,
        }
    }

    /// Axis-aligned cube of edge 1 centred on the origin: 24 vertices
    /// (4 per face) and 36 indices.
    pub fn unit_cube() -> Self {
        let half = Vec3::splat(0.5);
        let bounds = Aabb::from_min_max(-half, half);
        Self::new(
            "unit_cube",
            vec![Primitive::with_bounds(PrimitiveMode::Triangles, 24, 36, bounds)],
        )
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Union of the primitives' bounds.
    pub fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    pub fn vertex_count(&self) -> u32 {
        self.primitives.iter().map(|p| p.vertex_count).sum()
    }

    pub fn index_count(&self) -> u32 {
        self.primitives.iter().map(|p| p.index_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_bounds_from_positions() {
        let p = Primitive::from_positions(
            PrimitiveMode::Triangles,
            &[Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, -2.0), Vec3::ZERO],
            3,
        );
        assert_eq!(p.vertex_count, 3);
        assert_eq!(p.local_aabb.min(), Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(p.local_aabb.max(), Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn mesh_bounds_merge_primitives() {
        let a = Primitive::from_positions(PrimitiveMode::Lines, &[Vec3::ZERO, Vec3::ONE], 0);
        let b = Primitive::from_positions(PrimitiveMode::Points, &[Vec3::splat(-2.0)], 0);
        let mesh = Mesh::new("pair", vec![a, b]);

        assert_eq!(mesh.local_aabb().min(), Vec3::splat(-2.0));
        assert_eq!(mesh.local_aabb().max(), Vec3::ONE);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn empty_mesh_is_vanilla() {
        assert!(Mesh::new("empty", Vec::new()).local_aabb().is_vanilla());
    }

    #[test]
    fn unit_cube_counts() {
        let cube = Mesh::unit_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.local_aabb().size(), Vec3::ONE);
    }

    #[test]
    fn gltf_mode_numbers() {
        assert_eq!(PrimitiveMode::from_gltf(4), Some(PrimitiveMode::Triangles));
        assert_eq!(PrimitiveMode::from_gltf(6), Some(PrimitiveMode::TriangleFan));
        assert_eq!(PrimitiveMode::from_gltf(7), None);
        assert_eq!(PrimitiveMode::LineStrip.as_gltf(), 3);
    }
}

use glam::{Mat4, Vec3};
use trellis_common::{EntityId, Mat4Ext};
use trellis_ecs::{CameraComponent, MeshHandle};
use trellis_kernel::World;

use crate::RenderError;

/// Viewport and fallback configuration for frame preparation.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub width: u32,
    pub height: u32,
    /// Used at the world origin when the world has no camera.
    pub fallback_camera: CameraComponent,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fallback_camera: CameraComponent::perspective(),
        }
    }
}

impl RenderView {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Resolved viewpoint for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCamera {
    /// `None` when the fallback camera was used.
    pub entity: Option<EntityId>,
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

/// One mesh to draw, placed by its entity's world matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub entity: EntityId,
    pub mesh: MeshHandle,
    /// Column-major world matrix.
    pub world_matrix: [f32; 16],
}

impl DrawCommand {
    /// Raw bytes of the world matrix, ready for a uniform upload.
    pub fn world_matrix_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.world_matrix)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.world_matrix)
    }

    pub fn position(&self) -> Vec3 {
        self.matrix().extract_translation()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub camera: FrameCamera,
    /// Ordered by entity id.
    pub draws: Vec<DrawCommand>,
}

fn resolve_camera(world: &World, view: &RenderView) -> Result<FrameCamera, RenderError> {
    let aspect = view.aspect();
    let active = world
        .active_camera()
        .and_then(|id| Some((id, world.components().camera(id)?, world.scene_graph(id)?)));

    match active {
        Some((entity, camera, graph)) => {
            let placement = graph.matrix();
            let view_matrix = CameraComponent::view_matrix(&placement)
                .map_err(|source| RenderError::CameraPlacement { entity, source })?;
            Ok(FrameCamera {
                entity: Some(entity),
                eye: placement.extract_translation(),
                view: view_matrix,
                projection: camera.projection_matrix(aspect),
            })
        }
        None => {
            tracing::debug!("no camera in world, using fallback");
            Ok(FrameCamera {
                entity: None,
                eye: Vec3::ZERO,
                view: Mat4::IDENTITY,
                projection: view.fallback_camera.projection_matrix(aspect),
            })
        }
    }
}

/// Collect the active camera and a draw command for every mesh entity.
pub fn prepare_frame(world: &World, view: &RenderView) -> Result<Frame, RenderError> {
    let _span = tracing::info_span!("prepare_frame", entities = world.entity_count()).entered();

    if view.width == 0 || view.height == 0 {
        return Err(RenderError::EmptyViewport {
            width: view.width,
            height: view.height,
        });
    }

    let camera = resolve_camera(world, view)?;
    let draws: Vec<DrawCommand> = world
        .components()
        .meshes()
        .iter()
        .filter_map(|(&entity, mesh)| {
            let graph = world.scene_graph(entity)?;
            Some(DrawCommand {
                entity,
                mesh: mesh.mesh,
                world_matrix: graph.matrix().to_cols_array(),
            })
        })
        .collect();

    tracing::debug!(draws = draws.len(), camera = ?camera.entity, "frame prepared");
    Ok(Frame { camera, draws })
}

//! Optional per-entity components.
//!
//! Every entity owns a transform and a scene-graph node (see `trellis-kernel`);
//! everything else is optional and lives here, one BTreeMap per component
//! kind keyed by EntityId.
//!
//! # Invariants
//! - At most one component of each kind per entity.
//! - All component mutations produce events.
//! - Iteration order is deterministic (BTreeMap, ascending id).

mod camera;
mod controller;

pub use camera::{CameraComponent, CameraType};
pub use controller::{
    CameraController, MoveDirection, OrbitSettings, OrbitState, WalkSettings, WalkState,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trellis_common::{Aabb, EntityId};

/// A handle referencing a mesh in an asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// Renderable geometry attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub mesh: MeshHandle,
    /// Bounds of the geometry in the entity's local space.
    pub local_aabb: Aabb,
}

/// Capability tag for an optional component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Mesh,
    Camera,
    CameraController,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::Mesh,
        ComponentKind::Camera,
        ComponentKind::CameraController,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error("entity {entity} already has a {kind:?} component")]
    AlreadyAttached { entity: EntityId, kind: ComponentKind },
}

/// Events produced by component mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentEvent {
    Attached { entity: EntityId, kind: ComponentKind },
    Removed { entity: EntityId, kind: ComponentKind },
}

/// Deterministic storage for the optional components of every entity in a world.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    meshes: BTreeMap<EntityId, MeshComponent>,
    cameras: BTreeMap<EntityId, CameraComponent>,
    controllers: BTreeMap<EntityId, CameraController>,
    events: Vec<ComponentEvent>,
}

fn insert_once<T>(
    map: &mut BTreeMap<EntityId, T>,
    events: &mut Vec<ComponentEvent>,
    entity: EntityId,
    kind: ComponentKind,
    value: T,
) -> Result<(), ComponentError> {
    if map.contains_key(&entity) {
        return Err(ComponentError::AlreadyAttached { entity, kind });
    }
    map.insert(entity, value);
    events.push(ComponentEvent::Attached { entity, kind });
    tracing::debug!(%entity, ?kind, "component attached");
    Ok(())
}

fn remove_tracked<T>(
    map: &mut BTreeMap<EntityId, T>,
    events: &mut Vec<ComponentEvent>,
    entity: EntityId,
    kind: ComponentKind,
) -> Option<T> {
    let removed = map.remove(&entity);
    if removed.is_some() {
        events.push(ComponentEvent::Removed { entity, kind });
    }
    removed
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending component events.
    pub fn drain_events(&mut self) -> Vec<ComponentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    // --- Mesh ---
    pub fn attach_mesh(&mut self, entity: EntityId, mesh: MeshComponent) -> Result<(), ComponentError> {
        insert_once(&mut self.meshes, &mut self.events, entity, ComponentKind::Mesh, mesh)
    }

    pub fn remove_mesh(&mut self, entity: EntityId) -> Option<MeshComponent> {
        remove_tracked(&mut self.meshes, &mut self.events, entity, ComponentKind::Mesh)
    }

    pub fn mesh(&self, entity: EntityId) -> Option<&MeshComponent> {
        self.meshes.get(&entity)
    }

    pub fn meshes(&self) -> &BTreeMap<EntityId, MeshComponent> {
        &self.meshes
    }

    // --- Camera ---
    pub fn attach_camera(&mut self, entity: EntityId, camera: CameraComponent) -> Result<(), ComponentError> {
        insert_once(&mut self.cameras, &mut self.events, entity, ComponentKind::Camera, camera)
    }

    pub fn remove_camera(&mut self, entity: EntityId) -> Option<CameraComponent> {
        remove_tracked(&mut self.cameras, &mut self.events, entity, ComponentKind::Camera)
    }

    pub fn camera(&self, entity: EntityId) -> Option<&CameraComponent> {
        self.cameras.get(&entity)
    }

    pub fn camera_mut(&mut self, entity: EntityId) -> Option<&mut CameraComponent> {
        self.cameras.get_mut(&entity)
    }

    pub fn cameras(&self) -> &BTreeMap<EntityId, CameraComponent> {
        &self.cameras
    }

    // --- CameraController ---
    pub fn attach_camera_controller(
        &mut self,
        entity: EntityId,
        controller: CameraController,
    ) -> Result<(), ComponentError> {
        insert_once(
            &mut self.controllers,
            &mut self.events,
            entity,
            ComponentKind::CameraController,
            controller,
        )
    }

    pub fn remove_camera_controller(&mut self, entity: EntityId) -> Option<CameraController> {
        remove_tracked(
            &mut self.controllers,
            &mut self.events,
            entity,
            ComponentKind::CameraController,
        )
    }

    pub fn camera_controller(&self, entity: EntityId) -> Option<&CameraController> {
        self.controllers.get(&entity)
    }

    pub fn camera_controller_mut(&mut self, entity: EntityId) -> Option<&mut CameraController> {
        self.controllers.get_mut(&entity)
    }

    /// Whether `entity` carries a component of `kind`.
    pub fn has(&self, entity: EntityId, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Mesh => self.meshes.contains_key(&entity),
            ComponentKind::Camera => self.cameras.contains_key(&entity),
            ComponentKind::CameraController => self.controllers.contains_key(&entity),
        }
    }

    /// All entities carrying a component of `kind`, ascending by id.
    pub fn entities_with(&self, kind: ComponentKind) -> Vec<EntityId> {
        match kind {
            ComponentKind::Mesh => self.meshes.keys().copied().collect(),
            ComponentKind::Camera => self.cameras.keys().copied().collect(),
            ComponentKind::CameraController => self.controllers.keys().copied().collect(),
        }
    }

    /// Component kinds attached to `entity`.
    pub fn kinds_of(&self, entity: EntityId) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.has(entity, *kind))
            .collect()
    }

    /// Drop every component and pending event.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.cameras.clear();
        self.controllers.clear();
        self.events.clear();
    }
}

pub fn crate_info() -> &'static str {
    "trellis-ecs v0.1.0"
}

use serde::{Deserialize, Serialize};
use trellis_common::EntityId;
use trellis_ecs::{CameraComponent, CameraController, ComponentKind, ComponentStore, MeshComponent};

use crate::{SceneError, TransformComponent};

/// An event record produced by every structural mutation to the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    Created { id: EntityId },
    Renamed { id: EntityId, old: String, new: String },
    /// `child` now hangs under `parent`; `previous` is the parent it was taken from.
    Reparented {
        child: EntityId,
        parent: EntityId,
        previous: Option<EntityId>,
    },
    Detached { child: EntityId, parent: EntityId },
    /// Every entity and component was dropped; ids restart at 0.
    Reset,
}

/// A node of the world: a name, a local transform and its place in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    pub(crate) transform: TransformComponent,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

impl Entity {
    fn new(id: EntityId) -> Self {
        Self {
            id,
            name: format!("Entity_{}", id.0),
            transform: TransformComponent::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &TransformComponent {
        &self.transform
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }
}

/// Owned registry of entities and their optional components.
///
/// Entities live in an arena indexed by id. There is no per-entity deletion;
/// [`World::reset`] clears everything. Several worlds may coexist.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub(crate) entities: Vec<Entity>,
    components: ComponentStore,
    active_camera: Option<EntityId>,
    event_log: Vec<WorldEvent>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with an identity transform and no parent.
    pub fn create(&mut self) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity::new(id));
        self.event_log.push(WorldEvent::Created { id });
        tracing::debug!(%id, "entity created");
        id
    }

    /// Create an entity and give it a name.
    pub fn create_named(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.create();
        self.entities[id.index()].name = name.into();
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        id.index() < self.entities.len()
    }

    pub(crate) fn require(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.get(id).ok_or(SceneError::EntityNotFound(id))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All entities, ascending by id.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities without a parent, ascending by id.
    pub fn roots(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.parent.is_none())
            .map(Entity::id)
            .collect()
    }

    pub fn rename(&mut self, id: EntityId, name: impl Into<String>) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(id.index())
            .ok_or(SceneError::EntityNotFound(id))?;
        let new = name.into();
        let old = std::mem::replace(&mut entity.name, new.clone());
        self.event_log.push(WorldEvent::Renamed { id, old, new });
        Ok(())
    }

    /// Drop every entity and component. Previously issued ids become stale
    /// and may be reissued to new entities.
    pub fn reset(&mut self) {
        tracing::debug!(entities = self.entities.len(), "world reset");
        self.entities.clear();
        self.components.clear();
        self.active_camera = None;
        self.event_log.push(WorldEvent::Reset);
    }

    pub fn transform(&self, id: EntityId) -> Option<&TransformComponent> {
        self.get(id).map(|e| &e.transform)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut TransformComponent> {
        self.entities.get_mut(id.index()).map(|e| &mut e.transform)
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    pub fn attach_mesh(&mut self, id: EntityId, mesh: MeshComponent) -> Result<(), SceneError> {
        self.require(id)?;
        Ok(self.components.attach_mesh(id, mesh)?)
    }

    pub fn attach_camera(&mut self, id: EntityId, camera: CameraComponent) -> Result<(), SceneError> {
        self.require(id)?;
        Ok(self.components.attach_camera(id, camera)?)
    }

    pub fn attach_camera_controller(
        &mut self,
        id: EntityId,
        controller: CameraController,
    ) -> Result<(), SceneError> {
        self.require(id)?;
        Ok(self.components.attach_camera_controller(id, controller)?)
    }

    /// Entities with a mesh, ascending by id.
    pub fn mesh_entities(&self) -> Vec<EntityId> {
        self.components.entities_with(ComponentKind::Mesh)
    }

    /// Entities with a camera, ascending by id.
    pub fn camera_entities(&self) -> Vec<EntityId> {
        self.components.entities_with(ComponentKind::Camera)
    }

    pub fn set_active_camera(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.require(id)?;
        if !self.components.has(id, ComponentKind::Camera) {
            return Err(SceneError::NotACamera(id));
        }
        self.active_camera = Some(id);
        Ok(())
    }

    /// The explicitly selected camera, or else the camera entity with the highest id.
    pub fn active_camera(&self) -> Option<EntityId> {
        self.active_camera
            .filter(|id| self.components.has(*id, ComponentKind::Camera))
            .or_else(|| self.camera_entities().last().copied())
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    pub(crate) fn record(&mut self, event: WorldEvent) {
        self.event_log.push(event);
    }
}

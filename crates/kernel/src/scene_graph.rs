//! Hierarchy edits and world-space views of an entity.
//!
//! A world transform is `parent_world * local`, resolved by walking the
//! ancestor chain on every read. Setters on [`SceneGraphMut`] take a
//! world-space value and back-solve the local one.

use glam::{Mat4, Quat, Vec3};
use trellis_common::{Aabb, EntityId, Mat4Ext, MathError, QuatExt, Transform};

use crate::world::{Entity, World, WorldEvent};
use crate::{SceneError, TransformComponent};

impl World {
    /// Attach `child` under `parent`, appending it to the parent's children.
    ///
    /// A child that already has a parent is detached from it first. Fails if
    /// either entity is missing, if `parent == child`, or if `child` is an
    /// ancestor of `parent`.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), SceneError> {
        self.require(parent)?;
        let previous = self.require(child)?.parent;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(old) = previous {
            self.entities[old.index()].children.retain(|c| *c != child);
        }
        self.entities[child.index()].parent = Some(parent);
        self.entities[parent.index()].children.push(child);

        tracing::debug!(%parent, %child, "reparented");
        self.record(WorldEvent::Reparented {
            child,
            parent,
            previous,
        });
        Ok(())
    }

    /// Remove `child` from `parent`'s children. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<bool, SceneError> {
        self.require(parent)?;
        self.require(child)?;

        let children = &mut self.entities[parent.index()].children;
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return Ok(false);
        };
        children.remove(pos);
        self.entities[child.index()].parent = None;

        tracing::debug!(%parent, %child, "detached");
        self.record(WorldEvent::Detached { child, parent });
        Ok(true)
    }

    /// Detach `child` from whatever parent it has. Returns `false` for a root.
    pub fn detach(&mut self, child: EntityId) -> Result<bool, SceneError> {
        match self.require(child)?.parent {
            Some(parent) => self.remove_child(parent, child),
            None => Ok(false),
        }
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = self.get(id).and_then(Entity::parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.get(p).and_then(Entity::parent);
        }
        false
    }

    pub fn scene_graph(&self, id: EntityId) -> Option<SceneGraph<'_>> {
        self.contains(id).then_some(SceneGraph { world: self, id })
    }

    pub fn scene_graph_mut(&mut self, id: EntityId) -> Option<SceneGraphMut<'_>> {
        if self.contains(id) {
            Some(SceneGraphMut { world: self, id })
        } else {
            None
        }
    }
}

/// Read-only world-space view of one entity.
#[derive(Debug, Clone, Copy)]
pub struct SceneGraph<'w> {
    world: &'w World,
    id: EntityId,
}

impl<'w> SceneGraph<'w> {
    fn node(&self, id: EntityId) -> &'w Entity {
        &self.world.entities[id.index()]
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.node(self.id).parent
    }

    pub fn children(&self) -> &'w [EntityId] {
        &self.node(self.id).children
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// View of the parent, if any.
    pub fn parent_graph(&self) -> Option<SceneGraph<'w>> {
        self.parent().map(|id| SceneGraph { world: self.world, id })
    }

    pub fn local(&self) -> &'w TransformComponent {
        &self.node(self.id).transform
    }

    /// World matrix: the product of local matrices from the root down.
    pub fn matrix(&self) -> Mat4 {
        let mut node = self.node(self.id);
        let mut matrix = node.transform.local_matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent);
            matrix = node.transform.local_matrix() * matrix;
        }
        matrix
    }

    pub fn position(&self) -> Vec3 {
        self.matrix().extract_translation()
    }

    /// World rotation composed from local rotations, without matrix decomposition.
    pub fn rotation(&self) -> Quat {
        let mut node = self.node(self.id);
        let mut rotation = node.transform.local_rotation();
        while let Some(parent) = node.parent {
            node = self.node(parent);
            rotation = node.transform.local_rotation() * rotation;
        }
        rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.matrix().extract_scale()
    }

    pub fn euler_angles(&self) -> Vec3 {
        self.rotation().to_euler_xyz()
    }

    pub fn transform(&self) -> Transform {
        let matrix = self.matrix();
        Transform::new(matrix.extract_translation(), self.rotation(), matrix.extract_scale())
    }

    /// World-space bounds of this entity's mesh merged with those of all its
    /// descendants. Vanilla when the subtree has no meshes.
    pub fn world_merged_aabb(&self) -> Aabb {
        let components = self.world.components();
        let mut merged = Aabb::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            if let Some(mesh) = components.mesh(id) {
                let graph = SceneGraph { world: self.world, id };
                merged.merge(&mesh.local_aabb.transform_by_matrix(&graph.matrix()));
            }
            stack.extend(self.node(id).children.iter().copied());
        }
        merged
    }
}

/// World-space write view of one entity. Each setter computes the local
/// value that yields the requested world value under the current parent.
#[derive(Debug)]
pub struct SceneGraphMut<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl SceneGraphMut<'_> {
    pub fn as_graph(&self) -> SceneGraph<'_> {
        SceneGraph {
            world: &*self.world,
            id: self.id,
        }
    }

    fn local_mut(&mut self) -> &mut TransformComponent {
        &mut self.world.entities[self.id.index()].transform
    }

    fn parent_matrix(&self) -> Option<Mat4> {
        self.as_graph().parent_graph().map(|p| p.matrix())
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<(), MathError> {
        let local = match self.parent_matrix() {
            Some(parent) => parent.try_invert()?.transform_point3(position),
            None => position,
        };
        self.local_mut().set_local_position(local);
        Ok(())
    }

    /// Exact for parents whose rotation keeps the scale axes aligned.
    pub fn set_scale(&mut self, scale: Vec3) -> Result<(), MathError> {
        let local = match self.parent_matrix() {
            Some(parent) => parent.without_translation().try_invert()?.transform_point3(scale),
            None => scale,
        };
        self.local_mut().set_local_scale(local);
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Quat) -> Result<(), MathError> {
        let local = match self.as_graph().parent_graph() {
            Some(parent) => parent.rotation().inverted() * rotation,
            None => rotation,
        };
        self.local_mut().set_local_rotation(local);
        Ok(())
    }

    pub fn set_euler_angles(&mut self, angles: Vec3) -> Result<(), MathError> {
        self.set_rotation(Quat::from_euler_xyz(angles))
    }

    pub fn set_matrix(&mut self, matrix: &Mat4) -> Result<(), MathError> {
        let local = match self.parent_matrix() {
            Some(parent) => parent.try_invert()? * *matrix,
            None => *matrix,
        };
        self.local_mut().set_local_matrix(&local);
        Ok(())
    }

    pub fn set_transform(&mut self, transform: &Transform) -> Result<(), MathError> {
        self.set_matrix(&transform.matrix())
    }
}

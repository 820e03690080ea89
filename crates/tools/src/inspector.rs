use std::fmt;

use glam::Vec3;
use trellis_common::{EntityId, Transform};
use trellis_ecs::ComponentKind;
use trellis_kernel::World;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// command-line output.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let components = world.components();
        WorldSummary {
            entity_count: world.entity_count(),
            root_count: world.roots().len(),
            mesh_count: components.meshes().len(),
            camera_count: components.cameras().len(),
            controller_count: components.entities_with(ComponentKind::CameraController).len(),
            active_camera: world.active_camera(),
            pending_events: world.events().len(),
        }
    }

    /// Local and world placement of one entity.
    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        let entity = world.get(id)?;
        let graph = world.scene_graph(id)?;
        Some(EntityInfo {
            id,
            name: entity.name().to_owned(),
            parent: entity.parent(),
            children: entity.children().len(),
            components: world.components().kinds_of(id),
            local: *entity.transform().local_transform(),
            world: graph.transform(),
        })
    }

    /// List all entity IDs in the world.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().iter().map(|e| e.id()).collect()
    }

    /// Depth-first walk of every tree, roots in id order and children in
    /// attachment order.
    pub fn hierarchy(world: &World) -> Vec<HierarchyLine> {
        let mut lines = Vec::with_capacity(world.entity_count());
        let mut stack: Vec<(EntityId, usize)> = world.roots().into_iter().rev().map(|id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(entity) = world.get(id) else {
                continue;
            };
            lines.push(HierarchyLine {
                depth,
                id,
                name: entity.name().to_owned(),
                components: world.components().kinds_of(id),
            });
            stack.extend(entity.children().iter().rev().map(|c| (*c, depth + 1)));
        }
        lines
    }

    /// The hierarchy as indented text, one entity per line.
    pub fn format_hierarchy(world: &World) -> String {
        Self::hierarchy(world)
            .iter()
            .map(|line| format!("{line}\n"))
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub entity_count: usize,
    pub root_count: usize,
    pub mesh_count: usize,
    pub camera_count: usize,
    pub controller_count: usize,
    pub active_camera: Option<EntityId>,
    pub pending_events: usize,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: entities={} roots={} meshes={} cameras={} controllers={} active_camera={} pending_events={}",
            self.entity_count,
            self.root_count,
            self.mesh_count,
            self.camera_count,
            self.controller_count,
            self.active_camera.map_or_else(|| "none".to_owned(), |id| id.to_string()),
            self.pending_events
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub parent: Option<EntityId>,
    pub children: usize,
    pub components: Vec<ComponentKind>,
    pub local: Transform,
    pub world: Transform,
}

fn vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent.map_or_else(|| "-".to_owned(), |p| p.to_string());
        writeln!(
            f,
            "Entity {} \"{}\" parent={} children={} components={:?}",
            self.id, self.name, parent, self.children, self.components
        )?;
        writeln!(
            f,
            "  local: pos={} euler={} scale={}",
            vec3(self.local.position),
            vec3(self.local.euler_angles()),
            vec3(self.local.scale)
        )?;
        write!(
            f,
            "  world: pos={} euler={} scale={}",
            vec3(self.world.position),
            vec3(self.world.euler_angles()),
            vec3(self.world.scale)
        )
    }
}

/// One row of the hierarchy dump.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyLine {
    pub depth: usize,
    pub id: EntityId,
    pub name: String,
    pub components: Vec<ComponentKind>,
}

impl fmt::Display for HierarchyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", "  ".repeat(self.depth), self.id, self.name)?;
        if !self.components.is_empty() {
            write!(f, " {:?}", self.components)?;
        }
        Ok(())
    }
}

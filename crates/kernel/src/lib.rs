//! Scene kernel: the entity registry (`World`), per-entity transform
//! components and the scene graph that resolves world transforms.
//!
//! # Invariants
//! - Entity ids are allocated sequentially from 0 and index the registry.
//! - The hierarchy is acyclic; `add_child` rejects any edge that would close a loop.
//! - World transforms are recomputed from local transforms on every read.
//! - All structural mutations are recorded in the world's event log.

mod error;
pub mod scene_graph;
mod transform;
pub mod world;

pub use error::SceneError;
pub use scene_graph::{SceneGraph, SceneGraphMut};
pub use transform::TransformComponent;
pub use world::{Entity, World, WorldEvent};

pub fn crate_info() -> &'static str {
    "trellis-kernel v0.1.0"
}

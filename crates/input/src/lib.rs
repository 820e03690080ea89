//! Camera navigation: window-system agnostic input events driving the orbit
//! and walk controllers attached to camera entities.
//!
//! Controllers are systems over the world. Their state lives in the camera's
//! `CameraController` component. They move cameras through the scene graph's
//! world-space getters and setters, drive the orbit pivot through its local
//! transform, and `orbit::set_target` also writes the camera's local position
//! to back it off along the pivot's Z axis.
//!
//! # Invariants
//! - Pointer moves, wheel and per-frame movement only apply to the active camera.
//! - Orbit dolly stays within `min_dolly..=max_dolly`.

mod error;
mod event;
pub mod orbit;
pub mod walk;

pub use error::ControlError;
pub use event::{InputEvent, KeyCode, Modifiers};

use trellis_common::EntityId;
use trellis_ecs::{CameraController, ComponentKind};
use trellis_kernel::World;

pub(crate) fn is_active(world: &World, camera: EntityId) -> bool {
    world.active_camera() == Some(camera)
}

/// Route `event` to every camera controller in the world. Returns how many
/// controllers reacted.
pub fn dispatch(world: &mut World, event: &InputEvent) -> Result<usize, ControlError> {
    let mut reacted = 0;
    for camera in world.components().entities_with(ComponentKind::CameraController) {
        let handled = match world.components().camera_controller(camera).copied() {
            Some(CameraController::Orbit(_)) => orbit::handle_event(world, camera, event)?,
            Some(CameraController::Walk(_)) => walk::handle_event(world, camera, event)?,
            None => false,
        };
        if handled {
            reacted += 1;
        }
    }
    Ok(reacted)
}

/// Per-frame update for every walk controller. Returns how many cameras moved.
pub fn process(world: &mut World) -> Result<usize, ControlError> {
    let mut moved = 0;
    for camera in world.components().entities_with(ComponentKind::CameraController) {
        let is_walk = matches!(
            world.components().camera_controller(camera),
            Some(CameraController::Walk(_))
        );
        if is_walk && walk::process(world, camera)? {
            moved += 1;
        }
    }
    Ok(moved)
}

pub fn crate_info() -> &'static str {
    "trellis-input v0.1.0"
}

//! Walk camera controller: WASD/QE moves the camera in its own world
//! orientation, horizontal drag turns it about the Y axis.

use glam::Vec3;
use trellis_common::EntityId;
use trellis_ecs::{CameraController, ComponentKind, WalkSettings, WalkState};
use trellis_kernel::{SceneError, World};

use crate::{ControlError, InputEvent, is_active};

pub fn attach(world: &mut World, camera: EntityId, settings: WalkSettings) -> Result<(), ControlError> {
    world.get(camera).ok_or(SceneError::EntityNotFound(camera))?;
    if !world.components().has(camera, ComponentKind::Camera) {
        return Err(SceneError::NotACamera(camera).into());
    }
    world.attach_camera_controller(camera, CameraController::Walk(WalkState::new(settings)))?;
    tracing::debug!(%camera, "walk controller attached");
    Ok(())
}

fn state(world: &World, camera: EntityId) -> Result<WalkState, ControlError> {
    match world.components().camera_controller(camera) {
        Some(CameraController::Walk(state)) => Ok(*state),
        Some(_) => Err(ControlError::WrongController {
            entity: camera,
            expected: "walk",
        }),
        None => Err(ControlError::NoController(camera)),
    }
}

fn store(world: &mut World, camera: EntityId, state: WalkState) {
    if let Some(controller) = world.components_mut().camera_controller_mut(camera) {
        *controller = CameraController::Walk(state);
    }
}

/// Feed one input event. Returns whether the camera turned.
pub fn handle_event(world: &mut World, camera: EntityId, event: &InputEvent) -> Result<bool, ControlError> {
    let mut state = state(world, camera)?;
    let mut turned = false;

    match *event {
        InputEvent::KeyDown(key) => state.held = key.move_direction(),
        InputEvent::KeyUp(_) => state.held = None,
        InputEvent::PointerDown { x, .. } => {
            state.pointer_down = true;
            state.pointer_x = x;
        }
        InputEvent::PointerMove { x, .. } if state.pointer_down && is_active(world, camera) => {
            state.yaw -= (x - state.pointer_x) * state.settings.rotation_ratio;
            state.pointer_x = x;
            if let Some(mut graph) = world.scene_graph_mut(camera) {
                graph.set_euler_angles(Vec3::new(0.0, state.yaw, 0.0))?;
            }
            turned = true;
        }
        InputEvent::PointerUp => state.pointer_down = false,
        _ => {}
    }

    store(world, camera, state);
    Ok(turned)
}

/// Advance one frame: step along the held direction. Returns whether the camera moved.
pub fn process(world: &mut World, camera: EntityId) -> Result<bool, ControlError> {
    let state = state(world, camera)?;
    let Some(direction) = state.held else {
        return Ok(false);
    };
    if !is_active(world, camera) {
        return Ok(false);
    }
    let Some(graph) = world.scene_graph(camera) else {
        return Err(SceneError::EntityNotFound(camera).into());
    };
    let step = graph.rotation() * direction.local_vector() * state.settings.speed;
    let target = graph.position() + step;

    if let Some(mut graph) = world.scene_graph_mut(camera) {
        graph.set_position(target)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyCode, Modifiers};
    use glam::Quat;
    use trellis_common::ApproxEq;
    use trellis_ecs::CameraComponent;

    fn walk_world() -> (World, EntityId) {
        let mut world = World::new();
        let camera = world.create();
        world.attach_camera(camera, CameraComponent::default()).unwrap();
        attach(&mut world, camera, WalkSettings::default()).unwrap();
        (world, camera)
    }

    fn turn(world: &mut World, camera: EntityId, dx: f32) {
        handle_event(world, camera, &InputEvent::PointerDown { x: 0.0, y: 0.0 }).unwrap();
        let turned = handle_event(
            world,
            camera,
            &InputEvent::PointerMove {
                x: dx,
                y: 0.0,
                modifiers: Modifiers::NONE,
            },
        )
        .unwrap();
        assert!(turned);
        handle_event(world, camera, &InputEvent::PointerUp).unwrap();
    }

    #[test]
    fn held_key_moves_each_frame() {
        let (mut world, camera) = walk_world();
        handle_event(&mut world, camera, &InputEvent::KeyDown(KeyCode::W)).unwrap();
        assert!(process(&mut world, camera).unwrap());
        assert!(process(&mut world, camera).unwrap());

        let pos = world.scene_graph(camera).unwrap().position();
        assert!(pos.approx_eq(&Vec3::new(0.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn key_up_stops_movement() {
        let (mut world, camera) = walk_world();
        handle_event(&mut world, camera, &InputEvent::KeyDown(KeyCode::E)).unwrap();
        handle_event(&mut world, camera, &InputEvent::KeyUp(KeyCode::E)).unwrap();
        assert!(!process(&mut world, camera).unwrap());
        assert_eq!(world.scene_graph(camera).unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn unbound_key_does_not_move() {
        let (mut world, camera) = walk_world();
        handle_event(&mut world, camera, &InputEvent::KeyDown(KeyCode::Other)).unwrap();
        assert!(!process(&mut world, camera).unwrap());
    }

    #[test]
    fn drag_turns_about_y() {
        let (mut world, camera) = walk_world();
        turn(&mut world, camera, 100.0);

        let expected = Quat::from_rotation_y(-0.5);
        assert!(world.scene_graph(camera).unwrap().rotation().approx_eq(&expected, 1e-5));
    }

    #[test]
    fn forward_follows_camera_rotation() {
        let (mut world, camera) = walk_world();
        turn(&mut world, camera, 100.0);
        handle_event(&mut world, camera, &InputEvent::KeyDown(KeyCode::W)).unwrap();
        process(&mut world, camera).unwrap();

        let expected = Quat::from_rotation_y(-0.5) * Vec3::NEG_Z;
        assert!(world.scene_graph(camera).unwrap().position().approx_eq(&expected, 1e-5));
    }

    #[test]
    fn world_space_movement_under_parent() {
        let (mut world, camera) = walk_world();
        let rig = world.create();
        world.transform_mut(rig).unwrap().set_local_position(Vec3::new(5.0, 0.0, 0.0));
        world.add_child(rig, camera).unwrap();

        handle_event(&mut world, camera, &InputEvent::KeyDown(KeyCode::D)).unwrap();
        process(&mut world, camera).unwrap();

        let pos = world.scene_graph(camera).unwrap().position();
        assert!(pos.approx_eq(&Vec3::new(6.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn inactive_camera_does_not_move() {
        let (mut world, camera) = walk_world();
        let other = world.create();
        world.attach_camera(other, CameraComponent::default()).unwrap();

        handle_event(&mut world, camera, &InputEvent::KeyDown(KeyCode::W)).unwrap();
        assert!(!process(&mut world, camera).unwrap());
    }

    #[test]
    fn orbit_camera_is_not_a_walk_camera() {
        let mut world = World::new();
        let camera = world.create();
        world.attach_camera(camera, CameraComponent::default()).unwrap();
        crate::orbit::attach(&mut world, camera, Default::default()).unwrap();
        assert_eq!(
            process(&mut world, camera),
            Err(ControlError::WrongController {
                entity: camera,
                expected: "walk"
            })
        );
    }
}

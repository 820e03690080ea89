//! Orbit camera controller.
//!
//! Attaching inserts a pivot entity above the camera. Dragging rotates the
//! pivot, shift-drag pans it, alt-drag and the wheel scale it (dolly). The
//! camera's own local transform only changes in [`set_target`].

use glam::{Quat, Vec2, Vec3};
use trellis_common::{Aabb, EntityId};
use trellis_ecs::{CameraController, ComponentError, ComponentKind, OrbitSettings, OrbitState};
use trellis_kernel::{SceneError, World};

use crate::{ControlError, InputEvent, is_active};

/// Attach an orbit controller to `camera`. Returns the new pivot entity.
pub fn attach(world: &mut World, camera: EntityId, settings: OrbitSettings) -> Result<EntityId, ControlError> {
    let components = world.components();
    if !components.has(camera, ComponentKind::Camera) {
        world.get(camera).ok_or(SceneError::EntityNotFound(camera))?;
        return Err(SceneError::NotACamera(camera).into());
    }
    if components.has(camera, ComponentKind::CameraController) {
        let err = ComponentError::AlreadyAttached {
            entity: camera,
            kind: ComponentKind::CameraController,
        };
        return Err(SceneError::from(err).into());
    }

    let name = world.get(camera).map(|e| e.name().to_owned()).unwrap_or_default();
    let pivot = world.create_named(format!("{name}_orbit_pivot"));
    world.add_child(pivot, camera)?;
    world.attach_camera_controller(camera, CameraController::Orbit(OrbitState::new(pivot, settings)))?;
    tracing::debug!(%camera, %pivot, "orbit controller attached");
    Ok(pivot)
}

fn state(world: &World, camera: EntityId) -> Result<OrbitState, ControlError> {
    match world.components().camera_controller(camera) {
        Some(CameraController::Orbit(state)) => Ok(*state),
        Some(_) => Err(ControlError::WrongController {
            entity: camera,
            expected: "orbit",
        }),
        None => Err(ControlError::NoController(camera)),
    }
}

fn store(world: &mut World, camera: EntityId, state: OrbitState) {
    if let Some(controller) = world.components_mut().camera_controller_mut(camera) {
        *controller = CameraController::Orbit(state);
    }
}

/// Feed one input event. Returns whether the pivot moved.
///
/// Moves and wheel events are ignored unless `camera` is the active camera.
pub fn handle_event(world: &mut World, camera: EntityId, event: &InputEvent) -> Result<bool, ControlError> {
    let mut state = state(world, camera)?;
    let active = is_active(world, camera);
    let settings = state.settings;

    let moved = match *event {
        InputEvent::PointerDown { x, y } => {
            state.pointer_down = true;
            state.pointer = Vec2::new(x, y);
            false
        }
        InputEvent::PointerMove { x, y, modifiers } if active && state.pointer_down => {
            let dx = x - state.pointer.x;
            let dy = -(y - state.pointer.y);
            if modifiers.shift {
                let distance = pivot_distance(world, camera, state.pivot);
                state.pan = -Vec2::new(dx, dy) * settings.translation_ratio * distance;
            } else if modifiers.alt {
                dolly(&mut state, dx * settings.dolly_ratio);
            } else {
                state.yaw -= dx * settings.rotation_ratio;
                state.pitch += dy * settings.rotation_ratio;
            }
            apply(world, &mut state);
            state.pointer = Vec2::new(x, y);
            true
        }
        InputEvent::PointerUp => {
            state.pointer_down = false;
            state.pan = Vec2::ZERO;
            false
        }
        InputEvent::Wheel { delta_y } if active => {
            dolly(&mut state, delta_y * settings.wheel_ratio);
            apply(world, &mut state);
            true
        }
        _ => false,
    };

    store(world, camera, state);
    Ok(moved)
}

fn pivot_distance(world: &World, camera: EntityId, pivot: EntityId) -> f32 {
    match (world.scene_graph(camera), world.scene_graph(pivot)) {
        (Some(cam), Some(piv)) => cam.position().distance(piv.position()),
        _ => 0.0,
    }
}

fn dolly(state: &mut OrbitState, amount: f32) {
    state.dolly = (state.dolly - amount).clamp(state.settings.min_dolly, state.settings.max_dolly);
}

/// Write dolly, rotation and any pending pan into the pivot's local transform.
fn apply(world: &mut World, state: &mut OrbitState) {
    let Some(pivot) = world.transform_mut(state.pivot) else {
        tracing::warn!(pivot = %state.pivot, "orbit pivot missing");
        return;
    };
    let rotation = Quat::from_rotation_y(state.yaw) * Quat::from_rotation_x(state.pitch);
    pivot.set_local_scale(Vec3::splat(state.dolly));
    pivot.set_local_rotation(rotation);
    let pan = rotation * Vec3::new(state.pan.x, state.pan.y, 0.0);
    pivot.set_local_position(pivot.local_position() + pan);
    state.pan = Vec2::ZERO;
}

/// Centre the pivot on the merged world bounds of `targets` and back the
/// camera off far enough to keep them all in view.
///
/// Does nothing when none of the targets carries geometry.
pub fn set_target(world: &mut World, camera: EntityId, targets: &[EntityId]) -> Result<(), ControlError> {
    let state = state(world, camera)?;

    let mut bounds = Aabb::new();
    for &target in targets {
        let graph = world.scene_graph(target).ok_or(SceneError::EntityNotFound(target))?;
        bounds.merge(&graph.world_merged_aabb());
    }
    if bounds.is_vanilla() {
        tracing::debug!(%camera, "orbit targets have no geometry");
        return Ok(());
    }

    let fovy = world
        .components()
        .camera(camera)
        .map(|c| c.fovy)
        .ok_or(SceneError::NotACamera(camera))?;
    let distance = bounds.fit_distance(fovy);

    if let Some(mut pivot) = world.scene_graph_mut(state.pivot) {
        pivot.set_position(bounds.center())?;
    }
    if let Some(transform) = world.transform_mut(camera) {
        transform.set_local_position(Vec3::new(0.0, 0.0, distance));
    }
    tracing::debug!(%camera, distance, "orbit target set");
    Ok(())
}

/// Return the pivot to the origin with no rotation. Dolly is kept.
pub fn reset(world: &mut World, camera: EntityId) -> Result<(), ControlError> {
    let mut state = state(world, camera)?;
    state.yaw = 0.0;
    state.pitch = 0.0;
    state.pan = Vec2::ZERO;
    if let Some(pivot) = world.transform_mut(state.pivot) {
        pivot.set_local_position(Vec3::ZERO);
        pivot.set_local_rotation(Quat::IDENTITY);
    }
    store(world, camera, state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Modifiers;
    use trellis_common::ApproxEq;
    use trellis_ecs::{CameraComponent, MeshComponent, MeshHandle};

    fn orbit_world() -> (World, EntityId, EntityId) {
        let mut world = World::new();
        let camera = world.create_named("Camera");
        world.attach_camera(camera, CameraComponent::default()).unwrap();
        world
            .transform_mut(camera)
            .unwrap()
            .set_local_position(Vec3::new(0.0, 0.0, 10.0));
        let pivot = attach(&mut world, camera, OrbitSettings::default()).unwrap();
        (world, camera, pivot)
    }

    fn drag(world: &mut World, camera: EntityId, to: Vec2, modifiers: Modifiers) {
        handle_event(world, camera, &InputEvent::PointerDown { x: 0.0, y: 0.0 }).unwrap();
        let moved = handle_event(
            world,
            camera,
            &InputEvent::PointerMove {
                x: to.x,
                y: to.y,
                modifiers,
            },
        )
        .unwrap();
        assert!(moved);
        handle_event(world, camera, &InputEvent::PointerUp).unwrap();
    }

    #[test]
    fn attach_inserts_pivot_parent() {
        let (world, camera, pivot) = orbit_world();
        assert_eq!(world.get(camera).unwrap().parent(), Some(pivot));
        assert_eq!(world.get(pivot).unwrap().name(), "Camera_orbit_pivot");
        assert!(matches!(
            world.components().camera_controller(camera),
            Some(CameraController::Orbit(s)) if s.pivot == pivot
        ));
    }

    #[test]
    fn attach_requires_camera() {
        let mut world = World::new();
        let plain = world.create();
        assert_eq!(
            attach(&mut world, plain, OrbitSettings::default()),
            Err(ControlError::Scene(SceneError::NotACamera(plain)))
        );
        assert_eq!(
            attach(&mut world, EntityId(7), OrbitSettings::default()),
            Err(ControlError::Scene(SceneError::EntityNotFound(EntityId(7))))
        );
    }

    #[test]
    fn attach_twice_is_rejected() {
        let (mut world, camera, _) = orbit_world();
        let count = world.entity_count();
        assert!(matches!(
            attach(&mut world, camera, OrbitSettings::default()),
            Err(ControlError::Scene(SceneError::Component(_)))
        ));
        assert_eq!(world.entity_count(), count);
    }

    #[test]
    fn drag_rotates_pivot_not_camera() {
        let (mut world, camera, pivot) = orbit_world();
        drag(&mut world, camera, Vec2::new(100.0, 0.0), Modifiers::NONE);

        let rotation = world.transform(pivot).unwrap().local_rotation();
        assert!(rotation.approx_eq(&Quat::from_rotation_y(-1.0), 1e-5));
        assert_eq!(world.transform(camera).unwrap().local_position(), Vec3::new(0.0, 0.0, 10.0));

        let expected = Quat::from_rotation_y(-1.0) * Vec3::new(0.0, 0.0, 10.0);
        assert!(world.scene_graph(camera).unwrap().position().approx_eq(&expected, 1e-4));
    }

    #[test]
    fn vertical_drag_pitches() {
        let (mut world, camera, pivot) = orbit_world();
        // Pointer y grows downwards; dragging up pitches positively.
        drag(&mut world, camera, Vec2::new(0.0, -50.0), Modifiers::NONE);
        let rotation = world.transform(pivot).unwrap().local_rotation();
        assert!(rotation.approx_eq(&Quat::from_rotation_x(0.5), 1e-5));
    }

    #[test]
    fn shift_drag_pans_relative_to_distance() {
        let (mut world, camera, pivot) = orbit_world();
        drag(&mut world, camera, Vec2::new(10.0, 0.0), Modifiers::SHIFT);

        // 10 px * 0.001 * distance 10, opposite to the drag.
        let position = world.transform(pivot).unwrap().local_position();
        assert!(position.approx_eq(&Vec3::new(-0.1, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn alt_drag_dollies() {
        let (mut world, camera, pivot) = orbit_world();
        drag(&mut world, camera, Vec2::new(50.0, 0.0), Modifiers::ALT);
        let scale = world.transform(pivot).unwrap().local_scale();
        assert!(scale.approx_eq(&Vec3::splat(0.5), 1e-5));
    }

    #[test]
    fn wheel_dolly_is_clamped() {
        let (mut world, camera, pivot) = orbit_world();
        handle_event(&mut world, camera, &InputEvent::Wheel { delta_y: 1.0e5 }).unwrap();
        assert_eq!(world.transform(pivot).unwrap().local_scale(), Vec3::splat(0.01));

        handle_event(&mut world, camera, &InputEvent::Wheel { delta_y: -1.0e6 }).unwrap();
        assert_eq!(world.transform(pivot).unwrap().local_scale(), Vec3::splat(10.0));
    }

    #[test]
    fn inactive_camera_ignores_moves() {
        let (mut world, camera, pivot) = orbit_world();
        let other = world.create();
        world.attach_camera(other, CameraComponent::default()).unwrap();
        assert_eq!(world.active_camera(), Some(other));

        handle_event(&mut world, camera, &InputEvent::PointerDown { x: 0.0, y: 0.0 }).unwrap();
        let moved = handle_event(
            &mut world,
            camera,
            &InputEvent::PointerMove {
                x: 100.0,
                y: 0.0,
                modifiers: Modifiers::NONE,
            },
        )
        .unwrap();
        assert!(!moved);
        assert!(!handle_event(&mut world, camera, &InputEvent::Wheel { delta_y: 10.0 }).unwrap());
        assert_eq!(world.transform(pivot).unwrap().local_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn set_target_frames_merged_bounds() {
        let (mut world, camera, pivot) = orbit_world();
        let target = world.create();
        world
            .attach_mesh(
                target,
                MeshComponent {
                    mesh: MeshHandle(0),
                    local_aabb: Aabb::from_points([Vec3::ZERO, Vec3::ONE]),
                },
            )
            .unwrap();
        world
            .transform_mut(target)
            .unwrap()
            .set_local_position(Vec3::new(10.0, 0.0, 0.0));

        set_target(&mut world, camera, &[target]).unwrap();

        let center = world.scene_graph(pivot).unwrap().position();
        assert!(center.approx_eq(&Vec3::new(10.5, 0.5, 0.5), 1e-4));
        let fovy = CameraComponent::default().fovy;
        let expected = 3.0_f32.sqrt() / (fovy / 2.0).sin();
        let local = world.transform(camera).unwrap().local_position();
        assert!(local.approx_eq(&Vec3::new(0.0, 0.0, expected), 1e-4));
        let eye = world.scene_graph(camera).unwrap().position();
        assert!(eye.approx_eq(&(center + Vec3::new(0.0, 0.0, expected)), 1e-3));
    }

    #[test]
    fn set_target_without_geometry_is_noop() {
        let (mut world, camera, pivot) = orbit_world();
        let empty = world.create();
        set_target(&mut world, camera, &[empty]).unwrap();
        assert_eq!(world.transform(pivot).unwrap().local_position(), Vec3::ZERO);
    }

    #[test]
    fn reset_clears_rotation_and_position() {
        let (mut world, camera, pivot) = orbit_world();
        drag(&mut world, camera, Vec2::new(100.0, 30.0), Modifiers::NONE);
        drag(&mut world, camera, Vec2::new(10.0, 0.0), Modifiers::SHIFT);
        reset(&mut world, camera).unwrap();

        let t = world.transform(pivot).unwrap();
        assert_eq!(t.local_position(), Vec3::ZERO);
        assert_eq!(t.local_rotation(), Quat::IDENTITY);
        assert!(matches!(
            world.components().camera_controller(camera),
            Some(CameraController::Orbit(s)) if s.yaw == 0.0 && s.pitch == 0.0
        ));
    }

    #[test]
    fn missing_controller_is_an_error() {
        let mut world = World::new();
        let camera = world.create();
        assert_eq!(
            handle_event(&mut world, camera, &InputEvent::PointerUp),
            Err(ControlError::NoController(camera))
        );
    }
}

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use trellis_common::EntityId;

/// Tuning for the orbit controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSettings {
    /// Pan distance per pixel, relative to the distance to the pivot.
    pub translation_ratio: f32,
    /// Radians per pixel of drag.
    pub rotation_ratio: f32,
    /// Dolly change per pixel of alt-drag.
    pub dolly_ratio: f32,
    /// Dolly change per wheel unit.
    pub wheel_ratio: f32,
    pub min_dolly: f32,
    pub max_dolly: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            translation_ratio: 0.001,
            rotation_ratio: 0.01,
            dolly_ratio: 0.01,
            wheel_ratio: 0.001,
            min_dolly: 0.01,
            max_dolly: 10.0,
        }
    }
}

/// Orbit controller state. The camera is parented under `pivot`; rotating,
/// panning and dollying move the pivot, never the camera's local transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitState {
    pub pivot: EntityId,
    pub settings: OrbitSettings,
    pub pointer_down: bool,
    pub pointer: Vec2,
    /// Pending pan for the current drag step, in pivot-local units.
    pub pan: Vec2,
    /// Rotation about the Y axis.
    pub yaw: f32,
    /// Rotation about the X axis.
    pub pitch: f32,
    /// Uniform scale applied to the pivot; smaller brings the camera closer.
    pub dolly: f32,
}

impl OrbitState {
    pub fn new(pivot: EntityId, settings: OrbitSettings) -> Self {
        Self {
            pivot,
            settings,
            pointer_down: false,
            pointer: Vec2::ZERO,
            pan: Vec2::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            dolly: 1.0,
        }
    }
}

/// Tuning for the walk controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkSettings {
    /// Radians of yaw per pixel of horizontal drag.
    pub rotation_ratio: f32,
    /// World units moved per processed frame while a movement key is held.
    pub speed: f32,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            rotation_ratio: 0.005,
            speed: 1.0,
        }
    }
}

/// Movement requested by a held key, in camera-local terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Down,
    Up,
}

impl MoveDirection {
    /// Unit step in the camera's local frame (the camera looks down -Z).
    pub fn local_vector(self) -> Vec3 {
        match self {
            MoveDirection::Forward => Vec3::NEG_Z,
            MoveDirection::Backward => Vec3::Z,
            MoveDirection::Left => Vec3::NEG_X,
            MoveDirection::Right => Vec3::X,
            MoveDirection::Down => Vec3::NEG_Y,
            MoveDirection::Up => Vec3::Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkState {
    pub settings: WalkSettings,
    pub pointer_down: bool,
    pub pointer_x: f32,
    pub yaw: f32,
    pub held: Option<MoveDirection>,
}

impl WalkState {
    pub fn new(settings: WalkSettings) -> Self {
        Self {
            settings,
            pointer_down: false,
            pointer_x: 0.0,
            yaw: 0.0,
            held: None,
        }
    }
}

/// Navigation behaviour attached to a camera entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraController {
    Orbit(OrbitState),
    Walk(WalkState),
}

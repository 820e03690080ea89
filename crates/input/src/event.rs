use serde::{Deserialize, Serialize};
use trellis_ecs::MoveDirection;

/// Modifier keys held during a pointer move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
    };
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        alt: true,
    };
}

/// Physical keys the controllers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    Other,
}

impl KeyCode {
    /// Walk movement bound to this key, if any.
    pub fn move_direction(self) -> Option<MoveDirection> {
        match self {
            KeyCode::W => Some(MoveDirection::Forward),
            KeyCode::S => Some(MoveDirection::Backward),
            KeyCode::A => Some(MoveDirection::Left),
            KeyCode::D => Some(MoveDirection::Right),
            KeyCode::Q => Some(MoveDirection::Down),
            KeyCode::E => Some(MoveDirection::Up),
            KeyCode::Other => None,
        }
    }
}

/// Window-system agnostic input. Pointer coordinates are in pixels with y
/// growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32, modifiers: Modifiers },
    PointerUp,
    Wheel { delta_y: f32 },
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_qe_map_to_directions() {
        assert_eq!(KeyCode::W.move_direction(), Some(MoveDirection::Forward));
        assert_eq!(KeyCode::S.move_direction(), Some(MoveDirection::Backward));
        assert_eq!(KeyCode::A.move_direction(), Some(MoveDirection::Left));
        assert_eq!(KeyCode::D.move_direction(), Some(MoveDirection::Right));
        assert_eq!(KeyCode::Q.move_direction(), Some(MoveDirection::Down));
        assert_eq!(KeyCode::E.move_direction(), Some(MoveDirection::Up));
        assert_eq!(KeyCode::Other.move_direction(), None);
    }

    #[test]
    fn modifiers_default_to_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}

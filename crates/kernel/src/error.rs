use trellis_common::{EntityId, MathError};
use trellis_ecs::ComponentError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: EntityId, child: EntityId },

    #[error("entity {0} has no camera component")]
    NotACamera(EntityId),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Math(#[from] MathError),
}

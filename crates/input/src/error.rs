use trellis_common::{EntityId, MathError};
use trellis_kernel::SceneError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("entity {0} has no camera controller")]
    NoController(EntityId),

    #[error("entity {entity} is not driven by a {expected} controller")]
    WrongController {
        entity: EntityId,
        expected: &'static str,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Math(#[from] MathError),
}

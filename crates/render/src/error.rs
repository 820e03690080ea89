use trellis_common::{EntityId, MathError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("viewport {width}x{height} has no area")]
    EmptyViewport { width: u32, height: u32 },

    #[error("camera {entity} has a degenerate placement")]
    CameraPlacement {
        entity: EntityId,
        #[source]
        source: MathError,
    },
}

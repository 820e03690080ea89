//! Rendering adapter: turns world state into backend-neutral frames.
//!
//! # Invariants
//! - Renderers never mutate the world; a missing camera is substituted, not created.
//! - Draw commands carry world matrices as 16 column-major floats.

mod error;
mod frame;
mod renderer;

pub use error::RenderError;
pub use frame::{DrawCommand, Frame, FrameCamera, RenderView, prepare_frame};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "trellis-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}

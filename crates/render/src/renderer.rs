use std::fmt::Write;

use trellis_kernel::World;

use crate::{RenderError, RenderView, prepare_frame};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view configuration, then produces
/// output. It never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and view.
    fn render(&self, world: &World, view: &RenderView) -> Result<Self::Output, RenderError>;
}

/// Produces a human-readable listing of one prepared frame. Useful for CLI
/// output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &RenderView) -> Result<String, RenderError> {
        let frame = prepare_frame(world, view)?;
        let mut out = String::new();

        let _ = writeln!(out, "=== Frame ({}x{}) ===", view.width, view.height);
        let eye = frame.camera.eye;
        match frame.camera.entity {
            Some(id) => {
                let name = world.get(id).map(|e| e.name()).unwrap_or("?");
                let _ = writeln!(
                    out,
                    "Camera: {id} \"{name}\" eye=({:.2}, {:.2}, {:.2})",
                    eye.x, eye.y, eye.z
                );
            }
            None => {
                let _ = writeln!(out, "Camera: fallback at origin");
            }
        }
        let _ = writeln!(out, "Draws: {}", frame.draws.len());

        for draw in &frame.draws {
            let p = draw.position();
            let name = world.get(draw.entity).map(|e| e.name()).unwrap_or("?");
            let _ = writeln!(
                out,
                "  {} \"{}\" mesh={} pos=({:.2}, {:.2}, {:.2})",
                draw.entity, name, draw.mesh.0, p.x, p.y, p.z
            );
        }

        Ok(out)
    }
}

//! Asset pipeline: mesh geometry, a content-addressed registry and glTF import.
//!
//! Assets are identified by content-addressed hashes. Entities reference
//! meshes by handle, never by raw file paths.

mod geometry;
pub mod gltf;
mod store;

pub use geometry::{Mesh, Primitive, PrimitiveMode};
pub use gltf::{ImportReport, import_gltf, import_gltf_str};
pub use store::{AssetId, AssetStore};

use trellis_kernel::SceneError;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("unknown camera type {0:?}")]
    UnknownCameraType(String),
    #[error("{what} index {index} is out of range")]
    InvalidIndex { what: &'static str, index: usize },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

pub fn crate_info() -> &'static str {
    "trellis-assets v0.1.0"
}

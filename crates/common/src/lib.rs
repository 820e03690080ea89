//! Shared types for the trellis scene graph: math extensions over glam,
//! the TRS `Transform`, axis-aligned bounding boxes and entity ids.
//!
//! # Invariants
//! - Every math operation returns a new value; only `Aabb` accumulates in place.
//! - Matrices are column-major and multiply column vectors (`a * b` applies `b` first).

mod aabb;
mod error;
pub mod math;
mod types;

pub use aabb::Aabb;
pub use error::MathError;
pub use math::{ApproxEq, DEFAULT_EPSILON, Mat4Ext, QuatExt};
pub use types::{EntityId, Transform};

pub fn crate_info() -> &'static str {
    "trellis-common v0.1.0"
}

//! Developer tooling: read-only world inspection.
//!
//! # Invariants
//! - Tools never mutate the world.

pub mod inspector;

pub use inspector::{EntityInfo, HierarchyLine, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "trellis-tools v0.1.0"
}

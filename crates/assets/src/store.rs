use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use trellis_ecs::{MeshComponent, MeshHandle};

use crate::Mesh;

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn handle(self) -> MeshHandle {
        MeshHandle(self.0)
    }
}

/// Content-addressed mesh registry. Registering identical geometry twice
/// yields the same id and a single entry.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    meshes: BTreeMap<AssetId, Mesh>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh and return its asset ID.
    pub fn register_mesh(&mut self, mesh: Mesh) -> AssetId {
        let id = content_hash(&mesh);
        tracing::debug!(id = id.0, name = %mesh.name, "mesh registered");
        self.meshes.entry(id).or_insert(mesh);
        id
    }

    /// Register the unit cube.
    pub fn register_default_cube(&mut self) -> AssetId {
        self.register_mesh(Mesh::unit_cube())
    }

    pub fn mesh(&self, id: AssetId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    /// Look a mesh up by the handle stored in a mesh component.
    pub fn mesh_by_handle(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.mesh(AssetId(handle.0))
    }

    /// Component referencing a registered mesh, carrying its local bounds.
    pub fn mesh_component(&self, id: AssetId) -> Option<MeshComponent> {
        self.mesh(id).map(|mesh| MeshComponent {
            mesh: id.handle(),
            local_aabb: mesh.local_aabb(),
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = (AssetId, &Mesh)> {
        self.meshes.iter().map(|(id, mesh)| (*id, mesh))
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

fn content_hash(mesh: &Mesh) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(mesh.name.as_bytes());
    for primitive in mesh.primitives() {
        hasher.update(primitive.mode.as_gltf().to_le_bytes());
        hasher.update(primitive.vertex_count.to_le_bytes());
        hasher.update(primitive.index_count.to_le_bytes());
        let bounds = primitive.local_aabb;
        for v in bounds.min().to_array().into_iter().chain(bounds.max().to_array()) {
            hasher.update(v.to_le_bytes());
        }
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}

//! glTF 2.0 JSON import: node hierarchy, local transforms, mesh bounds and cameras.
//!
//! Binary buffers are not read; primitive bounds come from the POSITION
//! accessor's `min`/`max`. The whole document is validated before the world
//! is touched.

use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use trellis_common::{Aabb, EntityId};
use trellis_ecs::{CameraComponent, CameraType};
use trellis_kernel::World;

use crate::{AssetError, AssetId, AssetStore, Mesh, Primitive, PrimitiveMode};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    accessors: Vec<Accessor>,
    #[serde(default)]
    cameras: Vec<Camera>,
}

#[derive(Debug, Default, Deserialize)]
struct Scene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct Node {
    name: Option<String>,
    #[serde(default)]
    children: Vec<usize>,
    matrix: Option<[f32; 16]>,
    translation: Option<[f32; 3]>,
    rotation: Option<[f32; 4]>,
    scale: Option<[f32; 3]>,
    mesh: Option<usize>,
    camera: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GltfMesh {
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<GltfPrimitive>,
}

#[derive(Debug, Deserialize)]
struct GltfPrimitive {
    #[serde(default)]
    attributes: BTreeMap<String, usize>,
    indices: Option<usize>,
    mode: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Accessor {
    count: u32,
    min: Option<Vec<f32>>,
    max: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct Camera {
    #[serde(rename = "type")]
    kind: String,
    perspective: Option<Perspective>,
    orthographic: Option<Orthographic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Perspective {
    aspect_ratio: Option<f32>,
    yfov: f32,
    zfar: Option<f32>,
    znear: f32,
}

#[derive(Debug, Deserialize)]
struct Orthographic {
    xmag: f32,
    ymag: f32,
    zfar: f32,
    znear: f32,
}

/// What an import added to the world.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Entity created for each glTF node, by node index.
    pub nodes: Vec<EntityId>,
    /// Entities of the nodes listed by the default scene (or every parentless node).
    pub roots: Vec<EntityId>,
    /// Registered mesh for each glTF mesh, by mesh index.
    pub meshes: Vec<AssetId>,
}

/// Read a `.gltf` file and add its node hierarchy to `world`.
pub fn import_gltf(
    path: impl AsRef<Path>,
    world: &mut World,
    store: &mut AssetStore,
) -> Result<ImportReport, AssetError> {
    let path = path.as_ref();
    let _span = tracing::info_span!("import_gltf", path = %path.display()).entered();
    let text = std::fs::read_to_string(path)?;
    import_gltf_str(&text, world, store)
}

/// Import a glTF JSON document held in memory.
pub fn import_gltf_str(text: &str, world: &mut World, store: &mut AssetStore) -> Result<ImportReport, AssetError> {
    let doc: Document = serde_json::from_str(text)?;

    let meshes = doc
        .meshes
        .iter()
        .enumerate()
        .map(|(i, mesh)| build_mesh(i, mesh, &doc.accessors))
        .collect::<Result<Vec<_>, _>>()?;
    let cameras = doc
        .cameras
        .iter()
        .enumerate()
        .map(|(i, camera)| build_camera(i, camera))
        .collect::<Result<Vec<_>, _>>()?;
    let parents = validate_nodes(&doc, meshes.len(), cameras.len())?;
    let root_nodes = root_nodes(&doc, &parents)?;

    let mesh_ids: Vec<AssetId> = meshes.into_iter().map(|m| store.register_mesh(m)).collect();

    let mut nodes = Vec::with_capacity(doc.nodes.len());
    for (i, node) in doc.nodes.iter().enumerate() {
        let id = match &node.name {
            Some(name) => world.create_named(name.clone()),
            None => world.create(),
        };
        if let Some(transform) = world.transform_mut(id) {
            match node.matrix {
                Some(m) => transform.set_local_matrix(&Mat4::from_cols_array(&m)),
                None => {
                    if let Some(t) = node.translation {
                        transform.set_local_position(Vec3::from_array(t));
                    }
                    if let Some(r) = node.rotation {
                        transform.set_local_rotation(Quat::from_array(r));
                    }
                    if let Some(s) = node.scale {
                        transform.set_local_scale(Vec3::from_array(s));
                    }
                }
            }
        }
        if let Some(component) = node.mesh.and_then(|m| store.mesh_component(mesh_ids[m])) {
            world.attach_mesh(id, component)?;
        }
        if let Some(c) = node.camera {
            world.attach_camera(id, cameras[c])?;
        }
        tracing::debug!(node = i, entity = %id, "node imported");
        nodes.push(id);
    }

    for (i, node) in doc.nodes.iter().enumerate() {
        for &child in &node.children {
            world.add_child(nodes[i], nodes[child])?;
        }
    }

    let roots = root_nodes.into_iter().map(|n| nodes[n]).collect();
    tracing::info!(nodes = nodes.len(), meshes = mesh_ids.len(), "glTF imported");
    Ok(ImportReport {
        nodes,
        roots,
        meshes: mesh_ids,
    })
}

fn accessor(accessors: &[Accessor], index: usize) -> Result<&Accessor, AssetError> {
    accessors.get(index).ok_or(AssetError::InvalidIndex {
        what: "accessor",
        index,
    })
}

fn build_mesh(index: usize, mesh: &GltfMesh, accessors: &[Accessor]) -> Result<Mesh, AssetError> {
    let mut primitives = Vec::with_capacity(mesh.primitives.len());
    for primitive in &mesh.primitives {
        let mode = match primitive.mode {
            None => PrimitiveMode::Triangles,
            Some(raw) => PrimitiveMode::from_gltf(raw)
                .ok_or_else(|| AssetError::GltfParse(format!("mesh {index}: unknown primitive mode {raw}")))?,
        };
        let position = primitive
            .attributes
            .get("POSITION")
            .ok_or_else(|| AssetError::GltfParse(format!("mesh {index}: primitive without POSITION")))?;
        let position = accessor(accessors, *position)?;
        let index_count = match primitive.indices {
            Some(i) => accessor(accessors, i)?.count,
            None => 0,
        };
        let bounds = match (position.min.as_deref(), position.max.as_deref()) {
            (Some([x0, y0, z0]), Some([x1, y1, z1])) => {
                Aabb::from_min_max(Vec3::new(*x0, *y0, *z0), Vec3::new(*x1, *y1, *z1))
            }
            _ => Aabb::new(),
        };
        primitives.push(Primitive::with_bounds(mode, position.count, index_count, bounds));
    }
    let name = mesh.name.clone().unwrap_or_else(|| format!("mesh_{index}"));
    Ok(Mesh::new(name, primitives))
}

fn build_camera(index: usize, camera: &Camera) -> Result<CameraComponent, AssetError> {
    let missing = |what: &str| AssetError::GltfParse(format!("camera {index}: missing {what} parameters"));
    match camera.kind.as_str() {
        "perspective" => {
            let p = camera.perspective.as_ref().ok_or_else(|| missing("perspective"))?;
            Ok(CameraComponent {
                camera_type: CameraType::Perspective,
                near: p.znear,
                far: p.zfar.unwrap_or(f32::INFINITY),
                fovy: p.yfov,
                aspect: p.aspect_ratio,
                ..CameraComponent::default()
            })
        }
        "orthographic" => {
            let o = camera.orthographic.as_ref().ok_or_else(|| missing("orthographic"))?;
            let mut component = CameraComponent {
                camera_type: CameraType::Orthographic,
                near: o.znear,
                far: o.zfar,
                ..CameraComponent::default()
            };
            component.set_xmag(o.xmag);
            component.set_ymag(o.ymag);
            Ok(component)
        }
        other => Err(AssetError::UnknownCameraType(other.to_owned())),
    }
}

/// Check every index in the node table. Returns each node's parent.
fn validate_nodes(doc: &Document, mesh_count: usize, camera_count: usize) -> Result<Vec<Option<usize>>, AssetError> {
    let node_count = doc.nodes.len();
    let mut parents = vec![None; node_count];
    for (i, node) in doc.nodes.iter().enumerate() {
        if let Some(m) = node.mesh.filter(|m| *m >= mesh_count) {
            return Err(AssetError::InvalidIndex { what: "mesh", index: m });
        }
        if let Some(c) = node.camera.filter(|c| *c >= camera_count) {
            return Err(AssetError::InvalidIndex { what: "camera", index: c });
        }
        for &child in &node.children {
            if child >= node_count {
                return Err(AssetError::InvalidIndex { what: "node", index: child });
            }
            if child == i || parents[child].replace(i).is_some() {
                return Err(AssetError::GltfParse(format!("node {child} has more than one parent")));
            }
        }
    }
    // With one parent per node, a chain longer than the node count loops.
    for &first in &parents {
        let mut steps = 0;
        let mut current = first;
        while let Some(p) = current {
            steps += 1;
            if steps > node_count {
                return Err(AssetError::GltfParse("node hierarchy contains a cycle".to_owned()));
            }
            current = parents[p];
        }
    }
    Ok(parents)
}

fn root_nodes(doc: &Document, parents: &[Option<usize>]) -> Result<Vec<usize>, AssetError> {
    let scene = match doc.scene {
        Some(s) => Some(doc.scenes.get(s).ok_or(AssetError::InvalidIndex { what: "scene", index: s })?),
        None => doc.scenes.first(),
    };
    match scene {
        Some(scene) => {
            if let Some(&n) = scene.nodes.iter().find(|n| **n >= doc.nodes.len()) {
                return Err(AssetError::InvalidIndex { what: "node", index: n });
            }
            Ok(scene.nodes.clone())
        }
        None => Ok((0..doc.nodes.len()).filter(|n| parents[*n].is_none()).collect()),
    }
}

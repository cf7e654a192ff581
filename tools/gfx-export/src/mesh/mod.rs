//! Mesh sources
//!
//! A [`MeshSource`] stands in for the application's current selection: it
//! hands the exporter an ordered list of mesh records and nothing else.

mod gltf;
mod obj;

use anyhow::Result;
use gfx_common::MeshRecord;
use std::path::{Path, PathBuf};

pub use self::gltf::load_gltf_meshes;
pub use self::obj::{load_obj_meshes, parse_obj_meshes};

/// Supplies the meshes to export, in the order they should be written.
pub trait MeshSource {
    /// The selected meshes. May be empty.
    fn selected_meshes(&self) -> Result<Vec<MeshRecord>>;
}

/// Meshes already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Vec<MeshRecord>);

impl MeshSource for StaticSource {
    fn selected_meshes(&self) -> Result<Vec<MeshRecord>> {
        Ok(self.0.clone())
    }
}

/// Every object of a Wavefront OBJ file.
#[derive(Debug, Clone)]
pub struct ObjSource {
    pub path: PathBuf,
}

impl MeshSource for ObjSource {
    fn selected_meshes(&self) -> Result<Vec<MeshRecord>> {
        load_obj_meshes(&self.path)
    }
}

/// Every triangle primitive of a glTF/GLB file.
#[derive(Debug, Clone)]
pub struct GltfSource {
    pub path: PathBuf,
}

impl MeshSource for GltfSource {
    fn selected_meshes(&self) -> Result<Vec<MeshRecord>> {
        load_gltf_meshes(&self.path)
    }
}

/// Several sources concatenated in order.
impl MeshSource for Vec<Box<dyn MeshSource + Send + Sync>> {
    fn selected_meshes(&self) -> Result<Vec<MeshRecord>> {
        let mut meshes = Vec::new();
        for source in self {
            meshes.extend(source.selected_meshes()?);
        }
        Ok(meshes)
    }
}

/// Pick a source for `path` by file extension.
///
/// Supports:
/// - .obj (Wavefront OBJ)
/// - .gltf / .glb (glTF 2.0)
pub fn source_for_path(path: &Path) -> Result<Box<dyn MeshSource + Send + Sync>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => Ok(Box::new(ObjSource {
            path: path.to_path_buf(),
        })),
        "gltf" | "glb" => Ok(Box::new(GltfSource {
            path: path.to_path_buf(),
        })),
        _ => anyhow::bail!(
            "Unsupported mesh format '{}': {} (use .obj, .gltf, or .glb)",
            ext,
            path.display()
        ),
    }
}

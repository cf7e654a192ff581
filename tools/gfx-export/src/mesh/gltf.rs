//! glTF/GLB mesh source

use anyhow::{Context, Result, bail};
use gfx_common::{MeshRecord, Polygon, check_index_range};
use ::gltf::mesh::Mode;
use std::path::Path;

/// Largest index storable in an `index=uint16` block.
const MAX_INDEX_VALUE: u32 = u16::MAX as u32;

/// Load every triangle primitive of a glTF/GLB file as a mesh record.
///
/// Meshes are visited in document order, primitives in mesh order. Normals and
/// the first texture coordinate set are carried when they cover every vertex.
pub fn load_gltf_meshes(input: &Path) -> Result<Vec<MeshRecord>> {
    let (document, buffers, _images) =
        ::gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh.name().unwrap_or("(unnamed)");

        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                tracing::warn!(
                    "Skipping primitive {} of mesh '{}': mode {:?} is not triangles",
                    primitive.index(),
                    mesh_name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            // Positions (required)
            let points: Vec<[f32; 3]> = reader
                .read_positions()
                .with_context(|| format!("No positions in mesh '{}'", mesh_name))?
                .collect();
            check_index_range(points.len())
                .with_context(|| format!("glTF mesh '{}'", mesh_name))?;

            // Indices (optional) - non-indexed primitives use vertex order
            let indices: Vec<u32> = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                None => (0..points.len() as u32).collect(),
            };
            if let Some((idx, &value)) = indices
                .iter()
                .enumerate()
                .find(|&(_, &v)| v > MAX_INDEX_VALUE)
            {
                bail!(
                    "Index {} at position {} in mesh '{}' exceeds maximum {} for uint16 indices",
                    value,
                    idx,
                    mesh_name,
                    MAX_INDEX_VALUE
                );
            }
            if indices.len() % 3 != 0 {
                tracing::warn!(
                    "Mesh '{}' has {} indices, dropping the trailing partial triangle",
                    mesh_name,
                    indices.len()
                );
            }
            let polygons: Vec<Polygon> = indices
                .chunks_exact(3)
                .map(|tri| Polygon::Triangle([tri[0] as u16, tri[1] as u16, tri[2] as u16]))
                .collect();

            // Normals (optional)
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
            let normals = match normals {
                Some(n) if n.len() == points.len() => Some(n),
                Some(n) => {
                    tracing::warn!(
                        "Mesh '{}' has mismatched normal count ({} vs {} vertices), ignoring normals",
                        mesh_name,
                        n.len(),
                        points.len()
                    );
                    None
                }
                None => None,
            };

            // UVs (optional)
            let texcoords: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect());
            let texcoords = match texcoords {
                Some(t) if t.len() == points.len() => Some(t),
                Some(t) => {
                    tracing::warn!(
                        "Mesh '{}' has mismatched UV count ({} vs {} vertices), ignoring UVs",
                        mesh_name,
                        t.len(),
                        points.len()
                    );
                    None
                }
                None => None,
            };

            tracing::debug!(
                "glTF mesh '{}' primitive {}: {} vertices, {} triangles",
                mesh_name,
                primitive.index(),
                points.len(),
                polygons.len()
            );

            meshes.push(MeshRecord {
                points,
                polygons,
                normals,
                texcoords,
            });
        }
    }

    tracing::info!("Loaded {} meshes from {:?}", meshes.len(), input);
    Ok(meshes)
}

//! Opt-in mesh checks
//!
//! The writer passes indices through verbatim. Callers that want referential
//! integrity run these checks themselves before writing.

use crate::error::{Result, TextMeshError};
use crate::mesh::MeshRecord;

/// Largest vertex count addressable with uint16 indices (65536).
pub const MAX_VERTEX_COUNT: usize = u16::MAX as usize + 1;

/// Check that every polygon index is below the mesh's point count.
///
/// Reports the first offending index in polygon order.
pub fn validate_indices(mesh: &MeshRecord) -> Result<()> {
    let vertex_count = mesh.vertex_count();
    for (polygon_idx, polygon) in mesh.polygons.iter().enumerate() {
        if let Some(&index) = polygon
            .indices()
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(TextMeshError::IndexOutOfRange {
                polygon: polygon_idx,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

/// Check that `vertex_count` vertices can be addressed with uint16 indices.
pub fn check_index_range(vertex_count: usize) -> Result<()> {
    if vertex_count > MAX_VERTEX_COUNT {
        return Err(TextMeshError::TooManyVertices {
            count: vertex_count,
            max: MAX_VERTEX_COUNT,
        });
    }
    Ok(())
}

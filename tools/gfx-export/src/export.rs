//! Export orchestration
//!
//! Picks a destination, pulls the selection from a mesh source and writes it
//! as a text mesh. A cancelled pick ends the export before any file is
//! created or any mesh is loaded.

use anyhow::{Context, Result};
use gfx_common::{MeshRecord, TextMeshError, WriteOptions, encode_mesh, validate_indices};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::destination::DestinationPicker;
use crate::mesh::MeshSource;

/// Export failures callers need to tell apart. Everything else is an
/// `anyhow::Error` with context.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No destination was chosen. Nothing was written.
    #[error("export cancelled: no destination chosen")]
    Cancelled,

    /// A mesh failed the opt-in index validation. Nothing was written.
    #[error("mesh {mesh} is invalid: {source}")]
    InvalidMesh {
        /// Position of the mesh in the selection.
        mesh: usize,
        /// The validation failure.
        source: TextMeshError,
    },
}

/// Options for [`export_selection`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Line width and banner.
    pub write: WriteOptions,
    /// Check polygon indices against point counts before writing.
    pub validate: bool,
    /// Encode meshes on the rayon pool before writing them in order.
    pub parallel: bool,
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// File the selection was written to.
    pub path: PathBuf,
    /// Number of meshes written.
    pub meshes: usize,
    /// Points across all meshes.
    pub vertices: usize,
    /// Polygons across all meshes.
    pub polygons: usize,
}

/// Export the source's selection to the picked destination.
///
/// Returns [`ExportError::Cancelled`] when the picker yields no path. I/O
/// errors abort the export; bytes already flushed stay on disk.
pub fn export_selection(
    source: &dyn MeshSource,
    picker: &mut dyn DestinationPicker,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let Some(path) = picker.destination_path()? else {
        return Err(ExportError::Cancelled.into());
    };

    let meshes = source.selected_meshes()?;

    if options.validate {
        for (mesh, record) in meshes.iter().enumerate() {
            validate_indices(record).map_err(|source| ExportError::InvalidMesh { mesh, source })?;
        }
    }

    let file =
        File::create(&path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    write_selection(&mut writer, &meshes, options)
        .with_context(|| format!("Failed to write {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {:?}", path))?;

    let summary = ExportSummary {
        path,
        meshes: meshes.len(),
        vertices: meshes.iter().map(MeshRecord::vertex_count).sum(),
        polygons: meshes.iter().map(MeshRecord::polygon_count).sum(),
    };
    tracing::info!(
        "Exported {} meshes ({} vertices, {} polygons) to {:?}",
        summary.meshes,
        summary.vertices,
        summary.polygons,
        summary.path
    );
    Ok(summary)
}

/// Write the whole selection into one sink.
///
/// With `parallel` set, meshes are encoded into separate buffers first and
/// then written in selection order, so the output matches the sequential path
/// byte for byte.
pub fn write_selection<W: Write>(
    sink: &mut W,
    meshes: &[MeshRecord],
    options: &ExportOptions,
) -> Result<(), TextMeshError> {
    if !options.parallel {
        return gfx_common::write_meshes(sink, meshes, &options.write);
    }

    if let Some(banner) = &options.write.banner {
        gfx_common::write_banner(sink, banner)?;
    }
    for buf in encode_parallel(meshes, options.write.line_width)? {
        sink.write_all(&buf)?;
    }
    Ok(())
}

/// Encode each mesh into its own buffer on the rayon pool.
pub fn encode_parallel(
    meshes: &[MeshRecord],
    line_width: usize,
) -> Result<Vec<Vec<u8>>, TextMeshError> {
    meshes
        .par_iter()
        .map(|mesh| encode_mesh(mesh, line_width))
        .collect()
}

//! gfx-export library
//!
//! Exports a mesh selection to the gfx text mesh format. The binary drives
//! it from the command line; other tools can call [`export_selection`] with
//! their own [`MeshSource`] and [`DestinationPicker`].

pub mod destination;
pub mod export;
pub mod manifest;
pub mod mesh;

// Re-export the export entry points
pub use export::{
    ExportError, ExportOptions, ExportSummary, encode_parallel, export_selection, write_selection,
};

// Re-export sources and destinations
pub use destination::{DestinationPicker, FixedDestination, PromptDestination};
pub use mesh::{GltfSource, MeshSource, ObjSource, StaticSource, source_for_path};

// Re-export format types from gfx-common
pub use gfx_common::{MeshRecord, Polygon, TextMeshError, WriteOptions};

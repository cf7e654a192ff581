//! Shared mesh types and formats for the gfx tools
//!
//! This crate provides the pieces shared between:
//! - `gfx-export` (asset pipeline and CLI)
//! - anything that needs to read exported text meshes back
//!
//! # Modules
//!
//! - [`mesh`] - In-memory mesh records (points + tri/quad polygons)
//! - [`formats`] - The line-wrapped text mesh format (writer and reader)
//! - [`validation`] - Opt-in index checks, never run by the writer

pub mod error;
pub mod formats;
pub mod mesh;
pub mod validation;

pub use error::{Result, TextMeshError};
pub use mesh::{MeshRecord, Point3, Polygon};
pub use validation::{check_index_range, validate_indices};

// Re-export commonly used format items
pub use formats::text_mesh::{
    BlockKind, ComponentType, DEFAULT_LINE_WIDTH, IndexArity, ReadOptions, WriteOptions,
    TextMeshContents, encode_mesh, parse_meshes, read_meshes, read_text_mesh, write_banner,
    write_mesh, write_meshes,
};

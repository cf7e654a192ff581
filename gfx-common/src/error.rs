//! Error type for the text mesh format.

use thiserror::Error;

/// Result type alias using [`TextMeshError`].
pub type Result<T> = std::result::Result<T, TextMeshError>;

/// Errors raised while writing, reading or validating text meshes.
#[derive(Error, Debug)]
pub enum TextMeshError {
    /// The sink or source failed. Never retried.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed text mesh input.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number (0 when the error is at end of input with no lines).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A polygon references a vertex past the end of the point list.
    #[error("polygon {polygon} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Polygon position in the mesh.
        polygon: usize,
        /// The offending index.
        index: u16,
        /// Number of points in the mesh.
        vertex_count: usize,
    },

    /// The mesh cannot be addressed with uint16 indices.
    #[error("mesh has {count} vertices, exceeds maximum {max} for uint16 indices")]
    TooManyVertices {
        /// Number of points in the mesh.
        count: usize,
        /// Largest addressable vertex count.
        max: usize,
    },
}

impl TextMeshError {
    /// Create a parse error at `line`.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        TextMeshError::Parse {
            line,
            message: message.into(),
        }
    }
}

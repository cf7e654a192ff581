//! Text mesh format (.mesh)
//!
//! Line-oriented, ASCII-only mesh format. Each mesh is written as a sequence
//! of framed blocks, positions first and indices last.
//!
//! # Layout
//! ```text
//! position=3 float
//! position <x> <y> <z> <x> <y> <z> ...
//! normal=3 float                 (optional)
//! normal <x> <y> <z> ...
//! texcoord0=2 float              (optional)
//! texcoord0 <u> <v> ...
//! index=uint16
//! index <a> <b> <c> ...
//! ```
//!
//! Data lines are wrapped once the characters written after the block name
//! exceed the line width (64 by default). The record that crosses the limit
//! is always finished on the same line.
//!
//! There are no end-of-block or end-of-file markers. Several meshes in one
//! stream simply repeat the headers; a `position=` header always starts a new
//! mesh.
//!
//! # Numbers
//!
//! Floats are written with `f32`'s `Display`: the shortest decimal that parses
//! back to the same bits, never in exponent form (`1.0` is written `1`).
//! Indices are plain decimal `u16`.

mod reader;
mod writer;


use std::fmt;
use std::io::Write;

pub use reader::{
    IndexArity, ReadOptions, TextMeshContents, parse_meshes, read_meshes, read_text_mesh,
};
pub use writer::{WriteOptions, encode_mesh, write_banner, write_mesh, write_meshes};

/// Default soft line width, in characters.
pub const DEFAULT_LINE_WIDTH: usize = 64;

/// Scalar type of a block's components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// 32-bit float
    Float,
    /// Unsigned 16-bit integer
    Uint16,
}

impl ComponentType {
    /// Name used in block headers.
    pub const fn name(self) -> &'static str {
        match self {
            ComponentType::Float => "float",
            ComponentType::Uint16 => "uint16",
        }
    }

    /// Parse a header type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float" => Some(ComponentType::Float),
            "uint16" => Some(ComponentType::Uint16),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kinds of block a mesh is written as, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Vertex positions, 3 floats per record.
    Position,
    /// Vertex normals, 3 floats per record.
    Normal,
    /// First texture coordinate set, 2 floats per record.
    TexCoord0,
    /// Polygon indices, 3 or 4 uint16 per record.
    Index,
}

impl BlockKind {
    /// Block name, used both in the header and at the start of data lines.
    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::Position => "position",
            BlockKind::Normal => "normal",
            BlockKind::TexCoord0 => "texcoord0",
            BlockKind::Index => "index",
        }
    }

    /// Component type of every scalar in the block.
    pub const fn component_type(self) -> ComponentType {
        match self {
            BlockKind::Index => ComponentType::Uint16,
            _ => ComponentType::Float,
        }
    }

    /// Fixed record arity, or `None` when it follows the polygon.
    pub const fn arity(self) -> Option<usize> {
        match self {
            BlockKind::Position | BlockKind::Normal => Some(3),
            BlockKind::TexCoord0 => Some(2),
            BlockKind::Index => None,
        }
    }

    /// Look up a block by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "position" => Some(BlockKind::Position),
            "normal" => Some(BlockKind::Normal),
            "texcoord0" => Some(BlockKind::TexCoord0),
            "index" => Some(BlockKind::Index),
            _ => None,
        }
    }

    /// Write the header line, e.g. `position=3 float` or `index=uint16`.
    ///
    /// The index header has no arity. Readers must not expect one.
    pub fn write_header<W: Write>(self, w: &mut W) -> std::io::Result<()> {
        match self.arity() {
            Some(arity) => writeln!(w, "{}={} {}", self.name(), arity, self.component_type()),
            None => writeln!(w, "{}={}", self.name(), self.component_type()),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

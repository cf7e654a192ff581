//! Text mesh reader
//!
//! Re-synchronises purely on header lines: anything containing `=` is a
//! header, `position=` starts a new mesh, and data lines belong to the most
//! recent header.

use std::io::BufRead;

use super::{BlockKind, ComponentType};
use crate::error::{Result, TextMeshError};
use crate::mesh::{MeshRecord, Polygon};

/// How index scalars are grouped into polygons.
///
/// The `index=uint16` header carries no arity, so the reader has to be told.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexArity {
    /// Three indices per polygon.
    #[default]
    Triangles,
    /// Four indices per polygon.
    Quads,
}

impl IndexArity {
    /// Indices per polygon.
    pub const fn count(self) -> usize {
        match self {
            IndexArity::Triangles => 3,
            IndexArity::Quads => 4,
        }
    }

    fn from_count(count: usize) -> Option<Self> {
        match count {
            3 => Some(IndexArity::Triangles),
            4 => Some(IndexArity::Quads),
            _ => None,
        }
    }
}

/// Options for [`read_meshes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Polygon arity used for `index` blocks that do not declare one.
    pub index_arity: IndexArity,
}

/// Everything a text mesh stream decoded to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMeshContents {
    /// Decoded meshes, in stream order.
    pub meshes: Vec<MeshRecord>,
    /// Names of skipped blocks, each listed once in order of first appearance.
    pub skipped_blocks: Vec<String>,
}

/// Block the decoder is currently filling.
enum Active {
    /// No header seen yet.
    None,
    /// Header with an unknown name; its data lines are ignored.
    Skip,
    /// Known block with its record arity.
    Block(BlockKind, usize),
}

struct Decoder {
    options: ReadOptions,
    meshes: Vec<MeshRecord>,
    skipped: Vec<String>,
    active: Active,
    floats: Vec<f32>,
    indices: Vec<u16>,
}

impl Decoder {
    fn new(options: ReadOptions) -> Self {
        Self {
            options,
            meshes: Vec::new(),
            skipped: Vec::new(),
            active: Active::None,
            floats: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn current_mesh(&mut self) -> &mut MeshRecord {
        if self.meshes.is_empty() {
            self.meshes.push(MeshRecord::default());
        }
        let last = self.meshes.len() - 1;
        &mut self.meshes[last]
    }

    /// Fail if the active block ended with a partial record.
    fn close_block(&mut self, line: usize) -> Result<()> {
        let dangling = self.floats.len() + self.indices.len();
        if dangling > 0 {
            let name = match &self.active {
                Active::Block(kind, _) => kind.name(),
                _ => "unknown",
            };
            return Err(TextMeshError::parse(
                line,
                format!("`{}` block ends with {} dangling values", name, dangling),
            ));
        }
        Ok(())
    }

    fn header(&mut self, line_no: usize, name: &str, body: &str) -> Result<()> {
        self.close_block(line_no)?;

        let Some(kind) = BlockKind::from_name(name) else {
            tracing::warn!("Skipping unsupported block `{}` at line {}", name, line_no);
            if !self.skipped.iter().any(|skipped| skipped == name) {
                self.skipped.push(name.to_string());
            }
            self.active = Active::Skip;
            return Ok(());
        };

        let mut tokens = body.split_whitespace().peekable();

        let declared_arity = match tokens.peek().map(|t| t.parse::<usize>()) {
            Some(Ok(arity)) => {
                tokens.next();
                Some(arity)
            }
            _ => None,
        };

        let type_name = tokens
            .next()
            .ok_or_else(|| TextMeshError::parse(line_no, format!("`{}` header has no type", name)))?;
        match ComponentType::from_name(type_name) {
            Some(ty) if ty == kind.component_type() => {}
            _ => {
                return Err(TextMeshError::parse(
                    line_no,
                    format!(
                        "`{}` header declares type `{}`, expected `{}`",
                        name,
                        type_name,
                        kind.component_type()
                    ),
                ));
            }
        }
        for flag in tokens {
            tracing::debug!("Ignoring header flag `{}` at line {}", flag, line_no);
        }

        let arity = match (kind.arity(), declared_arity) {
            (Some(fixed), Some(declared)) if fixed != declared => {
                return Err(TextMeshError::parse(
                    line_no,
                    format!("`{}` has arity {}, header declares {}", name, fixed, declared),
                ));
            }
            (Some(fixed), _) => fixed,
            (None, Some(declared)) => IndexArity::from_count(declared)
                .ok_or_else(|| {
                    TextMeshError::parse(line_no, format!("unsupported polygon arity {}", declared))
                })?
                .count(),
            (None, None) => self.options.index_arity.count(),
        };

        match kind {
            BlockKind::Position => self.meshes.push(MeshRecord::default()),
            BlockKind::Normal => {
                self.current_mesh().normals.get_or_insert_with(Vec::new);
            }
            BlockKind::TexCoord0 => {
                self.current_mesh().texcoords.get_or_insert_with(Vec::new);
            }
            BlockKind::Index => {
                self.current_mesh();
            }
        }

        self.active = Active::Block(kind, arity);
        Ok(())
    }

    fn data(&mut self, line_no: usize, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();

        let (kind, arity) = match &self.active {
            Active::None => {
                return Err(TextMeshError::parse(
                    line_no,
                    format!("data line `{}` before any block header", name),
                ));
            }
            Active::Skip => return Ok(()),
            Active::Block(kind, arity) => (*kind, *arity),
        };

        if name != kind.name() {
            return Err(TextMeshError::parse(
                line_no,
                format!("expected `{}` data line, found `{}`", kind.name(), name),
            ));
        }

        for token in tokens {
            match kind.component_type() {
                ComponentType::Float => {
                    let value = token.parse::<f32>().map_err(|_| {
                        TextMeshError::parse(line_no, format!("invalid float `{}`", token))
                    })?;
                    self.floats.push(value);
                    if self.floats.len() == arity {
                        self.push_float_record(kind);
                    }
                }
                ComponentType::Uint16 => {
                    let value = token.parse::<u16>().map_err(|_| {
                        TextMeshError::parse(line_no, format!("invalid uint16 `{}`", token))
                    })?;
                    self.indices.push(value);
                    if self.indices.len() == arity {
                        let polygon = Polygon::from_slice(&self.indices)
                            .ok_or_else(|| TextMeshError::parse(line_no, "bad polygon arity"))?;
                        self.indices.clear();
                        self.current_mesh().polygons.push(polygon);
                    }
                }
            }
        }
        Ok(())
    }

    fn push_float_record(&mut self, kind: BlockKind) {
        let values = std::mem::take(&mut self.floats);
        let mesh = self.current_mesh();
        match (kind, values.as_slice()) {
            (BlockKind::Position, &[x, y, z]) => mesh.points.push([x, y, z]),
            (BlockKind::Normal, &[x, y, z]) => {
                mesh.normals.get_or_insert_with(Vec::new).push([x, y, z])
            }
            (BlockKind::TexCoord0, &[u, v]) => {
                mesh.texcoords.get_or_insert_with(Vec::new).push([u, v])
            }
            _ => {}
        }
        // Reuse the allocation
        self.floats = values;
        self.floats.clear();
    }
}

/// Read every mesh from a text mesh stream.
///
/// Blocks with names this reader does not support (`color0`, `tangent`,
/// `texcoord1`, ...) are skipped with a warning and listed in
/// [`TextMeshContents::skipped_blocks`].
///
/// Blank lines and `#` comments are skipped, and `\r\n` endings are accepted.
/// Records may continue across data lines, but a block that ends with a
/// partial record is an error.
pub fn read_text_mesh<R: BufRead>(reader: R, options: &ReadOptions) -> Result<TextMeshContents> {
    let mut decoder = Decoder::new(*options);
    let mut last_line = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        last_line = line_no;

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((name, body)) => decoder.header(line_no, name.trim(), body)?,
            None => decoder.data(line_no, line)?,
        }
    }

    decoder.close_block(last_line)?;
    tracing::debug!("Read {} meshes", decoder.meshes.len());
    Ok(TextMeshContents {
        meshes: decoder.meshes,
        skipped_blocks: decoder.skipped,
    })
}

/// Read every mesh from a text mesh stream, dropping the list of skipped blocks.
pub fn read_meshes<R: BufRead>(reader: R, options: &ReadOptions) -> Result<Vec<MeshRecord>> {
    read_text_mesh(reader, options).map(|contents| contents.meshes)
}

/// Read every mesh from an in-memory string.
pub fn parse_meshes(text: &str, options: &ReadOptions) -> Result<Vec<MeshRecord>> {
    read_meshes(text.as_bytes(), options)
}

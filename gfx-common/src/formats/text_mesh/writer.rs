//! Text mesh writer

use std::fmt::{Display, Write as _};
use std::io::Write;

use super::{BlockKind, DEFAULT_LINE_WIDTH};
use crate::error::Result;
use crate::mesh::MeshRecord;

/// Options for [`write_meshes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Soft line width in characters. A data line is ended once the
    /// characters written after the block name exceed this.
    pub line_width: usize,
    /// Optional comment written once at the top of the stream (`# ...`).
    pub banner: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            banner: None,
        }
    }
}

/// Line-wrapping state for one block. Lives only as long as the block.
struct BlockWriter<'w, W: Write> {
    sink: &'w mut W,
    kind: BlockKind,
    line_width: usize,
    line_len: usize,
    at_line_start: bool,
    last_arity: Option<usize>,
    fragment: String,
    records: usize,
}

impl<'w, W: Write> BlockWriter<'w, W> {
    /// Write the block header and start with no open line.
    fn begin(sink: &'w mut W, kind: BlockKind, line_width: usize) -> Result<Self> {
        kind.write_header(sink)?;
        Ok(Self {
            sink,
            kind,
            line_width,
            line_len: 0,
            at_line_start: true,
            last_arity: None,
            fragment: String::new(),
            records: 0,
        })
    }

    fn write_record<T: Display>(&mut self, values: &[T]) -> Result<()> {
        // Records of different arity never share a line
        if self.last_arity.is_some_and(|arity| arity != values.len()) && !self.at_line_start {
            self.end_line()?;
        }
        self.last_arity = Some(values.len());

        if self.at_line_start {
            self.sink.write_all(self.kind.name().as_bytes())?;
            self.line_len = 0;
            self.at_line_start = false;
        }

        self.fragment.clear();
        for value in values {
            // Writing into a String cannot fail
            let _ = write!(self.fragment, " {}", value);
        }
        self.sink.write_all(self.fragment.as_bytes())?;
        // Fragments are ASCII, so bytes == characters
        self.line_len += self.fragment.len();
        self.records += 1;

        if self.line_len > self.line_width {
            self.end_line()?;
        }
        Ok(())
    }

    fn end_line(&mut self) -> Result<()> {
        self.sink.write_all(b"\n")?;
        self.at_line_start = true;
        Ok(())
    }

    /// Close a line left open by the last record. Returns the record count.
    fn finish(mut self) -> Result<usize> {
        if !self.at_line_start {
            self.end_line()?;
        }
        tracing::trace!("{} block: {} records", self.kind, self.records);
        Ok(self.records)
    }
}

/// Write one mesh as framed text blocks.
///
/// Blocks are written in order: `position`, then `normal` and `texcoord0`
/// when the mesh carries them, then `index`. Headers are written even when a
/// block has no records. Sink errors are returned as soon as they happen;
/// whatever was already written stays written.
pub fn write_mesh<W: Write>(sink: &mut W, mesh: &MeshRecord, line_width: usize) -> Result<()> {
    let mut block = BlockWriter::begin(sink, BlockKind::Position, line_width)?;
    for point in &mesh.points {
        block.write_record(point)?;
    }
    block.finish()?;

    if let Some(normals) = &mesh.normals {
        let mut block = BlockWriter::begin(sink, BlockKind::Normal, line_width)?;
        for normal in normals {
            block.write_record(normal)?;
        }
        block.finish()?;
    }

    if let Some(texcoords) = &mesh.texcoords {
        let mut block = BlockWriter::begin(sink, BlockKind::TexCoord0, line_width)?;
        for uv in texcoords {
            block.write_record(uv)?;
        }
        block.finish()?;
    }

    let mut block = BlockWriter::begin(sink, BlockKind::Index, line_width)?;
    for polygon in &mesh.polygons {
        block.write_record(polygon.indices())?;
    }
    block.finish()?;

    tracing::debug!(
        "Wrote mesh: {} points, {} polygons",
        mesh.vertex_count(),
        mesh.polygon_count()
    );
    Ok(())
}

/// Write several meshes into one stream, each with its own block set.
///
/// The caller owns `sink` exclusively for the whole call; the format has no
/// separators between meshes, so interleaved writers would corrupt it.
pub fn write_meshes<W: Write>(
    sink: &mut W,
    meshes: &[MeshRecord],
    options: &WriteOptions,
) -> Result<()> {
    if let Some(banner) = &options.banner {
        write_banner(sink, banner)?;
    }

    for mesh in meshes {
        write_mesh(sink, mesh, options.line_width)?;
    }
    Ok(())
}

/// Write `banner` as `#` comment lines, one per line of text.
pub fn write_banner<W: Write>(sink: &mut W, banner: &str) -> Result<()> {
    for line in banner.lines() {
        writeln!(sink, "# {}", line)?;
    }
    Ok(())
}

/// Encode one mesh into a fresh buffer.
pub fn encode_mesh(mesh: &MeshRecord, line_width: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_mesh(&mut buf, mesh, line_width)?;
    Ok(buf)
}

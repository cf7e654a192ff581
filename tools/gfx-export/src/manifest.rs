//! gfx-export.toml manifest parsing and batch builds

use anyhow::{Context, Result};
use gfx_common::{DEFAULT_LINE_WIDTH, WriteOptions};
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::destination::FixedDestination;
use crate::export::{ExportOptions, ExportSummary, export_selection};
use crate::mesh::source_for_path;

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "gfx-export.toml";

/// Extension used for outputs that do not name one.
pub const TEXT_MESH_EXT: &str = "mesh";

/// gfx-export.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct ExportManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
}

/// Output settings shared by every entry
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Output directory, relative to the manifest.
    /// Default: "."
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Soft line width for data lines.
    /// Default: 64
    #[serde(default = "default_line_width")]
    pub line_width: usize,

    /// Comment written at the top of every output file.
    #[serde(default)]
    pub banner: Option<String>,

    /// Check polygon indices before writing.
    /// Default: false
    #[serde(default)]
    pub validate: bool,
}

fn default_dir() -> String {
    ".".to_string()
}

fn default_line_width() -> usize {
    DEFAULT_LINE_WIDTH
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            line_width: default_line_width(),
            banner: None,
            validate: false,
        }
    }
}

/// Single mesh entry
#[derive(Debug, Deserialize)]
pub struct MeshEntry {
    pub id: String,
    /// Input mesh (.obj, .gltf or .glb), relative to the manifest.
    pub path: String,
    /// Output file name inside the output directory.
    /// Default: "<id>.mesh"
    #[serde(default)]
    pub output: Option<String>,
}

impl MeshEntry {
    /// Output file name for this entry.
    pub fn output_name(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("{}.{}", self.id, TEXT_MESH_EXT))
    }
}

impl ExportManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse gfx-export.toml")
    }

    /// Check entries without touching any input file.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut outputs = HashSet::new();

        for entry in &self.meshes {
            if entry.id.trim().is_empty() {
                anyhow::bail!("Mesh entry with path '{}' has an empty id", entry.path);
            }
            if entry.path.trim().is_empty() {
                anyhow::bail!("Mesh '{}' has an empty path", entry.id);
            }
            if !ids.insert(entry.id.as_str()) {
                anyhow::bail!("Duplicate mesh id '{}'", entry.id);
            }
            if !outputs.insert(entry.output_name()) {
                anyhow::bail!(
                    "Mesh '{}' writes to '{}', which another entry already uses",
                    entry.id,
                    entry.output_name()
                );
            }
        }
        Ok(())
    }

    /// Export options derived from the output section.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            write: WriteOptions {
                line_width: self.output.line_width,
                banner: self.output.banner.clone(),
            },
            validate: self.output.validate,
            parallel: false,
        }
    }
}

/// Export every manifest entry (parallel across entries).
///
/// Paths in the manifest are relative to `manifest_dir`. `output_override`
/// replaces the manifest's output directory.
pub fn build_all(
    manifest: &ExportManifest,
    manifest_dir: &Path,
    output_override: Option<&Path>,
) -> Result<Vec<ExportSummary>> {
    use rayon::prelude::*;

    manifest.validate()?;

    let out_dir: PathBuf = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest_dir.join(&manifest.output.dir),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let options = manifest.export_options();

    manifest
        .meshes
        .par_iter()
        .map(|entry| {
            let input = manifest_dir.join(&entry.path);
            let source = source_for_path(&input)?;
            let mut picker = FixedDestination(Some(out_dir.join(entry.output_name())));
            export_selection(source.as_ref(), &mut picker, &options)
                .with_context(|| format!("Failed to export mesh '{}'", entry.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = ExportManifest::parse(
            r#"
            [[meshes]]
            id = "cube"
            path = "cube.obj"
            "#,
        )
        .expect("parse failed");

        assert_eq!(manifest.output.dir, ".");
        assert_eq!(manifest.output.line_width, 64);
        assert!(manifest.output.banner.is_none());
        assert!(!manifest.output.validate);
        assert_eq!(manifest.meshes.len(), 1);
        assert_eq!(manifest.meshes[0].output_name(), "cube.mesh");
    }

    #[test]
    fn test_parse_full_manifest() {
        let manifest = ExportManifest::parse(
            r#"
            [output]
            dir = "out"
            line_width = 32
            banner = "Exported by gfx-export"
            validate = true

            [[meshes]]
            id = "cube"
            path = "assets/cube.obj"
            output = "cube.txt"
            "#,
        )
        .expect("parse failed");

        let options = manifest.export_options();
        assert_eq!(options.write.line_width, 32);
        assert_eq!(options.write.banner.as_deref(), Some("Exported by gfx-export"));
        assert!(options.validate);
        assert_eq!(manifest.meshes[0].output_name(), "cube.txt");
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let manifest = ExportManifest::parse(
            r#"
            [[meshes]]
            id = "a"
            path = "a.obj"

            [[meshes]]
            id = "a"
            path = "b.obj"
            "#,
        )
        .expect("parse failed");
        assert!(manifest.validate().is_err());

        let manifest = ExportManifest::parse(
            r#"
            [[meshes]]
            id = "a"
            path = "a.obj"
            output = "same.mesh"

            [[meshes]]
            id = "b"
            path = "b.obj"
            output = "same.mesh"
            "#,
        )
        .expect("parse failed");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_build_all_exports_each_entry() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("tri.obj"),
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n",
        )
        .expect("Failed to write OBJ");
        std::fs::write(
            dir.path().join("quad.obj"),
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .expect("Failed to write OBJ");

        let manifest = ExportManifest::parse(
            r#"
            [output]
            dir = "out"

            [[meshes]]
            id = "tri"
            path = "tri.obj"

            [[meshes]]
            id = "quad"
            path = "quad.obj"
            "#,
        )
        .expect("parse failed");

        let summaries = build_all(&manifest, dir.path(), None).expect("build failed");
        assert_eq!(summaries.len(), 2);

        let tri = std::fs::read_to_string(dir.path().join("out/tri.mesh")).expect("missing output");
        assert_eq!(
            tri,
            "position=3 float\nposition 0 0 0 1 0 0 1 1 0\nindex=uint16\nindex 0 1 2\n"
        );
        let quad =
            std::fs::read_to_string(dir.path().join("out/quad.mesh")).expect("missing output");
        assert!(quad.ends_with("index=uint16\nindex 0 1 2 3\n"));
    }

    #[test]
    fn test_build_all_reports_missing_input() {
        let dir = tempdir().expect("Failed to create temp dir");
        let manifest = ExportManifest::parse(
            r#"
            [[meshes]]
            id = "ghost"
            path = "ghost.obj"
            "#,
        )
        .expect("parse failed");

        assert!(build_all(&manifest, dir.path(), None).is_err());
        assert!(!dir.path().join("ghost.mesh").exists());
    }
}

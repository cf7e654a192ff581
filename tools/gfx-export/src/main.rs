//! gfx-export - gfx text mesh export tool
//!
//! Writes OBJ/glTF meshes as line-wrapped text meshes and checks existing
//! text mesh files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use gfx_common::{DEFAULT_LINE_WIDTH, IndexArity, ReadOptions, read_text_mesh, validate_indices};
use gfx_export::manifest::{self, DEFAULT_MANIFEST, ExportManifest};
use gfx_export::{
    DestinationPicker, ExportError, ExportOptions, FixedDestination, MeshSource,
    PromptDestination, WriteOptions, export_selection, source_for_path,
};

#[derive(Parser)]
#[command(name = "gfx-export")]
#[command(about = "gfx text mesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export meshes from one or more OBJ/glTF/GLB files into one text mesh
    Export {
        /// Input mesh files, written in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (prompts when omitted; an empty answer cancels)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Soft line width for data lines
        #[arg(short = 'w', long, default_value_t = DEFAULT_LINE_WIDTH)]
        line_width: usize,

        /// Comment written at the top of the file
        #[arg(long)]
        banner: Option<String>,

        /// Reject polygons that reference missing points
        #[arg(long)]
        validate: bool,

        /// Encode meshes in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Decode a text mesh file and validate its indices
    Check {
        /// Text mesh file
        file: PathBuf,

        /// Group undeclared index blocks in fours
        #[arg(long)]
        quads: bool,
    },

    /// Export every mesh listed in a manifest
    Build {
        /// Path to gfx-export.toml manifest
        #[arg(default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            inputs,
            output,
            line_width,
            banner,
            validate,
            parallel,
        } => {
            let options = ExportOptions {
                write: WriteOptions { line_width, banner },
                validate,
                parallel,
            };
            run_export(&inputs, output, &options)?;
        }

        Commands::Check { file, quads } => {
            let index_arity = if quads {
                IndexArity::Quads
            } else {
                IndexArity::Triangles
            };
            check_file(&file, &ReadOptions { index_arity })?;
        }

        Commands::Build { manifest, output } => {
            let config = ExportManifest::load(&manifest)?;
            let manifest_dir = manifest.parent().unwrap_or(Path::new("."));
            let summaries = manifest::build_all(&config, manifest_dir, output.as_deref())?;
            tracing::info!("Build complete! {} files written", summaries.len());
        }
    }

    Ok(())
}

fn run_export(inputs: &[PathBuf], output: Option<PathBuf>, options: &ExportOptions) -> Result<()> {
    let sources = inputs
        .iter()
        .map(|input| source_for_path(input))
        .collect::<Result<Vec<_>>>()?;

    let result = match output {
        Some(path) => export_to(&sources, &mut FixedDestination(Some(path)), options),
        None => {
            let stdin = std::io::stdin();
            let mut picker = PromptDestination::new(stdin.lock(), std::io::stderr());
            export_to(&sources, &mut picker, options)
        }
    };

    match result {
        Err(e) if matches!(e.downcast_ref::<ExportError>(), Some(ExportError::Cancelled)) => {
            tracing::info!("Export cancelled, nothing written");
            Ok(())
        }
        other => other,
    }
}

fn export_to(
    source: &dyn MeshSource,
    picker: &mut dyn DestinationPicker,
    options: &ExportOptions,
) -> Result<()> {
    export_selection(source, picker, options).map(|_| ())
}

fn check_file(path: &Path, options: &ReadOptions) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let contents = read_text_mesh(BufReader::new(file), options)
        .with_context(|| format!("Failed to decode {:?}", path))?;
    let meshes = contents.meshes;

    for (i, mesh) in meshes.iter().enumerate() {
        validate_indices(mesh).with_context(|| format!("Mesh {} in {:?}", i, path))?;
        tracing::info!(
            "Mesh {}: {} points, {} polygons{}{}",
            i,
            mesh.vertex_count(),
            mesh.polygon_count(),
            if mesh.normals.is_some() { ", normals" } else { "" },
            if mesh.texcoords.is_some() { ", texcoord0" } else { "" }
        );
    }

    if !contents.skipped_blocks.is_empty() {
        tracing::warn!(
            "{:?}: unsupported blocks not decoded: {}",
            path,
            contents.skipped_blocks.join(", ")
        );
    }
    tracing::info!("{:?} OK: {} meshes", path, meshes.len());
    Ok(())
}

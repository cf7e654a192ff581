//! Destination pickers
//!
//! Stand-ins for a "Save to..." dialog. Returning `None` means the user
//! cancelled, and the export must not touch the filesystem.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Chooses where an export is written.
pub trait DestinationPicker {
    /// The chosen path, or `None` when the user cancels.
    fn destination_path(&mut self) -> Result<Option<PathBuf>>;
}

/// A destination decided up front (e.g. the `-o` flag or a manifest entry).
#[derive(Debug, Clone, Default)]
pub struct FixedDestination(pub Option<PathBuf>);

impl DestinationPicker for FixedDestination {
    fn destination_path(&mut self) -> Result<Option<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Asks for a path on `output` and reads the answer from `input`.
///
/// An empty answer or end of input cancels.
pub struct PromptDestination<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDestination<R, W> {
    /// Prompt on `output`, read the answer from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DestinationPicker for PromptDestination<R, W> {
    fn destination_path(&mut self) -> Result<Option<PathBuf>> {
        write!(self.output, "Save to... ").context("Failed to write prompt")?;
        self.output.flush().context("Failed to write prompt")?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .context("Failed to read destination")?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(answer)))
    }
}

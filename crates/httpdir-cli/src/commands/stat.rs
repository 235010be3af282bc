//! `stat` command implementation.

use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::{EntryView, format_entry};
use anyhow::{Context, Result};
use httpdir::Tree;

/// Opens `path` and returns the handle's stat record.
///
/// A directory served through its index file reports the directory's own
/// record.
///
/// # Errors
///
/// Returns an error if the path cannot be opened.
pub fn stat(tree: &Tree, path: &str) -> Result<EntryView> {
    let handle = tree
        .open(path)
        .with_context(|| format!("cannot open '{path}'"))?;
    Ok(EntryView::from(handle.stat()))
}

/// Runs the `stat` command.
///
/// # Errors
///
/// Returns an error if the path cannot be opened or formatting fails.
pub fn run(tree: &Tree, path: &str, output_format: OutputFormat) -> Result<ExitCode> {
    let view = stat(tree, path)?;
    let formatted = format_entry(&view, output_format).context("failed to format stat")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}

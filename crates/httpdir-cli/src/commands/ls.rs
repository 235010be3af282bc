//! `ls` command implementation.
//!
//! Opens a path and pages through its listing. Files and directories served
//! through their index file list as their own single stat record, like
//! `ls FILE`.

use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::{EntryView, ListingView, format_listing};
use anyhow::{Context, Result};
use httpdir::Tree;
use std::num::NonZeroUsize;
use tracing::debug;

/// Lists `path`, reading the listing `page` entries at a time.
///
/// # Errors
///
/// Returns an error if the path cannot be opened or a host directory cannot
/// be read.
///
/// # Examples
///
/// ```
/// use httpdir::{Node, Tree};
/// use httpdir_cli::commands::ls;
/// use std::num::NonZeroUsize;
/// use std::time::SystemTime;
///
/// let mut tree = Tree::new(SystemTime::UNIX_EPOCH);
/// tree.mkdir("/d", SystemTime::UNIX_EPOCH, true)?;
/// tree.create("/d/b", Node::text("b", SystemTime::UNIX_EPOCH))?;
/// tree.create("/d/a", Node::text("a", SystemTime::UNIX_EPOCH))?;
///
/// let view = ls::list(&tree, "/d", NonZeroUsize::new(1))?;
/// assert_eq!(view.entries[0].name, "a");
/// assert_eq!(view.entries[1].name, "b");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn list(tree: &Tree, path: &str, page: Option<NonZeroUsize>) -> Result<ListingView> {
    let mut handle = tree
        .open(path)
        .with_context(|| format!("cannot open '{path}'"))?;

    let entries = if handle.is_listable() {
        let count = page.map(NonZeroUsize::get);
        let mut entries = Vec::new();
        let mut pages = 0usize;
        while let Some(batch) = handle
            .read_dir(count)
            .with_context(|| format!("cannot list '{path}'"))?
        {
            pages += 1;
            entries.extend(batch.iter().map(EntryView::from));
        }
        debug!(path, pages, entries = entries.len(), "listed directory");
        entries
    } else {
        vec![EntryView::from(handle.stat())]
    };

    Ok(ListingView {
        path: path.to_string(),
        entries,
    })
}

/// Runs the `ls` command.
///
/// # Errors
///
/// Returns an error if listing or formatting fails.
pub fn run(
    tree: &Tree,
    path: &str,
    page: Option<NonZeroUsize>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let view = list(tree, path, page)?;
    let formatted = format_listing(&view, output_format).context("failed to format listing")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}

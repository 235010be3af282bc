//! `cat` command implementation.

use crate::cli::ExitCode;
use anyhow::{Context, Result, bail};
use httpdir::Tree;
use std::io::{self, Write};

/// Copies the content at `path` into `out`, returning the bytes written.
///
/// Directories with listing disabled serve their index file.
///
/// # Errors
///
/// Returns an error if the path cannot be opened, resolves to a directory
/// listing, or the copy fails.
///
/// # Examples
///
/// ```
/// use httpdir::{Node, Tree};
/// use httpdir_cli::commands::cat;
/// use std::time::SystemTime;
///
/// let mut tree = Tree::new(SystemTime::UNIX_EPOCH);
/// tree.create("/docs/index.html", Node::text("<h1>Docs</h1>", SystemTime::UNIX_EPOCH))?;
///
/// let mut out = Vec::new();
/// cat::copy_to(&tree, "/docs", &mut out)?;
/// assert_eq!(out, b"<h1>Docs</h1>");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn copy_to<W: Write>(tree: &Tree, path: &str, out: &mut W) -> Result<u64> {
    let mut handle = tree
        .open(path)
        .with_context(|| format!("cannot open '{path}'"))?;
    if handle.is_listable() {
        bail!("'{path}' is a directory; use `httpdir ls` to list it");
    }
    let written = io::copy(&mut handle, out).with_context(|| format!("failed to read '{path}'"))?;
    handle.close()?;
    Ok(written)
}

/// Runs the `cat` command, writing content to stdout.
///
/// # Errors
///
/// Returns an error if the content cannot be read or written.
pub fn run(tree: &Tree, path: &str) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = copy_to(tree, path, &mut out)?;
    out.flush().context("failed to flush stdout")?;
    tracing::debug!(path, written, "copied content");
    Ok(ExitCode::SUCCESS)
}

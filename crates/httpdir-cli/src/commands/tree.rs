//! `tree` command implementation.
//!
//! Walks every directory reachable through listings, depth first, in name
//! order. Directories that refuse to list are shown but not entered.

use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::{EntryView, TreeEntry, format_tree};
use anyhow::{Context, Result};
use httpdir::Tree;
use tracing::debug;

/// Collects every entry reachable from the root.
///
/// # Errors
///
/// Returns an error if a listed path fails to open for a reason other than
/// listing being disabled, or a host directory cannot be read.
///
/// # Examples
///
/// ```
/// use httpdir::{Node, Tree};
/// use httpdir_cli::commands::tree;
/// use std::time::SystemTime;
///
/// let mut t = Tree::with_root_listing(SystemTime::UNIX_EPOCH, true);
/// t.mkdir("/a", SystemTime::UNIX_EPOCH, true)?;
/// t.create("/a/b.txt", Node::text("b", SystemTime::UNIX_EPOCH))?;
///
/// let entries = tree::walk(&t)?;
/// let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
/// assert_eq!(paths, ["/a", "/a/b.txt"]);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn walk(tree: &Tree) -> Result<Vec<TreeEntry>> {
    let mut out = Vec::new();
    walk_dir(tree, "", 0, &mut out)?;
    Ok(out)
}

fn walk_dir(tree: &Tree, dir_path: &str, depth: usize, out: &mut Vec<TreeEntry>) -> Result<()> {
    let open_path = if dir_path.is_empty() { "/" } else { dir_path };
    let mut handle = match tree.open(open_path) {
        Ok(handle) => handle,
        Err(e) if e.is_permission_denied() => {
            debug!(path = open_path, "listing disabled, not descending");
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("cannot open '{open_path}'")),
    };
    // An index file stands in for the directory
    if !handle.is_listable() {
        return Ok(());
    }

    while let Some(page) = handle
        .read_dir(None)
        .with_context(|| format!("cannot list '{open_path}'"))?
    {
        for meta in &page {
            let path = format!("{dir_path}/{}", meta.name());
            let entry = EntryView::from(meta);
            let is_dir = entry.is_dir();
            out.push(TreeEntry {
                path: path.clone(),
                depth,
                entry,
            });
            if is_dir {
                walk_dir(tree, &path, depth + 1, out)?;
            }
        }
    }
    Ok(())
}

/// Runs the `tree` command.
///
/// # Errors
///
/// Returns an error if the walk or formatting fails.
pub fn run(tree: &Tree, output_format: OutputFormat) -> Result<ExitCode> {
    let entries = walk(tree)?;
    let formatted = format_tree(&entries, output_format).context("failed to format tree")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpdir::Node;
    use std::time::UNIX_EPOCH;

    fn paths(entries: &[TreeEntry]) -> Vec<(&str, usize)> {
        entries.iter().map(|e| (e.path.as_str(), e.depth)).collect()
    }

    #[test]
    fn test_walk_skips_unlisted_directories() {
        let mut tree = Tree::with_root_listing(UNIX_EPOCH, true);
        tree.mkdir("/pub", UNIX_EPOCH, true).unwrap();
        tree.create("/pub/z.txt", Node::text("z", UNIX_EPOCH)).unwrap();
        tree.create("/pub/a/deep.txt", Node::text("d", UNIX_EPOCH))
            .unwrap();
        tree.create("/private/secret.txt", Node::text("s", UNIX_EPOCH))
            .unwrap();
        tree.create("/site/index.html", Node::text("i", UNIX_EPOCH))
            .unwrap();

        let entries = walk(&tree).unwrap();
        assert_eq!(
            paths(&entries),
            vec![
                ("/private", 0),
                ("/pub", 0),
                ("/pub/a", 1),
                ("/pub/z.txt", 1),
                ("/site", 0),
            ]
        );
    }

    #[test]
    fn test_walk_unlisted_root_is_empty() {
        let mut tree = Tree::new(UNIX_EPOCH);
        tree.create("/a.txt", Node::text("a", UNIX_EPOCH)).unwrap();
        assert!(walk(&tree).unwrap().is_empty());
    }
}

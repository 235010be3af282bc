//! Mirroring a host directory into a tree.
//!
//! Every host directory becomes a listing-enabled tree directory and every
//! other entry becomes a host passthrough leaf, so file content and stat
//! stay live.

use anyhow::{Context, Result};
use httpdir::{Node, Tree, path::SEPARATOR};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Counts of what a mount added to the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountStats {
    /// Directories created
    pub dirs: usize,
    /// Host leaves created
    pub files: usize,
    /// Entries skipped because they could not be read or named
    pub skipped: usize,
}

/// Builds a listing-enabled tree mirroring `root`.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory.
///
/// # Examples
///
/// ```no_run
/// use httpdir_cli::mount::mount_tree;
/// use std::path::Path;
///
/// let tree = mount_tree(Path::new("./public"))?;
/// assert!(tree.open("/").unwrap().is_listing());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn mount_tree(root: &Path) -> Result<Tree> {
    let modified = root
        .metadata()
        .with_context(|| format!("cannot mount {}", root.display()))?
        .modified()
        .unwrap_or_else(|_| SystemTime::now());
    let mut tree = Tree::with_root_listing(modified, true);
    let stats = mount(&mut tree, root)?;
    debug!(
        root = %root.display(),
        dirs = stats.dirs,
        files = stats.files,
        skipped = stats.skipped,
        "mounted host directory"
    );
    Ok(tree)
}

/// Mirrors the contents of `root` under `/` of an existing tree.
///
/// Unreadable entries and names that are not valid UTF-8 are skipped with a
/// warning.
///
/// # Errors
///
/// Returns an error if `root` is not a directory, or if a mirrored path
/// collides with an existing tree entry.
pub fn mount(tree: &mut Tree, root: &Path) -> Result<MountStats> {
    if !root.is_dir() {
        anyhow::bail!("cannot mount {}: not a directory", root.display());
    }

    let mut stats = MountStats::default();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                stats.skipped += 1;
                continue;
            }
        };

        let Some(virtual_path) = virtual_path(root, entry.path()) else {
            warn!(path = %entry.path().display(), "skipping entry with non UTF-8 name");
            stats.skipped += 1;
            continue;
        };

        if entry.file_type().is_dir() {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .unwrap_or_else(SystemTime::now);
            tree.mkdir(&virtual_path, modified, true)
                .with_context(|| format!("failed to mount directory {virtual_path}"))?;
            stats.dirs += 1;
        } else {
            tree.create(&virtual_path, Node::host(entry.path()))
                .with_context(|| format!("failed to mount file {virtual_path}"))?;
            stats.files += 1;
        }
    }
    Ok(stats)
}

/// Maps a host path below `root` to a rooted tree path.
fn virtual_path(root: &Path, host: &Path) -> Option<String> {
    let relative = host.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        out.push(SEPARATOR);
        out.push_str(component.as_os_str().to_str()?);
    }
    Some(out)
}

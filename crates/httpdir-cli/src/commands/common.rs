//! Common utilities shared across CLI commands.

use crate::{config, mount};
use anyhow::{Result, bail};
use httpdir::Tree;
use std::path::PathBuf;

/// Where the tree to inspect comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// A TOML manifest
    Manifest(PathBuf),
    /// A host directory mirrored as host leaves
    Mount(PathBuf),
}

impl TreeSource {
    /// Picks the source from the global flags.
    ///
    /// `--mount` wins; otherwise the manifest is resolved through
    /// [`config::resolve_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if neither a mount nor any manifest is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpdir_cli::commands::common::TreeSource;
    /// use std::path::PathBuf;
    ///
    /// let source = TreeSource::from_flags(None, Some(PathBuf::from("public")))?;
    /// assert_eq!(source, TreeSource::Mount(PathBuf::from("public")));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_flags(manifest: Option<PathBuf>, mount: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = mount {
            return Ok(Self::Mount(dir));
        }
        match config::resolve_path(manifest) {
            Some(path) => Ok(Self::Manifest(path)),
            None => bail!(
                "no tree to inspect: pass --manifest or --mount, or set {}",
                config::MANIFEST_ENV
            ),
        }
    }

    /// Builds the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or host directory cannot be loaded.
    pub fn load(&self) -> Result<Tree> {
        match self {
            Self::Manifest(path) => config::load_tree(path),
            Self::Mount(dir) => mount::mount_tree(dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_prefers_mount() {
        let source = TreeSource::from_flags(
            Some(PathBuf::from("m.toml")),
            Some(PathBuf::from("public")),
        )
        .unwrap();
        assert_eq!(source, TreeSource::Mount(PathBuf::from("public")));
    }

    #[test]
    fn test_from_flags_explicit_manifest() {
        let source = TreeSource::from_flags(Some(PathBuf::from("m.toml")), None).unwrap();
        assert_eq!(source, TreeSource::Manifest(PathBuf::from("m.toml")));
    }
}

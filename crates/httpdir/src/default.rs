//! The process-wide default tree.
//!
//! Some callers, generated asset modules in particular, want to register
//! files into one shared tree without threading a [`Tree`] through their
//! code. This module holds that tree.
//!
//! # Lifecycle
//!
//! The default tree is created once and lives for the rest of the process.
//! Call [`init_default`] early at startup to choose the root's modification
//! time and listing flag; otherwise the first use creates it with
//! [`Tree::default`]. The free functions only lock the tree and forward to
//! the matching [`Tree`] method.
//!
//! The mutex exists because a `static` must be `Sync`; it is the
//! integration-layer lock described on [`Tree`], not part of the tree.
//!
//! # Examples
//!
//! ```
//! use httpdir::{default, Node};
//! use std::time::SystemTime;
//!
//! default::create("/robots.txt", Node::text("User-agent: *", SystemTime::now()))?;
//! assert!(default::open("/robots.txt").is_ok());
//! # Ok::<(), httpdir::DirError>(())
//! ```

use crate::error::Result;
use crate::file::File;
use crate::node::Node;
use crate::tree::Tree;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::SystemTime;

static DEFAULT: OnceLock<Mutex<Tree>> = OnceLock::new();

/// Installs `tree` as the default tree.
///
/// # Errors
///
/// Returns `tree` back if the default tree was already initialised, either
/// by an earlier call or by first use.
pub fn init_default(tree: Tree) -> std::result::Result<(), Tree> {
    DEFAULT
        .set(Mutex::new(tree))
        .map_err(|rejected| rejected.into_inner().unwrap_or_else(PoisonError::into_inner))
}

/// Returns the default tree, creating it on first use.
pub fn default_tree() -> &'static Mutex<Tree> {
    DEFAULT.get_or_init(|| Mutex::new(Tree::default()))
}

fn lock() -> MutexGuard<'static, Tree> {
    default_tree()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Forwards to [`Tree::open`] on the default tree.
///
/// # Errors
///
/// See [`Tree::open`].
pub fn open(path: &str) -> Result<File> {
    lock().open(path)
}

/// Forwards to [`Tree::mkdir`] on the default tree.
///
/// # Errors
///
/// See [`Tree::mkdir`].
pub fn mkdir(path: &str, mod_time: SystemTime, listing: bool) -> Result<()> {
    lock().mkdir(path, mod_time, listing)
}

/// Forwards to [`Tree::create`] on the default tree.
///
/// # Errors
///
/// See [`Tree::create`].
pub fn create(path: &str, node: Node) -> Result<()> {
    lock().create(path, node)
}

/// Forwards to [`Tree::remove`] on the default tree.
///
/// # Errors
///
/// See [`Tree::remove`].
pub fn remove(path: &str) -> Result<()> {
    lock().remove(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    // The default tree is shared by every test in this binary, so each test
    // works under its own top-level directory.

    #[test]
    fn test_forwarding_roundtrip() {
        create("/default-roundtrip/a.txt", Node::text("a", UNIX_EPOCH)).unwrap();
        assert_eq!(open("/default-roundtrip/a.txt").unwrap().stat().size(), 1);

        remove("/default-roundtrip").unwrap();
        assert!(open("/default-roundtrip/a.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_forwarding_mkdir() {
        mkdir("/default-mkdir", UNIX_EPOCH, true).unwrap();
        assert!(open("/default-mkdir").unwrap().is_listing());
    }

    #[test]
    fn test_init_after_first_use_is_rejected() {
        let _ = default_tree();
        let rejected = init_default(Tree::new(UNIX_EPOCH)).unwrap_err();
        assert!(rejected.root().is_empty());
    }
}

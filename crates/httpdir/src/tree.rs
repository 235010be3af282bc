//! The tree container: path resolution and mutation.
//!
//! A [`Tree`] owns its root directory and everything below it. Paths are
//! cleaned lexically before use (see [`path::clean`](crate::path::clean)),
//! so `"a/./b"`, `"/a//b"` and `"/a/c/../b"` all name the same entry.
//!
//! # Ownership
//!
//! The tree does no locking of its own. Mutation takes `&mut self`, so an
//! owned tree is single-writer by construction; to share one between
//! threads, wrap it in a `Mutex` or `RwLock` at the integration layer.
//!
//! # Examples
//!
//! ```
//! use httpdir::{Node, Tree};
//! use std::time::SystemTime;
//!
//! let now = SystemTime::now();
//! let mut tree = Tree::new(now);
//! tree.mkdir("/static", now, true)?;
//! tree.create("/static/app.js", Node::text("console.log(1);", now))?;
//! tree.create("/static/style.css", Node::text("body {}", now))?;
//!
//! let mut dir = tree.open("/static")?;
//! let entries = dir.read_dir(None)?.unwrap_or_default();
//! let names: Vec<_> = entries.iter().map(|e| e.name()).collect();
//! assert_eq!(names, ["app.js", "style.css"]);
//! # Ok::<(), httpdir::DirError>(())
//! ```

use crate::directory::Directory;
use crate::error::{DirError, Result};
use crate::file::File;
use crate::node::Node;
use crate::path;
use std::collections::hash_map::Entry;
use std::time::SystemTime;

/// An in-memory directory tree.
#[derive(Debug)]
pub struct Tree {
    root: Directory,
}

impl Tree {
    /// Creates an empty tree whose root has listing disabled.
    ///
    /// Opening the root then requires an `index.html` at the top level.
    #[must_use]
    pub fn new(mod_time: SystemTime) -> Self {
        Self::with_root_listing(mod_time, false)
    }

    /// Creates an empty tree, choosing whether the root can be listed.
    #[must_use]
    pub fn with_root_listing(mod_time: SystemTime, listing: bool) -> Self {
        Self {
            root: Directory::new(mod_time, listing),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub const fn root(&self) -> &Directory {
        &self.root
    }

    /// Opens the entry at `path`.
    ///
    /// An empty path (or `/`) opens the root. The handle is named after the
    /// last path segment.
    ///
    /// # Errors
    ///
    /// - `DirError::NotFound` if a segment does not exist
    /// - `DirError::Invalid` if a segment before the last is not a directory
    /// - `DirError::PermissionDenied` if the target is a directory with
    ///   listing disabled and no `index.html`
    /// - the categorised host error if a host leaf fails to open
    pub fn open(&self, path: &str) -> Result<File> {
        let cleaned = path::clean(path);
        let mut dir = &self.root;
        let mut segments = path::segments(&cleaned).peekable();
        while let Some(segment) = segments.next() {
            let node = dir
                .get(segment)
                .ok_or_else(|| DirError::not_found(cleaned.as_str()))?;
            if segments.peek().is_none() {
                return File::open(segment, node);
            }
            dir = match node {
                Node::Directory(child) => child,
                _ => return Err(DirError::invalid(cleaned.as_str(), "not a directory")),
            };
        }
        File::open_dir("", dir)
    }

    /// Creates the directory at `path` and any missing parents.
    ///
    /// New directories get `mod_time` and `listing`. Directories that already
    /// exist are left as they are, so creating an existing directory again is
    /// a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns `DirError::Invalid` if a segment of `path` exists but is not a
    /// directory.
    pub fn mkdir(&mut self, path: &str, mod_time: SystemTime, listing: bool) -> Result<()> {
        let cleaned = path::clean(path);
        self.make_dirs(&cleaned, mod_time, listing).map(|_| ())
    }

    /// Inserts `node` at `path`.
    ///
    /// Missing parents are created with the node's modification time and
    /// listing disabled; use [`Tree::mkdir`] first for other settings.
    ///
    /// # Errors
    ///
    /// - `DirError::AlreadyExists` if the name is taken (the tree is left
    ///   unchanged)
    /// - `DirError::Invalid` if `path` names the root, or a parent segment is
    ///   not a directory
    pub fn create(&mut self, path: &str, node: Node) -> Result<()> {
        let cleaned = path::clean(path);
        let (parent, name) = path::split(&cleaned);
        if name.is_empty() {
            return Err(DirError::invalid(cleaned, "missing file name"));
        }

        let dir = self.make_dirs(parent, node.mod_time(), false)?;
        match dir.children_mut().entry(name.to_string()) {
            Entry::Occupied(_) => Err(DirError::AlreadyExists { path: cleaned }),
            Entry::Vacant(slot) => {
                tracing::debug!(path = %cleaned, kind = node.kind().as_str(), "created node");
                slot.insert(node);
                Ok(())
            }
        }
    }

    /// Removes the entry at `path`, including everything below it.
    ///
    /// # Errors
    ///
    /// - `DirError::NotFound` if the parent path or the entry does not exist
    /// - `DirError::Invalid` if the parent is not a directory, or `path`
    ///   names the root
    pub fn remove(&mut self, path: &str) -> Result<()> {
        let cleaned = path::clean(path);
        let (parent, name) = path::split(&cleaned);
        if name.is_empty() {
            return Err(DirError::invalid(cleaned, "cannot remove the root directory"));
        }

        let dir = self.find_dir_mut(parent, &cleaned)?;
        match dir.remove(name) {
            Some(removed) => {
                tracing::debug!(path = %cleaned, kind = removed.kind().as_str(), "removed node");
                Ok(())
            }
            None => Err(DirError::NotFound { path: cleaned }),
        }
    }

    fn make_dirs(
        &mut self,
        cleaned: &str,
        mod_time: SystemTime,
        listing: bool,
    ) -> Result<&mut Directory> {
        let mut dir = &mut self.root;
        for segment in path::segments(cleaned) {
            let node = dir
                .children_mut()
                .entry(segment.to_string())
                .or_insert_with(|| {
                    tracing::debug!(segment, listing, "created directory");
                    Node::Directory(Directory::new(mod_time, listing))
                });
            dir = match node {
                Node::Directory(child) => child,
                _ => return Err(DirError::invalid(cleaned, "path component is not a directory")),
            };
        }
        Ok(dir)
    }

    fn find_dir_mut(&mut self, dir_path: &str, full: &str) -> Result<&mut Directory> {
        let mut dir = &mut self.root;
        for segment in path::segments(dir_path) {
            dir = match dir.children_mut().get_mut(segment) {
                Some(Node::Directory(child)) => child,
                Some(_) => return Err(DirError::invalid(full, "parent is not a directory")),
                None => return Err(DirError::not_found(full)),
            };
        }
        Ok(dir)
    }
}

impl Default for Tree {
    /// An empty tree with the root modified now.
    fn default() -> Self {
        Self::new(SystemTime::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn read_all(tree: &Tree, path: &str) -> String {
        let mut out = String::new();
        tree.open(path).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_dir_walkthrough() {
        let mut tree = Tree::new(at(0));
        tree.mkdir("/dir", at(1), true).unwrap();
        tree.mkdir("/dir2", at(1), false).unwrap();

        assert!(tree.open("/dir").is_ok());
        assert!(tree.open("/dir2").unwrap_err().is_permission_denied());

        tree.create("/dir3/test/hello", Node::text("Hello, World!", at(2)))
            .unwrap();
        let mut file = tree.open("/dir3/test/hello").unwrap();
        assert_eq!(file.stat().name(), "hello");
        let mut data = [0u8; 20];
        let n = file.read(&mut data).unwrap();
        assert_eq!(&data[..n], b"Hello, World!");

        tree.remove("/dir3/test/hello").unwrap();
        let Some(Node::Directory(dir3)) = tree.root().get("dir3") else {
            panic!("dir3 missing");
        };
        let Some(Node::Directory(test)) = dir3.get("test") else {
            panic!("dir3/test missing");
        };
        assert!(test.is_empty());

        tree.remove("/dir3").unwrap();
        assert_eq!(tree.root().len(), 2);
    }

    #[test]
    fn test_mkdir_is_idempotent() {
        let mut tree = Tree::new(at(0));
        tree.mkdir("/a", at(10), true).unwrap();
        tree.mkdir("/a", at(20), false).unwrap();

        let Some(Node::Directory(a)) = tree.root().get("a") else {
            panic!("a missing");
        };
        assert_eq!(a.mod_time(), at(10));
        assert!(a.listing_enabled());
    }

    #[test]
    fn test_mkdir_through_leaf_is_invalid() {
        let mut tree = Tree::new(at(0));
        tree.create("/a", Node::text("x", at(0))).unwrap();
        assert!(tree.mkdir("/a/b", at(0), true).unwrap_err().is_invalid());
        assert!(tree.mkdir("/a", at(0), true).unwrap_err().is_invalid());
    }

    #[test]
    fn test_mkdir_root_is_noop() {
        let mut tree = Tree::new(at(0));
        tree.mkdir("/", at(5), true).unwrap();
        assert!(!tree.root().listing_enabled());
        assert_eq!(tree.root().mod_time(), at(0));
    }

    #[test]
    fn test_create_rejects_collision() {
        let mut tree = Tree::new(at(0));
        tree.create("/a/b", Node::text("first", at(0))).unwrap();
        let err = tree.create("/a/b", Node::text("second", at(0))).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(err.path(), "/a/b");
        assert_eq!(read_all(&tree, "/a/b"), "first");
    }

    #[test]
    fn test_create_over_directory_is_rejected() {
        let mut tree = Tree::new(at(0));
        tree.mkdir("/a/b", at(0), true).unwrap();
        let err = tree.create("/a/b", Node::text("x", at(0))).unwrap_err();
        assert!(err.is_already_exists());
        assert!(tree.open("/a/b").unwrap().is_listing());
    }

    #[test]
    fn test_create_auto_parents() {
        let mut tree = Tree::new(at(0));
        tree.create("/x/y/z", Node::bytes(vec![1, 2], at(7))).unwrap();

        let Some(Node::Directory(x)) = tree.root().get("x") else {
            panic!("x missing");
        };
        assert!(!x.listing_enabled());
        assert_eq!(x.mod_time(), at(7));
        let Some(Node::Directory(y)) = x.get("y") else {
            panic!("x/y missing");
        };
        assert!(!y.listing_enabled());
        assert!(tree.open("/x/y").unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_create_under_leaf_is_invalid() {
        let mut tree = Tree::new(at(0));
        tree.create("/file", Node::text("x", at(0))).unwrap();
        let err = tree.create("/file/child", Node::text("y", at(0))).unwrap_err();
        assert!(err.is_invalid());
    }

    #[test]
    fn test_create_root_is_invalid() {
        let mut tree = Tree::new(at(0));
        assert!(tree.create("/", Node::text("x", at(0))).unwrap_err().is_invalid());
        assert!(tree.create("", Node::text("x", at(0))).unwrap_err().is_invalid());
    }

    #[test]
    fn test_open_cleans_path() {
        let mut tree = Tree::new(at(0));
        tree.create("/a/b.txt", Node::text("b", at(0))).unwrap();
        assert_eq!(read_all(&tree, "a/./b.txt"), "b");
        assert_eq!(read_all(&tree, "//a//b.txt"), "b");
        assert_eq!(read_all(&tree, "/a/c/../b.txt"), "b");
        assert_eq!(read_all(&tree, "/../a/b.txt"), "b");
    }

    #[test]
    fn test_open_errors() {
        let mut tree = Tree::new(at(0));
        tree.create("/a/leaf", Node::text("x", at(0))).unwrap();

        assert!(tree.open("/missing").unwrap_err().is_not_found());
        assert!(tree.open("/missing/deeper").unwrap_err().is_not_found());
        assert!(tree.open("/a/leaf/deeper").unwrap_err().is_invalid());
    }

    #[test]
    fn test_open_root() {
        let tree = Tree::with_root_listing(at(3), true);
        let file = tree.open("").unwrap();
        assert_eq!(file.stat().name(), "");
        assert!(file.stat().is_dir());
        assert_eq!(file.stat().modified(), at(3));
        assert!(tree.open("/").unwrap().is_listing());

        let tree = Tree::new(at(0));
        assert!(tree.open("/").unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_index_substitution_keeps_directory_stat() {
        let mut tree = Tree::new(at(0));
        tree.mkdir("/site", at(1), false).unwrap();
        tree.create("/site/index.html", Node::text("<h1>hi</h1>", at(4)))
            .unwrap();

        let file = tree.open("/site").unwrap();
        assert_eq!(file.name(), "site");
        assert!(file.stat().is_dir());
        assert_eq!(file.stat().size(), 0);
        assert_eq!(file.stat().modified(), at(1));
        assert_eq!(read_all(&tree, "/site"), "<h1>hi</h1>");
    }

    #[test]
    fn test_root_index_substitution() {
        let mut tree = Tree::new(at(0));
        tree.create("/index.html", Node::text("home", at(0))).unwrap();
        assert_eq!(read_all(&tree, "/"), "home");
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = Tree::new(at(0));
        tree.create("/a/b/c", Node::text("c", at(0))).unwrap();
        tree.create("/a/d", Node::text("d", at(0))).unwrap();

        tree.remove("/a").unwrap();
        for path in ["/a", "/a/b", "/a/b/c", "/a/d"] {
            assert!(tree.open(path).unwrap_err().is_not_found(), "{path}");
        }
    }

    #[test]
    fn test_remove_errors() {
        let mut tree = Tree::new(at(0));
        tree.create("/leaf", Node::text("x", at(0))).unwrap();

        assert!(tree.remove("/missing").unwrap_err().is_not_found());
        assert!(tree.remove("/missing/child").unwrap_err().is_not_found());
        assert!(tree.remove("/leaf/child").unwrap_err().is_invalid());
        assert!(tree.remove("/").unwrap_err().is_invalid());
        assert!(tree.open("/leaf").is_ok());
    }

    #[test]
    fn test_default_tree_is_empty() {
        let tree = Tree::default();
        assert!(tree.root().is_empty());
    }
}

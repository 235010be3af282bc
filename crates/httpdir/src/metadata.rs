//! Stat records reported by handles and directory listings.

use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

/// The kind of entry a node represents.
///
/// `File` is the zero value, reported for host entries whose stat fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// A directory
    Directory,
    /// A regular file
    #[default]
    File,
    /// A host entry that is neither a regular file nor a directory
    Other,
}

impl NodeKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "regular file",
            Self::Other => "other",
        }
    }

    pub(crate) fn from_fs(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Name, size, kind and modification time of an opened or listed entry.
///
/// The name is the path segment the entry was reached by; nodes themselves
/// do not know their names.
///
/// # Examples
///
/// ```
/// use httpdir::{Node, NodeKind, Tree};
/// use std::time::SystemTime;
///
/// let mut tree = Tree::new(SystemTime::UNIX_EPOCH);
/// tree.create("/notes/todo.txt", Node::text("milk", SystemTime::UNIX_EPOCH))?;
///
/// let file = tree.open("/notes/todo.txt")?;
/// let stat = file.stat();
/// assert_eq!(stat.name(), "todo.txt");
/// assert_eq!(stat.size(), 4);
/// assert_eq!(stat.kind(), NodeKind::File);
/// # Ok::<(), httpdir::DirError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    name: String,
    size: u64,
    kind: NodeKind,
    modified: SystemTime,
}

impl Metadata {
    pub(crate) fn new(name: impl Into<String>, size: u64, kind: NodeKind, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
            modified,
        }
    }

    pub(crate) fn from_fs(name: impl Into<String>, meta: &fs::Metadata) -> Self {
        Self::new(
            name,
            meta.len(),
            NodeKind::from_fs(meta.file_type()),
            meta.modified().unwrap_or(UNIX_EPOCH),
        )
    }

    /// Returns the entry name (empty for the tree root).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size in bytes. Directories report 0.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the modification time.
    #[must_use]
    pub const fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Returns `true` if the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

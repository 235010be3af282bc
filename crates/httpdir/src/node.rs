//! The closed set of tree entries.
//!
//! Every entry in the tree is a [`Node`]. The variants share one capability
//! set: report size, kind and modification time, and open into a
//! [`File`](crate::File) handle.
//!
//! # Examples
//!
//! ```
//! use httpdir::{Node, NodeKind};
//! use std::time::SystemTime;
//!
//! let node = Node::bytes(vec![1, 2, 3], SystemTime::UNIX_EPOCH);
//! assert_eq!(node.size(), 3);
//! assert_eq!(node.kind(), NodeKind::File);
//! ```

use crate::directory::Directory;
use crate::error::{DirError, Result};
use crate::file::File;
use crate::leaf::{ByteLeaf, HostLeaf, TextLeaf};
use crate::metadata::{Metadata, NodeKind};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// An entry in the tree.
#[derive(Debug)]
pub enum Node {
    /// A directory of named children
    Directory(Directory),
    /// Content held in a byte buffer
    Bytes(ByteLeaf),
    /// Content held in a string
    Text(TextLeaf),
    /// Content read from the host filesystem on open
    Host(HostLeaf),
}

impl Node {
    /// Creates a leaf backed by a byte buffer.
    #[must_use]
    pub fn bytes(data: impl Into<Arc<[u8]>>, mod_time: SystemTime) -> Self {
        Self::Bytes(ByteLeaf::new(data, mod_time))
    }

    /// Creates a leaf backed by a string.
    #[must_use]
    pub fn text(text: impl Into<Arc<str>>, mod_time: SystemTime) -> Self {
        Self::Text(TextLeaf::new(text, mod_time))
    }

    /// Creates a leaf that passes through to a host filesystem entry.
    #[must_use]
    pub fn host(path: impl Into<PathBuf>) -> Self {
        Self::Host(HostLeaf::new(path))
    }

    /// Returns the content size in bytes. Directories report 0.
    #[must_use]
    pub fn size(&self) -> u64 {
        match self {
            Self::Directory(_) => 0,
            Self::Bytes(leaf) => leaf.size(),
            Self::Text(leaf) => leaf.size(),
            Self::Host(leaf) => leaf.size(),
        }
    }

    /// Returns the node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::Bytes(_) | Self::Text(_) => NodeKind::File,
            Self::Host(leaf) => leaf.kind(),
        }
    }

    /// Returns the modification time.
    #[must_use]
    pub fn mod_time(&self) -> SystemTime {
        match self {
            Self::Directory(dir) => dir.mod_time(),
            Self::Bytes(leaf) => leaf.mod_time(),
            Self::Text(leaf) => leaf.mod_time(),
            Self::Host(leaf) => leaf.mod_time(),
        }
    }

    /// Returns `true` if the node is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Opens the node on its own, with an empty name.
    ///
    /// # Errors
    ///
    /// Returns `DirError::PermissionDenied` for a directory with listing
    /// disabled and no index file, or the categorised host error for a host
    /// leaf that cannot be opened.
    pub fn open(&self) -> Result<File> {
        File::open("", self)
    }

    pub(crate) fn metadata(&self, name: &str) -> Metadata {
        match self {
            Self::Directory(dir) => dir.metadata(name),
            leaf => Metadata::new(name, leaf.size(), leaf.kind(), leaf.mod_time()),
        }
    }
}

/// Decodes the gzip content of `node` into a new byte leaf.
///
/// Exactly `size` bytes of decompressed output are read. The new leaf keeps
/// the modification time of `node`.
///
/// # Errors
///
/// Returns any error from opening `node`, or `DirError::Decompress` if the
/// content is not valid gzip or decodes to fewer than `size` bytes. The error
/// carries the host path when `node` is a host leaf.
///
/// # Examples
///
/// ```no_run
/// use httpdir::{decompressed, Node};
///
/// let compressed = Node::host("assets/app.js.gz");
/// let plain = decompressed(&compressed, 48_213)?;
/// assert_eq!(plain.size(), 48_213);
/// # Ok::<(), httpdir::DirError>(())
/// ```
pub fn decompressed(node: &Node, size: usize) -> Result<Node> {
    let file = node.open()?;
    let mut decoder = GzDecoder::new(file);
    let mut buf = vec![0; size];
    decoder
        .read_exact(&mut buf)
        .map_err(|source| DirError::Decompress {
            path: match node {
                Node::Host(leaf) => leaf.path().display().to_string(),
                _ => String::new(),
            },
            source,
        })?;
    tracing::trace!(size, "decompressed gzip content");
    Ok(Node::bytes(buf, node.mod_time()))
}

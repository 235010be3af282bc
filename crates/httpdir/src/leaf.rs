//! Content-bearing leaf nodes.
//!
//! Byte and text leaves hold an immutable, reference-counted buffer, so
//! opening one never copies its content. Host leaves only remember a path and
//! ask the host filesystem for everything else at call time.

use crate::error::{DirError, Result};
use crate::metadata::NodeKind;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A leaf backed by an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteLeaf {
    data: Arc<[u8]>,
    mod_time: SystemTime,
}

impl ByteLeaf {
    /// Creates a byte leaf.
    #[must_use]
    pub fn new(data: impl Into<Arc<[u8]>>, mod_time: SystemTime) -> Self {
        Self {
            data: data.into(),
            mod_time,
        }
    }

    /// Returns the content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns the modification time.
    #[must_use]
    pub const fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    pub(crate) fn reader(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.data))
    }
}

/// A leaf backed by an immutable string.
#[derive(Debug, Clone)]
pub struct TextLeaf {
    text: Arc<str>,
    mod_time: SystemTime,
}

impl TextLeaf {
    /// Creates a text leaf.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>, mod_time: SystemTime) -> Self {
        Self {
            text: text.into(),
            mod_time,
        }
    }

    /// Returns the content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.text.len() as u64
    }

    /// Returns the modification time.
    #[must_use]
    pub const fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    pub(crate) fn reader(&self) -> Cursor<TextBuf> {
        Cursor::new(TextBuf(Arc::clone(&self.text)))
    }
}

/// Shared string viewed as bytes, so it can back a `Cursor`.
#[derive(Debug, Clone)]
pub(crate) struct TextBuf(Arc<str>);

impl AsRef<[u8]> for TextBuf {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A leaf that passes through to an entry on the host filesystem.
///
/// Size, kind and modification time are queried live. A failed stat is not
/// an error: it reports `0`, [`NodeKind::File`] and the Unix epoch instead.
#[derive(Debug, Clone)]
pub struct HostLeaf {
    path: PathBuf,
}

impl HostLeaf {
    /// Creates a host leaf for `path`. The path is not checked.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the host path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stat(&self) -> Option<fs::Metadata> {
        fs::metadata(&self.path).ok()
    }

    /// Returns the current size of the host entry.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.stat().map_or(0, |meta| meta.len())
    }

    /// Returns the current kind of the host entry.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.stat()
            .map_or_else(NodeKind::default, |meta| NodeKind::from_fs(meta.file_type()))
    }

    /// Returns the current modification time of the host entry.
    #[must_use]
    pub fn mod_time(&self) -> SystemTime {
        self.stat()
            .and_then(|meta| meta.modified().ok())
            .unwrap_or(UNIX_EPOCH)
    }

    pub(crate) fn open(&self) -> Result<fs::File> {
        fs::File::open(&self.path)
            .map_err(|e| DirError::from_host(self.path.display().to_string(), e))
    }
}

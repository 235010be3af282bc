//! Open handles.
//!
//! A [`File`] binds the name a node was reached by to whatever opening that
//! node produced: a content reader or a directory listing. It implements
//! [`Read`] and [`Seek`], and adds [`File::read_dir`], [`File::stat`] and
//! [`File::close`], which together form the surface a static file server
//! needs.
//!
//! Closing or dropping a handle never touches the tree.

use crate::directory::{Directory, Listing, Opening};
use crate::error::{DirError, Result};
use crate::leaf::TextBuf;
use crate::metadata::Metadata;
use crate::node::Node;
use std::fs;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An open tree entry.
///
/// # Examples
///
/// ```
/// use httpdir::{Node, Tree};
/// use std::io::Read;
/// use std::time::SystemTime;
///
/// let mut tree = Tree::new(SystemTime::UNIX_EPOCH);
/// tree.create("/hello.txt", Node::text("Hello, World!", SystemTime::UNIX_EPOCH))?;
///
/// let mut file = tree.open("/hello.txt")?;
/// let mut content = String::new();
/// file.read_to_string(&mut content)?;
/// assert_eq!(content, "Hello, World!");
/// file.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct File {
    info: Metadata,
    content: Content,
}

#[derive(Debug)]
enum Content {
    Bytes(Cursor<Arc<[u8]>>),
    Text(Cursor<TextBuf>),
    Host(HostFile),
    Listing(Listing),
}

#[derive(Debug)]
struct HostFile {
    file: fs::File,
    path: PathBuf,
    is_dir: bool,
    listing: Option<Listing>,
}

impl HostFile {
    fn listing(&mut self) -> Result<&mut Listing> {
        let listing = match self.listing.take() {
            Some(listing) => listing,
            None => Self::snapshot(&self.path)?,
        };
        Ok(self.listing.insert(listing))
    }

    fn snapshot(path: &Path) -> Result<Listing> {
        let host_err = |e| DirError::from_host(path.display().to_string(), e);
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(host_err)? {
            let entry = entry.map_err(host_err)?;
            let meta = entry.metadata().map_err(host_err)?;
            entries.push(Metadata::from_fs(entry.file_name().to_string_lossy(), &meta));
        }
        Ok(Listing::new(entries))
    }
}

impl File {
    /// Opens `node` under the name it was resolved by.
    pub(crate) fn open(name: &str, node: &Node) -> Result<Self> {
        let content = match node {
            Node::Directory(dir) => return Self::open_dir(name, dir),
            Node::Bytes(leaf) => Content::Bytes(leaf.reader()),
            Node::Text(leaf) => Content::Text(leaf.reader()),
            Node::Host(leaf) => {
                let file = leaf.open()?;
                let info = file
                    .metadata()
                    .map(|meta| Metadata::from_fs(name, &meta))
                    .map_err(|e| DirError::from_host(leaf.path().display().to_string(), e))?;
                let is_dir = info.is_dir();
                return Ok(Self {
                    info,
                    content: Content::Host(HostFile {
                        file,
                        path: leaf.path().to_path_buf(),
                        is_dir,
                        listing: None,
                    }),
                });
            }
        };
        Ok(Self {
            info: node.metadata(name),
            content,
        })
    }

    /// Opens a directory, applying index substitution when listing is off.
    ///
    /// A substituted index serves its content under the directory's stat
    /// record, so callers see the directory they asked for.
    pub(crate) fn open_dir(name: &str, dir: &Directory) -> Result<Self> {
        match dir.open() {
            Opening::Listing(listing) => Ok(Self {
                info: dir.metadata(name),
                content: Content::Listing(listing),
            }),
            Opening::Index(index) => {
                tracing::trace!(name, "serving index file in place of directory");
                let opened = Self::open(name, index)?;
                Ok(Self {
                    info: dir.metadata(name),
                    content: opened.content,
                })
            }
            Opening::Denied => Err(DirError::PermissionDenied {
                path: name.to_string(),
            }),
        }
    }

    /// Returns the stat record of the handle.
    #[must_use]
    pub const fn stat(&self) -> &Metadata {
        &self.info
    }

    /// Returns the name the handle was opened under.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Returns `true` if this handle enumerates a directory listing.
    #[must_use]
    pub const fn is_listing(&self) -> bool {
        matches!(self.content, Content::Listing(_))
    }

    /// Returns `true` if [`File::read_dir`] can enumerate children: a tree
    /// listing or a host directory.
    ///
    /// A directory served through its index file reports a directory stat
    /// but is not listable.
    #[must_use]
    pub const fn is_listable(&self) -> bool {
        match &self.content {
            Content::Listing(_) => true,
            Content::Host(host) => host.is_dir,
            Content::Bytes(_) | Content::Text(_) => false,
        }
    }

    /// Reads up to `count` directory entries, or all remaining for `None`.
    ///
    /// Returns `Ok(None)` once the listing is exhausted. Host directories are
    /// snapshotted on the first call.
    ///
    /// # Errors
    ///
    /// Returns `DirError::Invalid` for content handles, or the categorised
    /// host error if a host directory cannot be read.
    pub fn read_dir(&mut self, count: Option<usize>) -> Result<Option<Vec<Metadata>>> {
        match &mut self.content {
            Content::Listing(listing) => Ok(listing.next_page(count)),
            Content::Host(host) if host.is_dir => Ok(host.listing()?.next_page(count)),
            _ => Err(DirError::invalid(
                self.info.name(),
                "cannot list the children of a file",
            )),
        }
    }

    /// Closes the handle.
    ///
    /// # Errors
    ///
    /// Never fails for in-memory content; kept fallible for parity with
    /// host-backed handles.
    pub fn close(self) -> Result<()> {
        drop(self);
        Ok(())
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.content {
            Content::Bytes(cursor) => cursor.read(buf),
            Content::Text(cursor) => cursor.read(buf),
            Content::Host(host) => host.file.read(buf),
            Content::Listing(_) => {
                Err(DirError::invalid(self.info.name(), "cannot read a directory listing").into())
            }
        }
    }
}

impl Seek for File {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.content {
            Content::Bytes(cursor) => cursor.seek(pos),
            Content::Text(cursor) => cursor.seek(pos),
            Content::Host(host) => {
                let offset = host.file.seek(pos)?;
                if offset == 0
                    && let Some(listing) = &mut host.listing
                {
                    listing.seek(SeekFrom::Start(0));
                }
                Ok(offset)
            }
            Content::Listing(listing) => {
                if listing.seek(pos) {
                    Ok(0)
                } else {
                    Err(DirError::invalid(
                        self.info.name(),
                        "directory listings only rewind to position 0",
                    )
                    .into())
                }
            }
        }
    }
}

//! Error types for tree operations.
//!
//! Every failure the tree can report falls into one of a handful of
//! categories that map directly onto [`std::io::ErrorKind`], so handles can
//! surface tree errors through the standard `Read`/`Seek` traits without
//! losing their meaning.
//!
//! # Examples
//!
//! ```
//! use httpdir::{DirError, Tree};
//! use std::time::SystemTime;
//!
//! let tree = Tree::new(SystemTime::UNIX_EPOCH);
//! let err = tree.open("/missing.txt").unwrap_err();
//!
//! assert!(err.is_not_found());
//! assert_eq!(err.path(), "/missing.txt");
//! ```

use std::io;
use thiserror::Error;

/// Errors that can occur while resolving, mutating or reading the tree.
///
/// All variants carry the path the operation was applied to, and implement
/// `is_xxx()` methods for easy error classification.
#[derive(Error, Debug)]
pub enum DirError {
    /// A path segment or child name does not exist.
    #[error("Not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// `create` targeted a name that is already occupied.
    ///
    /// Existing entries are never replaced implicitly; remove them first.
    #[error("Already exists: {path}")]
    AlreadyExists {
        /// The occupied path
        path: String,
    },

    /// The operation is structurally wrong for the target.
    ///
    /// Raised when descending through a leaf, reading a directory listing as
    /// a byte stream, seeking a listing anywhere but its start, or listing a
    /// content handle.
    #[error("Invalid operation on {path}: {reason}")]
    Invalid {
        /// The path the operation was applied to
        path: String,
        /// Short description of what was wrong
        reason: &'static str,
    },

    /// The directory has listing disabled and no index file to stand in.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// The directory that refused to open
        path: String,
    },

    /// Host filesystem failure that does not fit another category.
    #[error("Host I/O error on {path}")]
    Io {
        /// The host path involved
        path: String,
        /// Underlying host error
        #[source]
        source: io::Error,
    },

    /// Compressed content could not be decoded.
    #[error("Failed to decompress {}: {source}", or_content(.path))]
    Decompress {
        /// Host path of the compressed leaf, empty for in-memory content
        path: String,
        /// Underlying decoder error
        #[source]
        source: io::Error,
    },
}

impl DirError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn invalid(path: impl Into<String>, reason: &'static str) -> Self {
        Self::Invalid {
            path: path.into(),
            reason,
        }
    }

    /// Categorises a host filesystem error.
    ///
    /// Kinds that have a counterpart in the taxonomy are translated; anything
    /// else is carried unchanged in [`DirError::Io`].
    ///
    /// # Examples
    ///
    /// ```
    /// use httpdir::DirError;
    /// use std::io;
    ///
    /// let err = DirError::from_host("/srv/a.txt", io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.is_not_found());
    ///
    /// let err = DirError::from_host("/srv/a.txt", io::Error::other("disk on fire"));
    /// assert!(err.is_io());
    /// ```
    #[must_use]
    pub fn from_host(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::InvalidInput => Self::Invalid {
                path,
                reason: "rejected by the host filesystem",
            },
            _ => Self::Io { path, source },
        }
    }

    /// Returns the path the failed operation was applied to.
    ///
    /// Decompression of in-memory content has no path and returns `""`.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::AlreadyExists { path }
            | Self::Invalid { path, .. }
            | Self::PermissionDenied { path }
            | Self::Io { path, .. }
            | Self::Decompress { path, .. } => path,
        }
    }

    /// Returns the [`io::ErrorKind`] this error corresponds to.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::NotFound { .. } => io::ErrorKind::NotFound,
            Self::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            Self::Invalid { .. } => io::ErrorKind::InvalidInput,
            Self::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            Self::Io { source, .. } | Self::Decompress { source, .. } => source.kind(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns `true` if this is an invalid operation error.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Returns `true` if this is a permission denied error.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Returns `true` if this is an uncategorised host I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<DirError> for io::Error {
    fn from(err: DirError) -> Self {
        match err {
            DirError::Io { source, .. } => source,
            other => Self::new(other.kind(), other),
        }
    }
}

fn or_content(path: &str) -> &str {
    if path.is_empty() { "content" } else { path }
}

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, DirError>;

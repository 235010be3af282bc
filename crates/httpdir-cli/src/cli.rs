//! Output formats and process exit codes for the `httpdir` binary.
//!
//! # Examples
//!
//! ```
//! use httpdir::DirError;
//! use httpdir_cli::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format.as_str(), "json");
//!
//! let err = DirError::PermissionDenied { path: "/private".into() };
//! assert_eq!(ExitCode::from(&err), ExitCode::PERMISSION_DENIED);
//! ```

use httpdir::DirError;
use std::fmt;
use std::str::FromStr;

/// How `ls`, `stat` and `tree` render entries. `cat` always writes raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON document per command
    Json,
    /// One tab-separated line per entry
    Text,
    /// Colored columns
    #[default]
    Pretty,
}

impl OutputFormat {
    const ALL: [Self; 3] = [Self::Json, Self::Text, Self::Pretty];

    /// Name accepted by `--format`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown `--format` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}' (expected json, text or pretty)")]
pub struct InvalidFormat(String);

impl FromStr for OutputFormat {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidFormat(s.to_string()))
    }
}

/// Exit status of the `httpdir` process.
///
/// Each tree failure a file server would turn into a distinct response gets
/// its own code, so scripts can tell a missing path from an unlistable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// The command completed.
    pub const SUCCESS: Self = Self(0);

    /// Host I/O, decompression or formatting failed.
    pub const ERROR: Self = Self(1);

    /// A malformed path or a colliding tree entry.
    pub const INVALID_INPUT: Self = Self(2);

    /// A path segment does not exist.
    pub const NOT_FOUND: Self = Self(3);

    /// A directory has listing disabled and no index file.
    pub const PERMISSION_DENIED: Self = Self(4);

    /// Value passed to [`std::process::exit`].
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Picks the exit code for a failed command from the first [`DirError`]
    /// in the error chain, or [`ExitCode::ERROR`] if there is none.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|e| e.downcast_ref::<DirError>())
            .map_or(Self::ERROR, Self::from)
    }
}

impl From<&DirError> for ExitCode {
    fn from(err: &DirError) -> Self {
        match err {
            DirError::NotFound { .. } => Self::NOT_FOUND,
            DirError::PermissionDenied { .. } => Self::PERMISSION_DENIED,
            DirError::Invalid { .. } | DirError::AlreadyExists { .. } => Self::INVALID_INPUT,
            DirError::Io { .. } | DirError::Decompress { .. } => Self::ERROR,
        }
    }
}

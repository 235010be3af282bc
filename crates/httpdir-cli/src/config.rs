//! Tree manifests.
//!
//! A manifest is a TOML file declaring directories and files. Files carry
//! their content inline, point at a host file, or point at a gzip file on the
//! host that is decompressed when the tree is built.
//!
//! ```toml
//! root_listing = true
//!
//! [[dir]]
//! path = "/docs"
//! listing = true
//!
//! [[file]]
//! path = "/docs/readme.txt"
//! text = "hello"
//!
//! [[file]]
//! path = "/logo.png"
//! host = "assets/logo.png"
//! ```
//!
//! Host paths are resolved against the manifest's own directory.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use httpdir::{Node, Tree, decompressed};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Environment variable naming the manifest when `--manifest` is absent.
pub const MANIFEST_ENV: &str = "HTTPDIR_MANIFEST";

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Whether the root directory lists its children
    #[serde(default)]
    pub root_listing: bool,
    /// Directory declarations, applied before files
    #[serde(default, rename = "dir")]
    pub dirs: Vec<DirSpec>,
    /// File declarations
    #[serde(default, rename = "file")]
    pub files: Vec<FileSpec>,
}

/// A `[[dir]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirSpec {
    /// Path inside the tree
    pub path: String,
    /// Whether the directory lists its children
    #[serde(default)]
    pub listing: bool,
    /// Modification time in unix seconds; defaults to load time
    pub modified: Option<u64>,
}

/// A `[[file]]` entry.
///
/// Exactly one of `text`, `bytes`, `host` and `gzip` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    /// Path inside the tree
    pub path: String,
    /// Inline text content
    pub text: Option<String>,
    /// Inline binary content
    pub bytes: Option<Vec<u8>>,
    /// Host file served as is
    pub host: Option<PathBuf>,
    /// Gzip file on the host, decompressed on load
    pub gzip: Option<PathBuf>,
    /// Exact decompressed size, required with `gzip`
    pub size: Option<usize>,
    /// Modification time in unix seconds for inline content
    pub modified: Option<u64>,
}

/// Where a file's content comes from, once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// Inline text
    Text(&'a str),
    /// Inline bytes
    Bytes(&'a [u8]),
    /// Host passthrough
    Host(&'a Path),
    /// Gzip file on the host with its decompressed size
    Gzip(&'a Path, usize),
}

impl FileSpec {
    /// Validates the entry and returns its content source.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one source is set, if `gzip` lacks a
    /// `size`, or if `modified` is set on a host-backed entry.
    pub fn source(&self) -> Result<Source<'_>> {
        let set = [
            self.text.is_some(),
            self.bytes.is_some(),
            self.host.is_some(),
            self.gzip.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();
        if set != 1 {
            bail!(
                "file '{}' must set exactly one of text, bytes, host or gzip",
                self.path
            );
        }
        if self.size.is_some() && self.gzip.is_none() {
            bail!("file '{}': size only applies to gzip entries", self.path);
        }
        if self.modified.is_some() && (self.host.is_some() || self.gzip.is_some()) {
            bail!(
                "file '{}': modified is taken from the host file and cannot be set",
                self.path
            );
        }

        if let Some(text) = &self.text {
            return Ok(Source::Text(text));
        }
        if let Some(bytes) = &self.bytes {
            return Ok(Source::Bytes(bytes));
        }
        if let Some(host) = &self.host {
            return Ok(Source::Host(host));
        }
        match (&self.gzip, self.size) {
            (Some(gzip), Some(size)) => Ok(Source::Gzip(gzip, size)),
            _ => bail!("file '{}': gzip entries require a size", self.path),
        }
    }
}

/// Converts a manifest `modified` value, rejecting times that cannot be
/// represented as a calendar date.
fn unix_time(secs: Option<u64>, fallback: SystemTime, path: &str) -> Result<SystemTime> {
    let Some(secs) = secs else {
        return Ok(fallback);
    };
    let Some(time) = i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    else {
        bail!("'{path}': modified time {secs} is out of range");
    };
    Ok(time.into())
}

impl Manifest {
    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpdir_cli::config::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    ///     [[file]]
    ///     path = "/hello.txt"
    ///     text = "hi"
    /// "#)?;
    /// assert_eq!(manifest.files.len(), 1);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid manifest")
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Builds a tree from the manifest.
    ///
    /// Directories are created first so their attributes win over parents
    /// created on demand by files. Host paths are joined onto `base`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid file entries, path collisions, or gzip
    /// content that cannot be decompressed.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpdir_cli::config::Manifest;
    /// use std::path::Path;
    ///
    /// let manifest = Manifest::parse(r#"
    ///     [[dir]]
    ///     path = "/docs"
    ///     listing = true
    ///
    ///     [[file]]
    ///     path = "/docs/a.txt"
    ///     text = "a"
    /// "#)?;
    /// let tree = manifest.build_tree(Path::new("."))?;
    /// assert!(tree.open("/docs")?.is_listing());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn build_tree(&self, base: &Path) -> Result<Tree> {
        let now = SystemTime::now();
        let mut tree = Tree::with_root_listing(now, self.root_listing);

        for dir in &self.dirs {
            let modified = unix_time(dir.modified, now, &dir.path)?;
            tree.mkdir(&dir.path, modified, dir.listing)
                .with_context(|| format!("failed to create directory '{}'", dir.path))?;
        }

        for file in &self.files {
            let modified = unix_time(file.modified, now, &file.path)?;
            let node = match file.source()? {
                Source::Text(text) => Node::text(text, modified),
                Source::Bytes(bytes) => Node::bytes(bytes, modified),
                Source::Host(host) => Node::host(base.join(host)),
                Source::Gzip(gzip, size) => {
                    let source = Node::host(base.join(gzip));
                    decompressed(&source, size).with_context(|| {
                        format!("failed to decompress {} for '{}'", gzip.display(), file.path)
                    })?
                }
            };
            tree.create(&file.path, node)
                .with_context(|| format!("failed to create file '{}'", file.path))?;
        }

        tracing::debug!(
            dirs = self.dirs.len(),
            files = self.files.len(),
            "built tree from manifest"
        );
        Ok(tree)
    }
}

/// Picks the manifest to load.
///
/// An explicit path (from `--manifest` or the environment) wins; otherwise
/// `<config dir>/httpdir/manifest.toml` is used if it exists.
#[must_use]
pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let candidate = dirs::config_dir()?.join("httpdir").join("manifest.toml");
        candidate.is_file().then_some(candidate)
    })
}

/// Loads a manifest and builds its tree, resolving host paths against the
/// manifest's directory.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or the tree cannot be
/// built.
pub fn load_tree(path: &Path) -> Result<Tree> {
    let manifest = Manifest::load(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    tracing::debug!(manifest = %path.display(), "loading manifest");
    manifest.build_tree(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use std::time::{Duration, UNIX_EPOCH};
    use flate2::write::GzEncoder;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    fn file(path: &str) -> FileSpec {
        FileSpec {
            path: path.to_string(),
            text: None,
            bytes: None,
            host: None,
            gzip: None,
            size: None,
            modified: None,
        }
    }

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(
            r#"
            root_listing = true

            [[dir]]
            path = "/docs"
            listing = true
            modified = 1700000000

            [[file]]
            path = "/raw.bin"
            bytes = [0, 1, 255]

            [[file]]
            path = "/big.txt"
            gzip = "big.txt.gz"
            size = 10
            "#,
        )
        .unwrap();

        assert!(manifest.root_listing);
        assert_eq!(manifest.dirs[0].modified, Some(1_700_000_000));
        assert_eq!(manifest.files[0].bytes.as_deref(), Some(&[0, 1, 255][..]));
        assert_eq!(
            manifest.files[1].source().unwrap(),
            Source::Gzip(Path::new("big.txt.gz"), 10)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = Manifest::parse("[[file]]\npath = \"/a\"\ncontent = \"x\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("content"));
    }

    #[test]
    fn test_source_requires_exactly_one() {
        assert!(file("/none").source().is_err());

        let mut both = file("/both");
        both.text = Some("a".into());
        both.bytes = Some(vec![1]);
        assert!(both.source().is_err());

        let mut text = file("/text");
        text.text = Some("a".into());
        assert_eq!(text.source().unwrap(), Source::Text("a"));
    }

    #[test]
    fn test_source_gzip_requires_size() {
        let mut gz = file("/gz");
        gz.gzip = Some("a.gz".into());
        assert!(gz.source().is_err());

        let mut sized_text = file("/t");
        sized_text.text = Some("a".into());
        sized_text.size = Some(1);
        assert!(sized_text.source().is_err());
    }

    #[test]
    fn test_source_rejects_modified_on_host() {
        let mut host = file("/h");
        host.host = Some("h.txt".into());
        host.modified = Some(1);
        assert!(host.source().is_err());
    }

    #[test]
    fn test_build_tree_dirs_before_files() {
        // The file is declared first but the dir's listing flag still applies
        let manifest = Manifest {
            root_listing: false,
            dirs: vec![DirSpec {
                path: "/d".into(),
                listing: true,
                modified: Some(5),
            }],
            files: vec![FileSpec {
                text: Some("x".into()),
                ..file("/d/x.txt")
            }],
        };
        let tree = manifest.build_tree(Path::new(".")).unwrap();

        let dir = tree.open("/d").unwrap();
        assert!(dir.is_listing());
        assert_eq!(dir.stat().modified(), UNIX_EPOCH + Duration::from_secs(5));
        assert!(tree.open("/").unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_build_tree_collision_is_error() {
        let manifest = Manifest::parse(
            r#"
            [[file]]
            path = "/a"
            text = "1"

            [[file]]
            path = "/a"
            text = "2"
            "#,
        )
        .unwrap();
        let err = manifest.build_tree(Path::new(".")).unwrap_err();
        assert!(format!("{err:#}").contains("Already exists"));
    }

    #[test]
    fn test_load_tree_resolves_host_paths() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("assets")).unwrap();
        fs::write(temp.path().join("assets/logo.txt"), "logo").unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"decompressed!").unwrap();
        fs::write(temp.path().join("assets/big.txt.gz"), encoder.finish().unwrap()).unwrap();

        let manifest_path = temp.path().join("manifest.toml");
        fs::write(
            &manifest_path,
            r#"
            [[file]]
            path = "/logo.txt"
            host = "assets/logo.txt"

            [[file]]
            path = "/big.txt"
            gzip = "assets/big.txt.gz"
            size = 13
            "#,
        )
        .unwrap();

        let tree = load_tree(&manifest_path).unwrap();

        let mut logo = String::new();
        tree.open("/logo.txt")
            .unwrap()
            .read_to_string(&mut logo)
            .unwrap();
        assert_eq!(logo, "logo");

        let mut big = String::new();
        tree.open("/big.txt")
            .unwrap()
            .read_to_string(&mut big)
            .unwrap();
        assert_eq!(big, "decompressed!");
    }

    #[test]
    fn test_build_tree_rejects_out_of_range_modified() {
        // Past the last representable calendar year
        let manifest =
            Manifest::parse("[[file]]\npath = \"/a\"\ntext = \"x\"\nmodified = 100000000000000\n")
                .unwrap();
        let err = manifest.build_tree(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err:#}");
        assert!(err.to_string().contains("'/a'"));

        let dir = Manifest {
            dirs: vec![DirSpec {
                path: "/d".into(),
                listing: true,
                modified: Some(u64::MAX),
            }],
            ..Manifest::default()
        };
        let err = dir.build_tree(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("'/d'"));
    }

    #[test]
    fn test_unix_time_in_range() {
        let time = unix_time(Some(1_700_000_000), UNIX_EPOCH, "/a").unwrap();
        assert_eq!(time, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(unix_time(None, UNIX_EPOCH, "/a").unwrap(), UNIX_EPOCH);
    }

    #[test]
    fn test_load_missing_manifest() {
        let err = load_tree(Path::new("/nonexistent/manifest.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read manifest"));
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(resolve_path(Some(explicit.clone())), Some(explicit));
    }
}

//! Output formatters for CLI commands.
//!
//! Every command produces serializable views; this module renders them as
//! JSON, tab-separated text or colored terminal output.

use crate::cli::OutputFormat;
use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use httpdir::{Metadata, NodeKind};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Serializable view of one stat record.
///
/// # Examples
///
/// ```
/// use httpdir::{Node, Tree};
/// use httpdir_cli::formatters::EntryView;
/// use std::time::SystemTime;
///
/// let mut tree = Tree::new(SystemTime::UNIX_EPOCH);
/// tree.create("/a.txt", Node::text("abc", SystemTime::UNIX_EPOCH))?;
///
/// let view = EntryView::from(tree.open("/a.txt")?.stat());
/// assert_eq!(view.name, "a.txt");
/// assert_eq!(view.size, 3);
/// # Ok::<(), httpdir::DirError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// Entry name, `/` for the root
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Entry kind
    pub kind: &'static str,
    /// Modification time
    pub modified: DateTime<Utc>,
}

impl EntryView {
    /// Returns `true` if the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory.as_str()
    }
}

impl From<&Metadata> for EntryView {
    fn from(meta: &Metadata) -> Self {
        let name = if meta.name().is_empty() {
            "/".to_string()
        } else {
            meta.name().to_string()
        };
        Self {
            name,
            size: meta.size(),
            kind: meta.kind().as_str(),
            modified: to_utc(meta.modified()),
        }
    }
}

/// Converts a stat time to UTC, falling back to the epoch for times chrono
/// cannot represent.
fn to_utc(time: SystemTime) -> DateTime<Utc> {
    let timestamp = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs())
            .ok()
            .map(|secs| (secs, after.subsec_nanos())),
        Err(err) => {
            let before = err.duration();
            i64::try_from(before.as_secs())
                .ok()
                .map(|secs| match before.subsec_nanos() {
                    0 => (-secs, 0),
                    nanos => (-secs - 1, 1_000_000_000 - nanos),
                })
        }
    };
    timestamp
        .and_then(|(secs, nanos)| DateTime::from_timestamp(secs, nanos))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Listing of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    /// The path that was listed
    pub path: String,
    /// Entries in name order
    pub entries: Vec<EntryView>,
}

/// One entry of a recursive walk, keyed by its full path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// Full path of the entry
    pub path: String,
    /// Nesting depth below the root, starting at 0
    pub depth: usize,
    /// Stat record of the entry
    #[serde(flatten)]
    pub entry: EntryView,
}

/// Renders a single stat record.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_entry(entry: &EntryView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(entry),
        OutputFormat::Text => Ok(text::entry_line(entry)),
        OutputFormat::Pretty => Ok(pretty::stat_block(entry)),
    }
}

/// Renders a directory listing.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use httpdir_cli::cli::OutputFormat;
/// use httpdir_cli::formatters::{format_listing, ListingView};
///
/// let view = ListingView { path: "/".into(), entries: Vec::new() };
/// let output = format_listing(&view, OutputFormat::Json)?;
/// assert!(output.contains("\"entries\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_listing(listing: &ListingView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(listing),
        OutputFormat::Text => Ok(listing
            .entries
            .iter()
            .map(text::entry_line)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Pretty => Ok(pretty::listing(listing)),
    }
}

/// Renders a recursive walk.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_tree(entries: &[TreeEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(&entries),
        OutputFormat::Text => Ok(entries
            .iter()
            .map(|e| format!("{}\t{}\t{}", e.path, e.entry.size, e.entry.kind))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Pretty => Ok(pretty::tree(entries)),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }
}

/// Plain text output formatting.
///
/// One record per line, tab-separated, no colors. Suitable for piping to
/// `cut` or `awk`.
pub mod text {
    use super::EntryView;

    /// Format a stat record as `name<TAB>size<TAB>kind<TAB>rfc3339`.
    #[must_use]
    pub fn entry_line(entry: &EntryView) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            entry.name,
            entry.size,
            entry.kind,
            entry.modified.to_rfc3339()
        )
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, EntryView, ListingView, TreeEntry};
    use std::fmt::Write;

    const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    fn styled_name(entry: &EntryView) -> String {
        if entry.is_dir() {
            format!("{}/", entry.name.trim_end_matches('/'))
                .blue()
                .bold()
                .to_string()
        } else {
            entry.name.clone()
        }
    }

    /// Aligned `ls -l` style listing.
    #[must_use]
    pub fn listing(listing: &ListingView) -> String {
        let mut out = format!("{}\n", listing.path.bold());
        if listing.entries.is_empty() {
            out.push_str(&"  (empty)".dimmed().to_string());
            return out;
        }

        let width = listing
            .entries
            .iter()
            .map(|e| e.size.to_string().len())
            .max()
            .unwrap_or(1);
        for entry in &listing.entries {
            let _ = writeln!(
                out,
                "  {}  {:>width$}  {}",
                entry.modified.format(TIME_FORMAT).to_string().dimmed(),
                entry.size.to_string().cyan(),
                styled_name(entry),
            );
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Labelled stat record.
    #[must_use]
    pub fn stat_block(entry: &EntryView) -> String {
        format!(
            "{}     {}\n{}     {}\n{}     {}\n{} {}",
            "name:".bold(),
            styled_name(entry),
            "size:".bold(),
            entry.size.to_string().cyan(),
            "kind:".bold(),
            entry.kind.yellow(),
            "modified:".bold(),
            entry.modified.format(TIME_FORMAT).to_string().green(),
        )
    }

    /// Indented tree with one entry per line.
    #[must_use]
    pub fn tree(entries: &[TreeEntry]) -> String {
        let mut out = "/".blue().bold().to_string();
        for entry in entries {
            let _ = write!(
                out,
                "\n{}{}",
                "  ".repeat(entry.depth + 1),
                styled_name(&entry.entry)
            );
            if !entry.entry.is_dir() {
                let _ = write!(out, " {}", format!("({} B)", entry.entry.size).dimmed());
            }
        }
        out
    }
}

//! Lexical path handling.
//!
//! Tree paths are always `/`-separated and interpreted relative to the
//! tree root, whatever the host platform. Cleaning is purely lexical: no
//! lookups happen here.

/// The single reserved path delimiter.
pub const SEPARATOR: char = '/';

/// Returns the shortest rooted path equivalent to `path`.
///
/// Repeated delimiters and `.` segments are dropped and `..` removes the
/// segment before it. Because every path is rooted, `..` at the root stays
/// at the root. The result always starts with `/`.
///
/// # Examples
///
/// ```
/// use httpdir::path::clean;
///
/// assert_eq!(clean(""), "/");
/// assert_eq!(clean("a//b/./c"), "/a/b/c");
/// assert_eq!(clean("/a/b/../c/"), "/a/c");
/// assert_eq!(clean("/../../etc"), "/etc");
/// ```
#[must_use]
pub fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for part in &parts {
        cleaned.push(SEPARATOR);
        cleaned.push_str(part);
    }
    if cleaned.is_empty() {
        cleaned.push(SEPARATOR);
    }
    cleaned
}

/// Iterates over the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Splits a cleaned path into its parent path and final segment.
///
/// The root splits into `("", "")`.
///
/// # Examples
///
/// ```
/// use httpdir::path::split;
///
/// assert_eq!(split("/a/b/c"), ("/a/b", "c"));
/// assert_eq!(split("/c"), ("", "c"));
/// assert_eq!(split("/"), ("", ""));
/// ```
#[must_use]
pub fn split(path: &str) -> (&str, &str) {
    path.rsplit_once(SEPARATOR).unwrap_or(("", path))
}

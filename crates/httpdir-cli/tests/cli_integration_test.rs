//! Integration tests for building trees and running commands against them.

use httpdir_cli::cli::{ExitCode, OutputFormat};
use httpdir_cli::commands::{cat, ls, stat, tree};
use httpdir_cli::formatters::format_listing;
use httpdir_cli::TreeSource;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MANIFEST: &str = r#"
root_listing = true

[[dir]]
path = "/docs"
listing = true
modified = 1700000000

[[dir]]
path = "/private"

[[file]]
path = "/docs/readme.txt"
text = "read me"
modified = 1700000000

[[file]]
path = "/docs/raw.bin"
bytes = [1, 2, 3]

[[file]]
path = "/site/index.html"
host = "assets/index.html"
"#;

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    fs::create_dir(dir.join("assets")).unwrap();
    fs::write(dir.join("assets/index.html"), "<h1>site</h1>").unwrap();
    let manifest = dir.join("manifest.toml");
    fs::write(&manifest, MANIFEST).unwrap();
    manifest
}

#[test]
fn test_manifest_tree_end_to_end() {
    let temp = TempDir::new().unwrap();
    let manifest = write_fixture(temp.path());
    let tree = TreeSource::Manifest(manifest).load().unwrap();

    let root = ls::list(&tree, "/", None).unwrap();
    let names: Vec<_> = root.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "private", "site"]);

    let docs = ls::list(&tree, "/docs", None).unwrap();
    let names: Vec<_> = docs.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["raw.bin", "readme.txt"]);

    let mut out = Vec::new();
    cat::copy_to(&tree, "/site/", &mut out).unwrap();
    assert_eq!(out, b"<h1>site</h1>");

    let readme = stat::stat(&tree, "/docs/readme.txt").unwrap();
    assert_eq!(readme.size, 7);
    assert_eq!(readme.modified.timestamp(), 1_700_000_000);
}

#[test]
fn test_manifest_tree_walk() {
    let temp = TempDir::new().unwrap();
    let manifest = write_fixture(temp.path());
    let built = TreeSource::Manifest(manifest).load().unwrap();

    let entries = tree::walk(&built).unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/docs",
            "/docs/raw.bin",
            "/docs/readme.txt",
            "/private",
            "/site"
        ]
    );
}

#[test]
fn test_denied_directory_exit_code() {
    let temp = TempDir::new().unwrap();
    let manifest = write_fixture(temp.path());
    let tree = TreeSource::Manifest(manifest).load().unwrap();

    let err = ls::list(&tree, "/private", None).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::PERMISSION_DENIED);
}

#[test]
fn test_mount_end_to_end() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("img")).unwrap();
    fs::write(temp.path().join("img/a.svg"), "<svg/>").unwrap();
    fs::write(temp.path().join("robots.txt"), "User-agent: *").unwrap();

    let tree = TreeSource::Mount(temp.path().to_path_buf()).load().unwrap();

    let listing = ls::list(&tree, "/", None).unwrap();
    let text = format_listing(&listing, OutputFormat::Text).unwrap();
    let first_columns: Vec<_> = text
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect();
    assert_eq!(first_columns, vec!["img", "robots.txt"]);

    let mut out = Vec::new();
    cat::copy_to(&tree, "/img/a.svg", &mut out).unwrap();
    assert_eq!(out, b"<svg/>");

    // Host leaves stat live
    fs::write(temp.path().join("robots.txt"), "User-agent: *\nDisallow: /").unwrap();
    assert_eq!(stat::stat(&tree, "/robots.txt").unwrap().size, 25);
}

#[test]
fn test_invalid_manifest_reports_context() {
    let temp = TempDir::new().unwrap();
    let manifest = temp.path().join("bad.toml");
    fs::write(&manifest, "[[file]]\npath = \"/a\"\n").unwrap();

    let err = TreeSource::Manifest(manifest).load().unwrap_err();
    assert!(format!("{err:#}").contains("exactly one of text, bytes, host or gzip"));
}

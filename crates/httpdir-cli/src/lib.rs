//! Library side of the `httpdir` CLI.
//!
//! Builds trees from manifests or host directories and renders what the
//! commands find. Exposed as a library so the commands can be tested
//! without spawning the binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod formatters;
pub mod mount;

pub use cli::{ExitCode, OutputFormat};
pub use commands::common::TreeSource;

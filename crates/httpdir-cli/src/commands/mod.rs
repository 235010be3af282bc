//! Command implementations for the `httpdir` CLI.
//!
//! Each command splits into a function that queries the tree and returns a
//! view, and a `run` that formats the view and prints it.

pub mod cat;
pub mod common;
pub mod ls;
pub mod stat;
pub mod tree;

//! In-memory directory trees for file servers.
//!
//! `httpdir` holds files and directories assembled at runtime, or embedded
//! at build time, and serves them through the same open/read/seek/list
//! contract a static file server expects from a real filesystem, without
//! touching disk.
//!
//! # Features
//!
//! - **Closed node set**: directories, byte leaves, text leaves and host
//!   passthrough leaves, all behind [`Node`]
//! - **Path resolution**: lexical cleaning, auto-created parents, collision
//!   checks on insert
//! - **Listings**: name-sorted, paginated snapshots that never alias the
//!   live tree
//! - **Index substitution**: a directory with listing disabled serves its
//!   `index.html` instead
//! - **Default tree**: an optional process-wide tree in [`default`]
//!
//! # Examples
//!
//! ```
//! use httpdir::{Node, Tree};
//! use std::io::Read;
//! use std::time::SystemTime;
//!
//! let now = SystemTime::now();
//! let mut tree = Tree::new(now);
//! tree.create("/docs/index.html", Node::text("<h1>Docs</h1>", now))?;
//! tree.mkdir("/downloads", now, true)?;
//! tree.create("/downloads/b.bin", Node::bytes(vec![0xde, 0xad], now))?;
//! tree.create("/downloads/a.bin", Node::bytes(vec![0xbe, 0xef], now))?;
//!
//! // `/docs` has listing disabled, so its index is served.
//! let mut page = String::new();
//! tree.open("/docs")?.read_to_string(&mut page)?;
//! assert_eq!(page, "<h1>Docs</h1>");
//!
//! // `/downloads` lists its children in name order.
//! let mut dir = tree.open("/downloads")?;
//! let first = dir.read_dir(Some(1))?.unwrap();
//! assert_eq!(first[0].name(), "a.bin");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod default;
pub mod directory;
pub mod error;
pub mod file;
pub mod leaf;
pub mod metadata;
pub mod node;
pub mod path;
pub mod tree;

pub use directory::{Directory, INDEX_FILE, Listing};
pub use error::{DirError, Result};
pub use file::File;
pub use leaf::{ByteLeaf, HostLeaf, TextLeaf};
pub use metadata::{Metadata, NodeKind};
pub use node::{Node, decompressed};
pub use tree::Tree;

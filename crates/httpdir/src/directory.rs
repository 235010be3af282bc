//! Directory nodes and their listings.
//!
//! A [`Directory`] owns its children by name. Opening one takes one of three
//! branches, decided by [`Directory::open`]:
//!
//! - listing enabled: a [`Listing`] over a sorted snapshot of the children
//! - listing disabled, `index.html` present: that child stands in
//! - otherwise: the open is refused
//!
//! A [`Listing`] never aliases the live child map, so mutating the tree after
//! opening a directory does not change what the listing enumerates.

use crate::metadata::{Metadata, NodeKind};
use crate::node::Node;
use std::collections::HashMap;
use std::io::SeekFrom;
use std::time::SystemTime;

/// Child name that replaces a non-listing directory when it is opened.
pub const INDEX_FILE: &str = "index.html";

/// A directory node.
///
/// Directories are only created through [`Tree::mkdir`](crate::Tree::mkdir)
/// and [`Tree::create`](crate::Tree::create).
#[derive(Debug)]
pub struct Directory {
    listing: bool,
    children: HashMap<String, Node>,
    mod_time: SystemTime,
}

/// Outcome of opening a directory.
#[derive(Debug)]
pub(crate) enum Opening<'a> {
    /// Listing enabled: enumerate the children.
    Listing(Listing),
    /// Listing disabled: open this index child instead.
    Index(&'a Node),
    /// Listing disabled and no index child.
    Denied,
}

impl Directory {
    pub(crate) fn new(mod_time: SystemTime, listing: bool) -> Self {
        Self {
            listing,
            children: HashMap::new(),
            mod_time,
        }
    }

    /// Returns `true` if opening this directory produces a listing.
    #[must_use]
    pub const fn listing_enabled(&self) -> bool {
        self.listing
    }

    /// Returns the modification time.
    #[must_use]
    pub const fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the directory has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the child called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub(crate) const fn children_mut(&mut self) -> &mut HashMap<String, Node> {
        &mut self.children
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    pub(crate) fn metadata(&self, name: &str) -> Metadata {
        Metadata::new(name, 0, NodeKind::Directory, self.mod_time)
    }

    pub(crate) fn open(&self) -> Opening<'_> {
        if self.listing {
            let entries = self
                .children
                .iter()
                .map(|(name, node)| node.metadata(name))
                .collect();
            return Opening::Listing(Listing::new(entries));
        }
        match self.children.get(INDEX_FILE) {
            Some(index) => Opening::Index(index),
            None => Opening::Denied,
        }
    }
}

/// Paginated enumeration over a directory snapshot.
///
/// Entries are sorted by name in byte order. The cursor starts at 0 and only
/// moves forward, except for an explicit rewind to the start.
#[derive(Debug, Clone)]
pub struct Listing {
    entries: Vec<Metadata>,
    pos: usize,
}

impl Listing {
    pub(crate) fn new(mut entries: Vec<Metadata>) -> Self {
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Self { entries, pos: 0 }
    }

    /// Returns the total number of entries in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.pos
    }

    /// Reads up to `count` entries, or all remaining ones for `None`.
    ///
    /// Returns `None` once nothing is left to read.
    pub fn next_page(&mut self, count: Option<usize>) -> Option<Vec<Metadata>> {
        let remaining = self.remaining();
        let count = count.map_or(remaining, |count| count.min(remaining));
        if count == 0 {
            return None;
        }
        let end = self.pos + count;
        let page = self.entries[self.pos..end].to_vec();
        self.pos = end;
        Some(page)
    }

    /// Rewinds to the start if `target` resolves to position 0.
    ///
    /// Returns `false`, leaving the cursor where it was, for any other
    /// position.
    pub fn seek(&mut self, target: SeekFrom) -> bool {
        let resolved = match target {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => self.pos as i128 + i128::from(offset),
            SeekFrom::End(offset) => self.entries.len() as i128 + i128::from(offset),
        };
        if resolved != 0 {
            return false;
        }
        self.pos = 0;
        true
    }
}

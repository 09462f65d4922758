//! Session-scoped cache of extracted document text.
//!
//! Entries are keyed by a content hash of the uploaded bytes, so changing
//! the file automatically misses the cache; no explicit invalidation call
//! is needed. The cache belongs to the orchestration layer and lives for
//! one interactive session at most.

use std::collections::HashMap;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::hash::{Hash as _, Hasher as _};

use docjury_core::Result;

use crate::extract_text;

/// Cache of extracted text keyed by document content hash.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<u64, String>,
}

impl DocumentCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached text for the document, extracting it on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction fails on a cache miss; nothing is
    /// stored in that case.
    pub fn fetch_or_extract(&mut self, bytes: &[u8], declared_extension: &str) -> Result<&str> {
        let key = content_hash(bytes);
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                tracing::debug!("Document cache hit for key {key:x}");
                Ok(occupied.into_mut().as_str())
            }
            Entry::Vacant(vacant) => {
                let text = extract_text(bytes, declared_extension)?;
                tracing::debug!(
                    "Document cache miss for key {key:x}; extracted {} chars",
                    text.len()
                );
                Ok(vacant.insert(text).as_str())
            }
        }
    }

    /// Whether the cache already holds this document's text.
    #[must_use]
    pub fn contains(&self, bytes: &[u8]) -> bool {
        self.entries.contains_key(&content_hash(bytes))
    }

    /// Number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all cached documents.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

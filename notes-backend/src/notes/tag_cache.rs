//! In-memory cache of frontmatter tags, keyed by absolute file path.
//!
//! Listings and tag aggregation ask for the tags of every note on every call.
//! This cache remembers the parsed tags together with the file's modification
//! time so unchanged notes are never re-read. An entry is valid only while its
//! stored mtime equals the file's current mtime; a mismatch triggers a re-read.
//! Structural changes (move, rename, delete) evict entries explicitly, and
//! callers evict BEFORE touching disk so a crash leaves entries stale-or-absent.

use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use super::frontmatter;
use crate::error::TagLookupError;
use crate::vfs::FileSystem;

/// A single cached tag list.
#[derive(Debug, Clone)]
struct CachedTags {
    mtime: SystemTime,
    tags: Vec<String>,
}

/// Thread-safe tag cache. Each (mtime, tags) pair is written as one value under
/// the map's per-shard lock, so concurrent writers can never tear it.
pub struct TagCache {
    entries: DashMap<String, CachedTags>,
    fs: Arc<dyn FileSystem>,
}

impl TagCache {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            entries: DashMap::new(),
            fs,
        }
    }

    /// Tags for `path`, or an empty list when the file cannot be read.
    pub fn get_tags(&self, path: &Path) -> Vec<String> {
        match self.lookup(path) {
            Ok(tags) => tags,
            Err(e) => {
                log::debug!("[TAGS] No tags for {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Tags for `path`, distinguishing "no tags" from "could not read".
    /// A failed lookup never leaves an entry behind.
    pub fn lookup(&self, path: &Path) -> Result<Vec<String>, TagLookupError> {
        let key = cache_key(path);

        let mtime = match self.fs.modified(path) {
            Ok(t) => t,
            Err(e) => {
                self.entries.remove(&key);
                return Err(e.into());
            }
        };

        if let Some(entry) = self.entries.get(&key) {
            if entry.mtime == mtime {
                return Ok(entry.tags.clone());
            }
        }

        // mtime is sampled before the read: a write racing with us leaves an
        // entry whose mtime is already outdated, so the next call re-reads.
        let content = match self.fs.read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                self.entries.remove(&key);
                return Err(e.into());
            }
        };
        let tags = frontmatter::parse_tags(&content);

        self.entries.insert(
            key,
            CachedTags {
                mtime,
                tags: tags.clone(),
            },
        );

        Ok(tags)
    }

    /// Drop the entry for exactly this file.
    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(&cache_key(path));
    }

    /// Drop every entry at or below `prefix`.
    ///
    /// Matches whole path components: invalidating `notes` evicts
    /// `notes/a.md` but leaves `notes2/a.md` alone.
    pub fn invalidate_prefix(&self, prefix: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !Path::new(key).starts_with(prefix));
        let removed = before.saturating_sub(self.entries.len());
        log::debug!(
            "[TAGS] Evicted {} entries under {}",
            removed,
            prefix.display()
        );
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&cache_key(path))
    }
}

fn cache_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

//! Optional page-text cache, injected by the caller.
//!
//! Extracting a page's text is the expensive step of a scan, and documents
//! are often scanned repeatedly with different queries. A [`PageTextCache`]
//! lets a caller keep extracted text around between scans. It is strictly an
//! accelerator: the scanner behaves identically with or without one, and the
//! crate never constructs a cache on its own.
//!
//! Keys pair the caller's document identity with a page number. The identity
//! string must encode content version as well (a path plus modification
//! time, a content hash) — the crate cannot detect that a file changed
//! underneath a reused identity.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Cache key: document identity + content version, and a 1-based page number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub doc: String,
    pub page: u32,
}

impl PageKey {
    pub fn new(doc: impl Into<String>, page: u32) -> Self {
        Self {
            doc: doc.into(),
            page,
        }
    }
}

/// A page-text cache usable from concurrent scan workers.
pub trait PageTextCache: Send + Sync {
    /// Look up the text for one page, if present.
    fn get(&self, key: &PageKey) -> Option<String>;

    /// Store one page's extracted text.
    fn put(&self, key: PageKey, text: String);
}

/// Bounded in-memory cache with oldest-first eviction.
///
/// Insertion order doubles as eviction order; re-inserting an existing key
/// refreshes its text but not its age. Good enough for the intended use —
/// keeping the last few documents' pages warm — without pulling in a full
/// LRU implementation.
pub struct MemoryPageTextCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

struct CacheInner {
    map: HashMap<PageKey, String>,
    order: VecDeque<PageKey>,
}

impl MemoryPageTextCache {
    /// Create a cache holding at most `capacity` pages.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Number of pages currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageTextCache for MemoryPageTextCache {
    fn get(&self, key: &PageKey) -> Option<String> {
        self.inner.lock().expect("cache poisoned").map.get(key).cloned()
    }

    fn put(&self, key: PageKey, text: String) {
        let mut inner = self.inner.lock().expect("cache poisoned");
        if inner.map.insert(key.clone(), text).is_none() {
            inner.order.push_back(key);
            while inner.map.len() > self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.map.remove(&oldest);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_put_stored() {
        let cache = MemoryPageTextCache::with_capacity(4);
        cache.put(PageKey::new("doc::1", 1), "page one".into());
        assert_eq!(cache.get(&PageKey::new("doc::1", 1)).as_deref(), Some("page one"));
        assert_eq!(cache.get(&PageKey::new("doc::1", 2)), None);
    }

    #[test]
    fn distinct_documents_do_not_collide() {
        let cache = MemoryPageTextCache::with_capacity(4);
        cache.put(PageKey::new("a", 1), "from a".into());
        cache.put(PageKey::new("b", 1), "from b".into());
        assert_eq!(cache.get(&PageKey::new("a", 1)).as_deref(), Some("from a"));
        assert_eq!(cache.get(&PageKey::new("b", 1)).as_deref(), Some("from b"));
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let cache = MemoryPageTextCache::with_capacity(2);
        cache.put(PageKey::new("d", 1), "one".into());
        cache.put(PageKey::new("d", 2), "two".into());
        cache.put(PageKey::new("d", 3), "three".into());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&PageKey::new("d", 1)), None);
        assert_eq!(cache.get(&PageKey::new("d", 3)).as_deref(), Some("three"));
    }

    #[test]
    fn reinsert_refreshes_text_without_growing() {
        let cache = MemoryPageTextCache::with_capacity(2);
        cache.put(PageKey::new("d", 1), "old".into());
        cache.put(PageKey::new("d", 1), "new".into());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&PageKey::new("d", 1)).as_deref(), Some("new"));
    }
}

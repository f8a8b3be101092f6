//! FIFO-keyed-by-path cache, a thin wrapper outside the core parser.
//!
//! Keying by filesystem path without stat-invalidation is a known
//! staleness hazard: a hit returns whatever was cached even if the file
//! has since changed on disk. This is deliberate, the cache never calls
//! `stat()` on lookup, and callers that need freshness guarantees must
//! invalidate entries themselves (e.g. on their own mtime check) or avoid
//! the cache for files they expect to change.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::metadata::RawMetadata;

/// A capacity-bounded, FIFO-evicting cache from file path to a previously
/// parsed [`RawMetadata`]. Safe to share across threads via `&MetadataCache`
/// (the core parser itself holds no lock and needs none).
pub struct MetadataCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    map: HashMap<PathBuf, Arc<RawMetadata>>,
    order: VecDeque<PathBuf>,
}

impl MetadataCache {
    /// `capacity` of `0` disables caching (every `get` misses, every `insert` is a no-op).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Look up a previously cached parse by path. Never touches the
    /// filesystem.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<RawMetadata>> {
        let inner = self.inner.lock().unwrap();
        inner.map.get(path.as_ref()).cloned()
    }

    /// Insert a freshly parsed result, evicting the oldest entry if this
    /// insert would exceed `capacity`.
    pub fn insert(&self, path: PathBuf, metadata: Arc<RawMetadata>) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        if !inner.map.contains_key(&path) {
            inner.order.push_back(path.clone());
        }
        inner.map.insert(path, metadata);

        while inner.map.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

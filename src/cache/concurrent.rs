use parking_lot::Mutex;

use super::byteview::ByteView;
use super::lru::LruCache;

/// Thread-safe cache of `ByteView`s used by each `Group`.
///
/// Every call holds one mutex for its whole duration. The underlying
/// `LruCache` is only allocated on the first `add`, so an unused group costs
/// nothing but its configuration.
pub struct ConcurrentCache {
    cache_bytes: usize,
    inner: Mutex<Option<LruCache<ByteView>>>,
}

impl ConcurrentCache {
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            inner: Mutex::new(None),
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.inner.lock();
        guard
            .get_or_insert_with(|| LruCache::new(self.cache_bytes))
            .add(key, value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map(LruCache::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn used_bytes(&self) -> usize {
        self.inner
            .lock()
            .as_ref()
            .map(LruCache::used_bytes)
            .unwrap_or(0)
    }

    pub fn cache_bytes(&self) -> usize {
        self.cache_bytes
    }

    #[cfg(test)]
    pub(crate) fn is_initialized(&self) -> bool {
        self.inner.lock().is_some()
    }
}

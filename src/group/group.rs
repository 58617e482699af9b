use std::fmt;
use std::sync::{Arc, OnceLock};

use super::getter::Getter;
use super::registry::GroupRegistry;
use crate::cache::{ByteView, ConcurrentCache};
use crate::error::{CacheError, Result};
use crate::peers::protocol::Request;
use crate::peers::{PeerGetter, PeerPicker};

/// A cache namespace and the loader behind it.
pub struct Group {
    name: String,
    /// Called on a miss that no peer could answer.
    getter: Arc<dyn Getter>,
    main_cache: ConcurrentCache,
    /// Set at most once, see `register_peers`.
    peers: OnceLock<Arc<dyn PeerPicker>>,
}

/// Configures a `Group` and registers it.
pub struct GroupBuilder {
    name: String,
    cache_bytes: usize,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    /// Byte budget of the local cache. `0` means unbounded.
    pub fn cache_bytes(mut self, cache_bytes: usize) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    pub fn getter<G>(mut self, getter: G) -> Self
    where
        G: Getter + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    /// Uses a loader that is shared with other groups.
    pub fn shared_getter(mut self, getter: Arc<dyn Getter>) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Creates the group and adds it to `registry`.
    ///
    /// Fails with `MissingGetter` when no loader was given and with
    /// `DuplicateGroup` when the name is taken.
    pub fn build(self, registry: &GroupRegistry) -> Result<Arc<Group>> {
        let Some(getter) = self.getter else {
            return Err(CacheError::MissingGetter(self.name));
        };

        registry.insert(Group {
            name: self.name,
            getter,
            main_cache: ConcurrentCache::new(self.cache_bytes),
            peers: OnceLock::new(),
        })
    }
}

impl Group {
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            cache_bytes: 0,
            getter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the picker used to route misses to their owning peer.
    ///
    /// Allowed once per group; later calls fail with `PeersAlreadyRegistered`.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    /// Returns the value for `key` from the cache, its owning peer or the
    /// source loader, in that order.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            tracing::debug!("[Cache {}] hit {}", self.name, key);
            return Ok(value);
        }

        self.load(key).await
    }

    /// Number of entries in this process's cache.
    pub fn cached_entries(&self) -> usize {
        self.main_cache.len()
    }

    /// Bytes held by this process's cache.
    pub fn cached_bytes(&self) -> usize {
        self.main_cache.used_bytes()
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        let peer = self.peers.get().and_then(|peers| peers.pick_peer(key));

        if let Some(peer) = peer {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!("[Cache {}] Failed to get {} from peer: {}", self.name, key, e);
                }
            }
        }

        self.get_locally(key)
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let request = Request {
            group: self.name.clone(),
            key: key.to_string(),
        };
        let response = peer.get(&request).await?;

        Ok(ByteView::from(response.value))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self.getter.get(key)?;
        let value = ByteView::copy_from(&bytes);

        self.main_cache.add(key, value.clone());
        tracing::debug!("[Cache {}] loaded {} locally", self.name, key);
        Ok(value)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cache_bytes", &self.main_cache.cache_bytes())
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}

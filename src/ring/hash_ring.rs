use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Hash used to place peers and keys on the ring.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// A sorted ring of virtual nodes.
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted ascending after every `add`.
    keys: Vec<u32>,
    hash_map: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        let hash: HashFn = match hash {
            Some(hash) => hash,
            None => Arc::new(crc32fast::hash),
        };
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
        }
    }

    /// Places `replicas` virtual nodes for each id.
    ///
    /// Calling this twice with the same id adds a second set of virtual
    /// nodes. Rebuild the ring to replace membership.
    pub fn add<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, id).as_bytes());
                self.keys.push(hash);
                self.hash_map.insert(hash, id.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    /// Returns the peer owning `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&h| h < hash);
        let ring_hash = self.keys[idx % self.keys.len()];

        self.hash_map.get(&ring_hash).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .finish()
    }
}

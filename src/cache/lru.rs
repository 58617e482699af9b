//! Byte-budgeted LRU cache.
//!
//! Entries live in a flat arena of slots linked by `prev`/`next` indices.
//! `head` is the most recently used slot and `tail` the least recently used.
//! Freed slots are recycled through a free list, so steady-state inserts do
//! not allocate.
//!
//! This type is not thread-safe; see `ConcurrentCache`.

use std::collections::HashMap;

/// Deterministic weight of a cached value, in bytes.
pub trait ByteSize {
    fn size_bytes(&self) -> usize;
}

impl ByteSize for Vec<u8> {
    fn size_bytes(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    fn size_bytes(&self) -> usize {
        self.len()
    }
}

impl ByteSize for &'static str {
    fn size_bytes(&self) -> usize {
        self.len()
    }
}

/// Invoked with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, V) + Send>;

struct Slot<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<V: ByteSize> Slot<V> {
    fn size(&self) -> usize {
        self.key.len() + self.value.size_bytes()
    }
}

pub struct LruCache<V> {
    /// Zero means unbounded.
    max_bytes: usize,
    used_bytes: usize,
    slots: Vec<Option<Slot<V>>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<String, usize>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: ByteSize> LruCache<V> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(&str, V) + Send + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    /// Looks up `key` and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|slot| &slot.value)
    }

    /// Inserts or replaces `key`, then evicts until the budget holds again.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            if let Some(slot) = self.slots[idx].as_mut() {
                self.used_bytes = self.used_bytes + value.size_bytes() - slot.value.size_bytes();
                slot.value = value;
            }
        } else {
            let slot = Slot {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            };
            self.used_bytes += slot.size();
            let idx = self.alloc(slot);
            self.push_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    /// Evicts the least recently used entry and returns its key.
    pub fn remove_oldest(&mut self) -> Option<String> {
        let idx = self.tail?;
        self.unlink(idx);
        let slot = self.slots[idx].take()?;
        self.free_list.push(idx);
        self.index.remove(&slot.key);
        self.used_bytes -= slot.size();

        let Slot { key, value, .. } = slot;
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&key, value);
        }
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.slots[idx].as_ref() {
                Some(slot) => {
                    keys.push(slot.key.as_str());
                    cursor = slot.next;
                }
                None => break,
            }
        }
        keys
    }

    fn alloc(&mut self, slot: Slot<V>) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(head) = self.slots[h].as_mut() {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_mut() {
            Some(slot) => (slot.prev.take(), slot.next.take()),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(slot) = self.slots[p].as_mut() {
                    slot.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(slot) = self.slots[n].as_mut() {
                    slot.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let live: usize = self.slots.iter().flatten().map(Slot::size).sum();
        assert_eq!(live, self.used_bytes, "used_bytes must match live entries");
        assert_eq!(self.keys().len(), self.index.len(), "list and index disagree");
        if self.max_bytes != 0 {
            assert!(self.used_bytes <= self.max_bytes, "budget exceeded");
        }
    }
}

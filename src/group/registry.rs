//! Group Registry
//!
//! Maps group names to their `Group`. Embedders create one registry, share it
//! by `Arc` with everything that creates or looks up groups (notably the peer
//! request handler), and keep it for the life of the process. Groups are
//! never removed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::getter::Getter;
use super::group::Group;
use crate::error::{CacheError, Result};

/// Lookups share a read lock; registration takes the write lock.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates and registers a group with the given byte budget and loader.
    pub fn new_group<G>(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        getter: G,
    ) -> Result<Arc<Group>>
    where
        G: Getter + 'static,
    {
        Group::builder(name)
            .cache_bytes(cache_bytes)
            .getter(getter)
            .build(self)
    }

    /// Returns the named group, or `None` if it was never created.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Names of all registered groups, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }

    pub(crate) fn insert(&self, group: Group) -> Result<Arc<Group>> {
        let mut groups = self.groups.write();
        if groups.contains_key(group.name()) {
            return Err(CacheError::DuplicateGroup(group.name().to_string()));
        }

        let group = Arc::new(group);
        groups.insert(group.name().to_string(), group.clone());
        tracing::info!("Registered group: {}", group.name());
        Ok(group)
    }
}

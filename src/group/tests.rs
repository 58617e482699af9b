//! Group Module Tests
//!
//! ## Test Scopes
//! - **Lookup sequence**: Cache hits, loader calls and error propagation.
//! - **Peer routing**: Remote success is not cached, remote failure falls back once.
//! - **Wiring**: Builder validation, single peer registration, registry lookups.

#[cfg(test)]
mod tests {
    use crate::error::CacheError;
    use crate::group::{Getter, GetterFn, Group, GroupRegistry};
    use crate::peers::protocol::{Request, Response};
    use crate::peers::{PeerFuture, PeerGetter, PeerPicker};
    use std::collections::HashMap;
    use std::sync::{Arc, Barrier};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scores() -> HashMap<String, String> {
        [("Tom", "630"), ("Jack", "589"), ("Sam", "567")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Loader over a fixed map that counts how often each key is loaded.
    struct CountingDb {
        data: HashMap<String, String>,
        loads: Arc<AtomicUsize>,
    }

    impl Getter for CountingDb {
        fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.data
                .get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
        }
    }

    fn counting_group(registry: &GroupRegistry, name: &str) -> (Arc<Group>, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let db = CountingDb {
            data: scores(),
            loads: loads.clone(),
        };
        let group = registry.new_group(name, 2 << 10, db).unwrap();
        (group, loads)
    }

    /// Peer that always fails, counting attempts.
    struct FailingPeer {
        calls: AtomicUsize,
    }

    impl PeerGetter for FailingPeer {
        fn get<'a>(&'a self, _request: &'a Request) -> PeerFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(CacheError::Load(anyhow::anyhow!("peer down"))) })
        }
    }

    /// Peer that answers every request with `remote:{group}:{key}`.
    struct EchoPeer {
        calls: AtomicUsize,
    }

    impl PeerGetter for EchoPeer {
        fn get<'a>(&'a self, request: &'a Request) -> PeerFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Ok(Response {
                    value: format!("remote:{}:{}", request.group, request.key).into_bytes(),
                })
            })
        }
    }

    /// Routes every key to the same peer.
    struct AlwaysPick<P>(Arc<P>);

    impl<P: PeerGetter + 'static> PeerPicker for AlwaysPick<P> {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
            Some(self.0.clone())
        }
    }

    struct NeverPick;

    impl PeerPicker for NeverPick {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
            None
        }
    }

    // ============================================================
    // LOOKUP SEQUENCE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_empty_key_is_rejected_without_loading() {
        let registry = GroupRegistry::new();
        let (group, loads) = counting_group(&registry, "scores");

        let result = group.get("").await;

        assert!(matches!(result, Err(CacheError::EmptyKey)));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_loads_once_then_hits_cache() {
        let registry = GroupRegistry::new();
        let (group, loads) = counting_group(&registry, "scores");

        for (key, value) in scores() {
            let view = group.get(&key).await.expect("failed to get value");
            assert_eq!(view.to_string(), value);
            assert_eq!(loads.load(Ordering::SeqCst), 1, "cache {} miss", key);

            let view = group.get(&key).await.unwrap();
            assert_eq!(view.to_string(), value);
            assert_eq!(loads.load(Ordering::SeqCst), 1, "cache {} expired", key);

            loads.store(0, Ordering::SeqCst);
        }

        assert_eq!(group.cached_entries(), 3);
    }

    #[tokio::test]
    async fn test_loader_error_propagates_and_is_not_cached() {
        let registry = GroupRegistry::new();
        let (group, loads) = counting_group(&registry, "scores");

        let err = group.get("unknown").await.unwrap_err();
        assert!(matches!(err, CacheError::Load(_)));
        assert_eq!(err.to_string(), "unknown not exist");

        assert!(group.get("unknown").await.is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 2, "failures are not cached");
        assert_eq!(group.cached_entries(), 0);
    }

    #[tokio::test]
    async fn test_closure_getter() {
        let registry = GroupRegistry::new();
        let group = registry
            .new_group(
                "upper",
                0,
                GetterFn::new(|key| Ok(key.to_uppercase().into_bytes())),
            )
            .unwrap();

        assert_eq!(group.get("abc").await.unwrap().as_slice(), b"ABC");
        assert_eq!(group.name(), "upper");
    }

    #[tokio::test]
    async fn test_budget_bounds_group_cache() {
        let registry = GroupRegistry::new();
        let group = registry
            .new_group("small", 10, GetterFn::new(|_key| Ok(vec![0u8; 3])))
            .unwrap();

        for key in ["aa", "bb", "cc", "dd"] {
            group.get(key).await.unwrap();
            assert!(group.cached_bytes() <= 10);
        }
        assert_eq!(group.cached_entries(), 2);
    }

    /// Loader that only returns once `barrier` has been reached by every
    /// concurrent caller.
    struct BarrierDb {
        barrier: Barrier,
        loads: AtomicUsize,
    }

    impl Getter for BarrierDb {
        fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.barrier.wait();
            Ok(key.as_bytes().to_vec())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_misses_each_call_loader() {
        const CALLERS: usize = 4;
        let registry = GroupRegistry::new();
        let db = Arc::new(BarrierDb {
            barrier: Barrier::new(CALLERS),
            loads: AtomicUsize::new(0),
        });
        let group = Group::builder("scores")
            .shared_getter(db.clone())
            .build(&registry)
            .unwrap();

        // Each caller gets its own thread so all loaders can meet at the barrier.
        let handle = tokio::runtime::Handle::current();
        let callers: Vec<_> = (0..CALLERS)
            .map(|_| {
                let group = group.clone();
                let handle = handle.clone();
                tokio::task::spawn_blocking(move || handle.block_on(group.get("Tom")))
            })
            .collect();

        for caller in callers {
            let view = caller.await.unwrap().unwrap();
            assert_eq!(view.to_string(), "Tom");
        }

        assert_eq!(db.loads.load(Ordering::SeqCst), CALLERS, "no request coalescing");
        assert_eq!(group.cached_entries(), 1);
    }

    // ============================================================
    // PEER ROUTING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_failing_peer_falls_back_to_loader() {
        let registry = GroupRegistry::new();
        let (group, loads) = counting_group(&registry, "scores");
        let peer = Arc::new(FailingPeer {
            calls: AtomicUsize::new(0),
        });
        group
            .register_peers(Arc::new(AlwaysPick(peer.clone())))
            .unwrap();

        let view = group.get("Tom").await.unwrap();

        assert_eq!(view.to_string(), "630");
        assert_eq!(peer.calls.load(Ordering::SeqCst), 1, "exactly one peer hop");
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        // The local fallback populated the cache, so neither is asked again.
        group.get("Tom").await.unwrap();
        assert_eq!(peer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_peer_value_is_returned_but_not_cached() {
        let registry = GroupRegistry::new();
        let (group, loads) = counting_group(&registry, "scores");
        let peer = Arc::new(EchoPeer {
            calls: AtomicUsize::new(0),
        });
        group
            .register_peers(Arc::new(AlwaysPick(peer.clone())))
            .unwrap();

        let view = group.get("Tom").await.unwrap();
        assert_eq!(view.to_string(), "remote:scores:Tom");
        assert_eq!(group.cached_entries(), 0);

        group.get("Tom").await.unwrap();
        assert_eq!(peer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_ownership_skips_peers() {
        let registry = GroupRegistry::new();
        let (group, loads) = counting_group(&registry, "scores");
        group.register_peers(Arc::new(NeverPick)).unwrap();

        assert_eq!(group.get("Jack").await.unwrap().to_string(), "589");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    // ============================================================
    // WIRING TESTS
    // ============================================================

    #[test]
    fn test_register_peers_only_once() {
        let registry = GroupRegistry::new();
        let (group, _) = counting_group(&registry, "scores");

        assert!(group.register_peers(Arc::new(NeverPick)).is_ok());
        let second = group.register_peers(Arc::new(NeverPick));

        assert!(matches!(
            second,
            Err(CacheError::PeersAlreadyRegistered(ref name)) if name == "scores"
        ));
    }

    #[test]
    fn test_builder_requires_getter() {
        let registry = GroupRegistry::new();

        let result = Group::builder("orphan").cache_bytes(64).build(&registry);

        assert!(matches!(result, Err(CacheError::MissingGetter(ref name)) if name == "orphan"));
        assert!(registry.get_group("orphan").is_none(), "Failed builds must not register");
    }

    #[test]
    fn test_duplicate_group_name_is_rejected() {
        let registry = GroupRegistry::new();
        let (first, _) = counting_group(&registry, "scores");

        let second = registry.new_group("scores", 0, GetterFn::new(|_| Ok(Vec::new())));

        assert!(matches!(second, Err(CacheError::DuplicateGroup(_))));
        let found = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&first, &found), "The original group must stay registered");
    }

    #[test]
    fn test_registry_lookup() {
        let registry = GroupRegistry::new();
        assert!(registry.is_empty());

        counting_group(&registry, "scores");
        counting_group(&registry, "info");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.group_names(), vec!["info", "scores"]);
        assert_eq!(registry.get_group("info").unwrap().name(), "info");
        assert!(registry.get_group("courses").is_none());
    }

    #[test]
    fn test_shared_getter_serves_multiple_groups() {
        let registry = GroupRegistry::new();
        let getter: Arc<dyn Getter> = Arc::new(GetterFn::new(|key| Ok(key.as_bytes().to_vec())));

        let a = Group::builder("a")
            .shared_getter(getter.clone())
            .build(&registry)
            .unwrap();
        let b = Group::builder("b")
            .shared_getter(getter)
            .build(&registry)
            .unwrap();

        assert_eq!(a.name(), "a");
        assert_eq!(b.name(), "b");
        assert_eq!(Arc::strong_count(&a), 2, "registry and caller hold the group");
    }
}

//! Hash Ring Tests
//!
//! ## Test Scopes
//! - **Lookup**: Clockwise search, wrap-around and the empty-ring sentinel.
//! - **Membership**: Locality of change when a peer is added, replicas = 0.
//! - **Default hash**: Determinism and spread with CRC-32.

#[cfg(test)]
mod tests {
    use crate::ring::{HashFn, HashRing};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Treats the input as a decimal number so ring positions are predictable.
    fn decimal_hash() -> HashFn {
        Arc::new(|data: &[u8]| {
            std::str::from_utf8(data)
                .expect("utf8 input")
                .parse::<u32>()
                .expect("numeric input")
        })
    }

    // ============================================================
    // LOOKUP TESTS
    // ============================================================

    #[test]
    fn test_lookup_walks_clockwise_and_wraps() {
        let mut ring = HashRing::new(3, Some(decimal_hash()));

        // Virtual nodes: 2, 4, 6, 12, 14, 16, 22, 24, 26
        ring.add(["6", "4", "2"]);
        assert_eq!(ring.len(), 9);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, owner) in cases {
            assert_eq!(ring.get(key), Some(owner), "Asking for {}", key);
        }

        // Adds 8, 18, 28: 27 now lands on 28.
        ring.add(["8"]);
        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "8")];
        for (key, owner) in cases {
            assert_eq!(ring.get(key), Some(owner), "Asking for {}", key);
        }
    }

    #[test]
    fn test_empty_ring_has_no_owner() {
        let ring = HashRing::new(50, None);

        assert!(ring.is_empty());
        for i in 0..100 {
            assert_eq!(ring.get(&format!("key_{}", i)), None);
        }
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let mut ring = HashRing::new(3, None);
        ring.add(["A", "B"]);

        for i in 0..200 {
            let key = format!("key_{}", i);
            let first = ring.get(&key).map(str::to_string);
            assert!(first.is_some());
            for _ in 0..3 {
                assert_eq!(ring.get(&key).map(str::to_string), first);
            }
        }
    }

    // ============================================================
    // MEMBERSHIP TESTS
    // ============================================================

    #[test]
    fn test_adding_peer_only_moves_keys_to_new_peer() {
        let peers = ["http://10.0.0.1:8001", "http://10.0.0.2:8001", "http://10.0.0.3:8001"];
        let new_peer = "http://10.0.0.4:8001";

        let mut ring = HashRing::new(50, None);
        ring.add(peers);
        let before: HashMap<String, String> = (0..2000)
            .map(|i| {
                let key = format!("user:{}", i);
                let owner = ring.get(&key).unwrap().to_string();
                (key, owner)
            })
            .collect();

        ring.add([new_peer]);

        let mut moved = 0;
        for (key, old_owner) in &before {
            let owner = ring.get(key).unwrap();
            if owner != old_owner {
                assert_eq!(owner, new_peer, "{} moved between existing peers", key);
                moved += 1;
            }
        }
        assert!(moved > 0, "The new peer should take over some keys");
        assert!(moved < before.len(), "Most keys should stay where they were");
    }

    #[test]
    fn test_repeated_add_duplicates_virtual_nodes() {
        let mut ring = HashRing::new(5, None);
        ring.add(["A"]);
        ring.add(["A"]);

        assert_eq!(ring.len(), 10);
        assert_eq!(ring.get("anything"), Some("A"));
    }

    #[test]
    fn test_zero_replicas_places_nothing() {
        let mut ring = HashRing::new(0, None);
        ring.add(["A", "B"]);

        assert!(ring.is_empty());
        assert_eq!(ring.get("key"), None);
    }

    // ============================================================
    // DEFAULT HASH TESTS
    // ============================================================

    #[test]
    fn test_default_hash_spreads_keys() {
        let mut ring = HashRing::new(50, None);
        ring.add(["A", "B", "C"]);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for i in 0..3000 {
            let key = format!("book_{}", i);
            *counts.entry(ring.get(&key).unwrap()).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 3, "Every peer should own some keys");
        for (peer, count) in counts {
            assert!(count > 300, "Peer {} only owns {} keys", peer, count);
        }
    }
}

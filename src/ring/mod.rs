//! Consistent Hashing Module
//!
//! Maps keys to peer identities with a hash ring of virtual nodes.
//!
//! ## Core Concepts
//! - **Virtual nodes**: Every peer is placed `replicas` times on the ring, at
//!   `hash("{i}{peer}")` for `i` in `0..replicas`, which smooths the load
//!   across peers.
//! - **Lookup**: A key belongs to the first virtual node clockwise from its
//!   own hash, wrapping around at the end of the ring.
//! - **Locality**: Adding a peer only moves the keys that fall into the spans
//!   claimed by its new virtual nodes.

pub mod hash_ring;

pub use hash_ring::{HashFn, HashRing};

#[cfg(test)]
mod tests;

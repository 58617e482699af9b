//! Group Module
//!
//! A `Group` is a cache namespace: a name, a byte budget, a source loader and
//! optionally a peer picker.
//!
//! ## Lookup Sequence
//! 1. **Local cache**: A hit returns immediately.
//! 2. **Owning peer**: On a miss the picker may name a remote owner. A value
//!    fetched from it is returned as-is and not cached locally; a failed
//!    fetch falls through to step 3 (one hop, no retries).
//! 3. **Source loader**: The group's `Getter` produces the value, which is
//!    cached locally. Loader errors go straight back to the caller.
//!
//! Concurrent misses for the same key each run the loader; there is no
//! request coalescing.
//!
//! ## Submodules
//! - **`getter`**: The source loader capability and its closure adapter.
//! - **`group`**: `Group` and `GroupBuilder`.
//! - **`registry`**: Name → group lookup shared by embedders and the peer handler.

pub mod getter;
pub mod group;
pub mod registry;

pub use getter::{Getter, GetterFn};
pub use group::{Group, GroupBuilder};
pub use registry::GroupRegistry;

#[cfg(test)]
mod tests;

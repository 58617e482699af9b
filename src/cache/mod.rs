//! Local Cache Module
//!
//! The in-memory layer every group reads through before touching peers or
//! the source loader.
//!
//! ## Core Concepts
//! - **Byte budget**: Entries are weighed as `key.len() + value.size_bytes()`.
//!   When the budget is exceeded the least recently used entries are evicted.
//!   A budget of `0` disables eviction.
//! - **Immutability**: Cached payloads are wrapped in `ByteView`, which can be
//!   shared between readers but never mutated.
//! - **Locking**: `LruCache` is single-threaded; `ConcurrentCache` serializes
//!   every call behind one mutex and builds the LRU lazily.
//!
//! ## Submodules
//! - **`byteview`**: The immutable value container.
//! - **`lru`**: Arena-backed LRU with an optional eviction callback.
//! - **`concurrent`**: Thread-safe wrapper used by `Group`.

pub mod byteview;
pub mod concurrent;
pub mod lru;

pub use byteview::ByteView;
pub use concurrent::ConcurrentCache;
pub use lru::{ByteSize, LruCache};

//! Sharded Read-Through Cache Library
//!
//! Callers ask a named group for a key. The value comes from this process's
//! cache, from the peer that owns the key on a consistent-hash ring, or from
//! the group's source loader, in that order.
//!
//! ## Architecture Modules
//! - **`cache`**: The byte-budgeted LRU and its thread-safe wrapper. Values are
//!   immutable `ByteView`s.
//! - **`ring`**: Consistent hashing with virtual nodes, used to decide which
//!   peer owns a key.
//! - **`peers`**: The HTTP peer protocol: `HttpPool` picks owners and serves
//!   inbound lookups, `HttpGetter` performs outbound ones.
//! - **`group`**: Cache namespaces, their source loaders and the
//!   `GroupRegistry` that names them.
//! - **`error`**: The `CacheError` taxonomy.
//!
//! ## Example
//! ```
//! use shardcache::group::{GetterFn, GroupRegistry};
//!
//! let registry = GroupRegistry::new();
//! let group = registry
//!     .new_group("scores", 2 << 10, GetterFn::new(|key| Ok(key.as_bytes().to_vec())))
//!     .unwrap();
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let view = rt.block_on(group.get("Tom")).unwrap();
//! assert_eq!(view.to_string(), "Tom");
//! ```

pub mod cache;
pub mod error;
pub mod group;
pub mod peers;
pub mod ring;

pub use cache::ByteView;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, GroupRegistry};
pub use peers::{HttpPool, PoolOptions};

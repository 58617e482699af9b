//! Peer Module
//!
//! Spreads groups across sibling processes over HTTP.
//!
//! ## Core Concepts
//! - **Ownership**: `HttpPool` keeps a `HashRing` of peer base URLs and answers
//!   "who owns this key". Keys owned by this process are served locally.
//! - **Transport**: `HttpGetter` fetches one key from one peer with a plain GET
//!   to `{base_url}{group}/{key}`.
//! - **Inbound**: `HttpPool::serve` implements the server side of the same
//!   protocol; `HttpPool::router` mounts it on an axum `Router`.
//! - **Membership**: Peers are configured from outside and replaced as a
//!   whole with `HttpPool::set`.
//!
//! ## Submodules
//! - **`protocol`**: Wire messages, codec and defaults.
//! - **`traits`**: `PeerPicker` / `PeerGetter` capabilities consumed by `Group`.
//! - **`client`**: Outbound HTTP transport.
//! - **`pool`**: Ring, transports and the inbound request contract.
//! - **`handlers`**: Axum glue.

pub mod client;
pub mod handlers;
pub mod pool;
pub mod protocol;
pub mod traits;

pub use client::HttpGetter;
pub use pool::{HttpPool, PoolOptions};
pub use traits::{PeerFuture, PeerGetter, PeerPicker};

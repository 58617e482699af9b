use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::protocol::{Request, Response};
use crate::error::Result;

/// Boxed future returned by `PeerGetter::get`, so getters can be used as
/// trait objects.
pub type PeerFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote owner of `key`, or `None` when the key should be
    /// served by this process.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a value from one remote peer.
pub trait PeerGetter: Send + Sync {
    fn get<'a>(&'a self, request: &'a Request) -> PeerFuture<'a>;
}

//! Source loader capability.
//!
//! Stateful loaders implement [`Getter`] directly; plain closures are wrapped
//! in [`GetterFn`].

use anyhow::Result;

/// Loads the value of a key from the origin data source.
pub trait Getter: Send + Sync {
    fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// Adapts a closure to [`Getter`].
///
/// ```
/// use shardcache::group::{Getter, GetterFn};
///
/// let getter = GetterFn::new(|key| Ok(key.as_bytes().to_vec()));
/// assert_eq!(getter.get("key").unwrap(), b"key");
/// ```
pub struct GetterFn<F>(pub F);

impl<F> GetterFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}

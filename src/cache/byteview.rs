use std::fmt;
use std::sync::Arc;

use super::lru::ByteSize;

/// An immutable view of a cached payload.
///
/// Clones share the same buffer. Callers get either a read-only borrow or an
/// owned copy, so a value handed out by the cache can never be changed
/// underneath other readers.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Copies `bytes` into a new view.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns an owned copy of the payload.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl ByteSize for ByteView {
    fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Lossy UTF-8 rendering of the payload.
impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.bytes.len())
            .finish()
    }
}

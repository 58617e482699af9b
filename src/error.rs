//! Error types shared by the cache, the groups and the peer layer.

use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("key is required")]
    EmptyKey,

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    #[error("group already exists: {0}")]
    DuplicateGroup(String),

    #[error("group {0} was built without a getter")]
    MissingGetter(String),

    #[error("register_peers called more than once for group {0}")]
    PeersAlreadyRegistered(String),

    /// The source loader failed. Propagated to the caller unchanged.
    #[error(transparent)]
    Load(#[from] anyhow::Error),

    #[error("peer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned: {status} ({url})")]
    PeerStatus { url: String, status: StatusCode },

    #[error("decoding response body: {0}")]
    Codec(#[from] bincode::Error),
}

impl CacheError {
    /// Status used when the error surfaces through the inbound peer handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classifies transport-level failures of a remote peer.
    pub fn is_peer_failure(&self) -> bool {
        matches!(
            self,
            CacheError::Transport(_) | CacheError::PeerStatus { .. } | CacheError::Codec(_)
        )
    }
}

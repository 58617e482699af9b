//! HTTP peer pool.
//!
//! `HttpPool` is both halves of the peer protocol for one process: it picks
//! the owner of a key for outbound fetches and serves inbound fetches from
//! other peers against a `GroupRegistry`.

use axum::http::StatusCode;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::client::HttpGetter;
use super::handlers::PeerReply;
use super::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS, Response, encode_response};
use super::traits::{PeerGetter, PeerPicker};
use crate::group::GroupRegistry;
use crate::ring::{HashFn, HashRing};

/// Tunables for an `HttpPool`.
#[derive(Clone)]
pub struct PoolOptions {
    /// Path prefix for peer requests. Normalized to start and end with `/`.
    pub base_path: String,
    /// Virtual nodes per peer.
    pub replicas: usize,
    /// Ring hash; `None` selects CRC-32.
    pub hash_fn: Option<HashFn>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash_fn: None,
        }
    }
}

impl fmt::Debug for PoolOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolOptions")
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .field("custom_hash", &self.hash_fn.is_some())
            .finish()
    }
}

struct PoolState {
    peers: Vec<String>,
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

pub struct HttpPool {
    /// This peer's base URL, e.g. `http://10.0.0.1:8001`.
    self_url: String,
    base_path: String,
    replicas: usize,
    hash_fn: Option<HashFn>,
    http_client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    pub fn new(self_url: impl Into<String>) -> Self {
        Self::with_options(self_url, PoolOptions::default())
    }

    pub fn with_options(self_url: impl Into<String>, options: PoolOptions) -> Self {
        let self_url = trim_peer(self_url.into());
        Self {
            self_url,
            base_path: normalize_base_path(&options.base_path),
            replicas: options.replicas,
            state: Mutex::new(PoolState {
                peers: Vec::new(),
                ring: HashRing::new(options.replicas, options.hash_fn.clone()),
                getters: HashMap::new(),
            }),
            hash_fn: options.hash_fn,
            http_client: reqwest::Client::new(),
        }
    }

    /// Uses `client` for every outbound peer request. Call before `set`.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the whole peer set, including this process's own URL.
    ///
    /// The ring and every transport are rebuilt from scratch, then swapped in
    /// under the lock.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(|p| trim_peer(p.into())).collect();

        let mut ring = HashRing::new(self.replicas, self.hash_fn.clone());
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    format!("{}{}", peer, self.base_path),
                    self.http_client.clone(),
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        let mut state = self.state.lock();
        *state = PoolState {
            peers,
            ring,
            getters,
        };
        tracing::info!(
            "[Server {}] peer set updated: {} peers",
            self.self_url,
            state.peers.len()
        );
    }

    /// Currently configured peers, in the order given to `set`.
    pub fn peers(&self) -> Vec<String> {
        self.state.lock().peers.clone()
    }

    /// Serves one inbound peer request for `path`.
    ///
    /// `path` is the raw (still percent-encoded) request path.
    pub async fn serve(&self, path: &str, registry: &GroupRegistry) -> PeerReply {
        let Some(rest) = path.strip_prefix(self.base_path.as_str()) else {
            tracing::warn!("[Server {}] unexpected path: {}", self.self_url, path);
            return PeerReply::error(StatusCode::NOT_FOUND, format!("unexpected path: {}", path));
        };
        tracing::info!("[Server {}] GET {}", self.self_url, path);

        let Some((group_part, key_part)) = rest.split_once('/') else {
            return PeerReply::error(StatusCode::BAD_REQUEST, "bad request");
        };
        let (group_name, key) = match (
            urlencoding::decode(group_part),
            urlencoding::decode(key_part),
        ) {
            (Ok(group_name), Ok(key)) => (group_name.into_owned(), key.into_owned()),
            _ => return PeerReply::error(StatusCode::BAD_REQUEST, "bad request"),
        };

        let Some(group) = registry.get_group(&group_name) else {
            return PeerReply::error(
                StatusCode::NOT_FOUND,
                format!("no such group: {}", group_name),
            );
        };

        let view = match group.get(&key).await {
            Ok(view) => view,
            Err(e) => {
                tracing::error!(
                    "[Server {}] failed to load {}/{}: {}",
                    self.self_url,
                    group_name,
                    key,
                    e
                );
                return PeerReply::error(e.status_code(), e.to_string());
            }
        };

        match encode_response(&Response {
            value: view.byte_slice(),
        }) {
            Ok(body) => PeerReply::Value(body),
            Err(e) => PeerReply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer.is_empty() || peer == self.self_url {
            return None;
        }

        tracing::info!("[Server {}] Pick peer {}", self.self_url, peer);
        let getter = state.getters.get(peer)?.clone();
        Some(getter)
    }
}

fn trim_peer(peer: String) -> String {
    peer.trim_end_matches('/').to_string()
}

fn normalize_base_path(base_path: &str) -> String {
    let cleaned = base_path.trim_matches('/');
    if cleaned.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", cleaned)
    }
}

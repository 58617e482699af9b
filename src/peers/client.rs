use super::protocol::{Request, Response, decode_response, request_path};
use super::traits::{PeerFuture, PeerGetter};
use crate::error::{CacheError, Result};

/// HTTP transport to a single peer.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer address plus base path, e.g. `http://10.0.0.2:8008/_shardcache/`.
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch(&self, request: &Request) -> Result<Response> {
        let url = request_path(&self.base_url, request);

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::PeerStatus { url, status });
        }

        let body = response.bytes().await?;
        decode_response(&body)
    }
}

impl PeerGetter for HttpGetter {
    fn get<'a>(&'a self, request: &'a Request) -> PeerFuture<'a> {
        Box::pin(self.fetch(request))
    }
}

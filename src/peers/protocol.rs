//! Peer Network Protocol
//!
//! Defines the messages exchanged between peers and their binary encoding.
//!
//! A request travels in the URL path as `{base_path}{group}/{key}`, both
//! segments percent-encoded, with no body. A successful response carries a
//! bincode-encoded `Response` with an `application/octet-stream` content type.
//! Errors are plain text.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Path prefix under which peers serve each other.
pub const DEFAULT_BASE_PATH: &str = "/_shardcache/";
/// Virtual nodes per peer on the hash ring.
pub const DEFAULT_REPLICAS: usize = 50;

pub const CONTENT_TYPE_VALUE: &str = "application/octet-stream";
pub const CONTENT_TYPE_ERROR: &str = "text/plain; charset=utf-8";

/// A lookup of one key in one group on a remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub group: String,
    pub key: String,
}

/// The value returned by a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub value: Vec<u8>,
}

pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    Ok(bincode::serialize(response)?)
}

pub fn decode_response(body: &[u8]) -> Result<Response> {
    Ok(bincode::deserialize(body)?)
}

/// Builds the path of `request` below `base`, e.g. `/_shardcache/scores/Tom`.
pub fn request_path(base: &str, request: &Request) -> String {
    format!(
        "{}{}/{}",
        base,
        urlencoding::encode(&request.group),
        urlencoding::encode(&request.key)
    )
}

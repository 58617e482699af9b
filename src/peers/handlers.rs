use axum::{
    Router,
    extract::Extension,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;

use super::pool::HttpPool;
use super::protocol::{CONTENT_TYPE_ERROR, CONTENT_TYPE_VALUE};
use crate::group::GroupRegistry;

/// Outcome of an inbound peer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerReply {
    /// Wire-encoded `protocol::Response`.
    Value(Vec<u8>),
    Error { status: StatusCode, message: String },
}

impl PeerReply {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        PeerReply::Error {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PeerReply::Value(_) => StatusCode::OK,
            PeerReply::Error { status, .. } => *status,
        }
    }
}

impl IntoResponse for PeerReply {
    fn into_response(self) -> Response {
        match self {
            PeerReply::Value(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, CONTENT_TYPE_VALUE)],
                body,
            )
                .into_response(),
            PeerReply::Error { status, message } => (
                status,
                [(header::CONTENT_TYPE, CONTENT_TYPE_ERROR)],
                message,
            )
                .into_response(),
        }
    }
}

pub async fn handle_peer_request(
    Extension(pool): Extension<Arc<HttpPool>>,
    Extension(registry): Extension<Arc<GroupRegistry>>,
    uri: Uri,
) -> PeerReply {
    pool.serve(uri.path(), &registry).await
}

impl HttpPool {
    /// Router answering `GET {base_path}{group}/{key}` for `registry`.
    ///
    /// The bare base path is routed too so that it gets the same 400 as any
    /// other malformed peer path. Merge it into the embedder's application;
    /// binding and shutdown stay with the caller.
    pub fn router(self: &Arc<Self>, registry: Arc<GroupRegistry>) -> Router {
        Router::new()
            .route(self.base_path(), get(handle_peer_request))
            .route(
                &format!("{}*path", self.base_path()),
                get(handle_peer_request),
            )
            .layer(Extension(self.clone()))
            .layer(Extension(registry))
    }
}

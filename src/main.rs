use anyhow::Context;
use axum::extract::{Extension, Query};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use clap::Parser;
use dashmap::DashMap;
use serde::Deserialize;
use shardcache::peers::protocol::CONTENT_TYPE_VALUE;
use shardcache::{Getter, Group, GroupRegistry, HttpPool};
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs one cache node serving the `scores` group.
#[derive(Debug, Parser)]
#[command(name = "shardcache-node", version, about)]
struct Args {
    /// Port for peer traffic.
    #[arg(long, env = "SHARDCACHE_PORT", default_value_t = 8001)]
    port: u16,

    /// Base URLs of every peer, this node included.
    #[arg(long, env = "SHARDCACHE_PEERS", value_delimiter = ',')]
    peers: Vec<String>,

    /// Also start the front-end API.
    #[arg(long)]
    api: bool,

    #[arg(long, env = "SHARDCACHE_API_PORT", default_value_t = 9999)]
    api_port: u16,

    #[arg(long, env = "SHARDCACHE_LOG_LEVEL", default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
}

/// Stand-in for a slow origin database.
struct ScoresDb {
    rows: DashMap<String, String>,
}

impl ScoresDb {
    fn seeded() -> Self {
        let rows = DashMap::new();
        rows.insert("Tom".to_string(), "630".to_string());
        rows.insert("Jack".to_string(), "589".to_string());
        rows.insert("Sam".to_string(), "567".to_string());
        Self { rows }
    }
}

impl Getter for ScoresDb {
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        tracing::info!("[SlowDB] search key {}", key);
        match self.rows.get(key) {
            Some(value) => Ok(value.as_bytes().to_vec()),
            None => anyhow::bail!("{} not exist", key),
        }
    }
}

#[derive(Deserialize)]
struct ApiParams {
    key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let self_url = format!("http://localhost:{}", args.port);
    let peers = if args.peers.is_empty() {
        vec![self_url.clone()]
    } else {
        args.peers.clone()
    };

    // 1. Groups:
    let registry = GroupRegistry::new();
    let scores = registry.new_group("scores", 2 << 10, ScoresDb::seeded())?;

    // 2. Peers:
    let pool = Arc::new(HttpPool::new(self_url.clone()));
    pool.set(peers.clone());
    scores.register_peers(pool.clone())?;
    tracing::info!("Peers: {:?}", peers);

    // 3. Front-end API:
    if args.api {
        let api = Router::new()
            .route("/api", get(handle_api))
            .layer(Extension(scores.clone()));
        let api_addr = SocketAddr::from(([127, 0, 0, 1], args.api_port));
        let listener = tokio::net::TcpListener::bind(api_addr)
            .await
            .with_context(|| format!("binding api server on {}", api_addr))?;

        tracing::info!("Frontend server is running at http://{}", api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api).await {
                tracing::error!("API server stopped: {}", e);
            }
        });
    }

    // 4. Peer server:
    let app = pool.router(registry);
    let peer_addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(peer_addr)
        .await
        .with_context(|| format!("binding peer server on {}", peer_addr))?;

    tracing::info!("shardcache is running at {}", self_url);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_api(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> impl IntoResponse {
    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_VALUE)],
            view.byte_slice(),
        )
            .into_response(),
        Err(e) => (e.status_code(), e.to_string()).into_response(),
    }
}

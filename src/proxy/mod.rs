//! Stateless HTTP proxy endpoints the editor front end calls to reach remote media.

mod error;
mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::ProxyConfig;

pub use error::ProxyError;
pub use routes::{fetch_video, youtube_info, FetchedResponse};

#[derive(Clone)]
pub struct ProxyState {
    pub cfg: Arc<ProxyConfig>,
    pub client: reqwest::Client,
}

impl ProxyState {
    pub fn new(cfg: ProxyConfig) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self {
            cfg: Arc::new(cfg),
            client,
        })
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/fetch-video", post(fetch_video))
        .route("/youtube", get(youtube_info))
        .with_state(state)
}

pub async fn run_server(cfg: ProxyConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = cfg.socket_addr()?;
    let app = router(ProxyState::new(cfg)?);

    tracing::info!(%addr, "proxy listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

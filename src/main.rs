//! nla-proxy
//!
//! Serves the video-fetch and video-info endpoints the editor front end calls.

use nla_timeline::{config::ProxyConfig, logging, proxy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init_tracing();

    let cfg = ProxyConfig::load()?;
    tracing::info!(
        base_url = %cfg.video_info_base_url,
        token = cfg.video_info_token.is_some(),
        "nla-proxy starting"
    );
    proxy::run_server(cfg).await
}

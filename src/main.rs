//! Feed server — binary entrypoint.
//! Serves the rendered event feed, the data directory, health and metrics.

use std::path::Path;

use anyhow::Context;
use gw_feed::api::{self, AppState};
use gw_feed::config::feed::FeedConfig;
use gw_feed::metrics::Metrics;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    gw_feed::init_tracing();

    let cfg = FeedConfig::load_default().context("loading feed config")?;
    info!(
        data_path = %cfg.data_path,
        base_url = ?cfg.base_url,
        bind = %cfg.bind,
        "feed config loaded"
    );

    let metrics = Metrics::init().context("installing prometheus recorder")?;

    let data_dir = Path::new(&cfg.data_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf);
    let app = api::router(AppState::from_config(&cfg), data_dir).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("binding {}", cfg.bind))?;
    info!(addr = %cfg.bind, "feed server listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

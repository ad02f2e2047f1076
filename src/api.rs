use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::services::ServeDir;

use crate::config::feed::FeedConfig;
use crate::container::FeedContainer;
use crate::loader::FeedSource;
use crate::page::render_page;
use crate::pipeline;
use crate::render::RenderOptions;

#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn FeedSource>,
    options: Arc<RenderOptions>,
    container_id: String,
    page_title: String,
}

impl AppState {
    pub fn new(source: Arc<dyn FeedSource>, cfg: &FeedConfig) -> Self {
        Self {
            source,
            options: Arc::new(cfg.render_options()),
            container_id: cfg.container_id.clone(),
            page_title: cfg.page_title.clone(),
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Self {
        Self::new(Arc::from(cfg.build_source()), cfg)
    }
}

/// `/` renders the feed, `/health` answers `OK`. The data directory is served
/// under `/data` when `data_dir` is given.
pub fn router(state: AppState, data_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }));
    if let Some(dir) = data_dir {
        app = app.nest_service("/data", ServeDir::new(dir));
    }
    app.with_state(state)
}

// Every request is a fresh page load: new container, one pass, no diffing.
async fn index(State(state): State<AppState>) -> Html<String> {
    let mut container = FeedContainer::new(state.container_id.clone());
    let _ = pipeline::run(state.source.as_ref(), &mut container, &state.options).await;
    Html(render_page(&container, &state.page_title))
}

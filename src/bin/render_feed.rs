//! Renders the feed page once and writes it to stdout, or to the path given
//! as the first argument (static site mode).

use anyhow::Context;
use gw_feed::config::feed::FeedConfig;
use gw_feed::container::FeedContainer;
use gw_feed::page::render_page;
use gw_feed::pipeline::{self, FeedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    gw_feed::init_tracing();

    let cfg = FeedConfig::load_default().context("loading feed config")?;
    let source = cfg.build_source();
    let mut container = FeedContainer::new(cfg.container_id.clone());
    let state = pipeline::run(source.as_ref(), &mut container, &cfg.render_options()).await;
    let page = render_page(&container, &cfg.page_title);

    match std::env::args().nth(1) {
        Some(out) => {
            tokio::fs::write(&out, page)
                .await
                .with_context(|| format!("writing {out}"))?;
            tracing::info!(path = %out, "page written");
        }
        None => print!("{page}"),
    }

    if let FeedState::Errored { message } = state {
        eprintln!("feed render failed: {message}");
        std::process::exit(1);
    }
    Ok(())
}

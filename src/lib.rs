// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod container;
pub mod derive;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::container::FeedContainer;
pub use crate::derive::{
    classify_type, clean_title, derive_date_from_id, render_score, Classification, DerivedFields,
    ScoreDots,
};
pub use crate::loader::{FeedSource, LoadError};
pub use crate::model::EventRecord;
pub use crate::pipeline::FeedState;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the tracing subscriber for the binaries.
/// `RUST_LOG` overrides the default filter; `FEED_LOG_JSON=1` switches to JSON lines.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gw_feed=info,warn"));
    let json = std::env::var("FEED_LOG_JSON").ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        let _ = registry.with(fmt::layer().json()).try_init();
    } else {
        let _ = registry.with(fmt::layer().compact()).try_init();
    }
}

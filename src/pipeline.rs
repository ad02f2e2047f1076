// src/pipeline.rs
//! One render pass: `Idle -> Loading -> {Rendered | Errored}`.

use crate::container::FeedContainer;
use crate::loader::{load_once, FeedSource, LoadError};
use crate::model::EventRecord;
use crate::render::{present_error, render_feed, RenderOptions};

/// Settled outcome of the load.
pub type Settled = Result<Vec<EventRecord>, LoadError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Idle,
    Loading,
    Rendered { cards: usize },
    Errored { message: String },
}

impl FeedState {
    pub fn is_settled(&self) -> bool {
        matches!(self, FeedState::Rendered { .. } | FeedState::Errored { .. })
    }
}

/// Applies a settled load to the container. Rendering itself cannot fail.
pub fn settle(container: &mut FeedContainer, settled: Settled, opts: &RenderOptions) -> FeedState {
    match settled {
        Ok(records) => {
            render_feed(container, &records, opts);
            FeedState::Rendered {
                cards: records.len(),
            }
        }
        Err(e) => {
            present_error(container, &e);
            FeedState::Errored {
                message: e.to_string(),
            }
        }
    }
}

/// Runs the whole pass once. The load is the only await point.
pub async fn run(
    source: &dyn FeedSource,
    container: &mut FeedContainer,
    opts: &RenderOptions,
) -> FeedState {
    let mut state = FeedState::Idle;
    tracing::debug!(?state, source = source.name(), "feed pass starting");

    state = FeedState::Loading;
    tracing::debug!(?state, "loading events");
    let settled = load_once(source).await;

    state = settle(container, settled, opts);
    match &state {
        FeedState::Rendered { cards } => tracing::info!(cards = *cards, "feed rendered"),
        FeedState::Errored { message } => tracing::warn!(%message, "feed errored"),
        _ => {}
    }
    state
}

// src/metrics.rs
//! Prometheus exposition for the feed's load/render telemetry.

use axum::{extract::State, routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const METRICS_PATH: &str = "/metrics";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

/// Series names so they show up before the first page load.
pub fn describe_feed_metrics() {
    describe_counter!("feed_loads_total", "Events document loads attempted.");
    describe_counter!(
        "feed_load_failures_total",
        "Loads that ended in a fetch or parse failure."
    );
    describe_counter!("feed_cards_rendered_total", "Event cards rendered.");
    describe_histogram!("feed_load_ms", "Load time in milliseconds, parse included.");
    describe_histogram!("feed_parse_ms", "JSON parse time in milliseconds.");
}

impl Metrics {
    /// Installs the global recorder and describes the feed series.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe_feed_metrics();
        Ok(Self { handle })
    }

    /// Wraps an already-installed recorder handle.
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        describe_feed_metrics();
        Self { handle }
    }

    /// `GET /metrics`, merged into the feed router by the server binary.
    pub fn router(&self) -> Router {
        Router::new()
            .route(METRICS_PATH, get(scrape))
            .with_state(self.handle.clone())
    }
}

async fn scrape(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

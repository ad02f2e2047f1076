// src/loader.rs
//! Data loading: one retrieval of the events document, then JSON parsing.
//!
//! Sources implement [`FeedSource`]. The load is the only suspension point of
//! a render pass; there is no retry and no cache.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::model::EventRecord;

/// Message carried by every fetch failure, whatever the transport detail.
pub const FETCH_FAILURE_MESSAGE: &str = "data file not found";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Non-success response, transport error, or unreadable file.
    #[error("{0}")]
    Fetch(String),
    /// Body is not a JSON array of objects.
    #[error("invalid data file: {0}")]
    Parse(String),
}

impl LoadError {
    pub fn fetch() -> Self {
        LoadError::Fetch(FETCH_FAILURE_MESSAGE.to_string())
    }
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn load(&self) -> Result<Vec<EventRecord>, LoadError>;
    fn name(&self) -> &'static str;
}

/// Parses the events document. Records are returned in document order, unmodified.
pub fn parse_records(body: &str) -> Result<Vec<EventRecord>, LoadError> {
    let t0 = Instant::now();
    let value: Value = serde_json::from_str(body).map_err(|e| LoadError::Parse(e.to_string()))?;
    if !value.is_array() {
        return Err(LoadError::Parse("expected a JSON array of events".to_string()));
    }
    let records: Vec<EventRecord> =
        serde_json::from_value(value).map_err(|e| LoadError::Parse(e.to_string()))?;

    histogram!("feed_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    Ok(records)
}

/// Reads the events document from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn load(&self) -> Result<Vec<EventRecord>, LoadError> {
        let body = match tokio::fs::read_to_string(&self.path).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = ?e, path = %self.path.display(), "data file read failed");
                return Err(LoadError::fetch());
            }
        };
        parse_records(&body)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Fetches the events document with one GET of `base_url` + relative path.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    url: String,
    client: Client,
    timeout: Duration,
}

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn build_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "http client build failed, using defaults");
        Client::new()
    })
}

impl HttpFeedSource {
    pub fn new(base_url: &str, path: &str) -> Self {
        Self {
            url: join_url(base_url, path),
            client: build_client(DEFAULT_HTTP_TIMEOUT),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self.client = build_client(self.timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn load(&self) -> Result<Vec<EventRecord>, LoadError> {
        let resp = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, url = %self.url, "feed http error");
                return Err(LoadError::fetch());
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), url = %self.url, "feed http non-success status");
            return Err(LoadError::fetch());
        }
        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = ?e, url = %self.url, "feed http body read failed");
                return Err(LoadError::fetch());
            }
        };
        parse_records(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches("./").trim_start_matches('/')
    )
}

/// In-memory source: a fixed body, or a fixed failure.
#[derive(Debug, Clone)]
pub struct FixtureFeedSource {
    outcome: Result<String, LoadError>,
}

impl FixtureFeedSource {
    pub fn from_body(body: &str) -> Self {
        Self {
            outcome: Ok(body.to_string()),
        }
    }

    pub fn failing(err: LoadError) -> Self {
        Self { outcome: Err(err) }
    }
}

#[async_trait]
impl FeedSource for FixtureFeedSource {
    async fn load(&self) -> Result<Vec<EventRecord>, LoadError> {
        match &self.outcome {
            Ok(body) => parse_records(body),
            Err(e) => Err(e.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// Runs one load through `source`, recording load telemetry.
pub async fn load_once(source: &dyn FeedSource) -> Result<Vec<EventRecord>, LoadError> {
    let t0 = Instant::now();
    counter!("feed_loads_total").increment(1);
    let out = source.load().await;
    histogram!("feed_load_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    if let Err(e) = &out {
        tracing::warn!(error = %e, source = source.name(), "feed load failed");
        counter!("feed_load_failures_total").increment(1);
    }
    out
}

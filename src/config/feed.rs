// src/config/feed.rs
use serde::Deserialize;
use std::{env, fs, path::Path};

use crate::container::DEFAULT_CONTAINER_ID;
use crate::derive::DEFAULT_DETAIL_BASE_URL;
use crate::loader::{FeedSource, FileFeedSource, HttpFeedSource};
use crate::render::{RenderOptions, ScoreStyle};

pub const DEFAULT_FEED_CONFIG_PATH: &str = "config/feed.json";

pub const ENV_FEED_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const ENV_FEED_DATA_PATH: &str = "FEED_DATA_PATH";
pub const ENV_FEED_BASE_URL: &str = "FEED_BASE_URL";
pub const ENV_FEED_BIND: &str = "FEED_BIND";
pub const ENV_FEED_SCORE_STYLE: &str = "FEED_SCORE_STYLE";

fn default_data_path() -> String {
    "data/events.json".to_string()
}
fn default_container_id() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}
fn default_detail_base_url() -> String {
    DEFAULT_DETAIL_BASE_URL.to_string()
}
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_page_title() -> String {
    "Gravitational wave events".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    /// Relative path of the events document.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// When set, the document is fetched over HTTP from `{base_url}/{data_path}`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    #[serde(default = "default_detail_base_url")]
    pub detail_base_url: String,
    #[serde(default)]
    pub score_style: ScoreStyle,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_page_title")]
    pub page_title: String,
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            base_url: None,
            container_id: default_container_id(),
            detail_base_url: default_detail_base_url(),
            score_style: ScoreStyle::default(),
            bind: default_bind(),
            page_title: default_page_title(),
            http_timeout_secs: default_timeout_secs(),
        }
    }
}

impl FeedConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: FeedConfig = serde_json::from_str(&data)?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Config file from `$FEED_CONFIG_PATH`, else `config/feed.json`, else defaults.
    /// Env overrides apply in every case.
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_FEED_CONFIG_PATH) {
            if !Path::new(&p).exists() {
                anyhow::bail!("{ENV_FEED_CONFIG_PATH} points to non-existent path: {p}");
            }
            return Self::load_from_file(p);
        }
        if Path::new(DEFAULT_FEED_CONFIG_PATH).exists() {
            return Self::load_from_file(DEFAULT_FEED_CONFIG_PATH);
        }
        let mut cfg = Self::default();
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_non_empty(ENV_FEED_DATA_PATH) {
            self.data_path = v;
        }
        if let Some(v) = env_non_empty(ENV_FEED_BASE_URL) {
            self.base_url = Some(v);
        }
        if let Some(v) = env_non_empty(ENV_FEED_BIND) {
            self.bind = v;
        }
        if let Some(v) = env_non_empty(ENV_FEED_SCORE_STYLE) {
            match ScoreStyle::parse(&v) {
                Some(style) => self.score_style = style,
                None => tracing::warn!(value = %v, "ignoring unknown {ENV_FEED_SCORE_STYLE}"),
            }
        }
        if self.base_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.base_url = None;
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            score_style: self.score_style,
            detail_base_url: self.detail_base_url.clone(),
        }
    }

    /// HTTP source when `base_url` is set, file source otherwise.
    pub fn build_source(&self) -> Box<dyn FeedSource> {
        match &self.base_url {
            Some(base) => Box::new(
                HttpFeedSource::new(base, &self.data_path).with_timeout(self.http_timeout_secs),
            ),
            None => Box::new(FileFeedSource::new(&self.data_path)),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let cfg: FeedConfig = serde_json::from_str(r#"{"score_style": "numeric"}"#).unwrap();
        assert_eq!(cfg.score_style, ScoreStyle::Numeric);
        assert_eq!(cfg.data_path, "data/events.json");
        assert_eq!(cfg.container_id, "feed");
        assert_eq!(cfg.base_url, None);
    }

    #[test]
    fn source_kind_follows_base_url() {
        let mut cfg = FeedConfig::default();
        assert_eq!(cfg.build_source().name(), "file");
        cfg.base_url = Some("http://localhost:8000".into());
        assert_eq!(cfg.build_source().name(), "http");
    }
}

// src/container.rs
//! The feed container: the one element a render pass writes into.
//!
//! It is created by the caller (page or test) and handed to the renderer,
//! so there is no ambient lookup of a global element.

use html_escape::encode_double_quoted_attribute;

pub const DEFAULT_CONTAINER_ID: &str = "feed";
pub const LOADING_PLACEHOLDER: &str = r#"<p class="loading">Loading events…</p>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedContainer {
    id: String,
    children: Vec<String>,
}

impl FeedContainer {
    /// New container holding the loading placeholder.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: vec![LOADING_PLACEHOLDER.to_string()],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn append(&mut self, fragment: String) {
        self.children.push(fragment);
    }

    /// Drops every child and leaves `fragment` as the only one.
    pub fn replace_with(&mut self, fragment: String) {
        self.children.clear();
        self.children.push(fragment);
    }

    pub fn card_count(&self) -> usize {
        self.children
            .iter()
            .filter(|c| c.starts_with(r#"<article class="event-card""#))
            .count()
    }

    pub fn inner_html(&self) -> String {
        self.children.concat()
    }

    pub fn to_html(&self) -> String {
        format!(
            "<section id=\"{}\">{}</section>",
            encode_double_quoted_attribute(&self.id),
            self.inner_html()
        )
    }
}

impl Default for FeedContainer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_ID)
    }
}

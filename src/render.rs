// src/render.rs
//! Card template and error block.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};
use metrics::counter;
use serde::Deserialize;

use crate::container::FeedContainer;
use crate::derive::{DerivedFields, ScoreDots, DEFAULT_DETAIL_BASE_URL};
use crate::loader::LoadError;
use crate::model::{non_empty, EventRecord};

pub const ERROR_PREFIX: &str = "Loading error: ";
pub const ERROR_HINT: &str = "The ingest script may need to run once first.";
/// Shown for a missing score (numeric style) or a missing distance.
pub const NOT_AVAILABLE: &str = "N/A";

/// How the score cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStyle {
    /// Ten dots, the first `score` of them active.
    #[default]
    Dots,
    /// Plain `"{score}/10"`.
    Numeric,
}

impl ScoreStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dots" => Some(Self::Dots),
            "numeric" => Some(Self::Numeric),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub score_style: ScoreStyle,
    pub detail_base_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            score_style: ScoreStyle::Dots,
            detail_base_url: DEFAULT_DETAIL_BASE_URL.to_string(),
        }
    }
}

fn score_dots_html(dots: &ScoreDots) -> String {
    let mut out = String::from(r#"<span class="score-dots">"#);
    for on in dots.units() {
        out.push_str(if *on {
            r#"<span class="dot active"></span>"#
        } else {
            r#"<span class="dot"></span>"#
        });
    }
    out.push_str("</span>");
    out
}

fn score_cell(derived: &DerivedFields, style: ScoreStyle) -> String {
    match style {
        ScoreStyle::Dots => score_dots_html(&derived.dots),
        ScoreStyle::Numeric => match derived.score {
            Some(s) => format!("{s}/10"),
            None => NOT_AVAILABLE.to_string(),
        },
    }
}

/// One `<article>` for one record. Missing fields render as empty text or fallbacks.
pub fn render_card(record: &EventRecord, derived: &DerivedFields, opts: &RenderOptions) -> String {
    let c = derived.classification;
    let distance = non_empty(&record.distance).unwrap_or(NOT_AVAILABLE);

    let mut html = String::with_capacity(1024);
    // write! into a String cannot fail
    let _ = write!(
        html,
        concat!(
            r#"<article class="event-card">"#,
            r#"<div class="meta"><span class="badge {class}">{label}</span><span class="date">{date}</span></div>"#,
            "<h2>{title}</h2>",
            r#"<p class="summary">{summary}</p>"#,
            r#"<div class="details-grid">"#,
            r#"<div class="detail-item"><span class="label">Catalogue ID</span><span class="value">{id}</span></div>"#,
            r#"<div class="detail-item"><span class="label">Score</span><span class="value">{score}</span></div>"#,
            r#"<div class="detail-item"><span class="label">Distance</span><span class="value">{distance}</span></div>"#,
            "</div>",
            r#"<a href="{href}" target="_blank" rel="noopener" class="raw-link">GraceDB source &rarr;</a>"#,
            "</article>"
        ),
        class = encode_double_quoted_attribute(c.class),
        label = encode_text(c.label),
        date = encode_text(&derived.date),
        title = encode_text(&derived.title),
        summary = encode_text(record.summary.as_deref().unwrap_or_default()),
        id = encode_text(record.id_or_empty()),
        score = score_cell(derived, opts.score_style),
        distance = encode_text(distance),
        href = encode_double_quoted_attribute(&derived.detail_url),
    );
    html
}

/// Clears the container once, then appends one card per record in input order.
pub fn render_feed(container: &mut FeedContainer, records: &[EventRecord], opts: &RenderOptions) {
    container.clear();
    for record in records {
        let derived = DerivedFields::from_record(record, &opts.detail_base_url);
        container.append(render_card(record, &derived, opts));
    }
    counter!("feed_cards_rendered_total").increment(records.len() as u64);
}

/// Replaces the container's contents with the single error block.
pub fn present_error(container: &mut FeedContainer, err: &LoadError) {
    let block = format!(
        r#"<p class="feed-error">{}{}. <br>{}</p>"#,
        ERROR_PREFIX,
        encode_text(&err.to_string()),
        ERROR_HINT
    );
    container.replace_with(block);
}

// tests/loader_http.rs
//
// HttpFeedSource against a throwaway local axum server.

use axum::{http::StatusCode, routing::get, Router};
use gw_feed::container::FeedContainer;
use gw_feed::loader::{FeedSource, HttpFeedSource, LoadError};
use gw_feed::pipeline::{self, FeedState};
use gw_feed::render::RenderOptions;

const TWO: &str = include_str!("fixtures/events_two.json");

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/data/events.json", get(|| async { TWO }))
        .route("/broken/events.json", get(|| async { "[{\"id\": " }))
        .route(
            "/missing/events.json",
            get(|| async { (StatusCode::NOT_FOUND, "nope") }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn http_source_loads_records() {
    let base = spawn_server().await;
    let src = HttpFeedSource::new(&base, "data/events.json");
    assert!(src.url().ends_with("/data/events.json"));

    let records = src.load().await.expect("load ok");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id_or_empty(), "S251117dq");
    assert_eq!(records[1].id_or_empty(), "GW150914");
}

#[tokio::test]
async fn non_success_status_is_fetch_failure() {
    let base = spawn_server().await;
    let src = HttpFeedSource::new(&base, "missing/events.json");
    assert_eq!(src.load().await, Err(LoadError::fetch()));
}

#[tokio::test]
async fn malformed_body_is_parse_failure() {
    let base = spawn_server().await;
    let src = HttpFeedSource::new(&base, "broken/events.json");
    assert!(matches!(src.load().await, Err(LoadError::Parse(_))));
}

#[tokio::test]
async fn unreachable_host_is_fetch_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let src = HttpFeedSource::new(&format!("http://{addr}"), "data/events.json").with_timeout(2);
    assert_eq!(src.load().await, Err(LoadError::fetch()));
}

#[tokio::test]
async fn non_success_status_renders_error_block_only() {
    let base = spawn_server().await;
    let src = HttpFeedSource::new(&base, "missing/events.json");
    let mut feed = FeedContainer::default();
    let state = pipeline::run(&src, &mut feed, &RenderOptions::default()).await;

    assert_eq!(
        state,
        FeedState::Errored {
            message: "data file not found".into()
        }
    );
    assert_eq!(feed.children().len(), 1);
    assert!(feed.children()[0].contains("Loading error: data file not found"));
    assert_eq!(feed.card_count(), 0);
}

//! Shared fixtures for source integration tests.

#![allow(dead_code)]

use std::path::Path;

use axum::{http::StatusCode, routing::get, Router};
use flashcard_core::Snapshot;

pub const JAPANESE_DECK: &str = "front,back\r\napple,りんご\r\nsky,空\r\nwater,水\r\n";
pub const HEADERLESS_DECK: &str = "apple,りんご\nsky,空\n";

/// Write `content` to `name` under `dir` and return the full path as a string.
pub fn write_deck(dir: &Path, name: &str, content: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write deck fixture");
    path.display().to_string()
}

/// Serve a handful of deck routes on an ephemeral port. Returns the base URL.
pub async fn spawn_deck_server() -> String {
    let app = Router::new()
        .route("/decks/n5.csv", get(|| async { JAPANESE_DECK }))
        .route("/decks/empty.csv", get(|| async { "" }))
        .route("/decks/latin1.csv", get(|| async { b"caf\xe9,coffee\ntea,th\xe9".to_vec() }))
        .route("/decks/private.csv", get(|| async { StatusCode::FORBIDDEN }))
        .route(
            "/decks/broken.csv",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve decks");
    });
    format!("http://{}", addr)
}

/// Render sink that keeps every frame.
#[derive(Default)]
pub struct Frames(pub Vec<Snapshot>);

impl flashcard_core::RenderSink for Frames {
    fn render(&mut self, snapshot: &Snapshot) {
        self.0.push(snapshot.clone());
    }
}

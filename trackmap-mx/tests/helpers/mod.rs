//! Test Helper Utilities
//!
//! Shared fixtures and collaborator mocks for trackmap-mx tests

#![allow(dead_code)]

pub mod mocks;

pub use mocks::{MockCatalog, MockJudge, MockSearch};

use trackmap_mx::models::{Album, Track};
use trackmap_mx::services::{SearchHit, VideoDetails};

/// Track with one artist and no album/ISRC
pub fn track(id: &str, name: &str, duration_ms: u64) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        duration_ms,
        artists: vec!["Artist".to_string()],
        album: Album::default(),
        isrc: None,
    }
}

pub fn hit(id: &str, title: &str, channel: &str) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        title: title.to_string(),
        channel: channel.to_string(),
    }
}

pub fn details(duration_ms: u64, description: &str) -> VideoDetails {
    VideoDetails {
        duration_ms,
        description: description.to_string(),
    }
}

/// Serve `app` on an ephemeral local port; returns the base URL
pub async fn spawn_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

/// Base URL of a local port with nothing listening
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}", addr)
}

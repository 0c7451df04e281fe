//! Ollama judge against a local stub endpoint

mod helpers;

use axum::{http::StatusCode, routing::post, Json, Router};
use helpers::{spawn_stub, track, unreachable_url};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trackmap_mx::models::{watch_url, Candidate};
use trackmap_mx::services::{AiJudge, JudgeSettings, OllamaJudge, Verdict};

fn candidate(id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: "Artist - Song (Official Audio)".to_string(),
        channel: "Label".to_string(),
        duration_ms: 200_000,
        description: String::new(),
        has_bad_words: false,
        is_topic: false,
        isrc_in_description: false,
        url: watch_url(id),
    }
}

fn judge(base_url: &str) -> OllamaJudge {
    OllamaJudge::new(JudgeSettings {
        url: format!("{}/api/generate", base_url),
        model: "llama3".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

/// Stub replying with `status` and `{"response": text}`, capturing the request body
async fn stub(status: StatusCode, text: &'static str) -> (String, Arc<Mutex<Option<Value>>>) {
    let captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();
    let app = Router::new().route(
        "/api/generate",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(body);
                (status, Json(json!({ "response": text, "done": true })))
            }
        }),
    );
    (spawn_stub(app).await, captured)
}

#[tokio::test]
async fn test_verdict_from_clean_json() {
    let (url, captured) = stub(
        StatusCode::OK,
        r#"{"bestId":"vid1","confidence":0.82,"reason":"official audio upload"}"#,
    )
    .await;

    let verdict = judge(&url)
        .judge(&track("t1", "Song", 200_000), &[candidate("vid1"), candidate("vid2")])
        .await;

    assert_eq!(verdict.best_id.as_deref(), Some("vid1"));
    assert_eq!(verdict.confidence, Some(0.82));
    assert_eq!(verdict.reason.as_deref(), Some("official audio upload"));

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "llama3");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["temperature"], 0.0);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("\"vid2\""));
    assert!(prompt.ends_with("Return strict JSON only."));
}

#[tokio::test]
async fn test_verdict_from_wrapped_json() {
    let (url, _) = stub(
        StatusCode::OK,
        "Here you go:\n```json\n{\"bestId\": \"vid2\", \"reason\": \"topic\"}\n```",
    )
    .await;

    let verdict = judge(&url)
        .judge(&track("t1", "Song", 200_000), &[candidate("vid2")])
        .await;

    assert_eq!(verdict.best_id.as_deref(), Some("vid2"));
}

#[tokio::test]
async fn test_non_success_status_is_no_opinion() {
    let (url, _) = stub(StatusCode::INTERNAL_SERVER_ERROR, r#"{"bestId":"vid1"}"#).await;

    let verdict = judge(&url)
        .judge(&track("t1", "Song", 200_000), &[candidate("vid1")])
        .await;

    assert_eq!(verdict, Verdict::no_opinion());
}

#[tokio::test]
async fn test_garbage_is_no_opinion() {
    let (url, _) = stub(StatusCode::OK, "I think the second one, probably.").await;

    let verdict = judge(&url)
        .judge(&track("t1", "Song", 200_000), &[candidate("vid1")])
        .await;

    assert_eq!(verdict, Verdict::no_opinion());
}

#[tokio::test]
async fn test_non_json_body_is_no_opinion() {
    let app = Router::new().route("/api/generate", post(|| async { "plain text, not json" }));
    let url = spawn_stub(app).await;

    let verdict = judge(&url)
        .judge(&track("t1", "Song", 200_000), &[candidate("vid1")])
        .await;

    assert_eq!(verdict, Verdict::no_opinion());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_no_opinion() {
    let url = unreachable_url().await;

    let verdict = judge(&url)
        .judge(&track("t1", "Song", 200_000), &[candidate("vid1")])
        .await;

    assert_eq!(verdict, Verdict::no_opinion());
}

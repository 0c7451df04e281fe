//! Ollama-compatible AI judge
//!
//! Sends one non-streaming `/api/generate` request per candidate set at temperature 0
//! and reads the model text from the `response` field. No retries: any failure is
//! logged and becomes "no opinion".

use super::ai_judge::{build_prompt, parse_verdict, AiJudge, JudgeError, Verdict};
use crate::models::{Candidate, Track};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolved judge endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeSettings {
    /// Full generate endpoint URL
    pub url: String,
    pub model: String,
    /// HTTP request timeout
    pub timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// AI judge backed by an Ollama-compatible endpoint
pub struct OllamaJudge {
    http_client: Client,
    settings: JudgeSettings,
}

impl OllamaJudge {
    pub fn new(settings: JudgeSettings) -> Result<Self, JudgeError> {
        let http_client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| JudgeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    async fn request_verdict(
        &self,
        track: &Track,
        candidates: &[Candidate],
    ) -> Result<Verdict, JudgeError> {
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt: build_prompt(track, candidates),
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        let response = self
            .http_client
            .post(&self.settings.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| JudgeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(JudgeError::Status(status.as_u16()));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::Parse(e.to_string()))?;
        let text = payload.response.unwrap_or_default();
        let text = text.trim();

        debug!(track = %track.name, response = %text, "AI judge responded");
        Ok(parse_verdict(text))
    }
}

#[async_trait]
impl AiJudge for OllamaJudge {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn judge(&self, track: &Track, candidates: &[Candidate]) -> Verdict {
        match self.request_verdict(track, candidates).await {
            Ok(verdict) => {
                info!(
                    track = %track.name,
                    best_id = ?verdict.best_id,
                    confidence = ?verdict.confidence,
                    "AI judge verdict"
                );
                verdict
            }
            Err(e) => {
                warn!(
                    track = %track.name,
                    model = %self.settings.model,
                    error = %e,
                    "AI judge unavailable, no opinion"
                );
                Verdict::no_opinion()
            }
        }
    }
}

//! Gemini `generateContent` client.
//!
//! # Invariants
//! - One HTTP request per `generate` call; no retries.
//! - The API key only ever travels in the request URL, never in logs.

use crate::gateway::text_generation::{GenerationError, TextGenerationService};
use crate::logging::{sanitize_message, MAX_LOGGED_TEXT_CHARS};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiTextGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiTextGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Points the client at another `models` root, e.g. a regional proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

/// Error bodies are free text; keep them to one bounded line.
fn upstream_error(status: Option<u16>, body: &str) -> GenerationError {
    GenerationError::Upstream {
        status,
        message: sanitize_message(body.trim(), MAX_LOGGED_TEXT_CHARS),
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Concatenated text of the first candidate; empty when there is none.
fn response_text(response: GenerateResponse) -> Result<String, GenerationError> {
    if let Some(error) = response.error {
        return Err(upstream_error(None, &error.message));
    }

    let text = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

#[async_trait]
impl TextGenerationService for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "event=gemini_request module=gateway status=error http_status={} model={}",
                status.as_u16(),
                self.model
            );
            return Err(upstream_error(Some(status.as_u16()), &body));
        }

        let text = response_text(response.json::<GenerateResponse>().await?)?;
        debug!(
            "event=gemini_request module=gateway status=ok model={} prompt_chars={} response_chars={}",
            self.model,
            prompt.chars().count(),
            text.chars().count()
        );
        Ok(text)
    }
}

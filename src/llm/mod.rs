//! Reqwest-based client for the Gemini `generateContent` endpoint.

use std::future::Future;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Failure classes of a single completion call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// Rate limit or server-side failure; worth retrying.
    #[error("transient service error (status {status}): {message}")]
    Transient { status: u16, message: String },

    /// The service answered but the generated text could not be found.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Anything else (bad key, bad request, transport failure).
    #[error("{0}")]
    Fatal(String),
}

impl CompletionError {
    pub fn is_transient(&self) -> bool {
        matches!(self, CompletionError::Transient { .. })
    }
}

/// A remote text-completion service.
pub trait CompletionBackend {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn from_config(cfg: &Config, api_key: &str, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.api_base_url(),
            model: model.to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate_internal(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| CompletionError::Fatal("API key contains invalid characters".into()))?;
        headers.insert("x-goog-api-key", key);

        let body = GenerateRequest::from_prompt(prompt);

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent request");
        let resp = self
            .http
            .post(self.endpoint())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Fatal(format!("failed to send request: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CompletionError::Fatal(format!("failed to read response body: {e}")))?;

        classify_response(status, &text)
    }
}

impl CompletionBackend for GeminiClient {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, CompletionError>> + Send {
        self.generate_internal(prompt)
    }
}

/// Map a raw HTTP status and body to generated text or an error class.
pub fn classify_response(status: StatusCode, body: &str) -> Result<String, CompletionError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(CompletionError::Transient { status: status.as_u16(), message });
        }
        return Err(CompletionError::Fatal(format!("Gemini API error {}: {}", status.as_u16(), message)));
    }

    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::Malformed(format!("invalid JSON: {e}")))?;
    parsed.first_text()
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part { text: Some(prompt.to_string()) }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, or `Malformed` if any link is missing.
    fn first_text(self) -> Result<String, CompletionError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Malformed("no candidates".into()))?;
        let content = candidate
            .content
            .ok_or_else(|| CompletionError::Malformed("candidate has no content".into()))?;
        content
            .parts
            .into_iter()
            .next()
            .and_then(|p| p.text)
            .ok_or_else(|| CompletionError::Malformed("content has no text part".into()))
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

//! LLM Client: the single point of entry for all calls to the local Ollama runtime.
//!
//! ARCHITECTURAL RULE: No other module may talk to Ollama over HTTP directly.
//! Everything goes through the `ModelBackend` trait so the gateway can be
//! exercised against a fake backend in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Ollama is unreachable: {0}")]
    Unreachable(reqwest::Error),

    #[error("Ollama did not answer within {0:?}")]
    Timeout(Duration),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("Ollama API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode Ollama response: {0}")]
    Decode(String),
}

/// Output shape requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    /// Ollama's best-effort JSON mode (`"format": "json"`).
    Json,
}

/// One blocking generation call.
#[derive(Debug, Clone)]
pub struct GenerateParams<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub format: OutputFormat,
}

/// The external model service: "generate text" and "list models".
///
/// Carried in `AppState` as `Arc<dyn ModelBackend>`.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Returns the complete generated text. Never streams.
    async fn generate(&self, params: GenerateParams<'_>) -> Result<String, BackendError>;

    /// Model identifiers in the order the backend reports them.
    async fn list_models(&self) -> Result<Vec<String>, BackendError>;
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
    #[serde(default)]
    total_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaTags {
    models: Vec<OllamaModelEntry>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelEntry {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// HTTP client for the Ollama REST API.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Unreachable)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Unreachable(e)
        }
    }

    /// Turns a non-2xx response into a `BackendError`, reading Ollama's `{"error": ...}` body.
    /// A 404 only means "unknown model" on endpoints that take a model name.
    async fn error_from_response(
        &self,
        response: reqwest::Response,
        names_model: bool,
    ) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<OllamaError>(&body)
            .map(|e| e.error)
            .unwrap_or(body);

        if names_model && status == StatusCode::NOT_FOUND {
            BackendError::ModelNotFound(message)
        } else {
            BackendError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl ModelBackend for OllamaClient {
    async fn generate(&self, params: GenerateParams<'_>) -> Result<String, BackendError> {
        let body = OllamaGenerateRequest {
            model: params.model,
            prompt: params.prompt,
            stream: false,
            format: match params.format {
                OutputFormat::Text => None,
                OutputFormat::Json => Some("json"),
            },
        };

        let response = self
            .client
            .post(format!("{}{GENERATE_PATH}", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response, true).await);
        }

        let generated: OllamaGenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout)
            } else {
                BackendError::Decode(e.to_string())
            }
        })?;

        debug!(
            "Ollama generate succeeded: model={}, eval_count={:?}, total_duration_ns={:?}",
            params.model, generated.eval_count, generated.total_duration
        );

        Ok(generated.response)
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let response = self
            .client
            .get(format!("{}{TAGS_PATH}", self.base_url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response, false).await);
        }

        let tags: OllamaTags = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        tags.models
            .into_iter()
            .map(|entry| {
                entry
                    .model
                    .or(entry.name)
                    .ok_or_else(|| BackendError::Decode("model entry without an identifier".into()))
            })
            .collect()
    }
}

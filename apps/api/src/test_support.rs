//! In-process stand-in for the Ollama backend, shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{BackendError, GenerateParams, ModelBackend, OutputFormat};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub format: OutputFormat,
}

type Reply = Box<dyn Fn() -> Result<String, BackendError> + Send + Sync>;
type Listing = Box<dyn Fn() -> Result<Vec<String>, BackendError> + Send + Sync>;

/// Answers every `generate` with a fixed reply and records what it was asked.
pub struct FakeBackend {
    reply: Reply,
    listing: Listing,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeBackend {
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self {
            reply: Box::new(move || Ok(text.clone())),
            listing: Box::new(|| Ok(vec!["mistral:latest".to_string()])),
            calls: Arc::default(),
        }
    }

    /// Fails every operation with a fresh error from `make_error`.
    pub fn failing(make_error: fn() -> BackendError) -> Self {
        Self {
            reply: Box::new(move || Err(make_error())),
            listing: Box::new(move || Err(make_error())),
            calls: Arc::default(),
        }
    }

    pub fn with_models(models: &[&str]) -> Self {
        let models: Vec<String> = models.iter().map(|m| m.to_string()).collect();
        Self {
            listing: Box::new(move || Ok(models.clone())),
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for FakeBackend {
    async fn generate(&self, params: GenerateParams<'_>) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: params.model.to_string(),
            prompt: params.prompt.to_string(),
            format: params.format,
        });
        (self.reply)()
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        (self.listing)()
    }
}

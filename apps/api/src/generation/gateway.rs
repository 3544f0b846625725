//! Generation gateway: prompt → backend → normalized result.
//!
//! Every backend failure is classified into a closed set of kinds so the HTTP
//! layer can tell "backend down" apart from "backend returned garbage".

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generation::mode::GenerationMode;
use crate::generation::normalize::{normalize_cases, Repair};
use crate::generation::prompts::build_prompt;
use crate::generation::CaseMap;
use crate::llm_client::{BackendError, GenerateParams, ModelBackend};

/// Outcome of one generation request. Serializes as the bare text or the bare map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Narrative(String),
    Structured(CaseMap),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    InvalidModel(String),

    #[error("{0}")]
    MalformedOutput(String),

    #[error("{0}")]
    Timeout(String),
}

impl GatewayError {
    /// Stable machine-readable discriminator exposed to HTTP callers.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            GatewayError::InvalidModel(_) => "INVALID_MODEL",
            GatewayError::MalformedOutput(_) => "MALFORMED_OUTPUT",
            GatewayError::Timeout(_) => "BACKEND_TIMEOUT",
        }
    }
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err {
            BackendError::Unreachable(_) | BackendError::Api { .. } => {
                GatewayError::BackendUnavailable(message)
            }
            BackendError::Timeout(_) => GatewayError::Timeout(message),
            BackendError::ModelNotFound(_) => GatewayError::InvalidModel(message),
            BackendError::Decode(_) => GatewayError::MalformedOutput(message),
        }
    }
}

/// Runs one generation. Exactly one backend call, no retries.
pub async fn generate(
    backend: &dyn ModelBackend,
    requirement: &str,
    model: &str,
    mode: GenerationMode,
) -> Result<GenerationResult, GatewayError> {
    let prompt = build_prompt(mode, requirement);
    info!(
        "Generating {mode} with model {model} (requirement: {} chars)",
        requirement.chars().count()
    );

    let raw = backend
        .generate(GenerateParams {
            model,
            prompt: &prompt,
            format: mode.output_format(),
        })
        .await?;

    if !mode.is_structured() {
        return Ok(GenerationResult::Narrative(raw));
    }

    let normalized =
        normalize_cases(&raw).map_err(|e| GatewayError::MalformedOutput(e.to_string()))?;

    match normalized.repair {
        Repair::None => debug!("Model output parsed without repair"),
        repair => warn!("Model output for {mode} needed repair '{repair}' (model {model})"),
    }

    Ok(GenerationResult::Structured(normalized.cases))
}

/// Lists the backend's models in the order it reports them. Never cached.
pub async fn list_models(backend: &dyn ModelBackend) -> Result<Vec<String>, GatewayError> {
    let models = backend.list_models().await?;
    debug!("Backend reports {} models", models.len());
    Ok(models)
}

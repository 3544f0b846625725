// Test-case generation: prompt building, the gateway to the model backend,
// and normalization of the model's JSON output.
// All model calls go through llm_client::ModelBackend, never direct HTTP.

use indexmap::IndexMap;

pub mod example;
pub mod gateway;
pub mod handlers;
pub mod mode;
pub mod normalize;
pub mod prompts;

pub use gateway::{GatewayError, GenerationResult};
pub use mode::GenerationMode;

/// Structured model output: case/check label ("1", "2", ...) → description.
/// Keeps the order the model produced.
pub type CaseMap = IndexMap<String, String>;

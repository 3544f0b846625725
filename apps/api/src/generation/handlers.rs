//! Axum route handlers for the generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::gateway::{generate, list_models, GenerationResult};
use crate::generation::{CaseMap, GenerationMode};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RequirementRequest {
    pub requirement: String,
    /// Falls back to the configured default model.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestCasesResponse {
    pub requirement: String,
    pub test_cases: GenerationResult,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct StructuredCasesResponse {
    pub requirement: String,
    pub result: GenerationResult,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct AvailableModelsResponse {
    pub available_models: Vec<String>,
}

/// Validates the request and runs the gateway. Returns (requirement, model, result).
async fn run(
    state: &AppState,
    request: RequirementRequest,
    mode: GenerationMode,
) -> Result<(String, String, GenerationResult), AppError> {
    if request.requirement.trim().is_empty() {
        return Err(AppError::Validation(
            "requirement cannot be empty".to_string(),
        ));
    }

    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.default_model.clone());

    let result = generate(state.backend.as_ref(), &request.requirement, &model, mode).await?;
    Ok((request.requirement, model, result))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-test-cases/
///
/// Markdown test cases, returned exactly as the model wrote them.
pub async fn handle_generate_test_cases(
    State(state): State<AppState>,
    Json(request): Json<RequirementRequest>,
) -> Result<Json<TestCasesResponse>, AppError> {
    let (requirement, model, test_cases) = run(&state, request, GenerationMode::Narrative).await?;
    Ok(Json(TestCasesResponse {
        requirement,
        test_cases,
        model,
    }))
}

/// POST /generate_test_case/
///
/// Test cases as a `{"1": "...", ...}` map under `result`.
pub async fn handle_generate_structured_cases(
    State(state): State<AppState>,
    Json(request): Json<RequirementRequest>,
) -> Result<Json<StructuredCasesResponse>, AppError> {
    let (requirement, model, result) =
        run(&state, request, GenerationMode::StructuredCases).await?;
    Ok(Json(StructuredCasesResponse {
        requirement,
        result,
        model,
    }))
}

/// POST /generate_check_list/
///
/// The checklist map itself is the response body.
pub async fn handle_generate_checklist(
    State(state): State<AppState>,
    Json(request): Json<RequirementRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let (_, _, checklist) = run(&state, request, GenerationMode::Checklist).await?;
    Ok(Json(checklist))
}

/// GET /available-models/
pub async fn handle_available_models(
    State(state): State<AppState>,
) -> Result<Json<AvailableModelsResponse>, AppError> {
    let available_models = list_models(state.backend.as_ref()).await?;
    Ok(Json(AvailableModelsResponse { available_models }))
}

/// POST /test/
///
/// Canned result for client development. The request body is never read.
pub async fn handle_example(State(state): State<AppState>) -> Json<CaseMap> {
    Json(state.example.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::generation::example::load_example;
    use crate::llm_client::{BackendError, ModelBackend};
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::test_support::FakeBackend;

    const LOGIN_CHECKLIST: &str = r#"{"1": "Login form displays username and password fields", "2": "Valid credentials grant access"}"#;

    fn app(backend: Arc<FakeBackend>) -> Router {
        let backend: Arc<dyn ModelBackend> = backend;
        build_router(AppState {
            backend,
            default_model: "mistral:latest".to_string(),
            example: Arc::new(load_example().unwrap()),
        })
    }

    async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read(response).await
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read(response).await
    }

    async fn read(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_test_cases_echoes_requirement_and_model() {
        let backend = Arc::new(FakeBackend::replying("1. Успешный вход"));
        let (status, body) = post(
            app(backend.clone()),
            "/generate-test-cases/",
            r#"{"requirement": "User can log in with valid credentials", "model": "deepseek-r1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "requirement": "User can log in with valid credentials",
                "test_cases": "1. Успешный вход",
                "model": "deepseek-r1"
            })
        );
        assert_eq!(backend.calls()[0].model, "deepseek-r1");
    }

    #[tokio::test]
    async fn test_missing_model_uses_default() {
        let backend = Arc::new(FakeBackend::replying("ok"));
        let (status, body) = post(
            app(backend.clone()),
            "/generate-test-cases/",
            r#"{"requirement": "Search returns results"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "mistral:latest");
        assert_eq!(backend.calls()[0].model, "mistral:latest");
    }

    #[tokio::test]
    async fn test_checklist_body_is_the_mapping() {
        let backend = Arc::new(FakeBackend::replying(&format!("'{LOGIN_CHECKLIST}'")));
        let (status, body) = post(
            app(backend),
            "/generate_check_list/",
            r#"{"requirement": "User can log in with valid credentials", "model": "mistral:latest"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::from_str::<Value>(LOGIN_CHECKLIST).unwrap());
    }

    #[tokio::test]
    async fn test_structured_cases_under_result() {
        let backend = Arc::new(FakeBackend::replying(LOGIN_CHECKLIST));
        let (status, body) = post(
            app(backend),
            "/generate_test_case/",
            r#"{"requirement": "User can log in with valid credentials"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requirement"], "User can log in with valid credentials");
        assert_eq!(body["result"]["2"], "Valid credentials grant access");
    }

    #[tokio::test]
    async fn test_malformed_output_is_500() {
        let backend = Arc::new(FakeBackend::replying("I cannot produce JSON today"));
        let (status, body) = post(
            app(backend),
            "/generate_check_list/",
            r#"{"requirement": "Logout clears the session"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "MALFORMED_OUTPUT");
        assert!(body["detail"].as_str().unwrap().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_backend_failure_is_500_with_original_message() {
        let backend = Arc::new(FakeBackend::failing(|| {
            BackendError::ModelNotFound("model 'ghost' not found, try pulling it first".into())
        }));

        for uri in ["/generate-test-cases/", "/generate_test_case/", "/generate_check_list/"] {
            let (status, body) = post(
                app(backend.clone()),
                uri,
                r#"{"requirement": "Anything", "model": "ghost"}"#,
            )
            .await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body["code"], "INVALID_MODEL");
            assert!(body["detail"].as_str().unwrap().contains("model 'ghost' not found"));
        }

        let (status, body) = get(app(backend), "/available-models/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_blank_requirement_rejected_without_backend_call() {
        let backend = Arc::new(FakeBackend::replying("unused"));
        let (status, body) = post(
            app(backend.clone()),
            "/generate-test-cases/",
            r#"{"requirement": "   "}"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_available_models() {
        let backend = Arc::new(FakeBackend::with_models(&["mistral:latest", "deepseek-r1"]));
        let (status, body) = get(app(backend), "/available-models/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "available_models": ["mistral:latest", "deepseek-r1"] })
        );
    }

    #[tokio::test]
    async fn test_example_ignores_body() {
        let backend = Arc::new(FakeBackend::replying("unused"));
        let (status_a, body_a) = post(app(backend.clone()), "/test/", r#"{"requirement": "a"}"#).await;
        let (status_b, body_b) = post(app(backend.clone()), "/test/", "not even json").await;

        assert_eq!(status_a, StatusCode::OK);
        assert_eq!(status_b, StatusCode::OK);
        assert_eq!(body_a, body_b);
        assert_eq!(body_a, serde_json::to_value(load_example().unwrap()).unwrap());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let backend = Arc::new(FakeBackend::replying(""));
        let (status, body) = get(app(backend.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "casegen-api");
        assert_eq!(body["default_model"], "mistral:latest");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_checklist_keeps_model_key_order() {
        let backend = Arc::new(FakeBackend::replying(r#"{"2": "b", "10": "c", "1": "a"}"#));
        let response = app(backend)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate_check_list/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"requirement": "Pagination"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"2":"b","10":"c","1":"a"}"#
        );
    }
}

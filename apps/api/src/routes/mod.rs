pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route(
            "/generate-test-cases/",
            post(handlers::handle_generate_test_cases),
        )
        .route(
            "/generate_test_case/",
            post(handlers::handle_generate_structured_cases),
        )
        .route(
            "/generate_check_list/",
            post(handlers::handle_generate_checklist),
        )
        .route(
            "/available-models/",
            get(handlers::handle_available_models),
        )
        // Canned result for client development
        .route("/test/", post(handlers::handle_example))
        .with_state(state)
}

mod config;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AllowedOrigins, Config};
use crate::generation::example::load_example;
use crate::llm_client::OllamaClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting test case generator API v{}", env!("CARGO_PKG_VERSION"));

    let ollama = OllamaClient::new(&config.ollama_host, config.ollama_timeout)
        .context("Failed to build Ollama HTTP client")?;
    info!(
        "Ollama client initialized ({}, timeout {:?}, default model {})",
        ollama.base_url(),
        config.ollama_timeout,
        config.default_model
    );

    let example = load_example()?;

    let state = AppState {
        backend: Arc::new(ollama),
        default_model: config.default_model.clone(),
        example: Arc::new(example),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors(&config.allowed_origins)?),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST/PORT do not form a valid socket address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Browser-extension CORS policy. An explicit list allows credentials and
/// mirrors the requested method/headers; `*` falls back to fully permissive.
fn build_cors(origins: &AllowedOrigins) -> Result<CorsLayer> {
    match origins {
        AllowedOrigins::Any => Ok(CorsLayer::permissive()),
        AllowedOrigins::List(list) => {
            let values = list
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(CorsLayer::new()
                .allow_origin(AllowOrigin::list(values))
                .allow_credentials(true)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request()))
        }
    }
}

use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "mistral:latest";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "chrome-extension://ifilkkfhbldegbjggdapmcbcogcpllfd,http://localhost";

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `ALLOWED_ORIGINS=*`
    Any,
    List(Vec<String>),
}

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare `cargo run` talks to a local Ollama.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_host: String,
    pub default_model: String,
    pub allowed_origins: AllowedOrigins,
    pub host: String,
    pub port: u16,
    pub ollama_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ollama_host: env_or("OLLAMA_HOST", DEFAULT_OLLAMA_HOST),
            default_model: env_or("DEFAULT_MODEL", DEFAULT_MODEL),
            allowed_origins: parse_origins(&env_or("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS))?,
            host: env_or("HOST", "127.0.0.1"),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            ollama_timeout: Duration::from_secs(
                env_or("OLLAMA_TIMEOUT_SECS", "300")
                    .parse::<u64>()
                    .context("OLLAMA_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses a comma-separated origin list. A lone `*` means any origin.
pub fn parse_origins(raw: &str) -> Result<AllowedOrigins> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        if origins.len() > 1 {
            bail!("ALLOWED_ORIGINS cannot mix '*' with explicit origins");
        }
        return Ok(AllowedOrigins::Any);
    }
    if origins.is_empty() {
        bail!("ALLOWED_ORIGINS must name at least one origin (or '*')");
    }
    Ok(AllowedOrigins::List(origins))
}

use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::{is_supported_model, DEFAULT_MODEL, SUPPORTED_MODELS};
use crate::matching::chunker::DEFAULT_CHUNK_SIZE;
use crate::matching::ranker::DEFAULT_TOP_K;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub jobs_csv_path: String,
    pub ollama_url: String,
    pub default_model: String,
    pub generation_timeout_secs: u64,
    pub top_k: usize,
    pub chunk_size: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs_csv_path: "jobs.csv".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            generation_timeout_secs: 120,
            top_k: DEFAULT_TOP_K,
            chunk_size: DEFAULT_CHUNK_SIZE,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            jobs_csv_path: lookup("JOBS_CSV_PATH").unwrap_or(defaults.jobs_csv_path),
            ollama_url: lookup("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            default_model: lookup("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            generation_timeout_secs: parse_or(
                &lookup,
                "GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout_secs,
            )?,
            top_k: parse_or(&lookup, "TOP_K", defaults.top_k)?,
            chunk_size: parse_or(&lookup, "CHUNK_SIZE", defaults.chunk_size)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        };

        if !is_supported_model(&config.default_model) {
            bail!(
                "DEFAULT_MODEL '{}' is not one of: {}",
                config.default_model,
                SUPPORTED_MODELS.join(", ")
            );
        }
        if config.generation_timeout_secs == 0 {
            bail!("GENERATION_TIMEOUT_SECS must be greater than zero");
        }

        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{is_supported_model, SUPPORTED_MODELS};
use crate::matching::pipeline::{find_matches, MatchReport};
use crate::models::job::JobPosting;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<&'static str>,
    pub default_model: String,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub count: usize,
    pub postings: Vec<JobPosting>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matches
///
/// Ranks the job corpus against the resume text and explains the top matches.
/// Generation failures are reported in the body, not as an HTTP error.
pub async fn handle_find_matches(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let model = resolve_model(request.model.as_deref(), &state.config.default_model)?;
    let top_k = request.top_k.unwrap_or(state.config.top_k);
    let request_id = Uuid::new_v4();

    let report = find_matches(
        request_id,
        &state.corpus,
        state.generator.as_ref(),
        &request.resume_text,
        &model,
        top_k,
    )
    .instrument(tracing::info_span!("find_matches", %request_id, %model))
    .await;

    Ok(Json(report))
}

/// GET /api/v1/models
pub async fn handle_list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: SUPPORTED_MODELS.to_vec(),
        default_model: state.config.default_model.clone(),
    })
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<JobsResponse> {
    Json(JobsResponse {
        count: state.corpus.len(),
        postings: state.corpus.postings().to_vec(),
    })
}

/// Picks the requested model, falling back to the default when none (or a blank one) is given.
fn resolve_model(requested: Option<&str>, default_model: &str) -> Result<String, AppError> {
    match requested.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(default_model.to_string()),
        Some(model) if is_supported_model(model) => Ok(model.to_string()),
        Some(model) => Err(AppError::Validation(format!(
            "Unsupported model '{model}'. Choose one of: {}",
            SUPPORTED_MODELS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model_defaults() {
        assert_eq!(resolve_model(None, "llama3.2").unwrap(), "llama3.2");
        assert_eq!(resolve_model(Some("  "), "phi3").unwrap(), "phi3");
    }

    #[test]
    fn test_resolve_model_accepts_supported() {
        assert_eq!(resolve_model(Some("mistral"), "llama3.2").unwrap(), "mistral");
    }

    #[test]
    fn test_resolve_model_rejects_unknown() {
        let err = resolve_model(Some("gpt-4"), "llama3.2").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("gpt-4")));
    }
}

//! Match pipeline — ranks the corpus against a resume and asks the backend to explain the fit.
//!
//! Flow: rank → build_prompt → generate → MatchReport.
//!
//! A failed generation call never fails the pipeline: the ranked matches are still
//! returned and the failure is reported in `explanation`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::corpus::JobCorpus;
use crate::llm_client::{GenerationBackend, GenerationError};
use crate::matching::prompts::{build_prompt, preview, DESCRIPTION_SNIPPET_CHARS};
use crate::matching::ranker::{rank_scored, ScoredMatch};

/// Prefix on every generation failure message shown to users.
pub const GENERATION_ERROR_PREFIX: &str = "Error calling generation backend";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Result of the explanation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// The backend's text, passed through unmodified.
    Completed { text: String },
    Failed { message: String },
    /// No postings matched, so no call was made.
    Skipped,
}

impl GenerationOutcome {
    fn from_result(result: Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => GenerationOutcome::Completed { text },
            Err(e) => GenerationOutcome::Failed {
                message: format!("{GENERATION_ERROR_PREFIX}: {e}"),
            },
        }
    }
}

/// One ranked posting as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub rank: usize,
    pub score: usize,
    pub title: String,
    pub company: String,
    pub description: String,
    /// Shortened description for listings.
    pub snippet: String,
}

impl MatchView {
    fn new(rank: usize, scored: &ScoredMatch<'_>) -> Self {
        let posting = scored.posting;
        Self {
            rank,
            score: scored.score,
            title: posting.title.clone(),
            company: posting.company.clone(),
            description: posting.description.clone(),
            snippet: preview(&posting.description, DESCRIPTION_SNIPPET_CHARS),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub request_id: Uuid,
    pub model: String,
    pub matches: Vec<MatchView>,
    pub explanation: GenerationOutcome,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs one "find matches" action against the corpus.
pub async fn find_matches(
    request_id: Uuid,
    corpus: &JobCorpus,
    generator: &dyn GenerationBackend,
    resume_text: &str,
    model: &str,
    top_k: usize,
) -> MatchReport {
    let scored = rank_scored(resume_text, corpus.postings(), top_k);
    info!(
        "Ranked {} postings, kept {} (top_k={})",
        corpus.len(),
        scored.len(),
        top_k
    );

    let explanation = if scored.is_empty() {
        GenerationOutcome::Skipped
    } else {
        let postings: Vec<_> = scored.iter().map(|m| m.posting).collect();
        let prompt = build_prompt(resume_text, &postings);
        let outcome = GenerationOutcome::from_result(generator.generate(&prompt, model).await);
        if let GenerationOutcome::Failed { message } = &outcome {
            warn!("{message}");
        }
        outcome
    };

    MatchReport {
        request_id,
        model: model.to_string(),
        matches: scored
            .iter()
            .enumerate()
            .map(|(i, m)| MatchView::new(i + 1, m))
            .collect(),
        explanation,
        generated_at: Utc::now(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Axum route handlers for resume upload.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::ingestion::extract::{extract_text, UploadedDocument};
use crate::matching::chunker::{chunk_text, Chunk};
use crate::matching::prompts::{preview, RESUME_PREVIEW_CHARS};
use crate::state::AppState;

/// Multipart field carrying the resume file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub resume_text: String,
    pub preview: String,
    pub chunk_count: usize,
    /// Informational only; matching scores the whole resume text.
    pub chunks: Vec<Chunk>,
}

/// POST /api/v1/resumes/extract
///
/// Accepts a multipart upload (field `file`), extracts its text and chunks it.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        document = Some(UploadedDocument {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let document = document.ok_or_else(|| {
        AppError::Validation(format!("Missing multipart field '{FILE_FIELD}'"))
    })?;

    let resume_text = extract_text(document).await?;
    let chunks = chunk_text(&resume_text, state.config.chunk_size);
    info!(
        "Extracted resume: {} chars, {} chunks",
        resume_text.chars().count(),
        chunks.len()
    );

    Ok(Json(ExtractResponse {
        preview: preview(&resume_text, RESUME_PREVIEW_CHARS),
        chunk_count: chunks.len(),
        chunks,
        resume_text,
    }))
}

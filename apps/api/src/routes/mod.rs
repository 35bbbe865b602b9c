pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingestion;
use crate::matching;
use crate::state::AppState;

/// Resume uploads above this size are rejected.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes/extract",
            post(ingestion::handlers::handle_extract_resume)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/matches",
            post(matching::handlers::handle_find_matches),
        )
        .route("/api/v1/models", get(matching::handlers::handle_list_models))
        .route("/api/v1/jobs", get(matching::handlers::handle_list_jobs))
        .with_state(state)
}

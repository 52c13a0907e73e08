pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Analyze flow
        .route("/api/v1/sessions/:id/analyze", post(handlers::handle_analyze))
        .route("/api/v1/sessions/:id/chat", post(handlers::handle_chat))
        .route(
            "/api/v1/sessions/:id/analysis.pdf",
            get(handlers::handle_analysis_pdf),
        )
        // Generate flow
        .route("/api/v1/sessions/:id/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/sessions/:id/generated.pdf",
            get(handlers::handle_generated_pdf),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

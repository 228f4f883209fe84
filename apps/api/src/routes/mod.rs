pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/jd/generate", post(handlers::handle_generate_jd))
        .route("/jd/upload", post(handlers::handle_upload_jd))
        .route("/resumes/score", post(handlers::handle_score_resumes))
        .route("/email/generate", post(handlers::handle_generate_email))
        // Paths used by the original front-end
        .route("/generate_jd", post(handlers::handle_generate_jd))
        .route("/match_resumes", post(handlers::handle_score_resumes))
        .route("/generate_email", post(handlers::handle_generate_email))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::{self as analysis, MAX_AUDIO_BYTES};
use crate::auth::handlers as auth;
use crate::sheets::handlers as sheets;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", get(analysis::handle_get_analysis))
        .route("/api/v1/analysis/text", post(analysis::handle_analyze_text))
        .route(
            "/api/v1/analysis/audio",
            post(analysis::handle_analyze_audio).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        // Sheets API
        .route("/api/v1/sheets/load", post(sheets::handle_load_sheet))
        .route("/api/v1/sheets/context", get(sheets::handle_get_context))
        .route("/api/v1/sheets/results", post(sheets::handle_save_result))
        // Auth API
        .route("/api/v1/auth/session", get(auth::handle_get_session))
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        .with_state(state)
}
